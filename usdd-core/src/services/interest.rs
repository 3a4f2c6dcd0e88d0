//! Interest distribution engine
//!
//! Splits a freshly issued pool across every holder in proportion to their
//! balance at the reference supply (the supply before the pool was minted):
//!
//! ```text
//! share = floor(balance * pool / reference_supply)
//! ```
//!
//! Shares below the baseline are not handed out. Whatever the shares do not
//! cover goes to the treasury in one transfer, so the shares plus the
//! remainder always add up to the pool exactly.

use crate::domain::{
    Action, Asset, DistributionMode, DistributionReport, LedgerError, LedgerResult, Name, Share,
};

use super::context::ActionContext;

/// Distribute `pool` from `issuer` against `reference_supply`
///
/// In immediate mode each share becomes a forwarded transfer from the
/// issuer; in accrual mode it is added to the holder's interest in place.
/// The ledger's own holding never takes part.
pub fn distribute(
    ctx: &mut ActionContext<'_>,
    pool: &Asset,
    reference_supply: i64,
    issuer: &Name,
    mode: DistributionMode,
) -> LedgerResult<DistributionReport> {
    let symbol = pool.symbol.clone();
    let mut report = DistributionReport {
        mode,
        pool: pool.clone(),
        reference_supply,
        shares: Vec::new(),
        remainder: Asset::zero(symbol.clone()),
        skipped: false,
    };

    // The ceiling binds every self-issue, including the first one.
    if pool.amount > ctx.config.distribution_ceiling {
        return Err(LedgerError::PoolAboveCeiling {
            pool: pool.amount,
            ceiling: ctx.config.distribution_ceiling,
        });
    }
    // Nothing to be proportional to yet: the first issuance stays with the issuer.
    if reference_supply == 0 {
        report.skipped = true;
        return Ok(report);
    }
    if pool.amount > reference_supply {
        return Err(LedgerError::PoolExceedsSupply {
            pool: pool.amount,
            supply: reference_supply,
        });
    }

    let ledger = ctx.ledger();
    let holders: Vec<(Name, i64)> = ctx
        .state
        .holdings_of(symbol.code())
        .filter(|h| &h.owner != ledger)
        .map(|h| (h.owner.clone(), h.balance.amount))
        .collect();

    let mut remaining = pool.amount;
    for (owner, balance) in holders {
        if balance > reference_supply {
            return Err(LedgerError::HolderExceedsSupply {
                owner,
                balance,
                supply: reference_supply,
            });
        }

        let share = proportional_share(balance, pool.amount, reference_supply);
        if share < ctx.config.baseline {
            continue;
        }

        let amount = Asset::new(share, symbol.clone());
        match mode {
            DistributionMode::Immediate => {
                ctx.send_inline(Action::transfer(issuer, &owner, amount.clone(), ""), issuer);
            }
            DistributionMode::Accrual => {
                if let Some(holding) = ctx.state.holding_mut(&owner, symbol.code()) {
                    holding.interest = holding.interest.checked_add(&amount)?;
                }
            }
        }
        remaining -= share;
        report.shares.push(Share { owner, amount });
    }

    if remaining > 0 {
        let remainder = Asset::new(remaining, symbol);
        let treasury = ctx.config.treasury_account.clone();
        ctx.send_inline(Action::transfer(issuer, &treasury, remainder.clone(), ""), issuer);
        report.remainder = remainder;
    }

    Ok(report)
}

/// `floor(balance * pool / supply)`, multiplied before dividing in 128 bits
pub fn proportional_share(balance: i64, pool: i64, supply: i64) -> i64 {
    let share = i128::from(balance) * i128::from(pool) / i128::from(supply);
    // balance <= supply, so share <= pool and always fits
    share as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::signers::KnownAccounts;
    use crate::config::Config;
    use crate::domain::{Holding, LedgerState, Symbol};
    use crate::services::context::{ActionOutput, Authority};

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn usdd(amount: i64) -> Asset {
        Asset::new(amount, Symbol::new(4, "USDD"))
    }

    fn state_with(balances: &[(&str, i64)]) -> LedgerState {
        let mut state = LedgerState::new();
        for (owner, balance) in balances {
            state.insert_holding(Holding::new(name(owner), usdd(*balance)));
        }
        state
    }

    fn run_distribution(
        state: &mut LedgerState,
        config: &Config,
        pool: i64,
        supply: i64,
        mode: DistributionMode,
    ) -> LedgerResult<(DistributionReport, ActionOutput)> {
        let directory = KnownAccounts::default();
        let issuer = config.ledger_account.clone();
        let mut ctx = ActionContext::new(state, config, &directory, Authority::Forwarded(&issuer));
        let report = distribute(&mut ctx, &usdd(pool), supply, &issuer, mode)?;
        Ok((report, ctx.finish()))
    }

    #[test]
    fn test_proportional_shares_exact() {
        let mut state = state_with(&[("alice", 300), ("bob", 500), ("carol", 200)]);
        let config = Config::default();
        let (report, output) =
            run_distribution(&mut state, &config, 10, 1_000, DistributionMode::Immediate).unwrap();

        let shares: Vec<(String, i64)> = report
            .shares
            .iter()
            .map(|s| (s.owner.to_string(), s.amount.amount))
            .collect();
        assert_eq!(
            shares,
            vec![
                ("alice".to_string(), 3),
                ("bob".to_string(), 5),
                ("carol".to_string(), 2)
            ]
        );
        assert_eq!(report.remainder.amount, 0);
        assert_eq!(output.forwarded.len(), 3);
        assert!(output
            .forwarded
            .iter()
            .all(|f| f.authorizer == config.ledger_account));
    }

    #[test]
    fn test_rounding_goes_to_treasury() {
        let mut state = state_with(&[("alice", 1), ("bob", 1), ("carol", 1)]);
        let config = Config::default();
        let (report, output) =
            run_distribution(&mut state, &config, 2, 3, DistributionMode::Immediate).unwrap();

        // each share is floor(2/3) = 0, below the baseline
        assert!(report.shares.is_empty());
        assert_eq!(report.remainder.amount, 2);
        assert_eq!(output.forwarded.len(), 1);
        assert_eq!(
            output.forwarded[0].action,
            Action::transfer(
                &name("usddtoken"),
                &name("usdpiggybank"),
                usdd(2),
                ""
            )
        );
    }

    #[test]
    fn test_sum_of_shares_plus_remainder_is_pool() {
        let balances = [
            ("alice", 7_919),
            ("bob", 104_729),
            ("carol", 1_299_709),
            ("dave", 3),
            ("erin", 15_485_863),
        ];
        let supply: i64 = balances.iter().map(|(_, b)| b).sum();
        for pool in [1, 17, 999, 65_537, 1_000_003] {
            let mut state = state_with(&balances);
            let config = Config::default();
            let (report, _) =
                run_distribution(&mut state, &config, pool, supply, DistributionMode::Immediate)
                    .unwrap();
            assert!(report.distributed() <= pool);
            assert_eq!(report.distributed() + report.remainder.amount, pool);
        }
    }

    #[test]
    fn test_accrual_adds_interest_without_transfers() {
        let mut state = state_with(&[("alice", 600), ("bob", 400)]);
        let config = Config::default();
        let (report, output) =
            run_distribution(&mut state, &config, 50, 1_000, DistributionMode::Accrual).unwrap();

        assert_eq!(report.distributed(), 50);
        assert!(output.forwarded.is_empty());
        assert_eq!(state.holding(&name("alice"), "USDD").unwrap().interest.amount, 30);
        assert_eq!(state.holding(&name("bob"), "USDD").unwrap().interest.amount, 20);
        assert_eq!(state.holding(&name("alice"), "USDD").unwrap().balance.amount, 600);
    }

    #[test]
    fn test_ledger_holding_is_excluded() {
        let mut state = state_with(&[("usddtoken", 500), ("alice", 500)]);
        let config = Config::default();
        let (report, _) =
            run_distribution(&mut state, &config, 100, 1_000, DistributionMode::Accrual).unwrap();

        assert_eq!(report.shares.len(), 1);
        assert_eq!(report.shares[0].owner, name("alice"));
        assert_eq!(report.remainder.amount, 50);
        assert_eq!(state.holding(&name("usddtoken"), "USDD").unwrap().interest.amount, 0);
    }

    #[test]
    fn test_zero_reference_supply_is_a_no_op() {
        let mut state = state_with(&[("usddtoken", 1_000)]);
        let config = Config::default();
        let (report, output) =
            run_distribution(&mut state, &config, 1_000, 0, DistributionMode::Immediate).unwrap();

        assert!(report.skipped);
        assert!(report.shares.is_empty());
        assert_eq!(report.remainder.amount, 0);
        assert!(output.forwarded.is_empty());
    }

    #[test]
    fn test_ceiling_applies_at_zero_reference_supply() {
        let mut state = LedgerState::new();
        let config = Config::default();
        let err = run_distribution(
            &mut state,
            &config,
            2_000_000_000,
            0,
            DistributionMode::Immediate,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LedgerError::PoolAboveCeiling {
                pool: 2_000_000_000,
                ceiling: 999_999_999
            }
        );
    }

    #[test]
    fn test_guards() {
        let config = Config::default();

        let mut state = state_with(&[("alice", 10)]);
        let err = run_distribution(&mut state, &config, 11, 10, DistributionMode::Immediate)
            .unwrap_err();
        assert_eq!(err, LedgerError::PoolExceedsSupply { pool: 11, supply: 10 });

        let mut state = state_with(&[("alice", 10)]);
        let err = run_distribution(
            &mut state,
            &config,
            1_000_000_000,
            2_000_000_000,
            DistributionMode::Immediate,
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::PoolAboveCeiling { .. }));

        let mut state = state_with(&[("alice", 20)]);
        let err = run_distribution(&mut state, &config, 5, 10, DistributionMode::Immediate)
            .unwrap_err();
        assert!(matches!(err, LedgerError::HolderExceedsSupply { .. }));
    }

    #[test]
    fn test_baseline_is_configurable() {
        let mut state = state_with(&[("alice", 300), ("bob", 700)]);
        let mut config = Config::default();
        config.baseline = 4;
        let (report, _) =
            run_distribution(&mut state, &config, 10, 1_000, DistributionMode::Immediate).unwrap();

        // alice's 3 is below the baseline and ends up in the remainder
        assert_eq!(report.shares.len(), 1);
        assert_eq!(report.shares[0].amount.amount, 7);
        assert_eq!(report.remainder.amount, 3);
    }

    #[test]
    fn test_large_balances_do_not_overflow() {
        let big = 4_000_000_000_000_000_000;
        assert_eq!(proportional_share(big, 999_999_999, big), 999_999_999);
        assert_eq!(proportional_share(big / 2, 999_999_999, big), 499_999_999);
    }
}
