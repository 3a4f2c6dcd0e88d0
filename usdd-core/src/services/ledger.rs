//! Ledger engine - create, issue, transfer and balance bookkeeping

use crate::domain::{
    Action, Asset, DistributionMode, Holding, LedgerError, LedgerResult, LedgerState, Name,
    SupplyRecord, Symbol,
};

use super::claim::claim;
use super::context::ActionContext;
use super::interest::distribute;

/// Longest memo accepted by issue and transfer, in bytes
pub const MAX_MEMO_BYTES: usize = 256;

/// Exact length of an external withdrawal address (`0x` + 40 hex digits)
pub const WITHDRAWAL_ADDRESS_LEN: usize = 42;

/// Run one action against the context
pub fn dispatch(ctx: &mut ActionContext<'_>, action: &Action) -> LedgerResult<()> {
    match action {
        Action::Create {
            issuer,
            maximum_supply,
        } => create(ctx, issuer, maximum_supply),
        Action::Issue { to, quantity, memo } => issue(ctx, to, quantity, memo),
        Action::Transfer {
            from,
            to,
            quantity,
            memo,
        } => transfer(ctx, from, to, quantity, memo),
        Action::Claim { owner } => claim(ctx, owner),
    }
}

/// Register a new token symbol
pub fn create(ctx: &mut ActionContext<'_>, issuer: &Name, maximum_supply: &Asset) -> LedgerResult<()> {
    ctx.require_auth(ctx.ledger())?;

    let symbol = &maximum_supply.symbol;
    if !symbol.is_valid() {
        return Err(LedgerError::InvalidSymbol(symbol.to_string()));
    }
    if !maximum_supply.is_valid() {
        return Err(LedgerError::InvalidQuantity(maximum_supply.to_string()));
    }
    if maximum_supply.amount <= 0 {
        return Err(LedgerError::NonPositiveQuantity("create"));
    }
    if ctx.state.stat(symbol.code()).is_some() {
        return Err(LedgerError::SymbolExists(symbol.code().to_string()));
    }

    ctx.state.insert_stat(SupplyRecord {
        supply: Asset::zero(symbol.clone()),
        max_supply: maximum_supply.clone(),
        issuer: issuer.clone(),
    });
    Ok(())
}

/// Mint new supply to the issuer, then hand it on or distribute it
pub fn issue(ctx: &mut ActionContext<'_>, to: &Name, quantity: &Asset, memo: &str) -> LedgerResult<()> {
    let symbol = &quantity.symbol;
    if !symbol.is_valid() {
        return Err(LedgerError::InvalidSymbol(symbol.to_string()));
    }
    check_memo(memo)?;

    let stat = ctx
        .state
        .stat(symbol.code())
        .cloned()
        .ok_or_else(|| LedgerError::UnknownSymbol(symbol.code().to_string()))?;

    ctx.require_auth(&stat.issuer)?;
    check_quantity(quantity, &stat.supply.symbol, "issue")?;
    if quantity.amount > stat.available() {
        return Err(LedgerError::SupplyExceeded {
            available: stat.available(),
            requested: quantity.amount,
        });
    }

    let reference_supply = stat.supply.amount;
    add_balance(ctx.state, &stat.issuer, quantity)?;
    if let Some(record) = ctx.state.stat_mut(symbol.code()) {
        record.supply = record.supply.checked_add(quantity)?;
    }

    if to != &stat.issuer {
        let forwarded = Action::transfer(&stat.issuer, to, quantity.clone(), memo);
        ctx.send_inline(forwarded, &stat.issuer);
        return Ok(());
    }

    let mode = if memo == ctx.config.claim_memo {
        DistributionMode::Accrual
    } else {
        DistributionMode::Immediate
    };
    let report = distribute(ctx, quantity, reference_supply, &stat.issuer, mode)?;
    ctx.record_distribution(report);
    Ok(())
}

/// Move tokens between two parties, or withdraw them when sent to the ledger
pub fn transfer(
    ctx: &mut ActionContext<'_>,
    from: &Name,
    to: &Name,
    quantity: &Asset,
    memo: &str,
) -> LedgerResult<()> {
    if from == to {
        return Err(LedgerError::SelfTransfer);
    }
    ctx.require_auth(from)?;
    if !ctx.is_account(to) {
        return Err(LedgerError::UnknownAccount(to.clone()));
    }

    let code = quantity.symbol.code();
    let stat = ctx
        .state
        .stat(code)
        .cloned()
        .ok_or_else(|| LedgerError::UnknownSymbol(code.to_string()))?;

    ctx.require_recipient(from);
    ctx.require_recipient(to);

    check_quantity(quantity, &stat.supply.symbol, "transfer")?;
    check_memo(memo)?;

    if to == ctx.ledger() {
        if memo.len() != WITHDRAWAL_ADDRESS_LEN || !memo.starts_with("0x") {
            return Err(LedgerError::BadWithdrawalAddress);
        }
        sub_balance(ctx.state, from, quantity)?;
        if let Some(record) = ctx.state.stat_mut(code) {
            record.supply = record.supply.checked_sub(quantity)?;
        }
    } else {
        sub_balance(ctx.state, from, quantity)?;
        add_balance(ctx.state, to, quantity)?;
    }
    Ok(())
}

/// Debit `owner`; the holding goes away once balance and interest are both zero
pub fn sub_balance(state: &mut LedgerState, owner: &Name, value: &Asset) -> LedgerResult<()> {
    let code = value.symbol.code();
    let holding = state
        .holding_mut(owner, code)
        .ok_or_else(|| LedgerError::NoBalance(owner.clone()))?;
    if holding.balance.amount < value.amount {
        return Err(LedgerError::Overdrawn {
            have: holding.balance.amount,
            need: value.amount,
        });
    }

    holding.balance = holding.balance.checked_sub(value)?;
    if holding.is_empty() {
        state.remove_holding(owner, code);
    }
    Ok(())
}

/// Credit `owner`, creating the holding with zero interest if needed
pub fn add_balance(state: &mut LedgerState, owner: &Name, value: &Asset) -> LedgerResult<()> {
    match state.holding_mut(owner, value.symbol.code()) {
        Some(holding) => {
            holding.balance = holding.balance.checked_add(value)?;
        }
        None => state.insert_holding(Holding::new(owner.clone(), value.clone())),
    }
    Ok(())
}

/// Current supply of a symbol
pub fn get_supply(state: &LedgerState, code: &str) -> LedgerResult<Asset> {
    state
        .stat(code)
        .map(|s| s.supply.clone())
        .ok_or_else(|| LedgerError::UnknownSymbol(code.to_string()))
}

/// Transferable balance of `owner` for a symbol
pub fn get_balance(state: &LedgerState, owner: &Name, code: &str) -> LedgerResult<Asset> {
    state
        .balance_of(owner, code)
        .cloned()
        .ok_or_else(|| LedgerError::NoBalance(owner.clone()))
}

/// Accrued, unclaimed interest of `owner`; zero when there is no holding
pub fn get_interest(state: &LedgerState, owner: &Name, symbol: &Symbol) -> Asset {
    state
        .holding(owner, symbol.code())
        .map(|h| h.interest.clone())
        .unwrap_or_else(|| Asset::zero(symbol.clone()))
}

fn check_memo(memo: &str) -> LedgerResult<()> {
    if memo.len() > MAX_MEMO_BYTES {
        return Err(LedgerError::MemoTooLong);
    }
    Ok(())
}

fn check_quantity(quantity: &Asset, expected: &Symbol, verb: &'static str) -> LedgerResult<()> {
    if !quantity.is_valid() {
        return Err(LedgerError::InvalidQuantity(quantity.to_string()));
    }
    if quantity.amount <= 0 {
        return Err(LedgerError::NonPositiveQuantity(verb));
    }
    if &quantity.symbol != expected {
        return Err(LedgerError::SymbolMismatch {
            expected: expected.to_string(),
            actual: quantity.symbol.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::context::Authority;
    use crate::adapters::signers::{KnownAccounts, SignerSet};

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn usdd(amount: i64) -> Asset {
        Asset::new(amount, Symbol::new(4, "USDD"))
    }

    fn directory() -> KnownAccounts {
        KnownAccounts::from_names(["usddtoken", "usdpiggybank", "alice", "bob"])
    }

    fn run(
        state: &mut LedgerState,
        signers: &[&str],
        f: impl FnOnce(&mut ActionContext<'_>) -> LedgerResult<()>,
    ) -> LedgerResult<crate::services::context::ActionOutput> {
        let config = Config::default();
        let signers = SignerSet::from_names(signers.iter().copied());
        let directory = directory();
        let mut ctx = ActionContext::new(state, &config, &directory, Authority::Signed(&signers));
        f(&mut ctx)?;
        Ok(ctx.finish())
    }

    fn created() -> LedgerState {
        let mut state = LedgerState::new();
        run(&mut state, &["usddtoken"], |ctx| {
            create(ctx, &name("usddtoken"), &usdd(10_000_000))
        })
        .unwrap();
        state
    }

    #[test]
    fn test_create_requires_ledger_authority() {
        let mut state = LedgerState::new();
        let err = run(&mut state, &["alice"], |ctx| {
            create(ctx, &name("alice"), &usdd(100))
        })
        .unwrap_err();
        assert_eq!(err, LedgerError::MissingAuthority(name("usddtoken")));
        assert!(state.stat("USDD").is_none());
    }

    #[test]
    fn test_create_rejects_non_positive_and_invalid() {
        let mut state = LedgerState::new();
        let err = run(&mut state, &["usddtoken"], |ctx| {
            create(ctx, &name("alice"), &usdd(0))
        })
        .unwrap_err();
        assert_eq!(err, LedgerError::NonPositiveQuantity("create"));

        let err = run(&mut state, &["usddtoken"], |ctx| {
            create(ctx, &name("alice"), &Asset::new(5, Symbol::new(4, "usd")))
        })
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSymbol(_)));
    }

    #[test]
    fn test_issue_to_third_party_forwards_transfer() {
        let mut state = created();
        let output = run(&mut state, &["usddtoken"], |ctx| {
            issue(ctx, &name("alice"), &usdd(500), "welcome")
        })
        .unwrap();

        assert_eq!(get_supply(&state, "USDD").unwrap().amount, 500);
        assert_eq!(get_balance(&state, &name("usddtoken"), "USDD").unwrap().amount, 500);
        assert_eq!(output.forwarded.len(), 1);
        assert_eq!(output.forwarded[0].authorizer, name("usddtoken"));
        assert_eq!(
            output.forwarded[0].action,
            Action::transfer(&name("usddtoken"), &name("alice"), usdd(500), "welcome")
        );
    }

    #[test]
    fn test_issue_checks() {
        let mut state = created();
        let long_memo = "x".repeat(257);
        let err = run(&mut state, &["usddtoken"], |ctx| {
            issue(ctx, &name("alice"), &usdd(1), &long_memo)
        })
        .unwrap_err();
        assert_eq!(err, LedgerError::MemoTooLong);

        let err = run(&mut state, &["alice"], |ctx| issue(ctx, &name("alice"), &usdd(1), ""))
            .unwrap_err();
        assert_eq!(err, LedgerError::MissingAuthority(name("usddtoken")));

        let err = run(&mut state, &["usddtoken"], |ctx| {
            issue(ctx, &name("alice"), &Asset::new(1, Symbol::new(2, "USDD")), "")
        })
        .unwrap_err();
        assert!(matches!(err, LedgerError::SymbolMismatch { .. }));

        let err = run(&mut state, &["usddtoken"], |ctx| {
            issue(ctx, &name("alice"), &Asset::new(1, Symbol::new(4, "EOS")), "")
        })
        .unwrap_err();
        assert_eq!(err, LedgerError::UnknownSymbol("EOS".to_string()));
    }

    #[test]
    fn test_transfer_moves_balance_and_notifies() {
        let mut state = created();
        add_balance(&mut state, &name("alice"), &usdd(300)).unwrap();

        let output = run(&mut state, &["alice"], |ctx| {
            transfer(ctx, &name("alice"), &name("bob"), &usdd(100), "rent")
        })
        .unwrap();

        assert_eq!(get_balance(&state, &name("alice"), "USDD").unwrap().amount, 200);
        assert_eq!(get_balance(&state, &name("bob"), "USDD").unwrap().amount, 100);
        assert_eq!(output.notified, vec![name("alice"), name("bob")]);
        assert!(output.forwarded.is_empty());
    }

    #[test]
    fn test_transfer_rejections() {
        let mut state = created();
        add_balance(&mut state, &name("alice"), &usdd(300)).unwrap();

        let err = run(&mut state, &["alice"], |ctx| {
            transfer(ctx, &name("alice"), &name("alice"), &usdd(1), "")
        })
        .unwrap_err();
        assert_eq!(err, LedgerError::SelfTransfer);

        let err = run(&mut state, &["alice"], |ctx| {
            transfer(ctx, &name("alice"), &name("nobody"), &usdd(1), "")
        })
        .unwrap_err();
        assert_eq!(err, LedgerError::UnknownAccount(name("nobody")));

        let err = run(&mut state, &["bob"], |ctx| {
            transfer(ctx, &name("alice"), &name("bob"), &usdd(1), "")
        })
        .unwrap_err();
        assert_eq!(err, LedgerError::MissingAuthority(name("alice")));

        let err = run(&mut state, &["alice"], |ctx| {
            transfer(ctx, &name("alice"), &name("bob"), &usdd(301), "")
        })
        .unwrap_err();
        assert_eq!(err, LedgerError::Overdrawn { have: 300, need: 301 });

        let err = run(&mut state, &["bob"], |ctx| {
            transfer(ctx, &name("bob"), &name("alice"), &usdd(1), "")
        })
        .unwrap_err();
        assert_eq!(err, LedgerError::NoBalance(name("bob")));

        let err = run(&mut state, &["alice"], |ctx| {
            transfer(ctx, &name("alice"), &name("bob"), &usdd(-5), "")
        })
        .unwrap_err();
        assert_eq!(err, LedgerError::NonPositiveQuantity("transfer"));
    }

    #[test]
    fn test_withdrawal_debits_once_and_burns_supply() {
        let mut state = created();
        if let Some(stat) = state.stat_mut("USDD") {
            stat.supply = usdd(1_000);
        }
        add_balance(&mut state, &name("alice"), &usdd(1_000)).unwrap();
        let address = format!("0x{}", "ab".repeat(20));

        run(&mut state, &["alice"], |ctx| {
            transfer(ctx, &name("alice"), &name("usddtoken"), &usdd(400), &address)
        })
        .unwrap();

        assert_eq!(get_balance(&state, &name("alice"), "USDD").unwrap().amount, 600);
        assert_eq!(get_supply(&state, "USDD").unwrap().amount, 600);
        assert!(state.holding(&name("usddtoken"), "USDD").is_none());
    }

    #[test]
    fn test_withdrawal_requires_address_memo() {
        let mut state = created();
        add_balance(&mut state, &name("alice"), &usdd(10)).unwrap();

        let wrong_prefix = format!("1x{}", "a".repeat(40));
        for memo in ["", "0x1234", wrong_prefix.as_str()] {
            let err = run(&mut state, &["alice"], |ctx| {
                transfer(ctx, &name("alice"), &name("usddtoken"), &usdd(1), memo)
            })
            .unwrap_err();
            assert_eq!(err, LedgerError::BadWithdrawalAddress);
        }
    }

    #[test]
    fn test_debit_to_zero_removes_holding_unless_interest_pending() {
        let mut state = LedgerState::new();
        add_balance(&mut state, &name("alice"), &usdd(50)).unwrap();
        add_balance(&mut state, &name("bob"), &usdd(50)).unwrap();
        state.holding_mut(&name("bob"), "USDD").unwrap().interest = usdd(7);

        sub_balance(&mut state, &name("alice"), &usdd(50)).unwrap();
        sub_balance(&mut state, &name("bob"), &usdd(50)).unwrap();

        assert!(state.holding(&name("alice"), "USDD").is_none());
        let bob = state.holding(&name("bob"), "USDD").unwrap();
        assert_eq!(bob.balance.amount, 0);
        assert_eq!(bob.interest.amount, 7);
    }

    #[test]
    fn test_credit_leaves_interest_untouched() {
        let mut state = LedgerState::new();
        add_balance(&mut state, &name("alice"), &usdd(5)).unwrap();
        state.holding_mut(&name("alice"), "USDD").unwrap().interest = usdd(3);
        add_balance(&mut state, &name("alice"), &usdd(5)).unwrap();

        let holding = state.holding(&name("alice"), "USDD").unwrap();
        assert_eq!(holding.balance.amount, 10);
        assert_eq!(holding.interest.amount, 3);
    }
}
