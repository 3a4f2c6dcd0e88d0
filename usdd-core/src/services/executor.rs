//! Executor - runs a call chain atomically
//!
//! A call chain is one top-level action plus every action it forwards,
//! directly or through other forwarded actions. Forwarded actions run in
//! submission order, each after the action that queued it has returned.
//! The chain runs against a working copy of the state, which replaces the
//! caller's state only when every action succeeded.

use std::collections::VecDeque;

use crate::config::Config;
use crate::domain::{
    Action, ExecutedAction, ForwardedAction, LedgerError, LedgerResult, LedgerState, Receipt,
};
use crate::ports::{AccountDirectory, Authorizer};

use super::context::{ActionContext, Authority};
use super::ledger::dispatch;

pub struct Executor<'a> {
    config: &'a Config,
}

impl<'a> Executor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Run `action` and its forwarded actions, committing into `state` on success
    ///
    /// On error `state` is left exactly as it was.
    pub fn apply(
        &self,
        state: &mut LedgerState,
        action: Action,
        authorizer: &dyn Authorizer,
        directory: &dyn AccountDirectory,
    ) -> LedgerResult<Receipt> {
        let mut working = state.clone();
        let mut executed = Vec::new();
        let mut distributions = Vec::new();

        let output = {
            let mut ctx = ActionContext::new(
                &mut working,
                self.config,
                directory,
                Authority::Signed(authorizer),
            );
            dispatch(&mut ctx, &action)?;
            ctx.finish()
        };
        executed.push(ExecutedAction {
            action,
            forwarded_by: None,
            notified: output.notified,
        });
        distributions.extend(output.distributions);

        let mut queue: VecDeque<ForwardedAction> = output.forwarded.into();
        while let Some(forwarded) = queue.pop_front() {
            if executed.len() >= self.config.max_chain_actions {
                return Err(LedgerError::ChainTooLong(self.config.max_chain_actions));
            }

            let output = {
                let mut ctx = ActionContext::new(
                    &mut working,
                    self.config,
                    directory,
                    Authority::Forwarded(&forwarded.authorizer),
                );
                dispatch(&mut ctx, &forwarded.action)?;
                ctx.finish()
            };
            executed.push(ExecutedAction {
                action: forwarded.action,
                forwarded_by: Some(forwarded.authorizer),
                notified: output.notified,
            });
            distributions.extend(output.distributions);
            queue.extend(output.forwarded);
        }

        *state = working;
        Ok(Receipt::new(executed, distributions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::signers::{KnownAccounts, SignerSet};
    use crate::domain::{Asset, Name, Symbol};

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn usdd(amount: i64) -> Asset {
        Asset::new(amount, Symbol::new(4, "USDD"))
    }

    fn directory() -> KnownAccounts {
        KnownAccounts::from_names(["usddtoken", "usdpiggybank", "alice", "bob"])
    }

    fn apply(state: &mut LedgerState, action: Action, signer: &str) -> LedgerResult<Receipt> {
        let config = Config::default();
        let signers = SignerSet::from_names([signer]);
        Executor::new(&config).apply(state, action, &signers, &directory())
    }

    fn bootstrap() -> LedgerState {
        let mut state = LedgerState::new();
        apply(
            &mut state,
            Action::Create {
                issuer: name("usddtoken"),
                maximum_supply: usdd(10_000_000),
            },
            "usddtoken",
        )
        .unwrap();
        state
    }

    #[test]
    fn test_forwarded_transfer_runs_after_issue() {
        let mut state = bootstrap();
        let receipt = apply(
            &mut state,
            Action::Issue {
                to: name("alice"),
                quantity: usdd(700),
                memo: "hi".to_string(),
            },
            "usddtoken",
        )
        .unwrap();

        assert_eq!(receipt.actions.len(), 2);
        assert_eq!(receipt.actions[0].action.name(), "issue");
        assert_eq!(receipt.actions[0].forwarded_by, None);
        assert_eq!(receipt.actions[1].action.name(), "transfer");
        assert_eq!(receipt.actions[1].forwarded_by, Some(name("usddtoken")));
        assert_eq!(receipt.actions[1].notified, vec![name("usddtoken"), name("alice")]);

        assert_eq!(state.balance_of(&name("alice"), "USDD").unwrap().amount, 700);
        assert!(state.holding(&name("usddtoken"), "USDD").is_none());
    }

    #[test]
    fn test_failing_forwarded_action_rolls_back_everything() {
        let mut state = bootstrap();
        let before = state.clone();

        // "nobody" is not a known account, so the forwarded transfer fails
        let err = apply(
            &mut state,
            Action::Issue {
                to: name("nobody"),
                quantity: usdd(700),
                memo: String::new(),
            },
            "usddtoken",
        )
        .unwrap_err();

        assert_eq!(err, LedgerError::UnknownAccount(name("nobody")));
        assert_eq!(state, before);
        assert_eq!(state.stat("USDD").unwrap().supply.amount, 0);
    }

    #[test]
    fn test_forwarded_authority_does_not_leak_to_other_identities() {
        let mut state = bootstrap();
        apply(
            &mut state,
            Action::Issue {
                to: name("alice"),
                quantity: usdd(100),
                memo: String::new(),
            },
            "usddtoken",
        )
        .unwrap();

        // bob cannot move alice's funds even though he signed something
        let err = apply(
            &mut state,
            Action::transfer(&name("alice"), &name("bob"), usdd(10), ""),
            "bob",
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::MissingAuthority(name("alice")));
    }

    #[test]
    fn test_chain_length_is_bounded() {
        let mut config = Config::default();
        config.max_chain_actions = 1;
        let mut state = bootstrap();
        let signers = SignerSet::from_names(["usddtoken"]);

        let err = Executor::new(&config)
            .apply(
                &mut state,
                Action::Issue {
                    to: name("alice"),
                    quantity: usdd(1),
                    memo: String::new(),
                },
                &signers,
                &directory(),
            )
            .unwrap_err();
        assert_eq!(err, LedgerError::ChainTooLong(1));
        assert_eq!(state.stat("USDD").unwrap().supply.amount, 0);
    }
}
