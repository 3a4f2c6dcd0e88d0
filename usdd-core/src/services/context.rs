//! Per-action execution context
//!
//! An `ActionContext` is what a single action sees while it runs: the
//! mutable state handle, the configuration, the collaborator ports and
//! the output it produces (forwarded actions, notified parties,
//! distribution reports). Forwarded actions are only collected here; the
//! executor runs them after the current action has returned.

use crate::config::Config;
use crate::domain::{
    Action, DistributionReport, ForwardedAction, LedgerError, LedgerResult, LedgerState, Name,
};
use crate::ports::{AccountDirectory, Authorizer};

/// Where the authorization of the running action comes from
#[derive(Clone, Copy)]
pub enum Authority<'a> {
    /// Top-level action, authorized by the caller's signatures
    Signed(&'a dyn Authorizer),
    /// Forwarded action, authorized by the identity the ledger declared
    Forwarded(&'a Name),
}

/// Everything an action produced besides state changes
#[derive(Debug, Default)]
pub struct ActionOutput {
    pub forwarded: Vec<ForwardedAction>,
    pub notified: Vec<Name>,
    pub distributions: Vec<DistributionReport>,
}

pub struct ActionContext<'a> {
    pub state: &'a mut LedgerState,
    pub config: &'a Config,
    directory: &'a dyn AccountDirectory,
    authority: Authority<'a>,
    output: ActionOutput,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        state: &'a mut LedgerState,
        config: &'a Config,
        directory: &'a dyn AccountDirectory,
        authority: Authority<'a>,
    ) -> Self {
        Self {
            state,
            config,
            directory,
            authority,
            output: ActionOutput::default(),
        }
    }

    /// The ledger's own identity
    pub fn ledger(&self) -> &'a Name {
        &self.config.ledger_account
    }

    /// Fail unless the running action carries `who`'s authorization
    pub fn require_auth(&self, who: &Name) -> LedgerResult<()> {
        let authorized = match self.authority {
            Authority::Signed(authorizer) => authorizer.is_authorized(who),
            Authority::Forwarded(declared) => declared == who,
        };
        if authorized {
            Ok(())
        } else {
            Err(LedgerError::MissingAuthority(who.clone()))
        }
    }

    pub fn is_account(&self, who: &Name) -> bool {
        self.directory.exists(who)
    }

    /// Tell `who` that this action affects them
    pub fn require_recipient(&mut self, who: &Name) {
        if !self.output.notified.contains(who) {
            self.output.notified.push(who.clone());
        }
    }

    /// Queue an action to run after the current one, authorized by `authorizer`
    pub fn send_inline(&mut self, action: Action, authorizer: &Name) {
        self.output.forwarded.push(ForwardedAction {
            action,
            authorizer: authorizer.clone(),
        });
    }

    pub fn record_distribution(&mut self, report: DistributionReport) {
        self.output.distributions.push(report);
    }

    pub fn finish(self) -> ActionOutput {
        self.output
    }
}
