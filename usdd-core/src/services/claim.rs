//! Claim handler - turns accrued interest into transferable balance

use crate::domain::{Action, LedgerError, LedgerResult, Name};

use super::context::ActionContext;

/// Pay out `owner`'s accrued interest from the ledger's own balance
///
/// The interest field is zeroed right away; the payout itself is a
/// forwarded transfer, so if the ledger cannot cover it the whole chain
/// fails and the interest is restored with everything else.
pub fn claim(ctx: &mut ActionContext<'_>, owner: &Name) -> LedgerResult<()> {
    let ledger = ctx.ledger();
    if owner == ledger {
        return Err(LedgerError::SelfClaim);
    }
    ctx.require_auth(owner)?;
    if !ctx.is_account(owner) {
        return Err(LedgerError::UnknownAccount(owner.clone()));
    }

    let code = ctx.config.symbol.code();
    let baseline = ctx.config.baseline;
    let holding = ctx
        .state
        .holding_mut(owner, code)
        .ok_or_else(|| LedgerError::NoHolding(owner.clone()))?;

    let interest = holding.interest.clone();
    if interest.amount < baseline {
        return Err(LedgerError::InterestBelowBaseline {
            owner: owner.clone(),
            interest: interest.amount,
            baseline,
        });
    }
    holding.interest.amount = 0;

    ctx.send_inline(Action::transfer(ledger, owner, interest, ""), ledger);
    Ok(())
}
