//! Authorization and identity-existence ports

use crate::domain::Name;

/// Answers whether the current invocation carries an identity's authorization
///
/// Only consulted for the top-level action of a call chain. Forwarded
/// actions are authorized by the identity the ledger declared for them.
pub trait Authorizer {
    fn is_authorized(&self, who: &Name) -> bool;
}

/// Answers whether an identity exists at all
pub trait AccountDirectory {
    fn exists(&self, who: &Name) -> bool;
}
