//! In-process authorization and identity adapters

use std::collections::BTreeSet;

use crate::domain::Name;
use crate::ports::{AccountDirectory, Authorizer};

/// The identities whose signatures accompany an invocation
#[derive(Debug, Clone, Default)]
pub struct SignerSet {
    signers: BTreeSet<Name>,
}

impl SignerSet {
    pub fn new(signers: impl IntoIterator<Item = Name>) -> Self {
        Self {
            signers: signers.into_iter().collect(),
        }
    }

    /// Build from raw names, skipping anything that is not a valid name
    pub fn from_names<'s>(names: impl IntoIterator<Item = &'s str>) -> Self {
        Self::new(names.into_iter().filter_map(|n| Name::new(n).ok()))
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

impl Authorizer for SignerSet {
    fn is_authorized(&self, who: &Name) -> bool {
        self.signers.contains(who)
    }
}

/// A fixed set of existing identities
#[derive(Debug, Clone, Default)]
pub struct KnownAccounts {
    accounts: BTreeSet<Name>,
}

impl KnownAccounts {
    pub fn new(accounts: impl IntoIterator<Item = Name>) -> Self {
        Self {
            accounts: accounts.into_iter().collect(),
        }
    }

    pub fn from_names<'s>(names: impl IntoIterator<Item = &'s str>) -> Self {
        Self::new(names.into_iter().filter_map(|n| Name::new(n).ok()))
    }

    pub fn insert(&mut self, name: Name) -> bool {
        self.accounts.insert(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Name> {
        self.accounts.iter()
    }
}

impl AccountDirectory for KnownAccounts {
    fn exists(&self, who: &Name) -> bool {
        self.accounts.contains(who)
    }
}
