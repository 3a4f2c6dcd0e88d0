//! Ledger actions and execution receipts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::Asset;
use super::name::Name;

/// One invocation of a ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    Create {
        issuer: Name,
        maximum_supply: Asset,
    },
    Issue {
        to: Name,
        quantity: Asset,
        memo: String,
    },
    Transfer {
        from: Name,
        to: Name,
        quantity: Asset,
        memo: String,
    },
    Claim {
        owner: Name,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Create { .. } => "create",
            Action::Issue { .. } => "issue",
            Action::Transfer { .. } => "transfer",
            Action::Claim { .. } => "claim",
        }
    }

    pub fn transfer(from: &Name, to: &Name, quantity: Asset, memo: impl Into<String>) -> Self {
        Action::Transfer {
            from: from.clone(),
            to: to.clone(),
            quantity,
            memo: memo.into(),
        }
    }
}

/// An action queued by another action, to run after it completes
///
/// The ledger declares which identity authorizes the forwarded action;
/// the executor trusts that declaration because only ledger code can
/// produce one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardedAction {
    pub action: Action,
    pub authorizer: Name,
}

/// How a distribution hands out shares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    /// Shares are paid out right away with forwarded transfers
    Immediate,
    /// Shares are added to each holder's accrued interest
    Accrual,
}

/// A single holder's share of a distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub owner: Name,
    pub amount: Asset,
}

/// Outcome of one interest distribution pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub mode: DistributionMode,
    pub pool: Asset,
    pub reference_supply: i64,
    pub shares: Vec<Share>,
    /// Amount sent to the treasury (pool minus distributed shares)
    pub remainder: Asset,
    /// True when the reference supply was zero and nothing was distributed
    pub skipped: bool,
}

impl DistributionReport {
    pub fn distributed(&self) -> i64 {
        self.shares.iter().map(|s| s.amount.amount).sum()
    }
}

/// An action that ran as part of a call chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedAction {
    pub action: Action,
    /// None for the top-level action, which was authorized by signatures
    pub forwarded_by: Option<Name>,
    /// Parties told about this action, in the order they were added
    pub notified: Vec<Name>,
}

/// Result of a committed call chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub executed_at: DateTime<Utc>,
    pub actions: Vec<ExecutedAction>,
    pub distributions: Vec<DistributionReport>,
}

impl Receipt {
    pub fn new(actions: Vec<ExecutedAction>, distributions: Vec<DistributionReport>) -> Self {
        Self {
            id: Uuid::new_v4(),
            executed_at: Utc::now(),
            actions,
            distributions,
        }
    }

    /// Every party notified during the chain, first occurrence order
    pub fn notified(&self) -> Vec<&Name> {
        let mut seen: Vec<&Name> = Vec::new();
        for name in self.actions.iter().flat_map(|a| a.notified.iter()) {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Symbol;

    #[test]
    fn test_action_json_shape() {
        let action = Action::Claim {
            owner: Name::new("alice").unwrap(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action"], "claim");
        assert_eq!(json["owner"], "alice");

        let transfer = Action::transfer(
            &Name::new("alice").unwrap(),
            &Name::new("bob").unwrap(),
            Asset::new(15, Symbol::new(4, "USDD")),
            "",
        );
        let json = serde_json::to_value(&transfer).unwrap();
        assert_eq!(json["quantity"], "0.0015 USDD");
        let back: Action = serde_json::from_value(json).unwrap();
        assert_eq!(back, transfer);
    }
}
