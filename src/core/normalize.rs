//! Converts loosely shaped stored records into strict entity types.
//!
//! Stored collections come from hand edits and older imports, so numbers may
//! arrive as strings, fields may be missing and enums may hold unknown text.
//! Everything here is permissive: nothing fails, missing or malformed values
//! degrade to zero or to a documented default.

use crate::core::model::{Account, AccountStatus, Goal, Opportunity, Priority, Transaction};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const DEFAULT_HORIZON_YEARS: u32 = 5;
const MAX_HORIZON_YEARS: u32 = 100;

/// Coerces a JSON value into a finite number, defaulting to `0.0`.
pub fn to_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Coerces a JSON value into text. Null becomes an empty string.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn non_empty(value: &Value) -> Option<String> {
    let text = to_text(value);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAccount {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub balance: Value,
    #[serde(default)]
    pub status: Value,
}

impl From<RawAccount> for Account {
    fn from(raw: RawAccount) -> Self {
        Account {
            id: to_text(&raw.id),
            name: to_text(&raw.name),
            balance: to_number(&raw.balance),
            status: AccountStatus::from(to_text(&raw.status).as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOpportunity {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub category: Value,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub priority: Value,
    #[serde(default)]
    pub target_date: Value,
    #[serde(default)]
    pub notes: Value,
}

impl From<RawOpportunity> for Opportunity {
    fn from(raw: RawOpportunity) -> Self {
        let name = to_text(&raw.name);
        let priority_text = to_text(&raw.priority);
        let priority = Priority::parse(&priority_text).unwrap_or_else(|| {
            debug!(opportunity = %name, priority = %priority_text, "Unknown priority, using low");
            Priority::Low
        });
        let mut amount = to_number(&raw.amount);
        if amount < 0.0 {
            debug!(opportunity = %name, amount, "Negative requested amount clamped to zero");
            amount = 0.0;
        }

        Opportunity {
            id: to_text(&raw.id),
            category: to_text(&raw.category).as_str().into(),
            amount,
            priority,
            target_date: non_empty(&raw.target_date),
            notes: non_empty(&raw.notes),
            name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub amount: Value,
    #[serde(default, rename = "type")]
    pub kind: Value,
    #[serde(default)]
    pub counterparty: Value,
    #[serde(default)]
    pub timestamp: Value,
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        Transaction {
            id: to_text(&raw.id),
            amount: to_number(&raw.amount),
            kind: to_text(&raw.kind),
            counterparty: to_text(&raw.counterparty),
            timestamp: non_empty(&raw.timestamp),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGoal {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub initial_amount: Value,
    #[serde(default)]
    pub monthly_contribution: Value,
    #[serde(default)]
    pub horizon: Value,
}

impl From<RawGoal> for Goal {
    fn from(raw: RawGoal) -> Self {
        let horizon = to_number(&raw.horizon).floor();
        let horizon_years = if horizon >= 1.0 {
            horizon.min(MAX_HORIZON_YEARS as f64) as u32
        } else {
            DEFAULT_HORIZON_YEARS
        };

        Goal {
            id: to_text(&raw.id),
            name: to_text(&raw.name),
            initial_amount: to_number(&raw.initial_amount),
            monthly_contribution: to_number(&raw.monthly_contribution),
            horizon_years,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::OpportunityCategory;
    use serde_json::json;

    #[test]
    fn test_to_number_is_permissive() {
        assert_eq!(to_number(&json!(12.5)), 12.5);
        assert_eq!(to_number(&json!(" 300 ")), 300.0);
        assert_eq!(to_number(&json!("")), 0.0);
        assert_eq!(to_number(&json!("abc")), 0.0);
        assert_eq!(to_number(&json!(null)), 0.0);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!([1, 2])), 0.0);
        assert_eq!(to_number(&json!("inf")), 0.0);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(to_text(&json!("acc-1")), "acc-1");
        assert_eq!(to_text(&json!(42)), "42");
        assert_eq!(to_text(&json!(null)), "");
    }

    #[test]
    fn test_raw_account_defaults() {
        let raw: RawAccount = serde_json::from_value(json!({"id": 7, "balance": "1000"})).unwrap();
        let account = Account::from(raw);
        assert_eq!(account.id, "7");
        assert_eq!(account.name, "");
        assert_eq!(account.balance, 1000.0);
        assert_eq!(account.status, AccountStatus::Other(String::new()));
    }

    #[test]
    fn test_raw_opportunity_normalization() {
        let raw: RawOpportunity = serde_json::from_value(json!({
            "id": "op-1",
            "name": "New CNC machine",
            "category": "machine",
            "amount": "-50",
            "priority": "urgent",
            "targetDate": "",
            "notes": "quote pending"
        }))
        .unwrap();
        let op = Opportunity::from(raw);
        assert_eq!(op.category, OpportunityCategory::Machine);
        assert_eq!(op.amount, 0.0);
        assert_eq!(op.priority, Priority::Low);
        assert_eq!(op.target_date, None);
        assert_eq!(op.notes.as_deref(), Some("quote pending"));
    }

    #[test]
    fn test_raw_transaction_uses_type_field() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "id": "tx-1",
            "amount": -250,
            "type": "Supplier payment",
            "counterparty": "ACME",
        }))
        .unwrap();
        let tx = Transaction::from(raw);
        assert_eq!(tx.kind, "Supplier payment");
        assert_eq!(tx.amount, -250.0);
        assert!(tx.timestamp.is_none());
    }

    #[test]
    fn test_raw_goal_default_horizon() {
        let raw: RawGoal = serde_json::from_value(json!({
            "id": "g1",
            "name": "Reserve",
            "initialAmount": 1000,
            "monthlyContribution": "100"
        }))
        .unwrap();
        let goal = Goal::from(raw);
        assert_eq!(goal.horizon_years, 5);
        assert_eq!(goal.monthly_contribution, 100.0);
    }

    #[test]
    fn test_raw_goal_horizon_is_capped() {
        let raw: RawGoal = serde_json::from_value(json!({
            "id": "g1",
            "horizon": 1e12
        }))
        .unwrap();
        assert_eq!(Goal::from(raw).horizon_years, 100);

        let raw: RawGoal = serde_json::from_value(json!({"id": "g2", "horizon": "30"})).unwrap();
        assert_eq!(Goal::from(raw).horizon_years, 30);
    }
}
