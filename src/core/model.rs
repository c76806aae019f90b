//! Strict entity records the planners operate on.
//!
//! Values read from the store are loosely shaped; see [`crate::core::normalize`]
//! for how they are turned into these types.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Liquidity status of a bank account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    Available,
    Reserved,
    Suspended,
    Other(String),
}

impl From<&str> for AccountStatus {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "available" | "พร้อมใช้งาน" => AccountStatus::Available,
            "reserved" | "กันสำรอง" => AccountStatus::Reserved,
            "suspended" | "ระงับชั่วคราว" => AccountStatus::Suspended,
            _ => AccountStatus::Other(trimmed.to_string()),
        }
    }
}

impl AccountStatus {
    /// Fraction of the balance offered to discretionary investment.
    pub fn weight(&self) -> f64 {
        match self {
            AccountStatus::Available => 0.40,
            AccountStatus::Reserved => 0.25,
            AccountStatus::Suspended => 0.10,
            AccountStatus::Other(_) => 0.20,
        }
    }
}

impl Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Available => write!(f, "Available"),
            AccountStatus::Reserved => write!(f, "Reserved"),
            AccountStatus::Suspended => write!(f, "Suspended"),
            AccountStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub balance: f64,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Parses a stored priority. Unrecognized values are `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn score(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        write!(f, "{s}")
    }
}

/// What an opportunity spends money on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpportunityCategory {
    MutualFund,
    Stock,
    Gold,
    Machine,
    Expansion,
    Hiring,
    Upgrade,
    Other(String),
}

impl From<&str> for OpportunityCategory {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "mutualfund" | "mutual_fund" | "mutual fund" => OpportunityCategory::MutualFund,
            "stock" => OpportunityCategory::Stock,
            "gold" => OpportunityCategory::Gold,
            "machine" => OpportunityCategory::Machine,
            "expansion" => OpportunityCategory::Expansion,
            "hiring" => OpportunityCategory::Hiring,
            "upgrade" => OpportunityCategory::Upgrade,
            _ => OpportunityCategory::Other(trimmed.to_string()),
        }
    }
}

impl OpportunityCategory {
    /// Human readable label. Unknown categories echo their raw text.
    pub fn label(&self) -> &str {
        match self {
            OpportunityCategory::MutualFund => "Mutual fund",
            OpportunityCategory::Stock => "Stock",
            OpportunityCategory::Gold => "Gold",
            OpportunityCategory::Machine => "Machinery",
            OpportunityCategory::Expansion => "Branch expansion",
            OpportunityCategory::Hiring => "Hiring",
            OpportunityCategory::Upgrade => "System upgrade",
            OpportunityCategory::Other(s) => s,
        }
    }
}

impl Display for OpportunityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub name: String,
    pub category: OpportunityCategory,
    pub amount: f64,
    pub priority: Priority,
    pub target_date: Option<String>,
    pub notes: Option<String>,
}

/// A cash movement. Positive amounts are inflows, negative are outflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub kind: String,
    pub counterparty: String,
    pub timestamp: Option<String>,
}

/// A savings goal used for projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub initial_amount: f64,
    pub monthly_contribution: f64,
    pub horizon_years: u32,
}
