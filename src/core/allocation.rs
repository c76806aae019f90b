//! Greedy investment allocation planner.
//!
//! Each account offers a status-weighted slice of its balance (its eligible
//! pool). Opportunities are funded one at a time, most important first, by
//! draining the richest accounts first.

use crate::core::model::{Account, Opportunity, OpportunityCategory, Priority};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// Accounts left with at most this share of their original balance are
/// reported as near-exhausted.
const EXHAUSTION_THRESHOLD: f64 = 0.10;

pub const EMPTY_PLAN_NOTE: &str =
    "Add accounts and investment opportunities to generate an allocation plan";
pub const LIQUIDITY_REMAINS_NOTE: &str = "Liquidity remains in every account";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub account_id: String,
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationResult {
    pub opportunity: String,
    pub category: OpportunityCategory,
    pub requested: f64,
    pub fulfilled: f64,
    pub remaining: f64,
    pub contribution: Vec<Contribution>,
    pub priority: Priority,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationPlan {
    pub allocations: Vec<AllocationResult>,
    pub notes: String,
    pub exhausted_accounts: Vec<String>,
}

/// Working copy of an account's eligible pool.
struct Fund<'a> {
    account_id: &'a str,
    name: &'a str,
    available: f64,
    original_balance: f64,
}

/// Eligible pool for an account: `floor(balance * weight)`, never negative.
pub fn eligible_pool(account: &Account) -> f64 {
    (account.balance * account.status.weight()).floor().max(0.0)
}

fn by_priority_then_date(a: &Opportunity, b: &Opportunity) -> Ordering {
    b.priority
        .score()
        .cmp(&a.priority.score())
        .then_with(|| {
            a.target_date
                .as_deref()
                .unwrap_or("")
                .cmp(b.target_date.as_deref().unwrap_or(""))
        })
}

/// Builds an allocation plan. Inputs are only read; the plan is a fresh value.
pub fn allocate(accounts: &[Account], opportunities: &[Opportunity]) -> AllocationPlan {
    if accounts.is_empty() || opportunities.is_empty() {
        return AllocationPlan {
            allocations: Vec::new(),
            notes: EMPTY_PLAN_NOTE.to_string(),
            exhausted_accounts: Vec::new(),
        };
    }

    let mut funds: Vec<Fund> = accounts
        .iter()
        .map(|account| Fund {
            account_id: &account.id,
            name: &account.name,
            available: eligible_pool(account),
            original_balance: account.balance,
        })
        .collect();

    let mut ordered: Vec<&Opportunity> = opportunities.iter().collect();
    ordered.sort_by(|a, b| by_priority_then_date(a, b));

    let mut allocations = Vec::with_capacity(ordered.len());
    for opportunity in ordered {
        let mut target = opportunity.amount;
        let mut contribution = Vec::new();

        // Stable, so exact ties keep the order left by the previous round.
        funds.sort_by(|a, b| b.available.total_cmp(&a.available));
        for fund in funds.iter_mut() {
            if target <= 0.0 {
                break;
            }
            if fund.available <= 0.0 {
                continue;
            }
            let amount = target.min(fund.available);
            fund.available -= amount;
            target -= amount;
            contribution.push(Contribution {
                account_id: fund.account_id.to_string(),
                name: fund.name.to_string(),
                amount,
            });
        }

        debug!(
            opportunity = %opportunity.name,
            requested = opportunity.amount,
            remaining = target,
            "Allocated opportunity"
        );
        allocations.push(AllocationResult {
            opportunity: opportunity.name.clone(),
            category: opportunity.category.clone(),
            requested: opportunity.amount,
            fulfilled: opportunity.amount - target,
            remaining: target.max(0.0),
            contribution,
            priority: opportunity.priority,
            notes: opportunity.notes.clone(),
        });
    }

    let exhausted_accounts: Vec<String> = funds
        .iter()
        .filter(|fund| fund.available <= fund.original_balance * EXHAUSTION_THRESHOLD)
        .map(|fund| fund.name.to_string())
        .collect();
    let notes = if exhausted_accounts.is_empty() {
        LIQUIDITY_REMAINS_NOTE.to_string()
    } else {
        format!("Accounts nearly exhausted: {}", exhausted_accounts.join(", "))
    };

    AllocationPlan {
        allocations,
        notes,
        exhausted_accounts,
    }
}

/// Headline figures shown next to an allocation plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidityOverview {
    pub account_count: usize,
    pub total_balance: f64,
    pub total_eligible: f64,
    pub opportunity_count: usize,
    pub planned_budget: f64,
    pub high_priority_count: usize,
}

pub fn liquidity_overview(accounts: &[Account], opportunities: &[Opportunity]) -> LiquidityOverview {
    LiquidityOverview {
        account_count: accounts.len(),
        total_balance: accounts.iter().map(|a| a.balance).sum(),
        total_eligible: accounts.iter().map(eligible_pool).sum(),
        opportunity_count: opportunities.len(),
        planned_budget: opportunities.iter().map(|o| o.amount).sum(),
        high_priority_count: opportunities
            .iter()
            .filter(|o| o.priority == Priority::High)
            .count(),
    }
}
