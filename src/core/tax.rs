//! Corporate income tax and VAT estimates over a transaction ledger.
//!
//! VAT is assessed on gross inflows and outflows, not on invoice-level tax
//! lines. The figures are planning estimates, not a filing computation.

use crate::core::model::Transaction;
use serde::{Deserialize, Serialize};

pub const CORPORATE_TAX_RATE: f64 = 0.20;
pub const VAT_RATE: f64 = 0.07;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxRates {
    pub corporate: f64,
    pub vat: f64,
}

impl Default for TaxRates {
    fn default() -> Self {
        TaxRates {
            corporate: CORPORATE_TAX_RATE,
            vat: VAT_RATE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TaxSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub profit: f64,
    pub estimated_corporate_tax: f64,
    pub vat_due: f64,
    pub vat_credit: f64,
    pub net_vat: f64,
}

/// Summarizes a ledger using the default 20% corporate tax and 7% VAT.
pub fn summarize(transactions: &[Transaction]) -> TaxSummary {
    summarize_with_rates(transactions, &TaxRates::default())
}

pub fn summarize_with_rates(transactions: &[Transaction], rates: &TaxRates) -> TaxSummary {
    let (total_income, total_expense) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expense), tx| match tx.amount {
                a if a > 0.0 => (income + a, expense),
                a if a < 0.0 => (income, expense + a.abs()),
                _ => (income, expense),
            });

    let profit = total_income - total_expense;
    let vat_due = total_income * rates.vat;
    let vat_credit = total_expense * rates.vat;

    TaxSummary {
        total_income,
        total_expense,
        profit,
        // Losses carry no negative tax.
        estimated_corporate_tax: (profit * rates.corporate).max(0.0),
        vat_due,
        vat_credit,
        net_vat: vat_due - vat_credit,
    }
}
