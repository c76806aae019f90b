use super::ui;
use crate::core::repository::Repository;
use crate::core::tax::{TaxRates, TaxSummary, summarize_with_rates};
use anyhow::{Result, bail};
use comfy_table::Cell;
use tracing::debug;

pub fn run(repository: &Repository, rates: TaxRates, currency: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&rates.corporate) || !(0.0..=1.0).contains(&rates.vat) {
        bail!(
            "Tax rates must be between 0 and 1, got corporate={} vat={}",
            rates.corporate,
            rates.vat
        );
    }

    let transactions = repository.transactions()?;
    debug!(transactions = transactions.len(), ?rates, "Summarizing taxes");
    let summary = summarize_with_rates(&transactions, &rates);

    println!("{}", render_summary(&summary, &rates, currency));
    println!(
        "{}",
        ui::imported_at_line(repository.imported_at()?.as_deref())
    );
    ui::print_separator();
    Ok(())
}

pub fn render_summary(summary: &TaxSummary, rates: &TaxRates, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Item"), ui::header_cell("Amount")]);

    let rows = [
        ("Total income", summary.total_income),
        ("Total expense", -summary.total_expense),
        ("Profit", summary.profit),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), ui::signed_money_cell(value, currency)]);
    }
    table.add_row(vec![
        Cell::new(format!(
            "Corporate income tax ({:.0}%)",
            rates.corporate * 100.0
        )),
        ui::money_cell(summary.estimated_corporate_tax, currency),
    ]);
    table.add_row(vec![
        Cell::new(format!("Output VAT ({:.0}%)", rates.vat * 100.0)),
        ui::money_cell(summary.vat_due, currency),
    ]);
    table.add_row(vec![
        Cell::new("Input VAT credit"),
        ui::money_cell(summary.vat_credit, currency),
    ]);

    let net_label = if summary.net_vat < 0.0 {
        "Net VAT (refundable)"
    } else {
        "Net VAT payable"
    };
    table.add_row(vec![
        Cell::new(ui::style_text(net_label, ui::StyleType::TotalLabel)),
        ui::money_cell(summary.net_vat, currency),
    ]);

    format!(
        "\n{}\n\n{}\n\n{}",
        ui::style_text("Tax Estimate", ui::StyleType::Title),
        table,
        ui::style_text(
            "VAT is estimated on gross inflows and outflows, not on invoice tax lines.",
            ui::StyleType::Subtle
        )
    )
}
