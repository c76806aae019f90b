use super::ui;
use crate::core::allocation::{AllocationPlan, LiquidityOverview, allocate, liquidity_overview};
use crate::core::repository::Repository;
use anyhow::Result;
use comfy_table::Cell;
use tracing::debug;

pub fn run(repository: &Repository, currency: &str) -> Result<()> {
    let accounts = repository.accounts()?;
    let opportunities = repository.opportunities()?;
    debug!(
        accounts = accounts.len(),
        opportunities = opportunities.len(),
        "Building allocation plan"
    );

    let plan = allocate(&accounts, &opportunities);
    let overview = liquidity_overview(&accounts, &opportunities);

    println!("{}", render_overview(&overview, currency));
    println!("{}", render_plan(&plan, currency));
    println!(
        "{}",
        ui::imported_at_line(repository.imported_at()?.as_deref())
    );
    ui::print_separator();
    Ok(())
}

pub fn render_overview(overview: &LiquidityOverview, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Total liquidity"),
        ui::header_cell("Eligible for investment"),
        ui::header_cell("Planned budget"),
        ui::header_cell("High priority"),
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "{} ({} accounts)",
            ui::format_money(overview.total_balance, currency),
            overview.account_count
        )),
        ui::money_cell(overview.total_eligible, currency),
        Cell::new(format!(
            "{} ({} plans)",
            ui::format_money(overview.planned_budget, currency),
            overview.opportunity_count
        )),
        Cell::new(overview.high_priority_count),
    ]);
    table.to_string()
}

pub fn render_plan(plan: &AllocationPlan, currency: &str) -> String {
    let mut output = format!(
        "\n{}\n\n",
        ui::style_text("Investment Allocation", ui::StyleType::Title)
    );

    if plan.allocations.is_empty() {
        output.push_str(&ui::style_text(&plan.notes, ui::StyleType::Subtle));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Opportunity"),
        ui::header_cell("Category"),
        ui::header_cell("Priority"),
        ui::header_cell("Funded / Requested"),
        ui::header_cell("Funded from"),
        ui::header_cell("Shortfall"),
    ]);

    for row in &plan.allocations {
        let sources = if row.contribution.is_empty() {
            "-".to_string()
        } else {
            row.contribution
                .iter()
                .map(|c| format!("{}: {}", c.name, ui::format_money(c.amount, currency)))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let shortfall = if row.remaining > 0.0 {
            ui::money_cell(row.remaining, currency).fg(comfy_table::Color::Red)
        } else {
            Cell::new("-")
        };
        let mut name = row.opportunity.clone();
        if let Some(notes) = &row.notes {
            name.push('\n');
            name.push_str(&ui::style_text(notes, ui::StyleType::Subtle));
        }

        table.add_row(vec![
            Cell::new(name),
            Cell::new(row.category.label()),
            ui::priority_cell(&row.priority.to_string()),
            Cell::new(format!(
                "{} / {}",
                ui::format_money(row.fulfilled, currency),
                ui::format_money(row.requested, currency)
            )),
            Cell::new(sources),
            shortfall,
        ]);
    }

    output.push_str(&table.to_string());

    let notes_style = if plan.exhausted_accounts.is_empty() {
        ui::StyleType::Subtle
    } else {
        ui::StyleType::Warning
    };
    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(&plan.notes, notes_style)
    ));
    output
}
