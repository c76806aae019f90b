use super::ui;
use crate::core::model::Goal;
use crate::core::projection::{ForecastProvider, ForecastSource, ProjectionPoint, forecast_or_project};
use crate::core::repository::Repository;
use anyhow::{Result, anyhow};
use comfy_table::Cell;

pub async fn run(
    repository: &Repository,
    goal_id: Option<&str>,
    provider: Option<&dyn ForecastProvider>,
    expected_return: f64,
    currency: &str,
) -> Result<()> {
    let goals = repository.goals()?;
    let Some(goal) = select_goal(&goals, goal_id)? else {
        println!(
            "{}",
            ui::style_text(
                "No goals found. Import goals to build a forecast.",
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    };

    let spinner = provider.map(|_| ui::new_spinner("Requesting forecast..."));
    let (points, source) = forecast_or_project(provider, goal, expected_return).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    println!("{}", render_forecast(goal, &points, source, expected_return, currency));
    ui::print_separator();
    Ok(())
}

/// Picks the goal with `goal_id`, or the first goal when no id is given.
pub fn select_goal<'a>(goals: &'a [Goal], goal_id: Option<&str>) -> Result<Option<&'a Goal>> {
    match goal_id {
        Some(id) => goals
            .iter()
            .find(|g| g.id == id)
            .map(Some)
            .ok_or_else(|| anyhow!("Goal not found: {id}")),
        None => Ok(goals.first()),
    }
}

pub fn render_forecast(
    goal: &Goal,
    points: &[ProjectionPoint],
    source: ForecastSource,
    expected_return: f64,
    currency: &str,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Year"), ui::header_cell("Projected balance")]);
    for point in points {
        table.add_row(vec![
            Cell::new(&point.label),
            ui::money_cell(point.value, currency),
        ]);
    }

    let source_note = match source {
        ForecastSource::Provider => "Forecast generated by Gemini".to_string(),
        ForecastSource::Deterministic => format!(
            "Deterministic projection at {:.1}% annual return",
            expected_return * 100.0
        ),
    };

    format!(
        "\nGoal: {}\n{}\n\n{}\n\n{}",
        ui::style_text(&goal.name, ui::StyleType::Title),
        ui::style_text(
            &format!(
                "Initial {} | Monthly {} | {} years",
                ui::format_money(goal.initial_amount, currency),
                ui::format_money(goal.monthly_contribution, currency),
                goal.horizon_years
            ),
            ui::StyleType::Subtle
        ),
        table,
        ui::style_text(&source_note, ui::StyleType::Subtle)
    )
}
