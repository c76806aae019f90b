//! Savings goal projections and the forecast provider abstraction.

use crate::core::model::Goal;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_EXPECTED_RETURN: f64 = 0.06;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub label: String,
    pub value: f64,
}

/// Year-by-year balance of a goal compounding at `annual_rate`, with monthly
/// contributions added once per year.
pub fn build_projection(goal: &Goal, annual_rate: f64) -> Vec<ProjectionPoint> {
    let annual_contribution = goal.monthly_contribution * 12.0;
    let mut balance = goal.initial_amount;

    (1..=goal.horizon_years)
        .map(|year| {
            balance = balance * (1.0 + annual_rate) + annual_contribution;
            ProjectionPoint {
                label: format!("Y{year}"),
                value: balance.round(),
            }
        })
        .collect()
}

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn forecast(&self, goal: &Goal) -> Result<Vec<ProjectionPoint>>;
}

/// Where a projection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastSource {
    Provider,
    Deterministic,
}

/// Asks `provider` for a forecast and falls back to [`build_projection`] when
/// there is no provider, it fails, or it returns nothing.
pub async fn forecast_or_project(
    provider: Option<&dyn ForecastProvider>,
    goal: &Goal,
    annual_rate: f64,
) -> (Vec<ProjectionPoint>, ForecastSource) {
    if let Some(provider) = provider {
        match provider.forecast(goal).await {
            Ok(points) if !points.is_empty() => return (points, ForecastSource::Provider),
            Ok(_) => warn!(goal = %goal.name, "Forecast provider returned no points"),
            Err(e) => warn!(goal = %goal.name, error = %e, "Forecast provider failed"),
        }
    }
    debug!(goal = %goal.name, annual_rate, "Using deterministic projection");
    (build_projection(goal, annual_rate), ForecastSource::Deterministic)
}
