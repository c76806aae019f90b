pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::projection::ForecastProvider;
use crate::core::repository::Repository;
use crate::providers::gemini::GeminiForecastProvider;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Import { path: PathBuf },
    Plan,
    Tax { corporate_rate: Option<f64> },
    Forecast { goal: Option<String> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("smeops starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = store::open_store(&config)?;
    let repository = Repository::new(store);
    let currency = config.currency.as_str();

    match command {
        AppCommand::Import { path } => cli::import::run(&repository, &path),
        AppCommand::Plan => cli::plan::run(&repository, currency),
        AppCommand::Tax { corporate_rate } => {
            let mut rates = config.tax.rates();
            if let Some(rate) = corporate_rate {
                rates.corporate = rate;
            }
            cli::tax::run(&repository, rates, currency)
        }
        AppCommand::Forecast { goal } => {
            let provider = match &config.providers.gemini {
                Some(gemini) => GeminiForecastProvider::from_config(gemini)?,
                None => None,
            };
            cli::forecast::run(
                &repository,
                goal.as_deref(),
                provider.as_ref().map(|p| p as &dyn ForecastProvider),
                config.investment.expected_return,
                currency,
            )
            .await
        }
    }
}
