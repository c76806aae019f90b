use std::fs;
use std::path::Path;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_gemini_mock_server(model: &str, forecast_text: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/v1beta/models/{model}:generateContent");
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": forecast_text }] } }]
        });

        Mock::given(method("POST"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(dir: &std::path::Path, extra: &str) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let data_path = dir.join("data");
        let content = format!(
            "currency: \"THB\"\ndata_path: \"{}\"\n{extra}",
            data_path.display()
        );
        std::fs::write(&config_path, content).expect("Failed to write config file");
        config_path
    }
}

const DATA: &str = r#"
accounts:
  - id: a1
    name: Operating
    balance: 300
    status: available
opportunities:
  - id: o1
    name: Low priority
    category: stock
    amount: 100
    priority: low
  - id: o2
    name: High priority
    category: machine
    amount: 50
    priority: high
transactions:
  - id: t1
    amount: 1000
    type: Sale
    counterparty: Customer
  - id: t2
    amount: -400
    type: Supplies
    counterparty: Vendor
goals:
  - id: g1
    name: Emergency reserve
    initialAmount: 1000
    monthlyContribution: 100
    horizon: 2
"#;

fn write_data(dir: &Path) -> std::path::PathBuf {
    let data_file = dir.join("data.yaml");
    fs::write(&data_file, DATA).expect("Failed to write data file");
    data_file
}

fn open_repository(dir: &Path) -> smeops::core::Repository {
    let config = smeops::core::config::AppConfig {
        data_path: Some(dir.join("data").to_string_lossy().into_owned()),
        ..Default::default()
    };
    let store = smeops::store::open_store(&config).expect("Failed to open store");
    smeops::core::Repository::new(store)
}

#[test_log::test(tokio::test)]
async fn test_import_then_plan_and_tax() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), "");
    let config_path = config_path.to_str().unwrap();
    let data_file = write_data(temp_dir.path());

    let result = smeops::run_command(
        smeops::AppCommand::Import { path: data_file },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "Import failed with: {:?}", result.err());

    for command in [
        smeops::AppCommand::Plan,
        smeops::AppCommand::Tax {
            corporate_rate: None,
        },
        smeops::AppCommand::Tax {
            corporate_rate: Some(0.15),
        },
        smeops::AppCommand::Forecast { goal: None },
    ] {
        info!(?command, "Running command");
        let result = smeops::run_command(command, Some(config_path)).await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }

    // Data persisted to disk and the planners did not write back
    let repository = open_repository(temp_dir.path());
    let accounts = repository.accounts().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].balance, 300.0);

    let plan = smeops::core::allocate(&accounts, &repository.opportunities().unwrap());
    assert_eq!(plan.allocations[0].opportunity, "High priority");
    assert_eq!(plan.allocations[0].fulfilled, 50.0);
    assert_eq!(plan.allocations[1].fulfilled, 70.0);

    let summary = smeops::core::summarize(&repository.transactions().unwrap());
    assert_eq!(summary.profit, 600.0);
    assert!((summary.net_vat - 42.0).abs() < 1e-9);
}

#[test_log::test(tokio::test)]
async fn test_forecast_with_gemini_mock() {
    let forecast = r#"[{"label":"Y1","value":2300},{"label":"Y2","value":3700}]"#;
    let mock_server = test_utils::create_gemini_mock_server("gemini-2.5-flash", forecast).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let providers = format!(
        "providers:\n  gemini:\n    base_url: \"{}\"\n    api_key: \"test-key\"\n",
        mock_server.uri()
    );
    let config_path = test_utils::write_config(temp_dir.path(), &providers);
    let config_path = config_path.to_str().unwrap();
    let data_file = write_data(temp_dir.path());

    smeops::run_command(
        smeops::AppCommand::Import { path: data_file },
        Some(config_path),
    )
    .await
    .expect("Import failed");

    let result = smeops::run_command(
        smeops::AppCommand::Forecast {
            goal: Some("g1".to_string()),
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "Forecast failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_unknown_goal_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), "");
    let config_path = config_path.to_str().unwrap();
    let data_file = write_data(temp_dir.path());

    smeops::run_command(
        smeops::AppCommand::Import { path: data_file },
        Some(config_path),
    )
    .await
    .expect("Import failed");

    let result = smeops::run_command(
        smeops::AppCommand::Forecast {
            goal: Some("missing".to_string()),
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Goal not found"));
}

#[test_log::test(tokio::test)]
async fn test_plan_on_empty_store() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), "");

    let result =
        smeops::run_command(smeops::AppCommand::Plan, Some(config_path.to_str().unwrap())).await;
    assert!(result.is_ok(), "Plan failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_fails() {
    let result = smeops::run_command(
        smeops::AppCommand::Plan,
        Some("/nonexistent/smeops/config.yaml"),
    )
    .await;
    assert!(result.is_err());
}
