use crate::core::config::GeminiProviderConfig;
use crate::core::model::Goal;
use crate::core::projection::{ForecastProvider, ProjectionPoint};
use crate::providers::util::{RetryPolicy, send_with_retry};
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Forecasts goal balances with the Gemini `generateContent` API.
pub struct GeminiForecastProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    language: String,
    retry: RetryPolicy,
}

impl GeminiForecastProvider {
    pub fn new(base_url: &str, model: &str, api_key: &str, language: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("smeops/1.0")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    /// Builds a provider when an API key is available, `None` otherwise.
    pub fn from_config(config: &GeminiProviderConfig) -> Result<Option<Self>> {
        match config.resolve_api_key() {
            Some(key) => Ok(Some(Self::new(
                &config.base_url,
                &config.model,
                &key,
                &config.language,
            )?)),
            None => {
                debug!("No Gemini API key configured");
                Ok(None)
            }
        }
    }

    fn prompt(&self, goal: &Goal) -> String {
        format!(
            "You are a financial planner. Given this goal data: name={}, initial={}, monthly={}, \
             horizon={} years. Respond in {}. Return JSON array only, like \
             [{{\"label\":\"Y1\",\"value\":12345}},...], showing projected balance each year using \
             realistic SME investment assumptions (consider mix of deposits, emergency fund \
             redeployment, business reinvestment). No prose.",
            goal.name, goal.initial_amount, goal.monthly_contribution, goal.horizon_years, self.language
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_deref().unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }
}

/// Extracts the `[...]` span from model output and parses it as projection points.
pub(crate) fn parse_points(content: &str) -> Result<Vec<ProjectionPoint>> {
    let json_text = match (content.find('['), content.rfind(']')) {
        (Some(start), Some(end)) if end > start => &content[start..=end],
        _ => content,
    };
    let points: Vec<ProjectionPoint> = serde_json::from_str(json_text)
        .with_context(|| format!("Failed to parse forecast points from: '{content}'"))?;
    Ok(points)
}

#[async_trait]
impl ForecastProvider for GeminiForecastProvider {
    async fn forecast(&self, goal: &Goal) -> Result<Vec<ProjectionPoint>> {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!("Requesting forecast from {}", endpoint);
        let url = format!("{endpoint}?key={}", self.api_key);

        let body = json!({ "contents": [{ "parts": [{ "text": self.prompt(goal) }] }] });
        let response = send_with_retry(|| self.client.post(&url).json(&body).send(), self.retry)
            .await
            .with_context(|| format!("Failed to send forecast request for goal: {}", goal.name))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read forecast response")?;
        if !status.is_success() {
            if response_text.trim().is_empty() {
                bail!("Gemini request failed with status {status}");
            }
            bail!("Gemini request failed with status {status}: {response_text}");
        }

        let parsed: GenerateResponse = serde_json::from_str(&response_text)
            .with_context(|| format!("Failed to parse Gemini response: '{response_text}'"))?;
        let points = parse_points(&parsed.text())?;
        if points.is_empty() {
            return Err(anyhow!("Gemini returned an empty forecast"));
        }

        debug!(goal = %goal.name, points = points.len(), "Received forecast");
        Ok(points)
    }
}
