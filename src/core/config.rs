use crate::core::projection::DEFAULT_EXPECTED_RETURN;
use crate::core::tax::{CORPORATE_TAX_RATE, TaxRates, VAT_RATE};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf};
use tracing::debug;

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TaxConfig {
    #[serde(default = "default_corporate_rate")]
    pub corporate_rate: f64,
    #[serde(default = "default_vat_rate")]
    pub vat_rate: f64,
}

fn default_corporate_rate() -> f64 {
    CORPORATE_TAX_RATE
}

fn default_vat_rate() -> f64 {
    VAT_RATE
}

impl Default for TaxConfig {
    fn default() -> Self {
        TaxConfig {
            corporate_rate: CORPORATE_TAX_RATE,
            vat_rate: VAT_RATE,
        }
    }
}

impl TaxConfig {
    pub fn rates(&self) -> TaxRates {
        TaxRates {
            corporate: self.corporate_rate,
            vat: self.vat_rate,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct InvestmentConfig {
    #[serde(default = "default_expected_return")]
    pub expected_return: f64,
}

fn default_expected_return() -> f64 {
    DEFAULT_EXPECTED_RETURN
}

impl Default for InvestmentConfig {
    fn default() -> Self {
        InvestmentConfig {
            expected_return: DEFAULT_EXPECTED_RETURN,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct GeminiProviderConfig {
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Language the forecast is requested in, e.g. "English" or "Thai".
    #[serde(default = "default_gemini_language")]
    pub language: String,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_language() -> String {
    "English".to_string()
}

impl Default for GeminiProviderConfig {
    fn default() -> Self {
        GeminiProviderConfig {
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            api_key: None,
            language: default_gemini_language(),
        }
    }
}

// Never prints the API key.
impl fmt::Debug for GeminiProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProviderConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("language", &self.language)
            .finish()
    }
}

impl GeminiProviderConfig {
    /// API key from `GEMINI_API_KEY`, falling back to the config file.
    /// Quotes and surrounding whitespace are stripped; blank keys count as unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .or_else(|| self.api_key.clone())
            .map(|key| key.replace(['"', '\''], "").trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub gemini: Option<GeminiProviderConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub data_path: Option<String>,
    #[serde(default)]
    pub tax: TaxConfig,
    #[serde(default)]
    pub investment: InvestmentConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

fn default_currency() -> String {
    "THB".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            data_path: None,
            tax: TaxConfig::default(),
            investment: InvestmentConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("io", "smeops", "smeops")
            .context("Could not determine project directories")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
