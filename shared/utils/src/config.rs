use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

use crate::sheet::DateMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub extractor: ExtractorConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Stored for header labels whose neighbouring cell is blank.
    pub missing_value: String,
    /// Minimum run of leading dashes that closes an item table.
    pub terminator_dashes: usize,
    pub name_separator: String,
    pub date_format: String,
    pub date_mode: DateMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub column_width: usize,
    pub pretty_json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            file_path: None,
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            missing_value: "Data Not Present".to_string(),
            terminator_dashes: 10,
            name_separator: ":".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            date_mode: DateMode::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            column_width: 10,
            pretty_json: true,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("QUOTEMERGE").separator("__"));

        config.build()?.try_deserialize()
    }
}
