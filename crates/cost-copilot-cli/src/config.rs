use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use cost_copilot_core::data::DataSource;
use cost_copilot_core::report::chat_client::ChatConfig;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "copilot.toml";

/// Settings read from `copilot.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CopilotConfig {
    pub data: DataSource,
    pub report: ReportConfig,
    pub narrative: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Products listed in stars / at-risk / most-impacted views
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig { top_n: 3 }
    }
}

impl CopilotConfig {
    /// Load `path`, or `copilot.toml` if it exists, or fall back to defaults.
    ///
    /// An explicitly requested file must exist.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        match path {
            Some(p) => Self::from_file(Path::new(p)),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        Self::from_toml(&content)
            .map_err(|e| format!("Failed to parse config '{}': {}", path.display(), e).into())
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CopilotConfig::from_toml("").unwrap();
        assert_eq!(config.report.top_n, 3);
        assert_eq!(config.data.bom_path, PathBuf::from("data/bom_products.csv"));
        assert_eq!(config.narrative.model, "gpt-3.5-turbo");
        assert_eq!(config.narrative.max_tokens, 700);
    }

    #[test]
    fn test_partial_sections_fill_in() {
        let config = CopilotConfig::from_toml(
            r#"
            [data]
            rates_path = "fixtures/rates.csv"

            [report]
            top_n = 5

            [narrative]
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();
        assert_eq!(config.report.top_n, 5);
        assert_eq!(config.data.rates_path, PathBuf::from("fixtures/rates.csv"));
        assert_eq!(config.data.bom_path, PathBuf::from("data/bom_products.csv"));
        assert_eq!(config.narrative.model, "gpt-4o-mini");
        assert_eq!(config.narrative.timeout_secs, 60);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(CopilotConfig::from_toml("[report]\ntop_n = \"three\"").is_err());
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        assert!(CopilotConfig::load(Some("does/not/exist.toml")).is_err());
    }
}
