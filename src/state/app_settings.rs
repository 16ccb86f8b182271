use log::LevelFilter;
use mmpool_core::client::DEFAULT_API_URL;
use std::path::PathBuf;

pub const BRACKET_ENV: &str = "MMPOOL_BRACKET_JSON";
pub const API_URL_ENV: &str = "MMPOOL_API_URL";
pub const PREDICTIONS_ENV: &str = "MMPOOL_PREDICTIONS_JSON";

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// Bracket configuration file. `None` means the embedded bracket.
    pub bracket_path: Option<PathBuf>,
    pub api_url: String,
    /// Local predictions file, used instead of the analysis service when set.
    pub predictions_path: Option<PathBuf>,
    pub json: bool,
    pub log_level: Option<LevelFilter>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bracket_path: None,
            api_url: DEFAULT_API_URL.to_string(),
            predictions_path: None,
            json: false,
            log_level: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            bracket_path: var(BRACKET_ENV).map(PathBuf::from),
            api_url: var(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            predictions_path: var(PREDICTIONS_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Command-line values win over the environment.
    pub fn with_overrides(
        mut self,
        bracket: Option<PathBuf>,
        api_url: Option<String>,
        predictions: Option<PathBuf>,
    ) -> Self {
        if bracket.is_some() {
            self.bracket_path = bracket;
        }
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if predictions.is_some() {
            self.predictions_path = predictions;
        }
        self
    }

    /// `-v` raises the default filter to info, `-vv` to debug.
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.log_level = match verbose {
            0 => None,
            1 => Some(LevelFilter::Info),
            2 => Some(LevelFilter::Debug),
            _ => Some(LevelFilter::Trace),
        };
        self
    }

    pub fn default_filter(&self) -> String {
        self.log_level.unwrap_or(LevelFilter::Warn).to_string().to_lowercase()
    }
}
