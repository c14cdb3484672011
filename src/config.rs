use crate::market_data::TimeFrame;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub binance: BinanceConfig,
    #[serde(default)]
    pub indicators: IndicatorConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinanceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_stoch_smooth")]
    pub stoch_smooth_k: usize,
    #[serde(default = "default_stoch_smooth")]
    pub stoch_smooth_d: usize,
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,
    #[serde(default = "default_timeframes")]
    pub timeframes: Vec<TimeFrame>,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl BinanceConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            stoch_smooth_k: default_stoch_smooth(),
            stoch_smooth_d: default_stoch_smooth(),
            atr_period: default_atr_period(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            quote_currency: default_quote_currency(),
            timeframes: default_timeframes(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_max_retries() -> u32 {
    3 // attempts per timeframe, including the first
}

fn default_retry_delay_secs() -> u64 {
    3
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_rsi_period() -> usize {
    14
}

fn default_stoch_smooth() -> usize {
    3
}

fn default_atr_period() -> usize {
    14
}

fn default_history_limit() -> usize {
    100 // bars requested per timeframe
}

fn default_quote_currency() -> String {
    "USDT".to_string()
}

fn default_timeframes() -> Vec<TimeFrame> {
    TimeFrame::all().to_vec()
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to the built-in
    /// defaults when the file does not exist.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = serde_json::from_str(&config_str)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        config.sanitize();
        Ok(config)
    }

    /// Replace settings that would make the analysis meaningless
    fn sanitize(&mut self) {
        if self.analysis.timeframes.is_empty() {
            warn!("No timeframes configured, using 15m, 1h, 4h, 1d");
            self.analysis.timeframes = default_timeframes();
        }
        if self.analysis.history_limit == 0 {
            warn!("History limit of 0 bars, using {}", default_history_limit());
            self.analysis.history_limit = default_history_limit();
        }
        if self.binance.max_retries == 0 {
            warn!("max_retries must be at least 1, using {}", default_max_retries());
            self.binance.max_retries = default_max_retries();
        }
    }
}
