use crate::error::{LadderError, Result};
use crate::feed::binance::{MAX_DEPTH_LIMIT, SPOT_DEPTH_ENDPOINT};
use crate::ladder::{LadderParams, DEFAULT_ROWS};
use log::{info, LevelFilter};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "DEPTH_LADDER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "depth-ladder.toml";

/// Largest display precision accepted; the mid-price is shown with two more digits and
/// `Decimal` carries at most 28.
const MAX_PRECISION: u32 = 26;

/// Top-level configuration, one struct per TOML section. Every field has a default so an
/// empty or missing file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub ladder: LadderConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Binance,
    Simulated,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub source: FeedKind,
    pub endpoint: String,
    pub depth_limit: u32,
    pub refresh_interval_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: FeedKind::Binance,
            endpoint: SPOT_DEPTH_ENDPOINT.to_string(),
            depth_limit: MAX_DEPTH_LIMIT,
            refresh_interval_ms: 3000,
        }
    }
}

/// The selectable menus and their initial picks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LadderConfig {
    pub rows: usize,
    pub aggregation_steps: Vec<Decimal>,
    pub default_step: Decimal,
    pub pairs: Vec<String>,
    pub default_pair: String,
    pub precisions: Vec<u32>,
    pub price_precision: u32,
    pub quantity_precision: u32,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            aggregation_steps: vec![
                dec!(0.01),
                dec!(0.1),
                dec!(0.2),
                dec!(1),
                dec!(5),
                dec!(10),
                dec!(50),
                dec!(100),
                dec!(250),
                dec!(500),
            ],
            default_step: dec!(0.01),
            pairs: ["BTCUSDT", "ETHUSDT", "SOLUSDT", "WLDUSDT"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            default_pair: "ETHUSDT".to_string(),
            precisions: (0..=4).collect(),
            price_precision: 2,
            quantity_precision: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl LogConfig {
    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.level
            .parse()
            .map_err(|_| LadderError::Config(format!("unknown log level '{}'", self.level)))
    }
}

impl AppConfig {
    /// Path from `DEPTH_LADDER_CONFIG`, falling back to `depth-ladder.toml`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Loads `path` if it exists, otherwise returns the defaults. Either way the result is
    /// validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("No config at {}, using defaults", path.display());
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            LadderError::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;

        let config = Self::from_toml_str(&raw)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(raw).map_err(|e| LadderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let ladder = &self.ladder;

        if self.feed.refresh_interval_ms == 0 {
            return Err(invalid("feed.refresh_interval_ms must be positive"));
        }
        if ladder.rows == 0 {
            return Err(invalid("ladder.rows must be positive"));
        }

        if ladder.aggregation_steps.is_empty() {
            return Err(invalid("ladder.aggregation_steps is empty"));
        }
        if let Some(step) = ladder
            .aggregation_steps
            .iter()
            .find(|s| **s <= Decimal::ZERO)
        {
            return Err(LadderError::Config(format!(
                "aggregation step {step} is not positive"
            )));
        }
        if !ladder.aggregation_steps.contains(&ladder.default_step) {
            return Err(LadderError::Config(format!(
                "default step {} is not in ladder.aggregation_steps",
                ladder.default_step
            )));
        }

        if ladder.pairs.is_empty() {
            return Err(invalid("ladder.pairs is empty"));
        }
        if !ladder
            .pairs
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&ladder.default_pair))
        {
            return Err(LadderError::Config(format!(
                "default pair {} is not in ladder.pairs",
                ladder.default_pair
            )));
        }

        if ladder.precisions.is_empty() {
            return Err(invalid("ladder.precisions is empty"));
        }
        if let Some(p) = ladder.precisions.iter().find(|p| **p > MAX_PRECISION) {
            return Err(LadderError::Config(format!(
                "precision {p} exceeds {MAX_PRECISION}"
            )));
        }
        for (name, value) in [
            ("price_precision", ladder.price_precision),
            ("quantity_precision", ladder.quantity_precision),
        ] {
            if !ladder.precisions.contains(&value) {
                return Err(LadderError::Config(format!(
                    "ladder.{name} = {value} is not in ladder.precisions"
                )));
            }
        }

        self.log.level_filter()?;
        Ok(())
    }

    #[inline]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.feed.refresh_interval_ms)
    }

    /// Parameters for the initial menu selection.
    pub fn ladder_params(&self) -> LadderParams {
        LadderParams {
            step: self.ladder.default_step,
            price_precision: self.ladder.price_precision,
            quantity_precision: self.ladder.quantity_precision,
            rows: self.ladder.rows,
        }
    }
}

fn invalid(message: &str) -> LadderError {
    LadderError::Config(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();

        assert_eq!(config.feed.source, FeedKind::Binance);
        assert_eq!(config.refresh_interval(), Duration::from_secs(3));
        assert_eq!(config.ladder_params(), LadderParams::default());
        assert_eq!(config.ladder.aggregation_steps.len(), 10);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let config = AppConfig::from_toml_str(
            r#"
            [feed]
            source = "simulated"
            refresh_interval_ms = 1000

            [ladder]
            aggregation_steps = ["0.5", "1", "2.5"]
            default_step = "2.5"
            default_pair = "solusdt"
            quantity_precision = 4

            [log]
            file = "ladder.log"
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.feed.source, FeedKind::Simulated);
        assert_eq!(config.feed.endpoint, SPOT_DEPTH_ENDPOINT);
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
        assert_eq!(config.ladder.default_step, dec!(2.5));
        assert_eq!(config.ladder.rows, 10);
        assert_eq!(config.ladder_params().quantity_precision, 4);
        assert_eq!(config.log.file, Some(PathBuf::from("ladder.log")));
        assert_eq!(config.log.level_filter().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn test_rejects_bad_menus() {
        let cases = [
            "[ladder]\naggregation_steps = []",
            "[ladder]\naggregation_steps = [\"0\", \"1\"]\ndefault_step = \"1\"",
            "[ladder]\ndefault_step = \"3\"",
            "[ladder]\ndefault_pair = \"DOGEUSDT\"",
            "[ladder]\nprecisions = [0, 1]",
            "[ladder]\nprecisions = [2, 27]",
            "[ladder]\nrows = 0",
            "[feed]\nrefresh_interval_ms = 0",
            "[log]\nlevel = \"loud\"",
        ];

        for case in cases {
            assert!(
                matches!(AppConfig::from_toml_str(case), Err(LadderError::Config(_))),
                "accepted: {case}"
            );
        }
    }

    #[test]
    fn test_unknown_source_rejected() {
        let result = AppConfig::from_toml_str("[feed]\nsource = \"kraken\"");
        assert!(matches!(result, Err(LadderError::Config(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("/nonexistent/depth-ladder.toml").unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
