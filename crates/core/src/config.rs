//! Layered configuration for the TICK engine binaries.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults (conservative risk limits).
//! 2. TOML configuration file (if provided).
//!
//! There is no environment-variable layer: the core consumes no
//! environment variables.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, File};
use serde::Deserialize;

// ── Default value functions ────────────────────────────────────────────

/// Default traded symbol id.
fn default_symbol_id() -> u32 {
    1
}

/// Default mean-reversion entry threshold, in price units.
fn default_threshold() -> f64 {
    0.5
}

/// Default EWMA smoothing factor.
fn default_ewma_alpha() -> f64 {
    0.1
}

/// Default maximum single-order quantity.
fn default_max_order_qty() -> f64 {
    1.0
}

/// Default fat-finger band, in price units.
fn default_max_price_deviation() -> f64 {
    1_000.0
}

/// Default order rate limit per second.
fn default_max_orders_per_sec() -> i64 {
    100
}

/// Default audit log path.
fn default_audit_log() -> String {
    "tick_engine.log".to_string()
}

/// Default mock feeder inter-trade gap: 100 microseconds.
fn default_tick_interval_us() -> u64 {
    100
}

/// Default mock feeder starting price.
fn default_start_price() -> f64 {
    50_000.0
}

// ── Configuration structs ──────────────────────────────────────────────

/// Top-level application configuration for the trading binary.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Strategy parameters.
    pub engine: EngineConfig,
    /// Pre-trade risk limits.
    pub risk: RiskSettings,
    /// Audit logger settings.
    pub audit: AuditConfig,
    /// Mock feeder settings.
    #[serde(default)]
    pub feeder: FeederConfig,
}

/// Strategy parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Symbol the strategy trades.
    #[serde(default = "default_symbol_id")]
    pub symbol_id: u32,
    /// Mean-reversion entry threshold in price units.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// EWMA smoothing factor, must lie in (0, 1].
    #[serde(default = "default_ewma_alpha")]
    pub ewma_alpha: f64,
}

/// Pre-trade risk limits, expressed in display units and converted to
/// fixed point where the gate is built.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskSettings {
    /// Maximum single-order quantity.
    #[serde(default = "default_max_order_qty")]
    pub max_order_qty: f64,
    /// Maximum deviation between order price and reference price.
    #[serde(default = "default_max_price_deviation")]
    pub max_price_deviation: f64,
    /// Maximum orders per second (token bucket capacity and refill rate).
    #[serde(default = "default_max_orders_per_sec")]
    pub max_orders_per_sec: i64,
}

/// Audit logger settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// File the audit worker appends to.
    #[serde(default = "default_audit_log")]
    pub path: String,
}

/// Mock feeder settings for the demo binary.
#[derive(Debug, Clone, Deserialize)]
pub struct FeederConfig {
    /// Gap between generated trades, in microseconds.
    #[serde(default = "default_tick_interval_us")]
    pub tick_interval_us: u64,
    /// Starting price of the random walk.
    #[serde(default = "default_start_price")]
    pub start_price: f64,
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            tick_interval_us: default_tick_interval_us(),
            start_price: default_start_price(),
        }
    }
}

impl AppConfig {
    /// Load configuration from compiled-in defaults, then an optional
    /// TOML file, then validate.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("engine.symbol_id", 1i64)?
            .set_default("engine.threshold", 0.5)?
            .set_default("engine.ewma_alpha", 0.1)?
            .set_default("risk.max_order_qty", 1.0)?
            .set_default("risk.max_price_deviation", 1000.0)?
            .set_default("risk.max_orders_per_sec", 100i64)?
            .set_default("audit.path", "tick_engine.log")?
            .set_default("feeder.tick_interval_us", 100i64)?
            .set_default("feeder.start_price", 50000.0)?;

        if let Some(path) = config_path {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        let cfg: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    fn validate(&self) -> Result<()> {
        if self.engine.threshold <= 0.0 {
            bail!("engine.threshold must be positive");
        }
        if !(0.0..=1.0).contains(&self.engine.ewma_alpha) || self.engine.ewma_alpha == 0.0 {
            bail!("engine.ewma_alpha must lie in (0, 1]");
        }
        if self.risk.max_order_qty <= 0.0 {
            bail!("risk.max_order_qty must be positive");
        }
        if self.risk.max_price_deviation <= 0.0 {
            bail!("risk.max_price_deviation must be positive");
        }
        if self.risk.max_orders_per_sec <= 0 {
            bail!("risk.max_orders_per_sec must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Helper: create a temporary TOML config file and return its path.
    ///
    /// Uses `.toml` suffix so the `config` crate auto-detects the format.
    fn write_temp_toml(content: &str) -> (tempfile::NamedTempFile, PathBuf) {
        let mut f = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("create temp file");
        write!(f, "{}", content).expect("write temp file");
        let path = f.path().to_path_buf();
        (f, path)
    }

    #[test]
    fn test_load_defaults_only() {
        let cfg = AppConfig::load(None).expect("load defaults");
        assert_eq!(cfg.engine.symbol_id, 1);
        assert_eq!(cfg.engine.threshold, 0.5);
        assert_eq!(cfg.engine.ewma_alpha, 0.1);
        assert_eq!(cfg.risk.max_order_qty, 1.0);
        assert_eq!(cfg.risk.max_orders_per_sec, 100);
        assert_eq!(cfg.audit.path, "tick_engine.log");
        assert_eq!(cfg.feeder.tick_interval_us, 100);
    }

    #[test]
    fn test_load_from_toml() {
        let toml_content = r#"
[engine]
symbol_id = 7
threshold = 1.5

[risk]
max_order_qty = 0.25
max_price_deviation = 250.0
max_orders_per_sec = 10

[audit]
path = "/tmp/custom_audit.log"

[feeder]
tick_interval_us = 50
start_price = 100.0
"#;
        let (_f, path) = write_temp_toml(toml_content);
        let cfg = AppConfig::load(Some(path)).expect("load from toml");

        assert_eq!(cfg.engine.symbol_id, 7);
        assert_eq!(cfg.engine.threshold, 1.5);
        assert_eq!(cfg.risk.max_order_qty, 0.25);
        assert_eq!(cfg.risk.max_orders_per_sec, 10);
        assert_eq!(cfg.audit.path, "/tmp/custom_audit.log");
        assert_eq!(cfg.feeder.start_price, 100.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_content = r#"
[engine]
threshold = 2.0
"#;
        let (_f, path) = write_temp_toml(toml_content);
        let cfg = AppConfig::load(Some(path)).expect("load partial toml");
        assert_eq!(cfg.engine.threshold, 2.0);
        assert_eq!(cfg.engine.symbol_id, 1);
        assert_eq!(cfg.risk.max_order_qty, 1.0);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let toml_content = r#"
[engine]
threshold = -1.0
"#;
        let (_f, path) = write_temp_toml(toml_content);
        let result = AppConfig::load(Some(path));
        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("threshold"));
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        let toml_content = r#"
[engine]
ewma_alpha = 0.0
"#;
        let (_f, path) = write_temp_toml(toml_content);
        assert!(AppConfig::load(Some(path)).is_err());

        let toml_content = r#"
[engine]
ewma_alpha = 1.5
"#;
        let (_f, path) = write_temp_toml(toml_content);
        assert!(AppConfig::load(Some(path)).is_err());
    }

    #[test]
    fn test_invalid_rate_limit_rejected() {
        let toml_content = r#"
[risk]
max_orders_per_sec = 0
"#;
        let (_f, path) = write_temp_toml(toml_content);
        assert!(AppConfig::load(Some(path)).is_err());
    }

    #[test]
    fn test_missing_file_fails() {
        let result = AppConfig::load(Some(PathBuf::from("/nonexistent/tick.toml")));
        assert!(result.is_err());
    }
}
