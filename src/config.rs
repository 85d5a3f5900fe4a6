//! Configuration for the analytics pipeline.
//!
//! Every component takes its configuration by reference; there are no
//! module-level tunables, so concurrent evaluations with different
//! settings never share state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PairLabError;

/// Configuration for the cointegration scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Accept a pair when the Engle-Granger p-value is below this.
    #[serde(default = "default_p_value_threshold")]
    pub p_value_threshold: f64,

    /// Minimum overlapping non-missing observations per pair.
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,

    /// Maximum ADF lag order. `None` uses the Schwert rule
    /// ceil(12 * (n/100)^0.25); the order itself is then chosen by AIC.
    #[serde(default)]
    pub max_lag: Option<usize>,
}

/// Configuration for the recursive (Kalman) hedge ratio estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalmanConfig {
    /// Prior mean of the ratio state before the first observation.
    #[serde(default = "default_initial_mean")]
    pub initial_mean: f64,

    /// Prior variance of the ratio state.
    #[serde(default = "default_initial_variance")]
    pub initial_variance: f64,

    /// Process noise variance (Q): how fast the ratio may drift.
    #[serde(default = "default_process_noise")]
    pub process_noise: f64,

    /// Observation noise variance (R): measurement uncertainty of the
    /// raw price ratio.
    #[serde(default = "default_observation_noise")]
    pub observation_noise: f64,
}

/// Configuration for spread signal generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Rolling window length for the z-score.
    #[serde(default = "default_window")]
    pub window: usize,

    /// Absolute z-score at which a position is opened.
    #[serde(default = "default_entry_threshold")]
    pub entry_threshold: f64,

    /// Absolute z-score at which an open position is closed.
    #[serde(default = "default_exit_threshold")]
    pub exit_threshold: f64,
}

/// Configuration for the backtest engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Proportional commission per unit of position change.
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
}

/// Parameter grid for the optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeConfig {
    /// Rolling window candidates, in sweep order.
    #[serde(default = "default_windows")]
    pub windows: Vec<usize>,

    /// Entry-threshold candidates, in sweep order.
    #[serde(default = "default_entry_thresholds")]
    pub entry_thresholds: Vec<f64>,

    /// Exit threshold held fixed across the grid.
    #[serde(default = "default_exit_threshold")]
    pub exit_threshold: f64,

    /// Commission applied in every grid cell.
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
}

/// Aggregate configuration, loadable from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub kalman: KalmanConfig,
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub backtest: BacktestConfig,
    #[serde(default)]
    pub optimize: OptimizeConfig,
}

// Default value functions for serde
fn default_p_value_threshold() -> f64 {
    0.05
}
fn default_min_observations() -> usize {
    60
}
fn default_initial_mean() -> f64 {
    0.0
}
fn default_initial_variance() -> f64 {
    1.0
}
fn default_process_noise() -> f64 {
    0.01
}
fn default_observation_noise() -> f64 {
    1.0
}
fn default_window() -> usize {
    60
}
fn default_entry_threshold() -> f64 {
    2.0
}
fn default_exit_threshold() -> f64 {
    0.5
}
fn default_commission_rate() -> f64 {
    0.001
}
fn default_windows() -> Vec<usize> {
    (20..=100).step_by(10).collect()
}
fn default_entry_thresholds() -> Vec<f64> {
    (2..=6).map(|i| i as f64 / 2.0).collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            p_value_threshold: default_p_value_threshold(),
            min_observations: default_min_observations(),
            max_lag: None,
        }
    }
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self {
            initial_mean: default_initial_mean(),
            initial_variance: default_initial_variance(),
            process_noise: default_process_noise(),
            observation_noise: default_observation_noise(),
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            entry_threshold: default_entry_threshold(),
            exit_threshold: default_exit_threshold(),
        }
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            commission_rate: default_commission_rate(),
        }
    }
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            windows: default_windows(),
            entry_thresholds: default_entry_thresholds(),
            exit_threshold: default_exit_threshold(),
            commission_rate: default_commission_rate(),
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.p_value_threshold) {
            return Err(format!(
                "p_value_threshold must be between 0.0 and 1.0, got {}",
                self.p_value_threshold
            ));
        }
        if self.min_observations < 20 {
            return Err(format!(
                "min_observations must be at least 20 for a meaningful test, got {}",
                self.min_observations
            ));
        }
        Ok(())
    }
}

impl KalmanConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_variance <= 0.0 {
            return Err("initial_variance must be positive".to_string());
        }
        if self.process_noise < 0.0 {
            return Err("process_noise cannot be negative".to_string());
        }
        if self.observation_noise <= 0.0 {
            return Err("observation_noise must be positive".to_string());
        }
        Ok(())
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.window < 2 {
            return Err(format!("window must be at least 2, got {}", self.window));
        }
        if self.entry_threshold <= 0.0 {
            return Err("entry_threshold must be positive".to_string());
        }
        if self.exit_threshold < 0.0 {
            return Err("exit_threshold cannot be negative".to_string());
        }
        if self.exit_threshold >= self.entry_threshold {
            return Err(format!(
                "exit_threshold ({}) must be below entry_threshold ({})",
                self.exit_threshold, self.entry_threshold
            ));
        }
        Ok(())
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.commission_rate < 0.0 {
            return Err("commission_rate cannot be negative".to_string());
        }
        Ok(())
    }
}

impl OptimizeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.windows.is_empty() {
            return Err("windows cannot be empty".to_string());
        }
        if self.windows.iter().any(|&w| w < 2) {
            return Err("every window must be at least 2".to_string());
        }
        if self.entry_thresholds.is_empty() {
            return Err("entry_thresholds cannot be empty".to_string());
        }
        if self
            .entry_thresholds
            .iter()
            .any(|&t| t <= self.exit_threshold)
        {
            return Err(format!(
                "every entry threshold must exceed the exit threshold {}",
                self.exit_threshold
            ));
        }
        if self.commission_rate < 0.0 {
            return Err("commission_rate cannot be negative".to_string());
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load an aggregate configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PairLabError> {
        let raw = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        config
            .validate()
            .map_err(PairLabError::InvalidConfig)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.scan.validate()?;
        self.kalman.validate()?;
        self.signal.validate()?;
        self.backtest.validate()?;
        self.optimize.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_grid_matches_documented_ranges() {
        let config = OptimizeConfig::default();
        assert_eq!(config.windows.first(), Some(&20));
        assert_eq!(config.windows.last(), Some(&100));
        assert_eq!(config.entry_thresholds, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
    }

    #[test]
    fn test_exit_above_entry_invalid() {
        let config = SignalConfig {
            window: 60,
            entry_threshold: 1.0,
            exit_threshold: 1.5,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_p_threshold() {
        let config = ScanConfig {
            p_value_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"signal": {"window": 30}}"#).unwrap();
        assert_eq!(config.signal.window, 30);
        assert_eq!(config.signal.entry_threshold, 2.0);
        assert_eq!(config.backtest.commission_rate, 0.001);
    }
}
