//! Fixed solver constants: PCU weights, saturation flow, lost time, bounds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignalError};
use crate::models::WeightTable;

/// Upper bound applied to the saturation sum before computing the cycle
/// length. Webster's formula diverges as the sum approaches 1.
pub const SATURATION_CEILING: f64 = 0.95;

/// Configuration of a signal optimizer.
///
/// Fixed at construction of a [`SignalOptimizer`](crate::optimizer::SignalOptimizer);
/// every request is evaluated against the same values.
///
/// Defaults: car 1.0, motorcycle 0.5, bus 3.0, truck 2.5 PCU; saturation
/// flow 30 PCU/min (about 1800 PCU/h); 4 s lost time per phase; 10 s minimum
/// green; cycle length between 60 s and 150 s.
///
/// # Examples
///
/// ```
/// use u_signal::config::SignalConfig;
///
/// let config = SignalConfig::new()
///     .with_saturation_flow(25.0)
///     .with_cycle_bounds(45, 120);
/// assert!(config.validate().is_ok());
///
/// let parsed = SignalConfig::from_toml_str("min_green_time = 7").unwrap();
/// assert_eq!(parsed.min_green_time, 7);
/// assert_eq!(parsed.max_cycle_time, 150);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// PCU weight per vehicle category.
    pub weights: WeightTable,
    /// Lane capacity in PCU per unit time. Must be positive.
    pub saturation_flow: f64,
    /// Yellow plus all-red seconds per phase.
    pub lost_time_per_phase: u32,
    /// Floor applied to every lane's green time.
    pub min_green_time: u32,
    /// Lower bound of the nominal cycle length.
    pub min_cycle_time: u32,
    /// Upper bound of the nominal cycle length.
    pub max_cycle_time: u32,
}

impl SignalConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the weight table.
    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the saturation flow.
    pub fn with_saturation_flow(mut self, flow: f64) -> Self {
        self.saturation_flow = flow;
        self
    }

    /// Sets the lost time per phase.
    pub fn with_lost_time_per_phase(mut self, seconds: u32) -> Self {
        self.lost_time_per_phase = seconds;
        self
    }

    /// Sets the minimum green time.
    pub fn with_min_green_time(mut self, seconds: u32) -> Self {
        self.min_green_time = seconds;
        self
    }

    /// Sets the nominal cycle bounds.
    pub fn with_cycle_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_cycle_time = min;
        self.max_cycle_time = max;
        self
    }

    /// Parses a TOML document; missing keys take their default values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SignalConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            SignalError::ConfigParse(msg) => {
                SignalError::ConfigParse(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Checks the configuration invariants.
    pub fn validate(&self) -> Result<()> {
        if !(self.saturation_flow.is_finite() && self.saturation_flow > 0.0) {
            return Err(SignalError::NonPositiveSaturationFlow(self.saturation_flow));
        }
        if self.min_cycle_time > self.max_cycle_time {
            return Err(SignalError::CycleBounds {
                min: self.min_cycle_time,
                max: self.max_cycle_time,
            });
        }
        if let Some((category, weight)) = self
            .weights
            .iter()
            .find(|&(_, w)| !(w.is_finite() && w >= 0.0))
        {
            return Err(SignalError::InvalidWeight {
                category: category.to_string(),
                weight,
            });
        }
        Ok(())
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            weights: WeightTable::default(),
            saturation_flow: 30.0,
            lost_time_per_phase: 4,
            min_green_time: 10,
            min_cycle_time: 60,
            max_cycle_time: 150,
        }
    }
}
