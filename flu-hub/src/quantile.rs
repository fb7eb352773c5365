use serde::{Deserialize, Serialize};
use std::fmt;

use crate::RowError;

/// Fixed-point resolution of a quantile level: 1/10000.
const SCALE: f64 = 10_000.0;

/// A quantile level discretized to units of 1/10000.
///
/// Hub files carry levels such as `0.025` as floats; they are rounded to an
/// integer identifier once at load and compared as integers afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuantileLevel(u16);

impl QuantileLevel {
    /// Lower bound of the 95% interval (0.025).
    pub const LOWER_95: QuantileLevel = QuantileLevel(250);
    /// Median (0.5).
    pub const MEDIAN: QuantileLevel = QuantileLevel(5_000);
    /// Upper bound of the 95% interval (0.975).
    pub const UPPER_95: QuantileLevel = QuantileLevel(9_750);

    /// Discretize a probability in [0, 1].
    pub fn from_f64(level: f64) -> Result<Self, RowError> {
        if !level.is_finite() || !(0.0..=1.0).contains(&level) {
            return Err(RowError::QuantileOutOfRange(level));
        }
        Ok(QuantileLevel((level * SCALE).round() as u16))
    }

    /// Build from the fixed-point identifier (1/10000 units).
    pub fn from_key(key: u16) -> Option<Self> {
        (f64::from(key) <= SCALE).then_some(QuantileLevel(key))
    }

    /// The fixed-point identifier, as stored.
    pub fn key(&self) -> u16 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / SCALE
    }
}

impl fmt::Display for QuantileLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}
