use std::fmt;

use serde::{Deserialize, Serialize};

const SCALE: i64 = 1_000_000;

/// Fixed-point effect magnitude with six fractional digits.
///
/// Stored as an integer count of millionths so that values survive a
/// shuffle bit-for-bit. Serializes as a plain JSON number.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "f64", from = "f64")]
pub struct Magnitude(i64);

impl Magnitude {
    pub const ZERO: Magnitude = Magnitude(0);

    /// Create a magnitude from a raw count of millionths.
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub fn micros(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }
}

impl From<f64> for Magnitude {
    fn from(value: f64) -> Self {
        Self((value * SCALE as f64).round() as i64)
    }
}

impl From<Magnitude> for f64 {
    fn from(m: Magnitude) -> Self {
        m.as_f64()
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = SCALE as u64;
        write!(f, "{sign}{}.{:06}", abs / scale, abs % scale)
    }
}
