use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payment gateways charge in the currency's smallest unit (paise, cents).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

//--------------------------------------     MinorUnits       ---------------------------------------------------------
/// An amount of money expressed as an integer number of minor currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MinorUnits(i64);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountError {
    #[error("Amount must be a finite number, but was {0}")]
    NotFinite(f64),
    #[error("Amount must be greater than zero, but was {0}")]
    NotPositive(f64),
    #[error("Amount {0} is too large to be charged")]
    TooLarge(f64),
}

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_major = MINOR_UNITS_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per_major, abs % per_major)
    }
}

impl MinorUnits {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Converts a price in major units (e.g. rupees) into minor units, truncating any fraction of a minor unit.
    ///
    /// `10.5` becomes `1050`. Prices that are not finite, or that truncate to zero or less, are rejected so that a
    /// zero or negative charge can never be requested.
    pub fn try_from_major(amount: f64) -> Result<Self, AmountError> {
        if !amount.is_finite() {
            return Err(AmountError::NotFinite(amount));
        }
        #[allow(clippy::cast_precision_loss)]
        let minor = (amount * MINOR_UNITS_PER_MAJOR as f64).trunc();
        if minor < 1.0 {
            return Err(AmountError::NotPositive(amount));
        }
        #[allow(clippy::cast_precision_loss)]
        if minor >= i64::MAX as f64 {
            return Err(AmountError::TooLarge(amount));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(minor as i64))
    }
}
