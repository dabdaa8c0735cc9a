// ============================================================================
// Rounding Modes
// Explicit rounding rules applied whenever a result loses digits
// ============================================================================

use std::fmt;
use std::str::FromStr;

use super::errors::NumericError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rounding rule applied when an exact result does not fit the target scale.
///
/// Every lossy operation on [`FixedDecimal`](super::FixedDecimal) takes one of
/// these explicitly; nothing in the crate relies on an implicit default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingMode {
    /// Ties go away from zero (2.5 -> 3, -2.5 -> -3)
    #[default]
    HalfUp,
    /// Ties go toward zero (2.5 -> 2, -2.5 -> -2)
    HalfDown,
    /// Ties go to the even neighbour (2.5 -> 2, 3.5 -> 4)
    HalfEven,
    /// Truncate toward zero
    Down,
    /// Round away from zero whenever digits are discarded
    Up,
}

impl RoundingMode {
    /// Stable upper-case name, as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::Down => "DOWN",
            RoundingMode::Up => "UP",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HALF_UP" => Ok(RoundingMode::HalfUp),
            "HALF_DOWN" => Ok(RoundingMode::HalfDown),
            "HALF_EVEN" => Ok(RoundingMode::HalfEven),
            "DOWN" => Ok(RoundingMode::Down),
            "UP" => Ok(RoundingMode::Up),
            _ => Err(NumericError::InvalidInput),
        }
    }
}

/// Divide `numerator` by `denominator`, rounding the quotient with `mode`.
///
/// Caller guarantees `denominator != 0`.
pub(crate) fn div_round(numerator: i128, denominator: i128, mode: RoundingMode) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder == 0 {
        return quotient;
    }

    // Direction of the discarded fraction
    let step: i128 = if (numerator < 0) != (denominator < 0) {
        -1
    } else {
        1
    };

    let twice_rem = remainder.unsigned_abs() * 2;
    let divisor = denominator.unsigned_abs();

    let round_away = match mode {
        RoundingMode::Down => false,
        RoundingMode::Up => true,
        RoundingMode::HalfUp => twice_rem >= divisor,
        RoundingMode::HalfDown => twice_rem > divisor,
        RoundingMode::HalfEven => {
            twice_rem > divisor || (twice_rem == divisor && quotient % 2 != 0)
        },
    };

    if round_away {
        quotient + step
    } else {
        quotient
    }
}
