// ============================================================================
// Fixed-Point Decimal
// Fixed-scale decimal arithmetic with caller-supplied rounding
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::rounding::{div_round, RoundingMode};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Fixed-point decimal number with compile-time scale.
///
/// Internally stores `value × 10^DECIMALS` as an i64. Addition and
/// subtraction are exact; every operation that can discard digits takes a
/// [`RoundingMode`] so the rounding applied to a reported figure is always
/// visible at the call site.
///
/// # Type Parameter
/// - `DECIMALS`: Number of fractional digits (0-18). Default is 6.
///
/// # Example
/// ```
/// use qc_engine::numeric::{FixedDecimal, RoundingMode};
///
/// let spread = FixedDecimal::<6>::from_integer(30).unwrap();
/// let one_sd = spread.checked_div_int(3, RoundingMode::HalfUp).unwrap();
/// assert_eq!(one_sd.to_string(), "10.000000");
/// ```
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct FixedDecimal<const DECIMALS: u8 = 6>(i64);

// ============================================================================
// Scale Constants
// ============================================================================

/// Compute 10^n at compile time
const fn pow10(n: u8) -> i64 {
    let mut result: i64 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

/// Narrow an i128 intermediate back into the i64 representation.
fn narrow(value: i128) -> NumericResult<i64> {
    if value > i64::MAX as i128 {
        Err(NumericError::Overflow)
    } else if value < i64::MIN as i128 {
        Err(NumericError::Underflow)
    } else {
        Ok(value as i64)
    }
}

impl<const D: u8> FixedDecimal<D> {
    /// The scale factor (10^DECIMALS)
    pub const SCALE: i64 = pow10(D);

    /// Number of fractional digits carried by this type
    pub const DECIMALS: u8 = D;

    /// Zero value
    pub const ZERO: Self = Self(0);

    /// One (1.0)
    pub const ONE: Self = Self(pow10(D));

    /// Maximum representable value
    pub const MAX: Self = Self(i64::MAX);

    /// Minimum representable value
    pub const MIN: Self = Self(i64::MIN);

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from raw internal representation (already scaled).
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Create from an integer value.
    ///
    /// # Errors
    /// Returns `Overflow` if the value is too large to represent.
    #[inline]
    pub fn from_integer(value: i64) -> NumericResult<Self> {
        value
            .checked_mul(Self::SCALE)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    /// Create from integer and fractional parts.
    ///
    /// `fraction` is expressed in units of 10^-DECIMALS and must be below
    /// `SCALE`. The sign of `integer` applies to the whole value.
    ///
    /// ```
    /// use qc_engine::numeric::FixedDecimal;
    ///
    /// let x = FixedDecimal::<6>::from_parts(123, 456_000).unwrap();
    /// assert_eq!(x.to_string(), "123.456000");
    /// ```
    #[inline]
    pub fn from_parts(integer: i64, fraction: u64) -> NumericResult<Self> {
        if fraction >= Self::SCALE as u64 {
            return Err(NumericError::InvalidInput);
        }

        let int_scaled = integer
            .checked_mul(Self::SCALE)
            .ok_or(NumericError::Overflow)?;

        let frac_signed = if integer < 0 {
            -(fraction as i64)
        } else {
            fraction as i64
        };

        int_scaled
            .checked_add(frac_signed)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the raw internal value (value × 10^DECIMALS).
    #[inline]
    pub const fn raw_value(self) -> i64 {
        self.0
    }

    /// Get the integer part (truncated toward zero).
    #[inline]
    pub const fn integer_part(self) -> i64 {
        self.0 / Self::SCALE
    }

    /// Get the fractional part as a positive value.
    #[inline]
    pub const fn fractional_part(self) -> u64 {
        (self.0 % Self::SCALE).unsigned_abs()
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Get absolute value.
    #[inline]
    pub fn abs(self) -> NumericResult<Self> {
        self.0.checked_abs().map(Self).ok_or(NumericError::Overflow)
    }

    /// Checked negation.
    #[inline]
    pub fn checked_neg(self) -> NumericResult<Self> {
        self.0.checked_neg().map(Self).ok_or(NumericError::Overflow)
    }

    // ========================================================================
    // Exact Arithmetic
    // ========================================================================

    /// Checked addition.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    #[inline]
    pub fn checked_add(self, rhs: Self) -> NumericResult<Self> {
        self.0.checked_add(rhs.0).map(Self).ok_or({
            if rhs.0 > 0 {
                NumericError::Overflow
            } else {
                NumericError::Underflow
            }
        })
    }

    /// Checked subtraction.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> NumericResult<Self> {
        self.0.checked_sub(rhs.0).map(Self).ok_or({
            if rhs.0 < 0 {
                NumericError::Overflow
            } else {
                NumericError::Underflow
            }
        })
    }

    /// Multiply by an integer. Exact, no rounding involved.
    #[inline]
    pub fn checked_mul_int(self, rhs: i64) -> NumericResult<Self> {
        narrow(self.0 as i128 * rhs as i128).map(Self)
    }

    // ========================================================================
    // Rounded Arithmetic
    // ========================================================================

    /// Checked multiplication, rounding the product back to DECIMALS digits.
    ///
    /// Uses an i128 intermediate so only the final result can overflow.
    #[inline]
    pub fn checked_mul(self, rhs: Self, mode: RoundingMode) -> NumericResult<Self> {
        let product = (self.0 as i128) * (rhs.0 as i128);
        narrow(div_round(product, Self::SCALE as i128, mode)).map(Self)
    }

    /// Checked division at this scale.
    ///
    /// # Errors
    /// `DivisionByZero` if `rhs` is zero, `Overflow`/`Underflow` if the
    /// quotient does not fit.
    #[inline]
    pub fn checked_div(self, rhs: Self, mode: RoundingMode) -> NumericResult<Self> {
        self.checked_div_to::<D>(rhs, mode)
    }

    /// Divide and produce the quotient directly at scale `E`.
    ///
    /// The exact quotient is rounded once, so `a.checked_div_to::<4>(b, m)`
    /// may differ from dividing at scale D and rescaling afterwards.
    pub fn checked_div_to<const E: u8>(
        self,
        rhs: Self,
        mode: RoundingMode,
    ) -> NumericResult<FixedDecimal<E>> {
        if rhs.0 == 0 {
            return Err(NumericError::DivisionByZero);
        }
        let numerator = (self.0 as i128)
            .checked_mul(FixedDecimal::<E>::SCALE as i128)
            .ok_or(NumericError::Overflow)?;
        narrow(div_round(numerator, rhs.0 as i128, mode)).map(FixedDecimal::<E>::from_raw)
    }

    /// Divide by an integer count.
    #[inline]
    pub fn checked_div_int(self, rhs: i64, mode: RoundingMode) -> NumericResult<Self> {
        if rhs == 0 {
            return Err(NumericError::DivisionByZero);
        }
        narrow(div_round(self.0 as i128, rhs as i128, mode)).map(Self)
    }

    /// Convert to another scale, rounding when digits are dropped.
    ///
    /// ```
    /// use qc_engine::numeric::{FixedDecimal, RoundingMode};
    ///
    /// let interim: FixedDecimal<6> = "1.333350".parse().unwrap();
    /// let shown: FixedDecimal<4> = interim.rescale(RoundingMode::HalfUp).unwrap();
    /// assert_eq!(shown.to_string(), "1.3334");
    /// ```
    pub fn rescale<const E: u8>(self, mode: RoundingMode) -> NumericResult<FixedDecimal<E>> {
        let raw = match E.cmp(&D) {
            Ordering::Equal => self.0 as i128,
            Ordering::Greater => (self.0 as i128) * (pow10(E - D) as i128),
            Ordering::Less => div_round(self.0 as i128, pow10(D - E) as i128, mode),
        };
        narrow(raw).map(FixedDecimal::<E>::from_raw)
    }

    /// Square root at this scale.
    ///
    /// Computed on integers (`isqrt` of `raw × SCALE`) and then rounded, so
    /// the result is reproducible across platforms.
    ///
    /// # Errors
    /// `NegativeRoot` for negative inputs.
    pub fn sqrt(self, mode: RoundingMode) -> NumericResult<Self> {
        if self.0 < 0 {
            return Err(NumericError::NegativeRoot);
        }

        let radicand = (self.0 as u128) * (Self::SCALE as u128);
        let root = radicand.isqrt();
        let square = root * root;
        if square == radicand {
            return narrow(root as i128).map(Self);
        }

        // (root + 1/2)^2 = root^2 + root + 1/4, so a tie can never occur
        let round_up = match mode {
            RoundingMode::Down => false,
            RoundingMode::Up => true,
            RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven => {
                radicand > square + root
            },
        };

        let rounded = if round_up { root + 1 } else { root };
        narrow(rounded as i128).map(Self)
    }

    /// Square root rounded once to `digits` significant digits, or to this
    /// scale when that is coarser.
    ///
    /// The root is taken six digits beyond this scale so the single
    /// rounding sees the exact discarded part.
    ///
    /// ```
    /// use qc_engine::numeric::{FixedDecimal, RoundingMode};
    ///
    /// let variance: FixedDecimal<6> = "15000".parse().unwrap();
    /// let sd = variance.sqrt_significant(6, RoundingMode::HalfUp).unwrap();
    /// assert_eq!(sd.to_string(), "122.474000");
    /// ```
    ///
    /// # Errors
    /// `NegativeRoot` for negative inputs, `InvalidInput` for zero digits.
    pub fn sqrt_significant(self, digits: u32, mode: RoundingMode) -> NumericResult<Self> {
        if self.0 < 0 {
            return Err(NumericError::NegativeRoot);
        }
        if digits == 0 {
            return Err(NumericError::InvalidInput);
        }

        // root_ext = floor(sqrt(value) * 10^(D + guard))
        let radicand = (self.0 as u128)
            .checked_mul(Self::SCALE as u128)
            .and_then(|r| r.checked_mul(10u128.pow(2 * SQRT_GUARD_DIGITS)))
            .ok_or(NumericError::Overflow)?;
        let root = radicand.isqrt();
        let Some(magnitude) = root.checked_ilog10() else {
            return Ok(Self::ZERO);
        };

        let drop = (magnitude + 1)
            .saturating_sub(digits)
            .max(SQRT_GUARD_DIGITS);
        let unit = 10i128.pow(drop);
        let root = root as i128;

        // An inexact root lies strictly inside (root, root + 1), so rounding
        // root + 1/2 lands on the same side of every boundary
        let kept = if (root as u128) * (root as u128) == radicand {
            div_round(root, unit, mode)
        } else {
            div_round(2 * root + 1, 2 * unit, mode)
        };

        let raw = kept
            .checked_mul(10i128.pow(drop - SQRT_GUARD_DIGITS))
            .ok_or(NumericError::Overflow)?;
        narrow(raw).map(Self)
    }
}

/// Extra fractional digits carried by [`FixedDecimal::sqrt_significant`]
const SQRT_GUARD_DIGITS: u32 = 6;

// ============================================================================
// Trait Implementations
// ============================================================================

impl<const D: u8> Default for FixedDecimal<D> {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const D: u8> PartialEq for FixedDecimal<D> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<const D: u8> Eq for FixedDecimal<D> {}

impl<const D: u8> PartialOrd for FixedDecimal<D> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const D: u8> Ord for FixedDecimal<D> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<const D: u8> Hash for FixedDecimal<D> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl<const D: u8> fmt::Debug for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedDecimal<{}>({}, raw={})", D, self, self.0)
    }
}

impl<const D: u8> fmt::Display for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int_part = self.integer_part();
        let frac_part = self.fractional_part();

        if D == 0 {
            write!(f, "{}", int_part)
        } else if self.0 < 0 && int_part == 0 {
            // -0.xxx has no sign on the integer part
            write!(f, "-0.{:0>width$}", frac_part, width = D as usize)
        } else {
            write!(f, "{}.{:0>width$}", int_part, frac_part, width = D as usize)
        }
    }
}

// ============================================================================
// Conversion from rust_decimal (API boundaries)
// ============================================================================

impl<const D: u8> FixedDecimal<D> {
    /// Convert from `rust_decimal::Decimal` without rounding.
    ///
    /// Trailing zeros are ignored, so `1.500000000` fits a 6-digit scale.
    ///
    /// # Errors
    /// - `PrecisionLoss` if the value has more than DECIMALS significant
    ///   fractional digits
    /// - `Overflow`/`Underflow` if the value is out of range
    pub fn from_decimal(d: Decimal) -> NumericResult<Self> {
        let normalized = d.normalize();
        let scale = normalized.scale();
        if scale > D as u32 {
            return Err(NumericError::PrecisionLoss);
        }

        let factor = 10i128.pow(D as u32 - scale);
        let raw = normalized
            .mantissa()
            .checked_mul(factor)
            .ok_or(NumericError::Overflow)?;
        narrow(raw).map(Self)
    }

    /// Convert to `rust_decimal::Decimal`, keeping exactly DECIMALS digits.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, D as u32)
    }
}

impl<const D: u8> TryFrom<Decimal> for FixedDecimal<D> {
    type Error = NumericError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl<const D: u8> std::str::FromStr for FixedDecimal<D> {
    type Err = NumericError;

    /// Parse from a plain decimal string.
    ///
    /// # Examples
    /// - "123" -> 123.000000
    /// - "123.456" -> 123.456000
    /// - "-0.001" -> -0.001000
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (is_negative, s) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (false, rest)
        } else {
            (false, s)
        };

        let (int_str, frac_str) = match s.split_once('.') {
            Some((int_str, frac)) => (int_str, frac),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_str.is_empty() && frac_str.is_empty())
            || !all_digits(int_str)
            || !all_digits(frac_str)
        {
            return Err(NumericError::InvalidInput);
        }

        let int_val: i64 = if int_str.is_empty() {
            0
        } else {
            int_str.parse().map_err(|_| NumericError::Overflow)?
        };

        // Trailing zeros carry no precision
        let frac_trimmed = frac_str.trim_end_matches('0');
        let frac_val: u64 = if frac_trimmed.is_empty() {
            0
        } else if frac_trimmed.len() > D as usize {
            return Err(NumericError::PrecisionLoss);
        } else {
            let padded = format!("{:0<width$}", frac_trimmed, width = D as usize);
            padded.parse().map_err(|_| NumericError::InvalidInput)?
        };

        let result = Self::from_parts(int_val, frac_val)?;
        if is_negative {
            result.checked_neg()
        } else {
            Ok(result)
        }
    }
}

// ============================================================================
// Serde (string form keeps every digit)
// ============================================================================

#[cfg(feature = "serde")]
impl<const D: u8> serde::Serialize for FixedDecimal<D> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de, const D: u8> serde::Deserialize<'de> for FixedDecimal<D> {
    fn deserialize<De: serde::Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Type Aliases for Common Use Cases
// ============================================================================

/// Fractional digits kept for stored values, limits and interim results
pub const INTERIM_SCALE: u8 = 6;

/// Fractional digits of reported statistics
pub const REPORT_SCALE: u8 = 4;

/// Measured value, control/specification limit or interim statistic
pub type Measurement = FixedDecimal<INTERIM_SCALE>;

/// Reported mean, standard deviation or capability index
pub type Reported = FixedDecimal<REPORT_SCALE>;

// ============================================================================
// Tests
// ============================================================================
