// ============================================================================
// Statistics Engine
// Mean, population SD, Cpk and in-control status over a chart's history
// ============================================================================

use crate::domain::{DataPoint, ProcessStatistics};
use crate::numeric::{div_round, Measurement, NumericError, NumericResult, Reported, RoundingMode};

/// Significant digits kept on the standard deviation
pub const SD_SIGNIFICANT_DIGITS: u32 = 6;

/// Pure statistics calculator.
///
/// Precision contract (all roundings use the configured mode):
/// - mean and variance are rounded once to the interim scale, the variance
///   from the exact sum of squared deviations about the rounded mean
/// - SD is the square root of the rounded variance, rounded once to six
///   significant digits (never finer than the interim scale)
/// - Cpk is divided straight to the report scale
/// - mean and SD are then rescaled to the report scale
pub struct StatisticsEngine {
    rounding: RoundingMode,
    in_control_window: usize,
}

/// Interim-scale moments of a sample.
#[derive(Debug, Clone, Copy)]
struct Moments {
    mean: Measurement,
    sd: Measurement,
}

impl StatisticsEngine {
    pub fn new(rounding: RoundingMode, in_control_window: usize) -> Self {
        Self {
            rounding,
            in_control_window,
        }
    }

    /// Compute statistics over `points` in storage order (oldest first).
    ///
    /// Never fails: an empty history yields zeros, missing specification
    /// limits yield `cpk = 0`, and values too large for the fixed-point
    /// range degrade to zeros with a warning.
    pub fn compute(
        &self,
        points: &[DataPoint],
        usl: Option<Measurement>,
        lsl: Option<Measurement>,
    ) -> ProcessStatistics {
        let mut stats = ProcessStatistics::neutral();
        if points.is_empty() {
            return stats;
        }

        stats.total_points = points.len();
        stats.violation_count = points.iter().filter(|p| p.is_violation()).count();
        stats.in_control = !points
            .iter()
            .rev()
            .take(self.in_control_window)
            .any(DataPoint::is_violation);

        let moments = match self.moments(points) {
            Ok(moments) => moments,
            Err(err) => {
                tracing::warn!(points = points.len(), error = %err, "statistics out of fixed-point range");
                return stats;
            },
        };

        match self.report(moments) {
            Ok((mean, sd)) => {
                stats.mean = mean;
                stats.sd = sd;
            },
            Err(err) => {
                tracing::warn!(error = %err, "could not rescale mean/SD for reporting");
                return stats;
            },
        }

        stats.cpk = self.capability(moments, usl, lsl).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Cpk out of range, reporting zero");
            Reported::ZERO
        });

        stats
    }

    fn moments(&self, points: &[DataPoint]) -> NumericResult<Moments> {
        let n = points.len() as i128;

        let sum: i128 = points.iter().map(|p| p.value.raw_value() as i128).sum();
        let mean = to_measurement(div_round(sum, n, self.rounding))?;

        // Squared deviations are exact in units of 10^-12
        let mut squares: i128 = 0;
        for point in points {
            let deviation = point.value.raw_value() as i128 - mean.raw_value() as i128;
            let square = deviation
                .checked_mul(deviation)
                .ok_or(NumericError::Overflow)?;
            squares = squares.checked_add(square).ok_or(NumericError::Overflow)?;
        }

        let denominator = n
            .checked_mul(Measurement::SCALE as i128)
            .ok_or(NumericError::Overflow)?;
        let variance = to_measurement(div_round(squares, denominator, self.rounding))?;
        let sd = variance.sqrt_significant(SD_SIGNIFICANT_DIGITS, self.rounding)?;

        Ok(Moments { mean, sd })
    }

    fn report(&self, moments: Moments) -> NumericResult<(Reported, Reported)> {
        Ok((
            moments.mean.rescale(self.rounding)?,
            moments.sd.rescale(self.rounding)?,
        ))
    }

    /// `min((USL - mean) / 3 SD, (mean - LSL) / 3 SD)`, zero when either
    /// limit is missing or SD is zero.
    fn capability(
        &self,
        moments: Moments,
        usl: Option<Measurement>,
        lsl: Option<Measurement>,
    ) -> NumericResult<Reported> {
        let (Some(usl), Some(lsl)) = (usl, lsl) else {
            return Ok(Reported::ZERO);
        };
        if !moments.sd.is_positive() {
            return Ok(Reported::ZERO);
        }

        let three_sd = moments.sd.checked_mul_int(3)?;
        let upper: Reported = usl
            .checked_sub(moments.mean)?
            .checked_div_to(three_sd, self.rounding)?;
        let lower: Reported = moments
            .mean
            .checked_sub(lsl)?
            .checked_div_to(three_sd, self.rounding)?;

        Ok(upper.min(lower))
    }
}

impl Default for StatisticsEngine {
    fn default() -> Self {
        Self::new(RoundingMode::HalfUp, 10)
    }
}

fn to_measurement(raw: i128) -> NumericResult<Measurement> {
    i64::try_from(raw)
        .map(Measurement::from_raw)
        .map_err(|_| NumericError::Overflow)
}
