// ============================================================================
// Sigma Zones
// Zone boundaries derived from a chart's target and control limits
// ============================================================================

use crate::numeric::{Measurement, NumericResult, RoundingMode};

/// Zone boundaries used by the Westgard rules.
///
/// The process SD is inferred from the upper limit: `UCL = target + 3 SD`.
/// Boundaries are kept at the interim scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigmaZones {
    pub target: Measurement,
    pub ucl: Measurement,
    pub lcl: Measurement,
    pub one_sd: Measurement,
    pub plus_1s: Measurement,
    pub minus_1s: Measurement,
    pub plus_2s: Measurement,
    pub minus_2s: Measurement,
}

impl SigmaZones {
    /// Derive zones, or `None` when the limits cannot support rule checks
    /// (any of target/UCL/LCL missing, or `UCL - target <= 0`).
    pub fn derive(
        target: Option<Measurement>,
        ucl: Option<Measurement>,
        lcl: Option<Measurement>,
        mode: RoundingMode,
    ) -> Option<Self> {
        let (target, ucl, lcl) = (target?, ucl?, lcl?);
        match Self::compute(target, ucl, lcl, mode) {
            Ok(zones) => zones,
            Err(err) => {
                tracing::warn!(%target, %ucl, %lcl, error = %err, "control limits out of arithmetic range");
                None
            },
        }
    }

    fn compute(
        target: Measurement,
        ucl: Measurement,
        lcl: Measurement,
        mode: RoundingMode,
    ) -> NumericResult<Option<Self>> {
        let three_sd = ucl.checked_sub(target)?;
        if !three_sd.is_positive() {
            return Ok(None);
        }

        let one_sd = three_sd.checked_div_int(3, mode)?;
        let two_sd = one_sd.checked_mul_int(2)?;

        Ok(Some(Self {
            target,
            ucl,
            lcl,
            one_sd,
            plus_1s: target.checked_add(one_sd)?,
            minus_1s: target.checked_sub(one_sd)?,
            plus_2s: target.checked_add(two_sd)?,
            minus_2s: target.checked_sub(two_sd)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(s: &str) -> Measurement {
        s.parse().unwrap()
    }

    #[test]
    fn test_zones_for_symmetric_limits() {
        let zones =
            SigmaZones::derive(Some(m("100")), Some(m("130")), Some(m("70")), RoundingMode::HalfUp)
                .unwrap();

        assert_eq!(zones.one_sd, m("10"));
        assert_eq!(zones.plus_1s, m("110"));
        assert_eq!(zones.minus_1s, m("90"));
        assert_eq!(zones.plus_2s, m("120"));
        assert_eq!(zones.minus_2s, m("80"));
    }

    #[test]
    fn test_zone_rounding_follows_mode() {
        // 10 / 3 = 3.333333..., 2 SD is twice the rounded SD
        let zones =
            SigmaZones::derive(Some(m("0")), Some(m("10")), Some(m("-10")), RoundingMode::HalfUp)
                .unwrap();
        assert_eq!(zones.one_sd, m("3.333333"));
        assert_eq!(zones.plus_2s, m("6.666666"));

        let up = SigmaZones::derive(Some(m("0")), Some(m("10")), Some(m("-10")), RoundingMode::Up)
            .unwrap();
        assert_eq!(up.one_sd, m("3.333334"));
    }

    #[test]
    fn test_degenerate_limits() {
        let mode = RoundingMode::HalfUp;
        assert!(SigmaZones::derive(None, Some(m("130")), Some(m("70")), mode).is_none());
        assert!(SigmaZones::derive(Some(m("100")), None, Some(m("70")), mode).is_none());
        assert!(SigmaZones::derive(Some(m("100")), Some(m("130")), None, mode).is_none());
        assert!(SigmaZones::derive(Some(m("100")), Some(m("100")), Some(m("70")), mode).is_none());
        assert!(SigmaZones::derive(Some(m("100")), Some(m("90")), Some(m("70")), mode).is_none());
    }

    #[test]
    fn test_overflowing_limits_are_degenerate() {
        let zones = SigmaZones::derive(
            Some(Measurement::MIN),
            Some(Measurement::MAX),
            Some(Measurement::MIN),
            RoundingMode::HalfUp,
        );
        assert!(zones.is_none());
    }
}
