// ============================================================================
// Westgard Rules
// One ControlRule implementation per multi-rule
// ============================================================================

use crate::domain::{RuleCode, SigmaZones};
use crate::interfaces::ControlRule;
use crate::numeric::Measurement;

/// All values strictly above `upper`, or all strictly below `lower`.
fn same_side(values: &[Measurement], upper: Measurement, lower: Measurement) -> bool {
    values.iter().all(|v| *v > upper) || values.iter().all(|v| *v < lower)
}

/// 1-3s: a single value beyond UCL or LCL.
pub struct OneThreeSigma;

impl ControlRule for OneThreeSigma {
    fn code(&self) -> RuleCode {
        RuleCode::OneThreeS
    }

    fn is_violated(&self, values: &[Measurement], zones: &SigmaZones) -> bool {
        values.iter().any(|v| *v > zones.ucl || *v < zones.lcl)
    }
}

/// 2-2s: two consecutive values beyond 2 SD on the same side.
pub struct TwoTwoSigma;

impl ControlRule for TwoTwoSigma {
    fn code(&self) -> RuleCode {
        RuleCode::TwoTwoS
    }

    fn is_violated(&self, values: &[Measurement], zones: &SigmaZones) -> bool {
        same_side(values, zones.plus_2s, zones.minus_2s)
    }
}

/// R-4s: two consecutive values on opposite sides of ±2 SD, i.e. a range
/// wider than 4 SD.
pub struct RangeFourSigma;

impl ControlRule for RangeFourSigma {
    fn code(&self) -> RuleCode {
        RuleCode::RangeFourS
    }

    fn is_violated(&self, values: &[Measurement], zones: &SigmaZones) -> bool {
        let [newest, previous] = values else {
            return false;
        };
        let high = |v: &Measurement| *v > zones.plus_2s;
        let low = |v: &Measurement| *v < zones.minus_2s;
        (high(newest) && low(previous)) || (low(newest) && high(previous))
    }
}

/// 4-1s: four consecutive values beyond 1 SD on the same side.
pub struct FourOneSigma;

impl ControlRule for FourOneSigma {
    fn code(&self) -> RuleCode {
        RuleCode::FourOneS
    }

    fn is_violated(&self, values: &[Measurement], zones: &SigmaZones) -> bool {
        same_side(values, zones.plus_1s, zones.minus_1s)
    }
}

/// 10-x: ten consecutive values on the same side of the target. A value
/// exactly on target breaks the run.
pub struct TenMean;

impl ControlRule for TenMean {
    fn code(&self) -> RuleCode {
        RuleCode::TenX
    }

    fn is_violated(&self, values: &[Measurement], zones: &SigmaZones) -> bool {
        same_side(values, zones.target, zones.target)
    }
}

/// The five standard rules in reporting order.
pub fn standard_rules() -> Vec<Box<dyn ControlRule>> {
    vec![
        Box::new(OneThreeSigma),
        Box::new(TwoTwoSigma),
        Box::new(RangeFourSigma),
        Box::new(FourOneSigma),
        Box::new(TenMean),
    ]
}
