// ============================================================================
// Westgard Rule Engine
// Evaluates a new value against its recent history and the chart limits
// ============================================================================

use arrayvec::ArrayVec;

use super::rules::standard_rules;
use crate::domain::{ControlChart, RuleSet, SigmaZones};
use crate::interfaces::ControlRule;
use crate::numeric::{Measurement, RoundingMode};

/// Largest window any rule may inspect (new value + history)
pub const MAX_WINDOW: usize = 10;

/// Most stored points ever consulted for one evaluation
pub const HISTORY_DEPTH: usize = MAX_WINDOW - 1;

/// Pure multi-rule evaluator.
///
/// Each rule sees exactly `rule.window()` values, newest first, with the
/// value under evaluation at position 0. Rules whose window cannot be filled
/// from the supplied history are skipped.
pub struct WestgardRuleEngine {
    rules: Vec<Box<dyn ControlRule>>,
    rounding: RoundingMode,
}

impl WestgardRuleEngine {
    /// Engine with the five standard rules.
    pub fn new(rounding: RoundingMode) -> Self {
        Self::with_rules(standard_rules(), rounding)
    }

    /// Engine with a custom rule list. A rule whose window exceeds
    /// [`MAX_WINDOW`] can never be filled and never fires.
    pub fn with_rules(rules: Vec<Box<dyn ControlRule>>, rounding: RoundingMode) -> Self {
        Self { rules, rounding }
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Evaluate `value` given up to [`HISTORY_DEPTH`] prior values
    /// (newest first). Extra history is ignored.
    ///
    /// Returns the empty set when target/UCL/LCL are missing or
    /// `UCL - target <= 0`.
    pub fn evaluate(
        &self,
        value: Measurement,
        history: &[Measurement],
        target: Option<Measurement>,
        ucl: Option<Measurement>,
        lcl: Option<Measurement>,
    ) -> RuleSet {
        match SigmaZones::derive(target, ucl, lcl, self.rounding) {
            Some(zones) => self.evaluate_with_zones(value, history, &zones),
            None => RuleSet::EMPTY,
        }
    }

    /// Evaluate against a chart's configured limits.
    pub fn evaluate_for_chart(
        &self,
        value: Measurement,
        history: &[Measurement],
        chart: &ControlChart,
    ) -> RuleSet {
        self.evaluate(value, history, chart.target, chart.ucl, chart.lcl)
    }

    /// Evaluate with precomputed zones.
    pub fn evaluate_with_zones(
        &self,
        value: Measurement,
        history: &[Measurement],
        zones: &SigmaZones,
    ) -> RuleSet {
        let mut window: ArrayVec<Measurement, MAX_WINDOW> = ArrayVec::new();
        window.push(value);
        window.extend(history.iter().copied().take(HISTORY_DEPTH));

        let mut violated = RuleSet::new();
        for rule in &self.rules {
            let size = rule.window();
            if size == 0 || size > window.len() {
                continue;
            }
            if rule.is_violated(&window[..size], zones) {
                violated.insert(rule.code());
            }
        }
        violated
    }
}

impl Default for WestgardRuleEngine {
    fn default() -> Self {
        Self::new(RoundingMode::HalfUp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RuleCode;
    use proptest::prelude::*;

    fn m(v: i64) -> Measurement {
        Measurement::from_integer(v).unwrap()
    }

    fn limits() -> (Option<Measurement>, Option<Measurement>, Option<Measurement>) {
        (Some(m(100)), Some(m(130)), Some(m(70)))
    }

    fn run(value: i64, history_newest_first: &[i64]) -> RuleSet {
        let (target, ucl, lcl) = limits();
        let history: Vec<_> = history_newest_first.iter().copied().map(m).collect();
        WestgardRuleEngine::default().evaluate(m(value), &history, target, ucl, lcl)
    }

    fn only(rule: RuleCode) -> RuleSet {
        [rule].into_iter().collect()
    }

    #[test]
    fn test_single_point_beyond_limits() {
        assert_eq!(run(135, &[]), only(RuleCode::OneThreeS));
        assert_eq!(run(65, &[]), only(RuleCode::OneThreeS));
        assert_eq!(run(125, &[]), RuleSet::EMPTY);
    }

    #[test]
    fn test_two_two_s_without_one_three_s() {
        assert_eq!(run(123, &[122]), only(RuleCode::TwoTwoS));
    }

    #[test]
    fn test_range_four_s() {
        assert_eq!(run(74, &[125]), only(RuleCode::RangeFourS));
    }

    #[test]
    fn test_four_one_s() {
        assert_eq!(run(114, &[113, 112, 111]), only(RuleCode::FourOneS));
    }

    #[test]
    fn test_ten_x() {
        assert_eq!(
            run(110, &[109, 108, 107, 106, 105, 104, 103, 102, 101]),
            only(RuleCode::TenX)
        );
    }

    #[test]
    fn test_multiple_rules_fire_together() {
        // 135 > UCL, and with 125 both are above +2 SD
        let fired = run(135, &[125]);
        assert!(fired.contains(RuleCode::OneThreeS));
        assert!(fired.contains(RuleCode::TwoTwoS));
        assert_eq!(fired.len(), 2);
    }

    #[test]
    fn test_history_beyond_depth_is_ignored() {
        // The 10th prior value (50) would break the run if it were consulted
        let history = [109, 108, 107, 106, 105, 104, 103, 102, 101, 50];
        assert_eq!(run(110, &history), only(RuleCode::TenX));
    }

    #[test]
    fn test_fractional_zones() {
        // target 0, UCL 10 -> SD 3.333333, +2 SD 6.666666
        let engine = WestgardRuleEngine::default();
        let zero = Some(m(0));
        let ucl = Some(m(10));
        let lcl = Some(m(-10));
        let just_above: Measurement = "6.666667".parse().unwrap();
        let on_line: Measurement = "6.666666".parse().unwrap();

        let fired = engine.evaluate(just_above, &[just_above], zero, ucl, lcl);
        assert!(fired.contains(RuleCode::TwoTwoS));
        let quiet = engine.evaluate(on_line, &[on_line], zero, ucl, lcl);
        assert!(!quiet.contains(RuleCode::TwoTwoS));
    }

    #[test]
    fn test_degenerate_limits_never_fire() {
        let engine = WestgardRuleEngine::default();
        assert!(engine.evaluate(m(500), &[], None, Some(m(130)), Some(m(70))).is_empty());
        assert!(engine
            .evaluate(m(500), &[], Some(m(100)), Some(m(100)), Some(m(70)))
            .is_empty());
    }

    fn limit_strategy() -> impl Strategy<Value = Option<Measurement>> {
        prop::option::of((-1_000_000i64..1_000_000).prop_map(Measurement::from_raw))
    }

    proptest! {
        #[test]
        fn prop_missing_limit_means_no_violation(
            value in -1_000_000_000i64..1_000_000_000,
            history in prop::collection::vec(-1_000_000_000i64..1_000_000_000, 0..12),
            target in limit_strategy(),
            ucl in limit_strategy(),
            lcl in limit_strategy(),
        ) {
            prop_assume!(target.is_none() || ucl.is_none() || lcl.is_none());
            let history: Vec<_> = history.into_iter().map(Measurement::from_raw).collect();
            let fired = WestgardRuleEngine::default()
                .evaluate(Measurement::from_raw(value), &history, target, ucl, lcl);
            prop_assert!(fired.is_empty());
        }

        #[test]
        fn prop_short_history_skips_long_rules(
            value in 0i64..300,
            history in prop::collection::vec(0i64..300, 0..3),
        ) {
            let fired = run(value, &history);
            prop_assert!(!fired.contains(RuleCode::FourOneS));
            prop_assert!(!fired.contains(RuleCode::TenX));
            if history.is_empty() {
                prop_assert!(!fired.contains(RuleCode::TwoTwoS));
                prop_assert!(!fired.contains(RuleCode::RangeFourS));
            }
        }

        #[test]
        fn prop_evaluation_is_deterministic(
            value in 0i64..300,
            history in prop::collection::vec(0i64..300, 0..15),
        ) {
            prop_assert_eq!(run(value, &history), run(value, &history));
        }

        #[test]
        fn prop_only_nine_prior_values_matter(
            value in 0i64..300,
            history in prop::collection::vec(0i64..300, 9..20),
        ) {
            prop_assert_eq!(run(value, &history), run(value, &history[..9]));
        }
    }
}
