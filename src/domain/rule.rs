// ============================================================================
// Westgard Rule Codes
// Closed set of rule identifiers and a compact set type over them
// ============================================================================

use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use super::errors::ValidationError;

/// One of the five Westgard multi-rules evaluated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum RuleCode {
    /// 1-3s: one point beyond the control limits
    OneThreeS = 0,
    /// 2-2s: two consecutive points beyond 2 SD on the same side
    TwoTwoS = 1,
    /// R-4s: two consecutive points on opposite sides of ±2 SD
    RangeFourS = 2,
    /// 4-1s: four consecutive points beyond 1 SD on the same side
    FourOneS = 3,
    /// 10-x: ten consecutive points on the same side of the target
    TenX = 4,
}

impl RuleCode {
    /// All codes in evaluation (and reporting) order.
    pub const ALL: [RuleCode; 5] = [
        RuleCode::OneThreeS,
        RuleCode::TwoTwoS,
        RuleCode::RangeFourS,
        RuleCode::FourOneS,
        RuleCode::TenX,
    ];

    /// Conventional lab notation.
    pub const fn code(self) -> &'static str {
        match self {
            RuleCode::OneThreeS => "1-3s",
            RuleCode::TwoTwoS => "2-2s",
            RuleCode::RangeFourS => "R-4s",
            RuleCode::FourOneS => "4-1s",
            RuleCode::TenX => "10-x",
        }
    }

    /// Number of values (new point included) the rule inspects.
    pub const fn window(self) -> usize {
        match self {
            RuleCode::OneThreeS => 1,
            RuleCode::TwoTwoS | RuleCode::RangeFourS => 2,
            RuleCode::FourOneS => 4,
            RuleCode::TenX => 10,
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RuleCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RuleCode::ALL
            .into_iter()
            .find(|rule| rule.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::malformed("rule", format!("unknown rule code '{s}'")))
    }
}

// ============================================================================
// Rule Set
// ============================================================================

/// Set of violated rules, stored as a bitset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RuleSet(u8);

impl RuleSet {
    pub const EMPTY: RuleSet = RuleSet(0);

    pub const fn new() -> Self {
        Self::EMPTY
    }

    pub fn insert(&mut self, rule: RuleCode) {
        self.0 |= rule.bit();
    }

    pub const fn contains(&self, rule: RuleCode) -> bool {
        self.0 & rule.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Raw bit representation, stable across releases (bit n = `RuleCode` n).
    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub fn from_bits(bits: u8) -> Self {
        let mask = RuleCode::ALL.iter().fold(0u8, |acc, rule| acc | rule.bit());
        Self(bits & mask)
    }

    /// Violated rules in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = RuleCode> + '_ {
        RuleCode::ALL.into_iter().filter(|rule| self.contains(*rule))
    }

    pub fn codes(&self) -> SmallVec<[&'static str; 5]> {
        self.iter().map(RuleCode::code).collect()
    }
}

impl FromIterator<RuleCode> for RuleSet {
    fn from_iter<I: IntoIterator<Item = RuleCode>>(iter: I) -> Self {
        let mut set = RuleSet::new();
        for rule in iter {
            set.insert(rule);
        }
        set
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(RuleCode::code)).finish()
    }
}

/// Joined as `"1-3s, 2-2s"`, the form written to audit reports.
impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.codes().join(", "))
    }
}

impl FromStr for RuleSet {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<RuleCode>)
            .collect()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RuleSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(RuleCode::code))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RuleSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let codes = Vec::<String>::deserialize(deserializer)?;
        codes
            .iter()
            .map(|code| code.parse::<RuleCode>())
            .collect::<Result<RuleSet, _>>()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_windows() {
        let codes: Vec<_> = RuleCode::ALL.iter().map(|r| r.code()).collect();
        assert_eq!(codes, ["1-3s", "2-2s", "R-4s", "4-1s", "10-x"]);
        assert_eq!(RuleCode::TenX.window(), 10);
        assert!(RuleCode::ALL.iter().all(|r| r.window() <= 10));
    }

    #[test]
    fn test_set_operations() {
        let mut set = RuleSet::new();
        assert!(set.is_empty());

        set.insert(RuleCode::TenX);
        set.insert(RuleCode::OneThreeS);
        set.insert(RuleCode::TenX);

        assert_eq!(set.len(), 2);
        assert!(set.contains(RuleCode::OneThreeS));
        assert!(!set.contains(RuleCode::TwoTwoS));
        assert_eq!(set.iter().collect::<Vec<_>>(), [RuleCode::OneThreeS, RuleCode::TenX]);
    }

    #[test]
    fn test_display_joins_in_canonical_order() {
        let set: RuleSet = [RuleCode::FourOneS, RuleCode::TwoTwoS].into_iter().collect();
        assert_eq!(set.to_string(), "2-2s, 4-1s");
        assert_eq!(RuleSet::EMPTY.to_string(), "");
    }

    #[test]
    fn test_parse_report_form() {
        let set: RuleSet = "1-3s, r-4s".parse().unwrap();
        assert!(set.contains(RuleCode::OneThreeS));
        assert!(set.contains(RuleCode::RangeFourS));
        assert_eq!(set.len(), 2);

        assert_eq!("".parse::<RuleSet>().unwrap(), RuleSet::EMPTY);
        assert!("1-3s, 3-1s".parse::<RuleSet>().is_err());
    }

    #[test]
    fn test_from_bits_masks_unknown() {
        assert_eq!(RuleSet::from_bits(0xFF).len(), 5);
        assert_eq!(RuleSet::from_bits(0b1_0001).bits(), 0b1_0001);
    }
}
