// ============================================================================
// Process Statistics
// ============================================================================

use super::ids::ChartId;
use crate::numeric::Reported;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Summary of a chart's full point history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessStatistics {
    pub total_points: usize,
    pub mean: Reported,
    /// Population standard deviation (divides by N)
    pub sd: Reported,
    /// Zero when either specification limit is missing or SD is zero
    pub cpk: Reported,
    pub violation_count: usize,
    /// No flagged point among the most recent window
    pub in_control: bool,
}

impl ProcessStatistics {
    /// Output for an empty history (or one that cannot be computed).
    pub const fn neutral() -> Self {
        Self {
            total_points: 0,
            mean: Reported::ZERO,
            sd: Reported::ZERO,
            cpk: Reported::ZERO,
            violation_count: 0,
            in_control: true,
        }
    }
}

/// Statistics as presented for a specific chart.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChartStatistics {
    pub chart_id: ChartId,
    pub chart_name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub stats: ProcessStatistics,
}

impl std::ops::Deref for ChartStatistics {
    type Target = ProcessStatistics;

    fn deref(&self) -> &Self::Target {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral() {
        let stats = ProcessStatistics::neutral();
        assert_eq!(stats.mean, Reported::ZERO);
        assert_eq!(stats.sd, Reported::ZERO);
        assert_eq!(stats.cpk, Reported::ZERO);
        assert_eq!(stats.violation_count, 0);
        assert!(stats.in_control);
    }
}
