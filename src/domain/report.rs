// ============================================================================
// Chart Report
// A chart with its full history, ready for presentation
// ============================================================================

use super::chart::ControlChart;
use super::data_point::DataPoint;
use super::statistics::ProcessStatistics;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One stored point with its resolved actor name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointView {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub point: DataPoint,
    /// `None` when the actor directory has no entry
    pub measured_by_name: Option<String>,
}

/// Chart configuration, statistics and every point in storage order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChartReport {
    pub chart: ControlChart,
    pub statistics: ProcessStatistics,
    pub points: Vec<PointView>,
}

impl ChartReport {
    /// Points that violated at least one rule.
    pub fn violations(&self) -> impl Iterator<Item = &PointView> {
        self.points.iter().filter(|v| v.point.is_violation())
    }
}
