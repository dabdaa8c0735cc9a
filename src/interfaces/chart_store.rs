// ============================================================================
// Chart Store Interface
// Durable storage for charts and their append-only point history
// ============================================================================

use chrono::{DateTime, Utc};

use crate::domain::{ChartId, ControlChart, DataPoint, StoreError};

/// Storage contract consumed by the engine.
///
/// "Storage order" below is the order in which points were accepted by
/// `save_point`. Rule windows and the in-control window follow it, not
/// `measured_at`.
pub trait ChartStore: Send + Sync {
    /// Insert or replace a chart's configuration.
    fn save_chart(&self, chart: &ControlChart) -> Result<(), StoreError>;

    fn find_chart(&self, chart_id: ChartId) -> Result<Option<ControlChart>, StoreError>;

    /// Charts newest-first, optionally filtered by the active flag.
    fn list_charts(&self, active: Option<bool>) -> Result<Vec<ControlChart>, StoreError>;

    /// Append a point. Must be atomic: either the whole point is stored or
    /// nothing is.
    fn save_point(&self, point: &DataPoint) -> Result<(), StoreError>;

    /// Up to `limit` points of a chart, newest-first in storage order.
    fn find_recent_points(
        &self,
        chart_id: ChartId,
        limit: usize,
    ) -> Result<Vec<DataPoint>, StoreError>;

    /// Every point of a chart, oldest-first in storage order.
    fn find_all_points(&self, chart_id: ChartId) -> Result<Vec<DataPoint>, StoreError>;

    /// Flagged points across all charts with `measured_at >= since`.
    fn count_violations_since(&self, since: DateTime<Utc>) -> Result<u64, StoreError>;
}
