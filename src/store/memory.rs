// ============================================================================
// In-Memory Chart Store
// Lock-free skip lists keyed by chart id and storage sequence
// ============================================================================

use chrono::{DateTime, Utc};
use crossbeam_skiplist::SkipMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::{ChartId, ControlChart, DataPoint, StoreError};
use crate::interfaces::ChartStore;

/// A chart and its append-only history.
struct ChartEntry {
    chart: RwLock<ControlChart>,
    /// Keyed by global storage sequence, so iteration is storage order
    points: SkipMap<u64, DataPoint>,
}

/// Reference [`ChartStore`] kept entirely in memory.
///
/// Writes to one chart's history do not block readers of other charts.
/// Storage order is a single counter shared by all charts.
pub struct InMemoryChartStore {
    charts: SkipMap<ChartId, Arc<ChartEntry>>,
    sequence: AtomicU64,
}

impl InMemoryChartStore {
    pub fn new() -> Self {
        Self {
            charts: SkipMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Total points across all charts.
    pub fn point_count(&self) -> usize {
        self.charts.iter().map(|e| e.value().points.len()).sum()
    }

    fn entry(&self, chart_id: ChartId) -> Option<Arc<ChartEntry>> {
        self.charts.get(&chart_id).map(|e| Arc::clone(e.value()))
    }
}

impl Default for InMemoryChartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartStore for InMemoryChartStore {
    fn save_chart(&self, chart: &ControlChart) -> Result<(), StoreError> {
        match self.entry(chart.id) {
            Some(entry) => *entry.chart.write() = chart.clone(),
            None => {
                self.charts.insert(
                    chart.id,
                    Arc::new(ChartEntry {
                        chart: RwLock::new(chart.clone()),
                        points: SkipMap::new(),
                    }),
                );
            },
        }
        Ok(())
    }

    fn find_chart(&self, chart_id: ChartId) -> Result<Option<ControlChart>, StoreError> {
        Ok(self.entry(chart_id).map(|e| e.chart.read().clone()))
    }

    fn list_charts(&self, active: Option<bool>) -> Result<Vec<ControlChart>, StoreError> {
        let mut charts: Vec<ControlChart> = self
            .charts
            .iter()
            .map(|e| e.value().chart.read().clone())
            .filter(|c| active.is_none_or(|a| c.active == a))
            .collect();
        charts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(charts)
    }

    fn save_point(&self, point: &DataPoint) -> Result<(), StoreError> {
        let entry = self.entry(point.chart_id).ok_or_else(|| {
            StoreError::Constraint(format!("point references unknown chart {}", point.chart_id))
        })?;
        let seq = self.sequence.fetch_add(1, Ordering::AcqRel);
        entry.points.insert(seq, point.clone());
        Ok(())
    }

    fn find_recent_points(
        &self,
        chart_id: ChartId,
        limit: usize,
    ) -> Result<Vec<DataPoint>, StoreError> {
        Ok(self
            .entry(chart_id)
            .map(|e| {
                e.points
                    .iter()
                    .rev()
                    .take(limit)
                    .map(|p| p.value().clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn find_all_points(&self, chart_id: ChartId) -> Result<Vec<DataPoint>, StoreError> {
        Ok(self
            .entry(chart_id)
            .map(|e| e.points.iter().map(|p| p.value().clone()).collect())
            .unwrap_or_default())
    }

    fn count_violations_since(&self, since: DateTime<Utc>) -> Result<u64, StoreError> {
        let count: usize = self
            .charts
            .iter()
            .map(|e| {
                e.value()
                    .points
                    .iter()
                    .filter(|p| p.value().is_violation() && p.value().measured_at >= since)
                    .count()
            })
            .sum();
        Ok(count as u64)
    }
}
