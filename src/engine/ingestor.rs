// ============================================================================
// Data Point Ingestor
// Validate, evaluate and persist one measurement under the chart's lock
// ============================================================================

use chrono::Utc;
use std::sync::Arc;

use super::westgard::{WestgardRuleEngine, HISTORY_DEPTH};
use crate::domain::{
    ActorId, ChartId, DataPoint, DataPointRequest, IngestionOutcome, QcError, QcResult,
};
use crate::interfaces::{ChartStore, EventHandler, QcEvent};
use crate::numeric::Measurement;
use crate::utils::KeyedLocks;

/// Records measurements.
///
/// Reading the history, evaluating the rules and saving the new point
/// happen inside one per-chart critical section, so concurrent
/// submissions to the same chart each see every earlier point.
pub struct DataPointIngestor {
    store: Arc<dyn ChartStore>,
    rules: WestgardRuleEngine,
    locks: Arc<KeyedLocks<ChartId>>,
    event_handler: Arc<dyn EventHandler>,
    reject_inactive: bool,
}

impl DataPointIngestor {
    pub fn new(
        store: Arc<dyn ChartStore>,
        rules: WestgardRuleEngine,
        locks: Arc<KeyedLocks<ChartId>>,
        event_handler: Arc<dyn EventHandler>,
        reject_inactive: bool,
    ) -> Self {
        Self {
            store,
            rules,
            locks,
            event_handler,
            reject_inactive,
        }
    }

    /// Record a measurement on `chart_id`.
    ///
    /// Nothing is written when validation fails, the chart is unknown, or
    /// the store reports an error.
    pub fn ingest(
        &self,
        chart_id: ChartId,
        request: DataPointRequest,
        actor: ActorId,
    ) -> QcResult<IngestionOutcome> {
        let value = request.validated_value()?;

        let point = self
            .locks
            .with_lock(&chart_id, || self.record(chart_id, value, request, actor))?;

        let outcome = IngestionOutcome::from(&point);
        self.publish(&point);
        Ok(outcome)
    }

    fn record(
        &self,
        chart_id: ChartId,
        value: Measurement,
        request: DataPointRequest,
        actor: ActorId,
    ) -> QcResult<DataPoint> {
        let chart = self
            .store
            .find_chart(chart_id)?
            .ok_or_else(|| QcError::chart_not_found(chart_id))?;

        if self.reject_inactive && !chart.active {
            return Err(QcError::InactiveChart(chart_id));
        }

        let history: Vec<Measurement> = self
            .store
            .find_recent_points(chart_id, HISTORY_DEPTH)?
            .iter()
            .map(|p| p.value)
            .collect();

        let rules = self.rules.evaluate_for_chart(value, &history, &chart);
        let measured_at = request.measured_at.unwrap_or_else(Utc::now);

        let point = DataPoint::new(chart_id, value, measured_at, actor, rules)
            .with_lot(request.lot_id)
            .with_notes(request.notes);
        self.store.save_point(&point)?;

        if point.is_violation() {
            tracing::warn!(
                chart = %chart.name,
                %chart_id,
                %value,
                rules = %rules,
                "QC violation recorded"
            );
        } else {
            tracing::debug!(%chart_id, %value, history = history.len(), "QC point recorded");
        }

        Ok(point)
    }

    fn publish(&self, point: &DataPoint) {
        let timestamp = Utc::now();
        let mut events = vec![QcEvent::PointRecorded {
            chart_id: point.chart_id,
            point_id: point.id,
            value: point.value,
            actor: point.measured_by,
            timestamp,
        }];
        if point.is_violation() {
            events.push(QcEvent::ViolationDetected {
                chart_id: point.chart_id,
                point_id: point.id,
                value: point.value,
                rules: point.rules(),
                timestamp,
            });
        }
        self.event_handler.on_events(events);
    }
}
