// ============================================================================
// Quality-Control Service
// Host-facing operations over charts, points and statistics
// ============================================================================

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use super::ingestor::DataPointIngestor;
use super::statistics::StatisticsEngine;
use super::westgard::WestgardRuleEngine;
use crate::domain::{
    ActorId, ChartId, ChartReport, ChartRequest, ChartStatistics, ControlChart, DataPointRequest,
    IngestionOutcome, PointView, ProcessStatistics, QcConfig, QcError, QcResult,
};
use crate::interfaces::{ActorDirectory, ChartStore, EventHandler, QcEvent};
use crate::utils::KeyedLocks;

/// Entry point for the host application.
///
/// Cheap to share across threads behind an `Arc`; every operation takes
/// `&self`.
pub struct QcService {
    store: Arc<dyn ChartStore>,
    ingestor: DataPointIngestor,
    statistics: StatisticsEngine,
    locks: Arc<KeyedLocks<ChartId>>,
    event_handler: Arc<dyn EventHandler>,
    actors: Arc<dyn ActorDirectory>,
    config: QcConfig,
}

impl QcService {
    /// Build a service over `store`.
    ///
    /// # Errors
    /// `InvalidConfig` when `config` fails [`QcConfig::validate`].
    pub fn new(
        config: QcConfig,
        store: Arc<dyn ChartStore>,
        event_handler: Arc<dyn EventHandler>,
        actors: Arc<dyn ActorDirectory>,
    ) -> QcResult<Self> {
        config.validate().map_err(QcError::InvalidConfig)?;

        let locks = Arc::new(KeyedLocks::new());
        let ingestor = DataPointIngestor::new(
            Arc::clone(&store),
            WestgardRuleEngine::new(config.rounding),
            Arc::clone(&locks),
            Arc::clone(&event_handler),
            config.reject_inactive_charts,
        );
        Ok(Self {
            statistics: StatisticsEngine::new(config.rounding, config.in_control_window),
            store,
            ingestor,
            locks,
            event_handler,
            actors,
            config,
        })
    }

    pub fn config(&self) -> &QcConfig {
        &self.config
    }

    // ========================================================================
    // Charts
    // ========================================================================

    /// Validate and store a new chart. Charts start active.
    pub fn create_chart(&self, request: ChartRequest) -> QcResult<ChartId> {
        let chart = request.into_chart(Utc::now())?;
        self.store.save_chart(&chart)?;

        tracing::info!(chart_id = %chart.id, name = %chart.name, "control chart created");
        self.event_handler.on_event(QcEvent::ChartCreated {
            chart_id: chart.id,
            name: chart.name.clone(),
            timestamp: chart.created_at,
        });
        Ok(chart.id)
    }

    pub fn get_chart(&self, chart_id: ChartId) -> QcResult<ControlChart> {
        self.store
            .find_chart(chart_id)?
            .ok_or_else(|| QcError::chart_not_found(chart_id))
    }

    /// Charts newest-first; `Some(true)` lists only active charts.
    pub fn list_charts(&self, active: Option<bool>) -> QcResult<Vec<ControlChart>> {
        Ok(self.store.list_charts(active)?)
    }

    /// Mark a chart inactive. Its history is kept. Deactivating an
    /// inactive chart is a no-op.
    pub fn deactivate_chart(&self, chart_id: ChartId) -> QcResult<()> {
        let deactivated = self.locks.with_lock(&chart_id, || -> QcResult<bool> {
            let mut chart = self.get_chart(chart_id)?;
            if !chart.active {
                return Ok(false);
            }
            chart.deactivate();
            self.store.save_chart(&chart)?;
            Ok(true)
        })?;

        if deactivated {
            tracing::info!(%chart_id, "control chart deactivated");
            self.event_handler.on_event(QcEvent::ChartDeactivated {
                chart_id,
                timestamp: Utc::now(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Data points
    // ========================================================================

    /// Record a measurement and report which rules it violated.
    pub fn add_data_point(
        &self,
        chart_id: ChartId,
        request: DataPointRequest,
        actor: ActorId,
    ) -> QcResult<IngestionOutcome> {
        self.ingestor.ingest(chart_id, request, actor)
    }

    // ========================================================================
    // Statistics and reporting
    // ========================================================================

    /// Mean, SD, Cpk and control status over the chart's full history.
    pub fn get_statistics(&self, chart_id: ChartId) -> QcResult<ChartStatistics> {
        let chart = self.get_chart(chart_id)?;
        let stats = self.compute(&chart)?;
        Ok(ChartStatistics {
            chart_id,
            chart_name: chart.name,
            stats,
        })
    }

    /// Flagged points across all charts measured at or after `since`.
    pub fn count_violations_since(&self, since: DateTime<Utc>) -> QcResult<u64> {
        Ok(self.store.count_violations_since(since)?)
    }

    /// Flagged points in the last `days` days, or the configured default
    /// lookback when `None`.
    pub fn count_recent_violations(&self, days: Option<i64>) -> QcResult<u64> {
        let days = days.unwrap_or(self.config.recent_violation_days);
        let lookback = Duration::try_days(days)
            .filter(|_| days > 0)
            .ok_or_else(|| QcError::InvalidConfig(format!("invalid lookback of {days} days")))?;
        self.count_violations_since(Utc::now() - lookback)
    }

    /// Chart, statistics and every point with the actor's display name.
    pub fn get_chart_report(&self, chart_id: ChartId) -> QcResult<ChartReport> {
        let chart = self.get_chart(chart_id)?;
        let history = self.store.find_all_points(chart_id)?;
        let statistics = self.statistics.compute(&history, chart.usl, chart.lsl);

        let points = history
            .into_iter()
            .map(|point| PointView {
                measured_by_name: self.actors.display_name(point.measured_by),
                point,
            })
            .collect();

        Ok(ChartReport {
            chart,
            statistics,
            points,
        })
    }

    fn compute(&self, chart: &ControlChart) -> QcResult<ProcessStatistics> {
        let history = self.store.find_all_points(chart.id)?;
        Ok(self.statistics.compute(&history, chart.usl, chart.lsl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MethodId, RuleCode};
    use crate::interfaces::{NoActorDirectory, NoOpEventHandler, RecordingEventHandler};
    use crate::store::InMemoryChartStore;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    fn service_with(config: QcConfig, events: Arc<dyn EventHandler>) -> QcService {
        QcService::new(
            config,
            Arc::new(InMemoryChartStore::new()),
            events,
            Arc::new(NoActorDirectory),
        )
        .unwrap()
    }

    fn service() -> QcService {
        service_with(QcConfig::default(), Arc::new(NoOpEventHandler))
    }

    fn limited(name: &str) -> ChartRequest {
        ChartRequest::new(name, MethodId(1))
            .with_control_limits(Decimal::from(100), Decimal::from(130), Decimal::from(70))
            .with_spec_limits(Decimal::from(120), Decimal::from(80))
    }

    fn add(service: &QcService, chart: ChartId, value: i64) -> IngestionOutcome {
        service
            .add_data_point(chart, DataPointRequest::new(Decimal::from(value)), ActorId(1))
            .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = QcService::new(
            QcConfig::new().with_in_control_window(0),
            Arc::new(InMemoryChartStore::new()),
            Arc::new(NoOpEventHandler),
            Arc::new(NoActorDirectory),
        );
        assert!(matches!(result, Err(QcError::InvalidConfig(_))));
    }

    #[test]
    fn test_create_and_get_chart() {
        let service = service();
        let id = service.create_chart(limited("Cholesterol")).unwrap();
        let chart = service.get_chart(id).unwrap();
        assert_eq!(chart.name, "Cholesterol");
        assert!(chart.active);
        assert_eq!(chart.ucl.unwrap().to_string(), "130.000000");
    }

    #[test]
    fn test_create_chart_validation() {
        let service = service();
        assert!(matches!(
            service.create_chart(ChartRequest::new("  ", MethodId(1))),
            Err(QcError::Validation(_))
        ));
        assert!(service.list_charts(None).unwrap().is_empty());
    }

    #[test]
    fn test_get_unknown_chart() {
        let service = service();
        assert!(service.get_chart(ChartId::new()).unwrap_err().is_not_found());
        assert!(service.get_statistics(ChartId::new()).unwrap_err().is_not_found());
        assert!(service.get_chart_report(ChartId::new()).unwrap_err().is_not_found());
        assert!(service.deactivate_chart(ChartId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_deactivate_emits_once() {
        let events = Arc::new(RecordingEventHandler::new());
        let service = service_with(QcConfig::default(), events.clone());
        let id = service.create_chart(limited("Sodium")).unwrap();

        service.deactivate_chart(id).unwrap();
        service.deactivate_chart(id).unwrap();

        assert!(!service.get_chart(id).unwrap().active);
        let recorded = events.drain();
        assert_eq!(recorded.len(), 2);
        assert!(matches!(recorded[1], QcEvent::ChartDeactivated { .. }));
        assert_eq!(service.list_charts(Some(true)).unwrap().len(), 0);
        assert_eq!(service.list_charts(Some(false)).unwrap().len(), 1);
    }

    #[test]
    fn test_statistics_over_service() {
        let service = service();
        let id = service.create_chart(limited("Glucose")).unwrap();
        add(&service, id, 95);
        add(&service, id, 105);

        let stats = service.get_statistics(id).unwrap();
        assert_eq!(stats.chart_name, "Glucose");
        assert_eq!(stats.total_points, 2);
        assert_eq!(stats.mean.to_string(), "100.0000");
        assert_eq!(stats.sd.to_string(), "5.0000");
        assert_eq!(stats.cpk.to_string(), "1.3333");
        assert!(stats.in_control);
    }

    #[test]
    fn test_count_recent_violations() {
        let service = service();
        let id = service.create_chart(limited("Calcium")).unwrap();
        add(&service, id, 140);
        add(&service, id, 100);
        service
            .add_data_point(
                id,
                DataPointRequest::new(Decimal::from(40)).measured_at(Utc::now() - Duration::days(20)),
                ActorId(1),
            )
            .unwrap();

        assert_eq!(service.count_recent_violations(None).unwrap(), 1);
        assert_eq!(service.count_recent_violations(Some(30)).unwrap(), 2);
        assert!(matches!(
            service.count_recent_violations(Some(0)),
            Err(QcError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_chart_report_resolves_actor_names() {
        let directory = HashMap::from([(ActorId(7), "J. Smith".to_string())]);
        let service = QcService::new(
            QcConfig::default(),
            Arc::new(InMemoryChartStore::new()),
            Arc::new(NoOpEventHandler),
            Arc::new(directory),
        )
        .unwrap();
        let id = service.create_chart(limited("Iron")).unwrap();
        service
            .add_data_point(id, DataPointRequest::new(Decimal::from(100)), ActorId(7))
            .unwrap();
        service
            .add_data_point(id, DataPointRequest::new(Decimal::from(140)), ActorId(8))
            .unwrap();

        let report = service.get_chart_report(id).unwrap();
        assert_eq!(report.chart.id, id);
        assert_eq!(report.points.len(), 2);
        assert_eq!(report.points[0].measured_by_name.as_deref(), Some("J. Smith"));
        assert_eq!(report.points[1].measured_by_name, None);
        assert_eq!(report.statistics.violation_count, 1);

        let flagged: Vec<_> = report.violations().collect();
        assert_eq!(flagged.len(), 1);
        assert!(flagged[0].point.rules().contains(RuleCode::OneThreeS));
    }
}
