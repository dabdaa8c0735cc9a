// ============================================================================
// Service Factory
// Creates quality-control services with proper configuration
// ============================================================================

use crate::domain::{QcConfig, QcResult};
use crate::engine::QcService;
use crate::interfaces::{ActorDirectory, ChartStore, EventHandler, NoActorDirectory, NoOpEventHandler};
use crate::numeric::RoundingMode;
use crate::store::InMemoryChartStore;
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a service from configuration
///
/// # Arguments
/// * `config` - Rounding and window configuration
/// * `store` - Chart store the service reads and writes
/// * `event_handler` - Handler for chart and point events
///
/// # Example
/// ```
/// use qc_engine::prelude::*;
/// use std::sync::Arc;
///
/// let service = create_from_config(
///     QcConfig::clinical(),
///     Arc::new(InMemoryChartStore::new()),
///     Arc::new(NoOpEventHandler),
/// )
/// .unwrap();
/// assert!(service.list_charts(None).unwrap().is_empty());
/// ```
pub fn create_from_config(
    config: QcConfig,
    store: Arc<dyn ChartStore>,
    event_handler: Arc<dyn EventHandler>,
) -> QcResult<QcService> {
    QcService::new(config, store, event_handler, Arc::new(NoActorDirectory))
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating services with fluent API
///
/// # Example
/// ```
/// use qc_engine::prelude::*;
/// use std::sync::Arc;
///
/// let service = QcServiceBuilder::new()
///     .rounding(RoundingMode::HalfEven)
///     .in_control_window(20)
///     .with_event_handler(Arc::new(LoggingEventHandler))
///     .build()
///     .unwrap();
/// assert_eq!(service.config().in_control_window, 20);
/// ```
pub struct QcServiceBuilder {
    config: QcConfig,
    store: Option<Arc<dyn ChartStore>>,
    event_handler: Arc<dyn EventHandler>,
    actors: Arc<dyn ActorDirectory>,
}

impl QcServiceBuilder {
    /// Builder with clinical defaults, an in-memory store and no listeners
    pub fn new() -> Self {
        Self::from_config(QcConfig::clinical())
    }

    pub fn from_config(config: QcConfig) -> Self {
        Self {
            config,
            store: None,
            event_handler: Arc::new(NoOpEventHandler),
            actors: Arc::new(NoActorDirectory),
        }
    }

    // ========================================================================
    // Calculation Settings
    // ========================================================================

    /// Rounding applied to zones, mean, SD and Cpk
    pub fn rounding(mut self, rounding: RoundingMode) -> Self {
        self.config.rounding = rounding;
        self
    }

    /// Points that must be clean for a chart to be in control
    pub fn in_control_window(mut self, window: usize) -> Self {
        self.config.in_control_window = window;
        self
    }

    /// Default lookback for `count_recent_violations`
    pub fn recent_violation_days(mut self, days: i64) -> Self {
        self.config.recent_violation_days = days;
        self
    }

    /// Refuse points on deactivated charts
    pub fn strict(mut self) -> Self {
        self.config.reject_inactive_charts = true;
        self
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    pub fn with_store(mut self, store: Arc<dyn ChartStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    pub fn with_actor_directory(mut self, actors: Arc<dyn ActorDirectory>) -> Self {
        self.actors = actors;
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the service
    pub fn build(self) -> QcResult<QcService> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryChartStore::new()));
        QcService::new(self.config, store, self.event_handler, self.actors)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &QcConfig {
        &self.config
    }
}

impl Default for QcServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActorId, ChartRequest, DataPointRequest, MethodId, QcError};
    use rust_decimal::Decimal;

    #[test]
    fn test_create_from_config() {
        let service = create_from_config(
            QcConfig::clinical(),
            Arc::new(InMemoryChartStore::new()),
            Arc::new(NoOpEventHandler),
        )
        .unwrap();
        assert_eq!(service.config(), &QcConfig::clinical());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = create_from_config(
            QcConfig::new().with_in_control_window(0),
            Arc::new(InMemoryChartStore::new()),
            Arc::new(NoOpEventHandler),
        );
        assert!(matches!(result, Err(QcError::InvalidConfig(_))));

        let built = QcServiceBuilder::new().recent_violation_days(-1).build();
        assert!(matches!(built, Err(QcError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_pattern() {
        let builder = QcServiceBuilder::new()
            .rounding(RoundingMode::Down)
            .in_control_window(5)
            .strict();
        assert_eq!(builder.get_config().rounding, RoundingMode::Down);
        assert!(builder.get_config().reject_inactive_charts);

        let service = builder.build().unwrap();
        assert_eq!(service.config().in_control_window, 5);
    }

    #[test]
    fn test_builder_shares_store() {
        let store = Arc::new(InMemoryChartStore::new());
        let service = QcServiceBuilder::new()
            .with_store(store.clone())
            .build()
            .unwrap();

        let id = service
            .create_chart(ChartRequest::new("ALT", MethodId(2)))
            .unwrap();
        service
            .add_data_point(id, DataPointRequest::new(Decimal::from(30)), ActorId(1))
            .unwrap();
        assert_eq!(store.point_count(), 1);
    }

    #[test]
    fn test_strict_builder_rejects_inactive() {
        let service = QcServiceBuilder::new().strict().build().unwrap();
        let id = service
            .create_chart(ChartRequest::new("AST", MethodId(2)))
            .unwrap();
        service.deactivate_chart(id).unwrap();
        assert_eq!(
            service
                .add_data_point(id, DataPointRequest::new(Decimal::ONE), ActorId(1))
                .unwrap_err(),
            QcError::InactiveChart(id)
        );
    }
}
