// ============================================================================
// QC Engine Library
// Westgard multi-rule quality control and process capability statistics
// ============================================================================

//! # QC Engine
//!
//! Laboratory quality control over control charts: each new measurement is
//! checked against the chart's limits and its recent history with the
//! Westgard multi-rules, and charts report mean, SD, Cpk and whether they
//! are in control.
//!
//! ## Features
//!
//! - **Fixed-point arithmetic** with a caller-visible rounding mode
//! - **Pluggable control rules** (1-3s, 2-2s, R-4s, 4-1s, 10-x by default)
//! - **Per-chart serialization** so concurrent submissions never evaluate
//!   against a stale window
//! - **Event hooks** for audit trails and notifications
//!
//! ## Example
//!
//! ```rust
//! use qc_engine::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let service = QcServiceBuilder::new().build().unwrap();
//!
//! let chart = service
//!     .create_chart(
//!         ChartRequest::new("Cholesterol L1", MethodId(1))
//!             .with_control_limits(Decimal::from(100), Decimal::from(130), Decimal::from(70))
//!             .with_spec_limits(Decimal::from(120), Decimal::from(80)),
//!     )
//!     .unwrap();
//!
//! let outcome = service
//!     .add_data_point(chart, DataPointRequest::new(Decimal::from(135)), ActorId(1))
//!     .unwrap();
//! assert!(outcome.violation);
//! assert_eq!(outcome.rules.to_string(), "1-3s");
//!
//! let stats = service.get_statistics(chart).unwrap();
//! assert!(!stats.in_control);
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;
pub mod store;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        ActorId, ChartId, ChartReport, ChartRequest, ChartStatistics, ChartType, ControlChart,
        DataPoint, DataPointRequest, IngestionOutcome, InstrumentId, LotId, MethodId, PointId,
        PointView, ProcessStatistics, QcConfig, QcError, QcResult, RuleCode, RuleSet, SigmaZones,
        StoreError, ValidationError,
    };
    pub use crate::engine::{
        create_from_config, QcService, QcServiceBuilder, StatisticsEngine, WestgardRuleEngine,
    };
    pub use crate::interfaces::{
        ActorDirectory, ChartStore, ControlRule, EventHandler, LoggingEventHandler,
        NoActorDirectory, NoOpEventHandler, QcEvent, RecordingEventHandler,
    };
    pub use crate::numeric::{Measurement, Reported, RoundingMode};
    pub use crate::store::InMemoryChartStore;
}
