// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod chart;
pub mod config;
pub mod data_point;
pub mod errors;
pub mod ids;
pub mod limits;
pub mod report;
pub mod rule;
pub mod statistics;

pub use chart::{ChartRequest, ChartType, ControlChart};
pub use config::QcConfig;
pub use data_point::{DataPoint, DataPointRequest, IngestionOutcome};
pub use errors::{QcError, QcResult, StoreError, ValidationError};
pub use ids::{ActorId, ChartId, InstrumentId, LotId, MethodId, PointId};
pub use limits::SigmaZones;
pub use report::{ChartReport, PointView};
pub use rule::{RuleCode, RuleSet};
pub use statistics::{ChartStatistics, ProcessStatistics};
