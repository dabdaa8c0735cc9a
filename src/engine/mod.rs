// ============================================================================
// Engine Module
// Rule evaluation, statistics and the host-facing service
// ============================================================================

mod ingestor;
mod rules;
mod service;
mod statistics;
mod westgard;

pub mod factory;

pub use factory::{create_from_config, QcServiceBuilder};
pub use ingestor::DataPointIngestor;
pub use rules::{
    standard_rules, FourOneSigma, OneThreeSigma, RangeFourSigma, TenMean, TwoTwoSigma,
};
pub use service::QcService;
pub use statistics::StatisticsEngine;
pub use westgard::{WestgardRuleEngine, HISTORY_DEPTH, MAX_WINDOW};
