// ============================================================================
// Engine Configuration
// Rounding policy and windows used by the quality-control service
// ============================================================================

use crate::numeric::RoundingMode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a quality-control service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QcConfig {
    /// Rounding applied to zones, mean, SD and Cpk
    pub rounding: RoundingMode,

    /// Number of most recent points that must be violation-free for a
    /// chart to count as in control
    pub in_control_window: usize,

    /// Lookback used by `count_recent_violations` when the host gives none
    pub recent_violation_days: i64,

    /// Refuse new points on deactivated charts. Off by default: inactive
    /// charts keep accepting data.
    pub reject_inactive_charts: bool,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingMode::HalfUp,
            in_control_window: 10,
            recent_violation_days: 7,
            reject_inactive_charts: false,
        }
    }
}

impl QcConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Set rounding mode
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Builder method: Set in-control window
    pub fn with_in_control_window(mut self, window: usize) -> Self {
        self.in_control_window = window;
        self
    }

    /// Builder method: Set default violation lookback in days
    pub fn with_recent_violation_days(mut self, days: i64) -> Self {
        self.recent_violation_days = days;
        self
    }

    /// Builder method: Refuse points on deactivated charts
    pub fn reject_inactive_charts(mut self, reject: bool) -> Self {
        self.reject_inactive_charts = reject;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.in_control_window == 0 {
            return Err("In-control window must be at least one point".to_string());
        }

        if self.recent_violation_days <= 0 {
            return Err("Violation lookback must be a positive number of days".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Preset Configurations
// ============================================================================

impl QcConfig {
    /// Clinical laboratory defaults
    /// - HALF_UP rounding
    /// - In control = last 10 points clean
    /// - Inactive charts still accept data
    pub fn clinical() -> Self {
        Self::default()
    }

    /// Strict configuration
    /// - As `clinical`, but deactivated charts refuse new points
    pub fn strict() -> Self {
        Self::default().reject_inactive_charts(true)
    }
}
