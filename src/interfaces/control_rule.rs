// ============================================================================
// Control Rule Interface
// Defines the contract for pluggable Westgard rules
// ============================================================================

use crate::domain::{RuleCode, SigmaZones};
use crate::numeric::Measurement;

/// Strategy pattern interface for a single control rule.
/// Implementations: 1-3s, 2-2s, R-4s, 4-1s, 10-x.
pub trait ControlRule: Send + Sync {
    /// Code recorded on the point when the rule fires
    fn code(&self) -> RuleCode;

    /// Exact number of values the rule inspects, new point included
    fn window(&self) -> usize {
        self.code().window()
    }

    /// Decide the rule on exactly `window()` values.
    ///
    /// # Arguments
    /// * `values` - newest-first; `values[0]` is the point being ingested
    /// * `zones` - sigma zones of the chart
    fn is_violated(&self, values: &[Measurement], zones: &SigmaZones) -> bool;
}
