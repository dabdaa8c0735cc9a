// ============================================================================
// Numeric Module
// Decimal arithmetic policy for control limits and statistics
// ============================================================================
//
// This module provides:
// - FixedDecimal<D>: Fixed-point decimal with compile-time scale
// - RoundingMode: the rounding rule every lossy operation must name
// - NumericError: Error types for arithmetic operations
// - Measurement/Reported aliases for the interim (6) and report (4) scales
//
// Design principles:
// - No floating-point operations
// - All arithmetic returns Result (no panics)
// - Rounding is always an explicit argument

mod errors;
mod fixed_decimal;
mod rounding;

pub use errors::{NumericError, NumericResult};
pub use fixed_decimal::{FixedDecimal, Measurement, Reported, INTERIM_SCALE, REPORT_SCALE};
pub use rounding::RoundingMode;

pub(crate) use rounding::div_round;
