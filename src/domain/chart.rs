// ============================================================================
// Control Chart Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use super::errors::ValidationError;
use super::ids::{ChartId, InstrumentId, MethodId};
use super::limits::SigmaZones;
use crate::numeric::{Measurement, RoundingMode};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Chart Type
// ============================================================================

/// Kind of control chart. Only affects presentation; rule evaluation is
/// the same for every type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChartType {
    /// Mean and range of subgroups
    #[default]
    XbarR,
    /// Mean and standard deviation of subgroups
    XbarS,
    /// Individual measurements
    Individual,
    /// Cumulative sum
    Cusum,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::XbarR => "XBAR_R",
            ChartType::XbarS => "XBAR_S",
            ChartType::Individual => "INDIVIDUAL",
            ChartType::Cusum => "CUSUM",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "XBAR_R" => Ok(ChartType::XbarR),
            "XBAR_S" => Ok(ChartType::XbarS),
            "INDIVIDUAL" => Ok(ChartType::Individual),
            "CUSUM" => Ok(ChartType::Cusum),
            other => Err(ValidationError::malformed(
                "chart_type",
                format!("unknown chart type '{other}'"),
            )),
        }
    }
}

// ============================================================================
// Control Chart
// ============================================================================

/// Chart configuration. Points live in the store keyed by chart id; the
/// chart never holds its history.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlChart {
    pub id: ChartId,
    pub name: String,
    pub method_id: MethodId,
    pub instrument_id: Option<InstrumentId>,
    pub chart_type: ChartType,

    /// Center line
    pub target: Option<Measurement>,
    /// Upper/lower control limits (target ± 3 SD by convention)
    pub ucl: Option<Measurement>,
    pub lcl: Option<Measurement>,
    /// Upper/lower specification limits (external tolerance)
    pub usl: Option<Measurement>,
    pub lsl: Option<Measurement>,

    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl ControlChart {
    /// Zones for Westgard evaluation, `None` if the limits are incomplete.
    pub fn sigma_zones(&self, mode: RoundingMode) -> Option<SigmaZones> {
        SigmaZones::derive(self.target, self.ucl, self.lcl, mode)
    }

    /// True when target, UCL and LCL are present and UCL lies above target.
    pub fn supports_rule_checks(&self) -> bool {
        self.sigma_zones(RoundingMode::HalfUp).is_some()
    }

    /// True when both specification limits are present.
    pub fn supports_capability(&self) -> bool {
        self.usl.is_some() && self.lsl.is_some()
    }

    /// Stop accepting the chart as current. History is kept.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

// ============================================================================
// Chart Creation Request
// ============================================================================

/// Input for creating a chart.
///
/// Limits arrive as `rust_decimal::Decimal` from the host and must fit the
/// interim scale exactly.
#[derive(Debug, Clone, Default)]
pub struct ChartRequest {
    pub name: String,
    pub method_id: Option<MethodId>,
    pub instrument_id: Option<InstrumentId>,
    pub chart_type: Option<ChartType>,
    pub target: Option<Decimal>,
    pub ucl: Option<Decimal>,
    pub lcl: Option<Decimal>,
    pub usl: Option<Decimal>,
    pub lsl: Option<Decimal>,
}

impl ChartRequest {
    pub fn new(name: impl Into<String>, method_id: MethodId) -> Self {
        Self {
            name: name.into(),
            method_id: Some(method_id),
            ..Default::default()
        }
    }

    pub fn with_instrument(mut self, instrument_id: InstrumentId) -> Self {
        self.instrument_id = Some(instrument_id);
        self
    }

    pub fn with_chart_type(mut self, chart_type: ChartType) -> Self {
        self.chart_type = Some(chart_type);
        self
    }

    /// Set target and control limits.
    pub fn with_control_limits(mut self, target: Decimal, ucl: Decimal, lcl: Decimal) -> Self {
        self.target = Some(target);
        self.ucl = Some(ucl);
        self.lcl = Some(lcl);
        self
    }

    /// Set specification limits.
    pub fn with_spec_limits(mut self, usl: Decimal, lsl: Decimal) -> Self {
        self.usl = Some(usl);
        self.lsl = Some(lsl);
        self
    }

    /// Validate and build the chart. Limits are not checked against each
    /// other; an inconsistent set simply disables rule evaluation.
    pub fn into_chart(self, created_at: DateTime<Utc>) -> Result<ControlChart, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::blank("name"));
        }
        let method_id = self
            .method_id
            .ok_or_else(|| ValidationError::missing("method_id"))?;

        Ok(ControlChart {
            id: ChartId::new(),
            name: name.to_string(),
            method_id,
            instrument_id: self.instrument_id,
            chart_type: self.chart_type.unwrap_or_default(),
            target: limit("target", self.target)?,
            ucl: limit("ucl", self.ucl)?,
            lcl: limit("lcl", self.lcl)?,
            usl: limit("usl", self.usl)?,
            lsl: limit("lsl", self.lsl)?,
            active: true,
            created_at,
        })
    }
}

fn limit(field: &'static str, value: Option<Decimal>) -> Result<Option<Measurement>, ValidationError> {
    value
        .map(|v| Measurement::from_decimal(v).map_err(|e| ValidationError::numeric(field, e)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ChartRequest {
        ChartRequest::new("Glucose L1", MethodId(7))
            .with_control_limits(Decimal::from(100), Decimal::from(130), Decimal::from(70))
    }

    #[test]
    fn test_chart_type_round_trip_names() {
        for ty in [ChartType::XbarR, ChartType::XbarS, ChartType::Individual, ChartType::Cusum] {
            assert_eq!(ty.as_str().parse::<ChartType>().unwrap(), ty);
        }
        assert_eq!(ChartType::default(), ChartType::XbarR);
        assert!("PIE".parse::<ChartType>().is_err());
    }

    #[test]
    fn test_into_chart_defaults() {
        let chart = request().into_chart(Utc::now()).unwrap();
        assert_eq!(chart.name, "Glucose L1");
        assert_eq!(chart.chart_type, ChartType::XbarR);
        assert!(chart.active);
        assert!(chart.supports_rule_checks());
        assert!(!chart.supports_capability());
        assert_eq!(chart.ucl, Some("130".parse().unwrap()));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut req = request();
        req.name = "   ".into();
        assert_eq!(
            req.into_chart(Utc::now()).unwrap_err(),
            ValidationError::blank("name")
        );
    }

    #[test]
    fn test_missing_method_rejected() {
        let req = ChartRequest {
            name: "No method".into(),
            ..Default::default()
        };
        assert_eq!(
            req.into_chart(Utc::now()).unwrap_err(),
            ValidationError::missing("method_id")
        );
    }

    #[test]
    fn test_over_precise_limit_rejected() {
        let req = request().with_spec_limits(Decimal::new(1_200_000_001, 7), Decimal::from(80));
        let err = req.into_chart(Utc::now()).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed { field: "usl", .. }));
    }

    #[test]
    fn test_incomplete_limits_disable_rules() {
        let chart = ChartRequest::new("Plain log", MethodId(1))
            .into_chart(Utc::now())
            .unwrap();
        assert!(!chart.supports_rule_checks());
    }

    #[test]
    fn test_deactivate() {
        let mut chart = request().into_chart(Utc::now()).unwrap();
        chart.deactivate();
        assert!(!chart.active);
    }
}
