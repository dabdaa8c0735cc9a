// ============================================================================
// Data Point Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::errors::ValidationError;
use super::ids::{ActorId, ChartId, LotId, PointId};
use super::rule::RuleSet;
use crate::numeric::Measurement;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A stored measurement.
///
/// Points are append-only. The violation fields are decided once, by the
/// ingestor, before the point is written.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataPoint {
    pub id: PointId,
    pub chart_id: ChartId,
    pub value: Measurement,
    pub measured_at: DateTime<Utc>,
    pub measured_by: ActorId,
    pub lot_id: Option<LotId>,
    violation: bool,
    rules: RuleSet,
    pub notes: Option<String>,
}

impl DataPoint {
    /// Build a point with its rule outcome. The violation flag is derived
    /// from `rules` so the two can never disagree.
    pub fn new(
        chart_id: ChartId,
        value: Measurement,
        measured_at: DateTime<Utc>,
        measured_by: ActorId,
        rules: RuleSet,
    ) -> Self {
        Self {
            id: PointId::new(),
            chart_id,
            value,
            measured_at,
            measured_by,
            lot_id: None,
            violation: !rules.is_empty(),
            rules,
            notes: None,
        }
    }

    pub fn with_lot(mut self, lot_id: Option<LotId>) -> Self {
        self.lot_id = lot_id;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn is_violation(&self) -> bool {
        self.violation
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }
}

// ============================================================================
// Ingestion Request / Outcome
// ============================================================================

/// Host input for recording a measurement.
#[derive(Debug, Clone, Default)]
pub struct DataPointRequest {
    /// Required; `None` is rejected as a validation error
    pub measured_value: Option<Decimal>,
    pub lot_id: Option<LotId>,
    pub notes: Option<String>,
    /// Defaults to the ingestion time. A backdated timestamp does not change
    /// where the point sits in the rule window (storage order wins).
    pub measured_at: Option<DateTime<Utc>>,
}

impl DataPointRequest {
    pub fn new(measured_value: Decimal) -> Self {
        Self {
            measured_value: Some(measured_value),
            ..Default::default()
        }
    }

    pub fn with_lot(mut self, lot_id: LotId) -> Self {
        self.lot_id = Some(lot_id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn measured_at(mut self, at: DateTime<Utc>) -> Self {
        self.measured_at = Some(at);
        self
    }

    /// Check the measured value and convert it to the interim scale.
    pub fn validated_value(&self) -> Result<Measurement, ValidationError> {
        let value = self
            .measured_value
            .ok_or_else(|| ValidationError::missing("measured_value"))?;
        Measurement::from_decimal(value).map_err(|e| ValidationError::numeric("measured_value", e))
    }
}

/// Result of one ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IngestionOutcome {
    pub point_id: PointId,
    pub violation: bool,
    pub rules: RuleSet,
}

impl From<&DataPoint> for IngestionOutcome {
    fn from(point: &DataPoint) -> Self {
        Self {
            point_id: point.id,
            violation: point.is_violation(),
            rules: point.rules(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RuleCode;

    #[test]
    fn test_violation_follows_rules() {
        let clean = DataPoint::new(
            ChartId::new(),
            Measurement::from_integer(100).unwrap(),
            Utc::now(),
            ActorId(1),
            RuleSet::EMPTY,
        );
        assert!(!clean.is_violation());

        let flagged = DataPoint::new(
            ChartId::new(),
            Measurement::from_integer(140).unwrap(),
            Utc::now(),
            ActorId(1),
            [RuleCode::OneThreeS].into_iter().collect(),
        );
        assert!(flagged.is_violation());
        assert!(flagged.rules().contains(RuleCode::OneThreeS));
    }

    #[test]
    fn test_request_validation() {
        assert_eq!(
            DataPointRequest::default().validated_value().unwrap_err(),
            ValidationError::missing("measured_value")
        );

        let ok = DataPointRequest::new(Decimal::new(10125, 2));
        assert_eq!(ok.validated_value().unwrap(), "101.25".parse().unwrap());

        let too_precise = DataPointRequest::new(Decimal::new(1, 9));
        assert!(matches!(
            too_precise.validated_value(),
            Err(ValidationError::Malformed { field: "measured_value", .. })
        ));
    }

    #[test]
    fn test_outcome_from_point() {
        let point = DataPoint::new(
            ChartId::new(),
            Measurement::ZERO,
            Utc::now(),
            ActorId(3),
            RuleSet::EMPTY,
        )
        .with_lot(Some(LotId(9)))
        .with_notes(Some("calibrated".into()));

        let outcome = IngestionOutcome::from(&point);
        assert_eq!(outcome.point_id, point.id);
        assert!(!outcome.violation);
        assert_eq!(point.lot_id, Some(LotId(9)));
    }
}
