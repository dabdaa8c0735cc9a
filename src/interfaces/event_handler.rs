// ============================================================================
// Event Handler Interface
// Defines the contract for handling chart and data point events
// ============================================================================

use crate::domain::{ActorId, ChartId, PointId, RuleSet};
use crate::numeric::Measurement;
use chrono::{DateTime, Utc};
use crossbeam::queue::SegQueue;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the quality-control service
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QcEvent {
    /// Chart created
    ChartCreated {
        chart_id: ChartId,
        name: String,
        timestamp: DateTime<Utc>,
    },

    /// Chart deactivated (history retained)
    ChartDeactivated {
        chart_id: ChartId,
        timestamp: DateTime<Utc>,
    },

    /// Point evaluated and stored
    PointRecorded {
        chart_id: ChartId,
        point_id: PointId,
        value: Measurement,
        actor: ActorId,
        timestamp: DateTime<Utc>,
    },

    /// Stored point violated one or more rules
    ViolationDetected {
        chart_id: ChartId,
        point_id: PointId,
        value: Measurement,
        rules: RuleSet,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing service events.
/// Implementations can handle notifications, audit trails, metrics, etc.
pub trait EventHandler: Send + Sync {
    /// Handle an event
    fn on_event(&self, event: QcEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<QcEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: QcEvent) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: QcEvent) {
        match &event {
            QcEvent::ViolationDetected {
                chart_id,
                value,
                rules,
                ..
            } => {
                tracing::warn!(%chart_id, %value, rules = %rules, "Westgard violation");
            },
            _ => tracing::debug!("QC event: {:?}", event),
        }
    }
}

/// Buffers events in a lock-free queue until drained.
#[derive(Default)]
pub struct RecordingEventHandler {
    events: SegQueue<QcEvent>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered events in arrival order.
    pub fn drain(&self) -> Vec<QcEvent> {
        std::iter::from_fn(|| self.events.pop()).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventHandler for RecordingEventHandler {
    fn on_event(&self, event: QcEvent) {
        self.events.push(event);
    }
}
