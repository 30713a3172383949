//! Event logging for analysis auditing.
//!
//! Every [`analyze`](crate::orchestrator::analyze) call records the decisions
//! it takes, in order, into an [`EventLog`] attached to the report. Front
//! ends replay the log to explain *why* a market ended up where it did
//! (which band check failed, whether the fraction was clamped, which corner
//! won) without re-deriving anything themselves.
//!
//! # Event Types
//!
//! Events are grouped by analysis stage:
//! - **GroupA**: priority allocation of Type-A seats
//! - **GroupB**: MSE band check, clamping, interior or corner result, probes
//! - **Advice**: value adjustment suggestions
//!
//! # Example
//!
//! ```rust
//! use admission_equilibrium_core::models::{AnalysisStage, Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::MseChecked {
//!     k: 2.0,
//!     lower: 0.75,
//!     upper: 4.0 / 3.0,
//!     feasible: false,
//! });
//!
//! assert_eq!(log.events_in_stage(AnalysisStage::GroupB).len(), 1);
//! ```

use crate::equilibrium::{ClampBound, EquilibriumKind};
use serde::{Deserialize, Serialize};

/// Analysis stage an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStage {
    GroupA,
    GroupB,
    Advice,
}

/// Analysis event capturing one decision.
///
/// Events are logged in the order the analysis takes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum Event {
    /// Group A was matched against Type-A seats
    GroupAAllocated {
        applicants: u64,
        seats: u64,
        admission_rate: f64,
        expected_payoff: f64,
        complete: bool,
    },

    /// K was tested against the feasibility band
    MseChecked {
        k: f64,
        lower: f64,
        upper: f64,
        feasible: bool,
    },

    /// The indifference fraction violated a capacity constraint and was moved
    FractionClamped {
        raw_fraction: f64,
        fraction: f64,
        bound: ClampBound,
    },

    /// An interior equilibrium was produced
    InteriorEquilibrium {
        fraction: f64,
        payoff_b: f64,
        payoff_c: f64,
        indifference_holds: bool,
    },

    /// A corner (or an indifferent tie between corners) was selected
    CornerSelected {
        kind: EquilibriumKind,
        admission_rate: f64,
        expected_payoff: f64,
    },

    /// One asymmetric-deviation probe point was evaluated
    DeviationProbed {
        switchers: u64,
        admission_b: f64,
        admission_c: f64,
        rational: bool,
    },

    /// Group B had no applicants or no seats to compete for
    DegenerateMarket {
        applicants: u64,
        seats_b: u64,
        seats_c: u64,
    },

    /// The advisor classified K; no target when the band is empty
    SuggestionIssued {
        current_k: f64,
        target_k: Option<f64>,
        adjustment_needed: bool,
    },
}

impl Event {
    /// Get the stage this event belongs to
    pub fn stage(&self) -> AnalysisStage {
        match self {
            Event::GroupAAllocated { .. } => AnalysisStage::GroupA,
            Event::MseChecked { .. }
            | Event::FractionClamped { .. }
            | Event::InteriorEquilibrium { .. }
            | Event::CornerSelected { .. }
            | Event::DeviationProbed { .. }
            | Event::DegenerateMarket { .. } => AnalysisStage::GroupB,
            Event::SuggestionIssued { .. } => AnalysisStage::Advice,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::GroupAAllocated { .. } => "GroupAAllocated",
            Event::MseChecked { .. } => "MseChecked",
            Event::FractionClamped { .. } => "FractionClamped",
            Event::InteriorEquilibrium { .. } => "InteriorEquilibrium",
            Event::CornerSelected { .. } => "CornerSelected",
            Event::DeviationProbed { .. } => "DeviationProbed",
            Event::DegenerateMarket { .. } => "DegenerateMarket",
            Event::SuggestionIssued { .. } => "SuggestionIssued",
        }
    }
}

/// Ordered log of analysis events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific stage
    pub fn events_in_stage(&self, stage: AnalysisStage) -> Vec<&Event> {
        self.events.iter().filter(|e| e.stage() == stage).collect()
    }
}
