//! Domain models for the admission market

pub mod event;
pub mod parameters;

// Re-exports
pub use event::{AnalysisStage, Event, EventLog};
pub use parameters::{
    validate, GroupStatistics, ParameterSet, ProgrammeSizeProfile, ProgrammeType, RawParameters,
    ValidationError, SEAT_PROPORTION_TOLERANCE,
};
