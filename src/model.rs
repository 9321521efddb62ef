//! Telemetry batch and event model gated by the admission layer.
//!
//! Only the number of events in a batch matters to admission; the typed payloads exist so the
//! model can travel through the rest of a pipeline unchanged.

pub mod batch;
pub mod event;

pub use batch::*;
pub use event::*;
