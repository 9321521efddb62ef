//! Optional observability helpers for the admission gate.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to open an `ingest_gate.admit` span per admission carrying the `cost`,
//!   `client`, and `outcome` fields, plus a `debug` event for every rejection.
//! - Enable `metrics` to increment `ingest_gate_admission_total` once per admission, labeled by
//!   `outcome`, and `ingest_gate_admission_events_total` by the number of events of each kind,
//!   labeled by `outcome` and `kind`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Result of a single admission attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdmissionOutcome {
	/// The bucket granted the batch cost.
	Admitted,
	/// No bucket was associated with the context.
	Bypassed,
	/// The bucket could not cover the batch cost.
	Rejected,
}
impl AdmissionOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AdmissionOutcome::Admitted => "admitted",
			AdmissionOutcome::Bypassed => "bypassed",
			AdmissionOutcome::Rejected => "rejected",
		}
	}
}
impl Display for AdmissionOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
