// std
#[cfg(not(feature = "tracing"))]
use std::marker::PhantomData;
// self
use crate::{_prelude::*, id::ClientKey, obs::AdmissionOutcome};

/// Span wrapping a single admission decision.
#[derive(Clone, Debug)]
pub struct AdmissionSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl AdmissionSpan {
	/// Creates a new span tagged with the batch cost and optional client label.
	pub fn new(cost: u64, client: Option<&ClientKey>) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!(
				"ingest_gate.admit",
				cost,
				client = client.map(|key| key.as_ref()),
				outcome = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (cost, client);

			Self {}
		}
	}

	/// Enters the span for the duration of the returned guard.
	pub fn enter(&self) -> AdmissionSpanGuard<'_> {
		#[cfg(feature = "tracing")]
		{
			AdmissionSpanGuard { guard: self.span.enter() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			AdmissionSpanGuard { _span: PhantomData }
		}
	}

	/// Records the decision on the span.
	pub fn record_outcome(&self, outcome: AdmissionOutcome) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());

			if outcome == AdmissionOutcome::Rejected {
				tracing::debug!("batch rejected by rate limit");
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = outcome;
		}
	}
}

/// RAII guard returned by [`AdmissionSpan::enter`].
pub struct AdmissionSpanGuard<'a> {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::Entered<'a>,
	#[cfg(not(feature = "tracing"))]
	_span: PhantomData<&'a AdmissionSpan>,
}
impl Debug for AdmissionSpanGuard<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("AdmissionSpanGuard(..)")
	}
}
