//! Batch admission gate that charges one token per event against the context's bucket.
//!
//! The gate holds no state of its own. A context without a bucket bypasses rate limiting, a
//! granted withdrawal lets the batch through unchanged, and a denied withdrawal rejects the
//! whole batch with [`RateLimitExceeded`]. Rejections are returned immediately; nothing is
//! queued or retried here.

// self
use crate::{
	_prelude::*,
	context::{self, LimiterContext},
	error::RateLimitExceeded,
	model::Batch,
	obs::{self, AdmissionOutcome, AdmissionSpan},
};

/// Pipeline stage contract for components that inspect or gate a batch in flight.
pub trait BatchProcessor
where
	Self: Send + Sync,
{
	/// Processes `batch` within the request scope described by `context`.
	fn process_batch(&self, context: &LimiterContext, batch: &mut Batch) -> Result<()>;
}

/// Stateless admission gate.
#[derive(Clone, Copy, Debug, Default)]
pub struct BatchAdmissionGate;
impl BatchAdmissionGate {
	/// Admits or rejects `batch` against the bucket attached to `context`.
	pub fn admit(&self, context: &LimiterContext, batch: &Batch) -> Result<(), RateLimitExceeded> {
		let cost = batch.cost();
		let span = AdmissionSpan::new(cost, context.client());
		let _guard = span.enter();
		let outcome = match context::lookup(context) {
			None => AdmissionOutcome::Bypassed,
			Some(bucket) if bucket.try_withdraw(cost) => AdmissionOutcome::Admitted,
			Some(_) => AdmissionOutcome::Rejected,
		};

		span.record_outcome(outcome);
		obs::record_admission(outcome, batch);

		match outcome {
			AdmissionOutcome::Rejected => Err(RateLimitExceeded { cost }),
			AdmissionOutcome::Admitted | AdmissionOutcome::Bypassed => Ok(()),
		}
	}
}
impl BatchProcessor for BatchAdmissionGate {
	fn process_batch(&self, context: &LimiterContext, batch: &mut Batch) -> Result<()> {
		self.admit(context, batch).map_err(Error::from)
	}
}

/// Admits or rejects `batch` using a [`BatchAdmissionGate`].
pub fn admit(context: &LimiterContext, batch: &Batch) -> Result<(), RateLimitExceeded> {
	BatchAdmissionGate.admit(context, batch)
}
