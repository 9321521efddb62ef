// self
#[cfg(feature = "metrics")] use crate::model::EventKind;
use crate::{model::Batch, obs::AdmissionOutcome};

/// Records an admission outcome via the global metrics recorder (when enabled).
pub fn record_admission(outcome: AdmissionOutcome, batch: &Batch) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("ingest_gate_admission_total", "outcome" => outcome.as_str())
			.increment(1);

		for kind in EventKind::ALL {
			let count = batch.count(kind);

			if count == 0 {
				continue;
			}

			metrics::counter!(
				"ingest_gate_admission_events_total",
				"outcome" => outcome.as_str(),
				"kind" => kind.as_str(),
			)
			.increment(count as u64);
		}
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (outcome, batch);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::model::{Event, Log, Span};

	fn mixed_batch() -> Batch {
		Batch::from(vec![
			Event::from(Span::default()),
			Event::from(Log::default()),
			Event::from(Span::default()),
		])
	}

	#[test]
	fn record_admission_noop_without_recorder() {
		record_admission(AdmissionOutcome::Rejected, &mixed_batch());
	}

	#[cfg(feature = "metrics")]
	mod capture {
		// crates.io
		use metrics::{
			Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString,
			Unit,
		};
		// self
		use crate::_prelude::*;

		type Sink = Arc<Mutex<HashMap<String, u64>>>;

		/// Recorder that sums counter increments per rendered key.
		#[derive(Debug, Default)]
		pub(super) struct CaptureRecorder {
			counters: Sink,
		}
		impl CaptureRecorder {
			pub(super) fn counter(&self, key: &str) -> u64 {
				self.counters.lock().get(key).copied().unwrap_or_default()
			}

			pub(super) fn keys(&self) -> usize {
				self.counters.lock().len()
			}
		}
		impl Recorder for CaptureRecorder {
			fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
				let labels = key
					.labels()
					.map(|label| format!("{}={}", label.key(), label.value()))
					.collect::<Vec<_>>()
					.join(",");
				let rendered = format!("{}{{{labels}}}", key.name());

				Counter::from_arc(Arc::new(CaptureCounter {
					key: rendered,
					counters: self.counters.clone(),
				}))
			}

			fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
				Gauge::noop()
			}

			fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
				Histogram::noop()
			}
		}

		struct CaptureCounter {
			key: String,
			counters: Sink,
		}
		impl CounterFn for CaptureCounter {
			fn increment(&self, value: u64) {
				*self.counters.lock().entry(self.key.clone()).or_default() += value;
			}

			fn absolute(&self, value: u64) {
				self.counters.lock().insert(self.key.clone(), value);
			}
		}
	}

	#[cfg(feature = "metrics")]
	#[test]
	fn record_admission_labels_outcome_and_kind() {
		let recorder = capture::CaptureRecorder::default();

		metrics::with_local_recorder(&recorder, || {
			record_admission(AdmissionOutcome::Admitted, &mixed_batch());
			record_admission(AdmissionOutcome::Rejected, &mixed_batch());
			record_admission(AdmissionOutcome::Rejected, &Batch::new());
		});

		assert_eq!(recorder.counter("ingest_gate_admission_total{outcome=admitted}"), 1);
		assert_eq!(recorder.counter("ingest_gate_admission_total{outcome=rejected}"), 2);
		assert_eq!(
			recorder.counter("ingest_gate_admission_events_total{outcome=admitted,kind=span}"),
			2
		);
		assert_eq!(
			recorder.counter("ingest_gate_admission_events_total{outcome=rejected,kind=log}"),
			1
		);
		// Kinds absent from a batch are not emitted.
		assert_eq!(recorder.keys(), 6);
	}
}
