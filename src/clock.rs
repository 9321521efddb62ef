//! Monotonic time sources used for bucket refills.
//!
//! Buckets never read wall-clock time. [`MonotonicClock`] backs production buckets and
//! [`ManualClock`] lets tests move time explicitly instead of sleeping.

// self
use crate::_prelude::*;

/// Port for obtaining the current monotonic instant.
pub trait Clock
where
	Self: Send + Sync + Debug,
{
	/// Returns the current instant.
	fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;
impl Clock for MonotonicClock {
	fn now(&self) -> Instant {
		Instant::now()
	}
}

/// Controllable clock for deterministic refill tests.
///
/// Clones share the same underlying instant, so advancing one clone advances all of them.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<Instant>>);
impl ManualClock {
	/// Creates a clock frozen at `start`.
	pub fn new(start: Instant) -> Self {
		Self(Arc::new(Mutex::new(start)))
	}

	/// Moves the clock forward by `duration`.
	pub fn advance(&self, duration: Duration) {
		*self.0.lock() += duration;
	}

	/// Pins the clock to `instant`, which may lie before the current reading.
	pub fn set(&self, instant: Instant) {
		*self.0.lock() = instant;
	}
}
impl Default for ManualClock {
	fn default() -> Self {
		Self::new(Instant::now())
	}
}
impl Clock for ManualClock {
	fn now(&self) -> Instant {
		*self.0.lock()
	}
}
