//! Thread-safe token bucket shared by every batch of a client.
//!
//! The bucket refills lazily: each withdrawal first credits the tokens accrued since the last
//! refill (capped at capacity), then either subtracts the full cost or leaves the balance
//! untouched. Both steps run under one lock, so concurrent withdrawals behave as if they ran
//! in some serial order.
//!
//! Whole tokens are kept as integers. Accrual is always measured from the instant the bucket
//! was last full, so the credited amount depends only on elapsed time and never on how often
//! the bucket was polled in between.

// self
use crate::{
	_prelude::*,
	clock::{Clock, MonotonicClock},
	config::BucketConfig,
	error::ConfigError,
};

/// Capacity-bounded token balance with continuous refill.
pub struct TokenBucket {
	capacity: u64,
	refill_rate_per_second: f64,
	clock: Arc<dyn Clock>,
	state: Mutex<BucketState>,
}
impl TokenBucket {
	/// Creates a full bucket driven by the monotonic system clock.
	pub fn new(config: BucketConfig) -> Result<Self, ConfigError> {
		Self::with_clock(config, Arc::new(MonotonicClock))
	}

	/// Creates a full bucket driven by the provided clock.
	pub fn with_clock(config: BucketConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
		config.validate()?;

		Ok(Self::prevalidated(config, clock))
	}

	pub(crate) fn prevalidated(config: BucketConfig, clock: Arc<dyn Clock>) -> Self {
		let state = BucketState::full(config.capacity, clock.now());

		Self {
			capacity: config.capacity,
			refill_rate_per_second: config.refill_rate_per_second,
			clock,
			state: Mutex::new(state),
		}
	}

	/// Maximum number of tokens the bucket holds.
	pub fn capacity(&self) -> u64 {
		self.capacity
	}

	/// Tokens credited per second of elapsed time.
	pub fn refill_rate_per_second(&self) -> f64 {
		self.refill_rate_per_second
	}

	/// Returns the balance as of now, including pending refill, without mutating the bucket.
	pub fn tokens_available(&self) -> f64 {
		let now = self.clock.now();
		let state = self.state.lock().refilled(now, self.capacity, self.refill_rate_per_second);
		let pending = state.pending(now, self.refill_rate_per_second);

		(state.tokens as f64 + pending).min(self.capacity as f64)
	}

	/// Attempts to withdraw `n` tokens at once.
	///
	/// Returns `true` and subtracts exactly `n` when the refilled balance covers the cost.
	/// Returns `false` and keeps the balance otherwise. Requests of zero tokens always succeed
	/// and requests above capacity always fail, neither touching the bucket.
	pub fn try_withdraw(&self, n: u64) -> bool {
		if n == 0 {
			return true;
		}
		if n > self.capacity {
			return false;
		}

		let now = self.clock.now();
		let mut state = self.state.lock();

		*state = state.refilled(now, self.capacity, self.refill_rate_per_second);

		if state.tokens < n {
			return false;
		}

		state.tokens -= n;

		true
	}
}
impl Debug for TokenBucket {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenBucket")
			.field("capacity", &self.capacity)
			.field("refill_rate_per_second", &self.refill_rate_per_second)
			.field("tokens_available", &self.tokens_available())
			.finish()
	}
}

#[derive(Clone, Copy, Debug)]
struct BucketState {
	// Whole tokens on hand.
	tokens: u64,
	// Whole tokens credited since `anchor`.
	credited: u64,
	// Last instant the bucket was observed full.
	anchor: Instant,
}
impl BucketState {
	fn full(capacity: u64, at: Instant) -> Self {
		Self { tokens: capacity, credited: 0, anchor: at }
	}

	// Readings earlier than `anchor` accrue nothing.
	fn accrued(&self, now: Instant, rate: f64) -> f64 {
		now.saturating_duration_since(self.anchor).as_secs_f64() * rate
	}

	// Accrual not yet credited as whole tokens.
	fn pending(&self, now: Instant, rate: f64) -> f64 {
		(self.accrued(now, rate) - self.credited as f64).max(0.0)
	}

	fn refilled(self, now: Instant, capacity: u64, rate: f64) -> Self {
		if self.tokens as f64 + self.pending(now, rate) >= capacity as f64 {
			return Self::full(capacity, now.max(self.anchor));
		}

		// Float-to-int casts saturate, and `credited` never moves backwards.
		let credited = (self.accrued(now, rate).floor() as u64).max(self.credited);
		let tokens = self.tokens.saturating_add(credited - self.credited).min(capacity);

		Self { tokens, credited, anchor: self.anchor }
	}
}
