//! Bucket and rate-limit settings supplied by the embedding intake layer.

// self
use crate::{_prelude::*, error::ConfigError};

/// Largest capacity whose every integer balance is exactly representable as `f64`.
pub const MAX_CAPACITY: u64 = 1 << 53;

/// Parameters for a single [`TokenBucket`](crate::bucket::TokenBucket).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketConfig {
	/// Maximum number of tokens the bucket can hold (the burst size).
	pub capacity: u64,
	/// Tokens added per second of elapsed monotonic time.
	pub refill_rate_per_second: f64,
}
impl BucketConfig {
	/// Burst multiplier applied by [`from_event_limit`](Self::from_event_limit).
	pub const BURST_MULTIPLIER: u64 = 3;

	/// Creates a config from an explicit capacity and refill rate.
	pub const fn new(capacity: u64, refill_rate_per_second: f64) -> Self {
		Self { capacity, refill_rate_per_second }
	}

	/// Derives a bucket that sustains `event_limit` events per second and bursts up to
	/// [`BURST_MULTIPLIER`](Self::BURST_MULTIPLIER) times that.
	pub fn from_event_limit(event_limit: u64) -> Self {
		Self {
			capacity: event_limit.saturating_mul(Self::BURST_MULTIPLIER),
			refill_rate_per_second: event_limit as f64,
		}
	}

	/// Checks the parameters before a bucket is built from them.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let rate = self.refill_rate_per_second;

		if !rate.is_finite() || rate < 0.0 {
			return Err(ConfigError::InvalidRefillRate { rate });
		}
		if self.capacity > MAX_CAPACITY {
			return Err(ConfigError::CapacityOutOfRange {
				capacity: self.capacity,
				max: MAX_CAPACITY,
			});
		}

		Ok(())
	}

	/// Parses and validates a JSON payload.
	pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
		let config: Self = parse_json(payload)?;

		config.validate()?;

		Ok(config)
	}
}

/// Per-client rate limiting settings for intake layers that pool buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitConfig {
	/// Sustained events per second allowed for each client.
	pub event_limit: u64,
	/// Maximum number of distinct clients tracked at once.
	pub ip_limit: usize,
}
impl RateLimitConfig {
	const DEFAULT_EVENT_LIMIT: u64 = 300;
	const DEFAULT_IP_LIMIT: usize = 1000;

	/// Bucket parameters applied to every client.
	pub fn bucket_config(&self) -> BucketConfig {
		BucketConfig::from_event_limit(self.event_limit)
	}

	/// Checks the derived bucket parameters and the client limit.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.ip_limit == 0 {
			return Err(ConfigError::InvalidClientLimit);
		}

		self.bucket_config().validate()
	}

	/// Parses and validates a JSON payload; omitted fields take their defaults.
	pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
		let config: Self = parse_json(payload)?;

		config.validate()?;

		Ok(config)
	}
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self { event_limit: Self::DEFAULT_EVENT_LIMIT, ip_limit: Self::DEFAULT_IP_LIMIT }
	}
}

fn parse_json<T>(payload: &str) -> Result<T, ConfigError>
where
	T: for<'de> Deserialize<'de>,
{
	let mut de = serde_json::Deserializer::from_str(payload);

	serde_path_to_error::deserialize(&mut de).map_err(|source| ConfigError::Parse { source })
}
