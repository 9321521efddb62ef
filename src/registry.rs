//! Thread-safe per-client bucket pool for intake layers that key budgets by client.
//!
//! The registry owns one strong handle per client and evicts the least recently seen client
//! once `ip_limit` is reached. Contexts only carry weak references, so a bucket survives
//! eviction exactly as long as some session still holds the handle returned by
//! [`BucketRegistry::bucket`] or [`BucketRegistry::attach`].

// self
use crate::{
	_prelude::*,
	bucket::TokenBucket,
	clock::{Clock, MonotonicClock},
	config::{BucketConfig, RateLimitConfig},
	context::LimiterContext,
	error::ConfigError,
	id::ClientKey,
};

type RegistryMap = HashMap<ClientKey, RegistryEntry>;

#[derive(Debug)]
struct RegistryEntry {
	bucket: Arc<TokenBucket>,
	last_seen: Instant,
}

/// Bounded map from client key to shared token bucket.
pub struct BucketRegistry {
	bucket_config: BucketConfig,
	max_clients: usize,
	clock: Arc<dyn Clock>,
	entries: Mutex<RegistryMap>,
}
impl BucketRegistry {
	/// Creates a registry driven by the monotonic system clock.
	pub fn new(config: &RateLimitConfig) -> Result<Self, ConfigError> {
		Self::with_clock(config, Arc::new(MonotonicClock))
	}

	/// Creates a registry whose buckets and idle tracking use `clock`.
	pub fn with_clock(
		config: &RateLimitConfig,
		clock: Arc<dyn Clock>,
	) -> Result<Self, ConfigError> {
		config.validate()?;

		Ok(Self {
			bucket_config: config.bucket_config(),
			max_clients: config.ip_limit,
			clock,
			entries: Mutex::new(HashMap::new()),
		})
	}

	/// Parameters applied to every newly created bucket.
	pub fn bucket_config(&self) -> BucketConfig {
		self.bucket_config
	}

	/// Maximum number of clients tracked at once.
	pub fn max_clients(&self) -> usize {
		self.max_clients
	}

	/// Returns the bucket for `key`, creating a full one on first sight.
	pub fn bucket(&self, key: &ClientKey) -> Arc<TokenBucket> {
		let now = self.clock.now();
		let mut entries = self.entries.lock();

		if let Some(entry) = entries.get_mut(key) {
			entry.last_seen = now;

			return entry.bucket.clone();
		}
		if entries.len() >= self.max_clients {
			Self::evict_least_recent(&mut entries);
		}

		let bucket = Arc::new(TokenBucket::prevalidated(self.bucket_config, self.clock.clone()));

		entries.insert(key.clone(), RegistryEntry { bucket: bucket.clone(), last_seen: now });

		bucket
	}

	/// Derives a context bound to `key`'s bucket.
	///
	/// The returned handle must be held for as long as the session should stay rate limited;
	/// the context alone does not keep the bucket alive.
	pub fn attach(
		&self,
		context: &LimiterContext,
		key: &ClientKey,
	) -> (LimiterContext, Arc<TokenBucket>) {
		let bucket = self.bucket(key);
		let context = context.with_client(key.clone()).with_limiter(&bucket);

		(context, bucket)
	}

	/// Drops the registry's handle for `key`; returns whether an entry existed.
	pub fn remove(&self, key: &ClientKey) -> bool {
		self.entries.lock().remove(key).is_some()
	}

	/// Evicts clients unseen for at least `max_idle`; returns how many were evicted.
	pub fn evict_idle(&self, max_idle: Duration) -> usize {
		let now = self.clock.now();
		let mut entries = self.entries.lock();
		let before = entries.len();

		entries.retain(|_, entry| now.saturating_duration_since(entry.last_seen) < max_idle);

		before - entries.len()
	}

	/// Number of tracked clients.
	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	/// Returns true if no client is tracked.
	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}

	fn evict_least_recent(entries: &mut RegistryMap) {
		let victim = entries
			.iter()
			.min_by_key(|(_, entry)| entry.last_seen)
			.map(|(key, _)| key.clone());

		if let Some(key) = victim {
			entries.remove(&key);
		}
	}
}
impl Debug for BucketRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BucketRegistry")
			.field("bucket_config", &self.bucket_config)
			.field("max_clients", &self.max_clients)
			.field("clients", &self.len())
			.finish()
	}
}
