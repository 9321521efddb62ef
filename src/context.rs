//! Request-scoped carrier that associates a rate budget with an in-flight request.
//!
//! A [`LimiterContext`] holds a weak reference to a [`TokenBucket`]: the bucket's owner (the
//! intake layer, or a [`BucketRegistry`](crate::registry::BucketRegistry)) decides how long it
//! lives. Deriving a context never mutates the original, so a base context can be shared and
//! specialized per request.

// self
use crate::{_prelude::*, bucket::TokenBucket, id::ClientKey};

/// Immutable per-request bag of limiter associations.
#[derive(Clone, Debug, Default)]
pub struct LimiterContext {
	limiter: Option<Weak<TokenBucket>>,
	client: Option<ClientKey>,
}
impl LimiterContext {
	/// Creates a context with no bucket and no client label.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a derived context carrying a weak association with `bucket`.
	pub fn with_limiter(&self, bucket: &Arc<TokenBucket>) -> Self {
		Self { limiter: Some(Arc::downgrade(bucket)), ..self.clone() }
	}

	/// Returns a derived context labeled with `client`.
	pub fn with_client(&self, client: ClientKey) -> Self {
		Self { client: Some(client), ..self.clone() }
	}

	/// Resolves the associated bucket.
	///
	/// Returns `None` when nothing was attached or when every strong handle to the bucket has
	/// been dropped.
	pub fn limiter(&self) -> Option<Arc<TokenBucket>> {
		self.limiter.as_ref().and_then(Weak::upgrade)
	}

	/// Client label attached to the request, if any.
	pub fn client(&self) -> Option<&ClientKey> {
		self.client.as_ref()
	}
}

/// Derives a context from `context` that carries `bucket`.
pub fn attach(context: &LimiterContext, bucket: &Arc<TokenBucket>) -> LimiterContext {
	context.with_limiter(bucket)
}

/// Returns the bucket associated with `context`, if any.
pub fn lookup(context: &LimiterContext) -> Option<Arc<TokenBucket>> {
	context.limiter()
}
