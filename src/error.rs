//! Gate-level error types shared across buckets, configuration, and the admission gate.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The batch was rejected by the rate budget.
	#[error(transparent)]
	RateLimited(#[from] RateLimitExceeded),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Client key failed validation.
	#[error(transparent)]
	Identifier(#[from] crate::id::IdentifierError),
}

/// Signal returned when a batch's cost cannot be withdrawn from its bucket.
///
/// The whole batch is rejected and the bucket balance is left untouched. Callers translate
/// this into a throttling response for the originating client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ThisError)]
#[error("Rate limit exceeded; a batch of {cost} events was rejected.")]
pub struct RateLimitExceeded {
	/// Number of tokens the rejected batch requested.
	pub cost: u64,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Refill rate must be finite and non-negative.
	#[error("Refill rate must be finite and non-negative, got {rate}.")]
	InvalidRefillRate {
		/// Rejected rate in tokens per second.
		rate: f64,
	},
	/// Capacity cannot be represented exactly as a token balance.
	#[error("Bucket capacity {capacity} exceeds the supported maximum of {max}.")]
	CapacityOutOfRange {
		/// Rejected capacity.
		capacity: u64,
		/// Largest supported capacity.
		max: u64,
	},
	/// The registry must be able to hold at least one client.
	#[error("The client limit must be greater than zero.")]
	InvalidClientLimit,
	/// Configuration payload could not be parsed.
	#[error("Configuration payload is malformed.")]
	Parse {
		/// Structured parsing failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;

	#[test]
	fn rate_limit_exceeded_converts_transparently() {
		let rejection = RateLimitExceeded { cost: 7 };
		let error: Error = rejection.into();

		assert!(matches!(error, Error::RateLimited(RateLimitExceeded { cost: 7 })));
		assert_eq!(error.to_string(), rejection.to_string());
		assert!(error.to_string().contains("7 events"));
	}

	#[test]
	fn config_error_keeps_parse_source() {
		let mut de = serde_json::Deserializer::from_str("{\"capacity\": \"ten\"}");
		let source = serde_path_to_error::deserialize::<_, crate::config::BucketConfig>(&mut de)
			.expect_err("String capacity should fail to deserialize.");
		let error: Error = ConfigError::Parse { source }.into();
		let source = StdError::source(&error)
			.expect("Parse error should expose the path-aware failure as its source.");

		assert!(source.to_string().starts_with("capacity"));
	}
}
