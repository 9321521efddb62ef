//! Token-bucket admission gate for telemetry event batches: shared per-client budgets,
//! fail-fast rejection, and opt-in observability in one small crate.
//!
//! The intake layer attaches a [`TokenBucket`](bucket::TokenBucket) to a
//! [`LimiterContext`](context::LimiterContext) once per client or session; every batch then
//! passes through [`BatchAdmissionGate::admit`](gate::BatchAdmissionGate::admit), which
//! withdraws one token per event or rejects the whole batch.
//!
//! ```
//! use std::sync::Arc;
//!
//! use ingest_gate::{
//! 	bucket::TokenBucket,
//! 	config::BucketConfig,
//! 	context::LimiterContext,
//! 	error::RateLimitExceeded,
//! 	gate::BatchAdmissionGate,
//! 	model::{Batch, Event, Transaction},
//! };
//!
//! let bucket = Arc::new(TokenBucket::new(BucketConfig::new(10, 1.0)).unwrap());
//! let context = LimiterContext::new().with_limiter(&bucket);
//! let batch = Batch::from_iter((0..5).map(|_| Event::from(Transaction::default())));
//! let gate = BatchAdmissionGate;
//!
//! assert!(gate.admit(&context, &batch).is_ok());
//! assert!(gate.admit(&context, &batch).is_ok());
//! assert_eq!(gate.admit(&context, &batch), Err(RateLimitExceeded { cost: 5 }));
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod bucket;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod id;
pub mod model;
pub mod obs;
pub mod registry;

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		sync::{Arc, Weak},
		time::{Duration, Instant},
	};

	pub use parking_lot::Mutex;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;

	pub use crate::error::{Error, Result};
}

pub use bucket::TokenBucket;
pub use context::{LimiterContext, attach, lookup};
pub use error::RateLimitExceeded;
pub use gate::{BatchAdmissionGate, BatchProcessor, admit};
#[cfg(test)] use {color_eyre as _, tokio as _, tracing_subscriber as _};
