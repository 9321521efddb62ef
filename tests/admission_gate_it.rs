// std
use std::{
	sync::Arc,
	time::{Duration, Instant},
};
// self
use ingest_gate::{
	bucket::TokenBucket,
	clock::ManualClock,
	config::BucketConfig,
	context::{self, LimiterContext},
	error::{Error, RateLimitExceeded},
	gate::{self, BatchAdmissionGate, BatchProcessor},
	model::{Batch, ErrorEvent, Event, Span, Transaction},
};

fn transactions(count: usize) -> Batch {
	(0..count).map(|_| Event::from(Transaction::default())).collect()
}

fn manual_bucket(capacity: u64, rate: f64) -> (Arc<TokenBucket>, ManualClock) {
	let clock = ManualClock::new(Instant::now());
	let bucket =
		TokenBucket::with_clock(BucketConfig::new(capacity, rate), Arc::new(clock.clone()))
			.expect("Bucket fixture should be valid.");

	(Arc::new(bucket), clock)
}

#[test]
fn burst_is_exhausted_by_two_batches() {
	let bucket = Arc::new(
		TokenBucket::new(BucketConfig::new(10, 1.0)).expect("Bucket fixture should be valid."),
	);
	let context = context::attach(&LimiterContext::new(), &bucket);
	let batch = transactions(5);

	for _ in 0..2 {
		gate::admit(&context, &batch).expect("Batches within the burst should be admitted.");
	}

	// The burst is spent and one token per second cannot cover another five immediately.
	assert_eq!(gate::admit(&context, &batch), Err(RateLimitExceeded { cost: 5 }));
}

#[test]
fn contexts_without_a_bucket_are_never_limited() {
	let context = LimiterContext::new();
	let mut batch = Batch::new();

	for _ in 0..1_000 {
		batch.push(Span::default());
	}

	for _ in 0..10 {
		BatchAdmissionGate
			.admit(&context, &batch)
			.expect("Bypassed contexts should admit every batch.");
	}
}

#[test]
fn denied_batch_is_admitted_after_refill() {
	let (bucket, clock) = manual_bucket(10, 2.0);
	let context = LimiterContext::new().with_limiter(&bucket);
	let batch = transactions(6);

	gate::admit(&context, &batch).expect("First batch fits in the burst.");

	assert!(gate::admit(&context, &batch).is_err());
	assert_eq!(bucket.tokens_available(), 4.0);

	clock.advance(Duration::from_millis(999));

	assert!(gate::admit(&context, &batch).is_err());

	clock.advance(Duration::from_millis(1));

	gate::admit(&context, &batch).expect("One second at two tokens per second covers the gap.");

	assert_eq!(bucket.tokens_available(), 0.0);
}

#[test]
fn retries_while_denied_do_not_delay_admission() {
	let (bucket, clock) = manual_bucket(10, 0.3);
	let context = LimiterContext::new().with_limiter(&bucket);

	gate::admit(&context, &transactions(10)).expect("Full burst should be admitted.");

	for _ in 0..9 {
		clock.advance(Duration::from_secs(1));

		assert_eq!(gate::admit(&context, &transactions(3)), Err(RateLimitExceeded { cost: 3 }));
	}

	clock.advance(Duration::from_secs(1));

	gate::admit(&context, &transactions(3)).expect("Ten seconds at 0.3/s cover three events.");
}

#[test]
fn balance_stays_within_bounds() {
	let (bucket, clock) = manual_bucket(8, 3.0);
	let context = LimiterContext::new().with_limiter(&bucket);

	for step in 0..200_usize {
		let _ = gate::admit(&context, &transactions(step % 5));

		if step % 3 == 0 {
			clock.advance(Duration::from_millis(250));
		}

		let available = bucket.tokens_available();

		assert!((0.0..=8.0).contains(&available), "balance {available} escaped its bounds");
	}
}

#[test]
fn processor_chain_stops_at_rejection() {
	let (bucket, _) = manual_bucket(2, 0.0);
	let context = LimiterContext::new().with_limiter(&bucket);
	let stages: Vec<Box<dyn BatchProcessor>> = vec![Box::new(BatchAdmissionGate)];
	let mut batch = Batch::from(vec![
		Event::from(ErrorEvent { message: "boom".into(), ..Default::default() }),
		Event::from(Span::default()),
		Event::from(Span::default()),
	]);
	let result = stages.iter().try_for_each(|stage| stage.process_batch(&context, &mut batch));

	assert!(matches!(result, Err(Error::RateLimited(RateLimitExceeded { cost: 3 }))));
	assert_eq!(batch.len(), 3);
	assert_eq!(bucket.tokens_available(), 2.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_capacity_exactly() {
	const CALLERS: u64 = 128;

	let (bucket, _) = manual_bucket(CALLERS, 0.0);
	let context = Arc::new(LimiterContext::new().with_limiter(&bucket));
	let tasks = (0..CALLERS)
		.map(|_| {
			let context = context.clone();

			tokio::spawn(async move { gate::admit(&context, &transactions(1)).is_ok() })
		})
		.collect::<Vec<_>>();
	let mut granted = 0;

	for task in tasks {
		if task.await.expect("Admission task should not panic.") {
			granted += 1;
		}
	}

	assert_eq!(granted, CALLERS);
	assert_eq!(gate::admit(&context, &transactions(1)), Err(RateLimitExceeded { cost: 1 }));
	assert_eq!(bucket.tokens_available(), 0.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn oversubscribed_callers_never_overdraw() {
	const CAPACITY: u64 = 50;
	const CALLERS: usize = 200;

	let (bucket, _) = manual_bucket(CAPACITY, 0.0);
	let context = Arc::new(LimiterContext::new().with_limiter(&bucket));
	let tasks = (0..CALLERS)
		.map(|i| {
			let context = context.clone();
			let batch = transactions(1 + i % 2);

			tokio::spawn(async move {
				gate::admit(&context, &batch).map(|()| batch.cost()).unwrap_or_default()
			})
		})
		.collect::<Vec<_>>();
	let mut granted = 0;

	for task in tasks {
		granted += task.await.expect("Admission task should not panic.");
	}

	assert!(granted <= CAPACITY);
	assert_eq!(bucket.tokens_available(), (CAPACITY - granted) as f64);
	assert!(CAPACITY - granted <= 1, "only a single token can be stranded by cost-2 callers");
}
