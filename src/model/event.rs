//! Event variants carried inside a [`Batch`](crate::model::Batch).

// std
use std::collections::BTreeMap;
// self
use crate::_prelude::*;

/// One unit of telemetry data.
///
/// Serializes externally tagged, e.g. `{"transaction": {...}}`, mirroring the one-object-per-line
/// shape of event intake payloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
	/// Top-level unit of work, such as an incoming request.
	Transaction(Transaction),
	/// Operation nested inside a transaction.
	Span(Span),
	/// Captured error or exception.
	Error(ErrorEvent),
	/// Set of metric samples sharing a timestamp.
	Metricset(Metricset),
	/// Free-form log record.
	Log(Log),
}
impl Event {
	/// Variant discriminator.
	pub const fn kind(&self) -> EventKind {
		match self {
			Event::Transaction(_) => EventKind::Transaction,
			Event::Span(_) => EventKind::Span,
			Event::Error(_) => EventKind::Error,
			Event::Metricset(_) => EventKind::Metricset,
			Event::Log(_) => EventKind::Log,
		}
	}
}
impl From<Transaction> for Event {
	fn from(value: Transaction) -> Self {
		Self::Transaction(value)
	}
}
impl From<Span> for Event {
	fn from(value: Span) -> Self {
		Self::Span(value)
	}
}
impl From<ErrorEvent> for Event {
	fn from(value: ErrorEvent) -> Self {
		Self::Error(value)
	}
}
impl From<Metricset> for Event {
	fn from(value: Metricset) -> Self {
		Self::Metricset(value)
	}
}
impl From<Log> for Event {
	fn from(value: Log) -> Self {
		Self::Log(value)
	}
}

/// Event variant labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// [`Event::Transaction`].
	Transaction,
	/// [`Event::Span`].
	Span,
	/// [`Event::Error`].
	Error,
	/// [`Event::Metricset`].
	Metricset,
	/// [`Event::Log`].
	Log,
}
impl EventKind {
	/// Every kind, in declaration order.
	pub const ALL: [EventKind; 5] = [
		EventKind::Transaction,
		EventKind::Span,
		EventKind::Error,
		EventKind::Metricset,
		EventKind::Log,
	];

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			EventKind::Transaction => "transaction",
			EventKind::Span => "span",
			EventKind::Error => "error",
			EventKind::Metricset => "metricset",
			EventKind::Log => "log",
		}
	}
}
impl Display for EventKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Transaction payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
	/// Transaction identifier.
	pub id: String,
	/// Trace the transaction belongs to.
	pub trace_id: String,
	/// Logical name, e.g. the route.
	pub name: String,
	/// Transaction type, e.g. `request`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Duration in milliseconds.
	pub duration: f64,
}

/// Span payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
	/// Span identifier.
	pub id: String,
	/// Trace the span belongs to.
	pub trace_id: String,
	/// Parent span or transaction identifier.
	pub parent_id: String,
	/// Operation name.
	pub name: String,
	/// Duration in milliseconds.
	pub duration: f64,
}

/// Error payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorEvent {
	/// Error identifier.
	pub id: String,
	/// Trace the error was captured in, when known.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub trace_id: Option<String>,
	/// Human-readable error message.
	pub message: String,
	/// Code location that raised the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub culprit: Option<String>,
}

/// Metricset payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metricset {
	/// Sample timestamp in microseconds since the Unix epoch.
	pub timestamp: u64,
	/// Metric values keyed by name.
	pub samples: BTreeMap<String, f64>,
}

/// Log payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Log {
	/// Severity label.
	pub level: String,
	/// Log message.
	pub message: String,
}
