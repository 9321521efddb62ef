//! Ordered event batches and their admission cost.

// std
use std::{slice::Iter, vec::IntoIter};
// self
use crate::{
	_prelude::*,
	model::{Event, EventKind},
};

/// Ordered group of events submitted together for ingestion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
	events: Vec<Event>,
}
impl Batch {
	/// Creates an empty batch.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an event, preserving order.
	pub fn push(&mut self, event: impl Into<Event>) {
		self.events.push(event.into());
	}

	/// Number of events in the batch.
	pub fn len(&self) -> usize {
		self.events.len()
	}

	/// Returns true if the batch holds no events.
	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	/// Admission cost: one token per event, whatever its kind.
	pub fn cost(&self) -> u64 {
		self.events.len() as u64
	}

	/// Number of events of the given kind.
	pub fn count(&self, kind: EventKind) -> usize {
		self.events.iter().filter(|event| event.kind() == kind).count()
	}

	/// Iterator over events in submission order.
	pub fn iter(&self) -> Iter<'_, Event> {
		self.events.iter()
	}
}
impl From<Vec<Event>> for Batch {
	fn from(events: Vec<Event>) -> Self {
		Self { events }
	}
}
impl FromIterator<Event> for Batch {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = Event>,
	{
		Self { events: iter.into_iter().collect() }
	}
}
impl Extend<Event> for Batch {
	fn extend<I>(&mut self, iter: I)
	where
		I: IntoIterator<Item = Event>,
	{
		self.events.extend(iter);
	}
}
impl IntoIterator for Batch {
	type IntoIter = IntoIter<Event>;
	type Item = Event;

	fn into_iter(self) -> Self::IntoIter {
		self.events.into_iter()
	}
}
impl<'a> IntoIterator for &'a Batch {
	type IntoIter = Iter<'a, Event>;
	type Item = &'a Event;

	fn into_iter(self) -> Self::IntoIter {
		self.events.iter()
	}
}
