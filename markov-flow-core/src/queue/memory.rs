use std::collections::VecDeque;

use super::BoundedQueue;
use crate::error::QueueError;

/// An in-process FIFO backend.
///
/// Used by tests and by callers that want the flow-control protocol
/// without a remote store. Storage itself is unbounded; boundedness is
/// enforced by the thresholds of the wrapping `QueueGauge`.
#[derive(Debug, Default)]
pub struct MemoryQueue {
	units: VecDeque<String>,
}

impl MemoryQueue {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a queue pre-filled with `units`, head first.
	pub fn with_units<I, S>(units: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { units: units.into_iter().map(Into::into).collect() }
	}
}

impl BoundedQueue for MemoryQueue {
	fn push(&mut self, unit: &str) -> Result<(), QueueError> {
		self.units.push_back(unit.to_owned());
		Ok(())
	}

	fn pop(&mut self) -> Result<String, QueueError> {
		self.units.pop_front().ok_or(QueueError::Empty)
	}

	fn len(&mut self) -> Result<usize, QueueError> {
		Ok(self.units.len())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fifo_order_is_preserved() {
		let mut queue = MemoryQueue::new();
		queue.push("first").unwrap();
		queue.push("second").unwrap();

		assert_eq!(queue.pop().unwrap(), "first");
		assert_eq!(queue.pop().unwrap(), "second");
	}

	#[test]
	fn pop_on_empty_is_an_error() {
		let mut queue = MemoryQueue::new();
		assert!(matches!(queue.pop(), Err(QueueError::Empty)));
	}

	#[test]
	fn prefilled_queue_reports_its_length() {
		let mut queue = MemoryQueue::with_units(["a", "b", "c"]);
		assert_eq!(queue.len().unwrap(), 3);
	}
}
