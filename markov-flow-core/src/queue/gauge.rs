use log::info;

use super::BoundedQueue;
use crate::error::QueueError;

/// Wraps a queue backend with an occupancy counter and two static
/// thresholds.
///
/// The counter is seeded once from the backend's length at construction
/// time and afterwards maintained locally: incremented on a successful
/// push, decremented on a successful pop. It is a cache of the remote
/// length, never re-synchronized, so it can drift from ground truth if
/// the backend is shared with other writers or readers — an accepted
/// caveat of this design, not silently corrected.
///
/// # Invariants
/// - `occupancy >= 0` (decrements are saturating)
/// - `low` and `full` are fixed for the lifetime of the gauge
#[derive(Debug)]
pub struct QueueGauge<Q: BoundedQueue> {
	queue: Q,
	occupancy: usize,
	low: usize,
	full: usize,
}

impl<Q: BoundedQueue> QueueGauge<Q> {
	/// Wraps `queue`, reading its current length once to seed the
	/// occupancy counter.
	///
	/// # Errors
	/// Fails if the initial length query fails; callers must treat this
	/// as a hard failure rather than proceeding without a queue.
	pub fn new(mut queue: Q, low: usize, full: usize) -> Result<Self, QueueError> {
		let occupancy = queue.len()?;
		info!("initialized queue gauge with occupancy {occupancy}");
		Ok(Self { queue, occupancy, low, full })
	}

	/// Current locally tracked occupancy.
	pub fn occupancy(&self) -> usize {
		self.occupancy
	}

	/// True when occupancy has reached the full threshold.
	pub fn is_full(&self) -> bool {
		self.occupancy >= self.full
	}

	/// True when occupancy has drained to the low threshold.
	pub fn is_low(&self) -> bool {
		self.occupancy <= self.low
	}

	/// Pushes one unit, counting it on success.
	pub fn push(&mut self, unit: &str) -> Result<(), QueueError> {
		self.queue.push(unit)?;
		self.occupancy += 1;
		Ok(())
	}

	/// Forces the occupancy counter, simulating drift against the
	/// backend's ground truth.
	#[cfg(test)]
	pub(crate) fn set_occupancy(&mut self, occupancy: usize) {
		self.occupancy = occupancy;
	}

	/// Pops one unit, discounting it on success.
	pub fn pop(&mut self) -> Result<String, QueueError> {
		let unit = self.queue.pop()?;
		self.occupancy = self.occupancy.saturating_sub(1);
		Ok(unit)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::queue::MemoryQueue;

	#[test]
	fn seeds_occupancy_from_backend_length() {
		let queue = MemoryQueue::with_units(["a", "b"]);
		let gauge = QueueGauge::new(queue, 0, 4).unwrap();
		assert_eq!(gauge.occupancy(), 2);
	}

	#[test]
	fn push_and_pop_track_occupancy() {
		let mut gauge = QueueGauge::new(MemoryQueue::new(), 0, 4).unwrap();
		gauge.push("one").unwrap();
		gauge.push("two").unwrap();
		assert_eq!(gauge.occupancy(), 2);

		assert_eq!(gauge.pop().unwrap(), "one");
		assert_eq!(gauge.occupancy(), 1);
	}

	#[test]
	fn failed_pop_leaves_occupancy_untouched() {
		let mut gauge = QueueGauge::new(MemoryQueue::new(), 0, 4).unwrap();
		assert!(gauge.pop().is_err());
		assert_eq!(gauge.occupancy(), 0);
	}

	#[test]
	fn thresholds_are_inclusive() {
		let queue = MemoryQueue::with_units(["a", "b", "c"]);
		let gauge = QueueGauge::new(queue, 3, 3).unwrap();
		assert!(gauge.is_low());
		assert!(gauge.is_full());
	}

	#[test]
	fn fifo_round_trip_through_the_gauge() {
		let mut gauge = QueueGauge::new(MemoryQueue::new(), 0, 100).unwrap();
		let lines: Vec<String> = (0..10).map(|n| format!("line {n}")).collect();

		for line in &lines {
			gauge.push(line).unwrap();
		}
		for line in &lines {
			assert_eq!(&gauge.pop().unwrap(), line);
		}
	}
}
