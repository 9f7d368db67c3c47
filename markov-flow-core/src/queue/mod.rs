//! Bounded-queue adapters.
//!
//! The pipeline treats its queue as an opaque remote FIFO of string
//! units: push to the tail, pop from the head, query the length. Two
//! backends are provided, an in-process `MemoryQueue` and a `RedisQueue`
//! speaking the list commands of a Redis-compatible store. `QueueGauge`
//! wraps either one with the occupancy counter and the static low/full
//! thresholds the flow controller paces against.

use crate::error::QueueError;

/// In-process FIFO backend.
pub mod memory;

/// Remote list-store backend (RESP protocol).
pub mod redis;

/// Occupancy-tracking wrapper with low/full thresholds.
pub mod gauge;

pub use gauge::QueueGauge;
pub use memory::MemoryQueue;
pub use redis::RedisQueue;

/// Default list key in the remote store.
pub const DEFAULT_QUEUE_KEY: &str = "markov";
/// Default low threshold: the consumer halts at or below this occupancy.
pub const MIN_STORED_STRINGS: usize = 1000;
/// Default full threshold: the producer halts at or above this occupancy.
pub const MAX_STORED_STRINGS: usize = 5000;

/// A bounded external FIFO of string units.
///
/// `pop` on an empty queue is an error (`QueueError::Empty`), matching
/// the remote store's nil reply; callers decide whether that is
/// exceptional. No operation is retried by the adapter.
pub trait BoundedQueue {
	/// Appends one unit to the tail of the queue.
	fn push(&mut self, unit: &str) -> Result<(), QueueError>;

	/// Removes and returns the unit at the head of the queue.
	fn pop(&mut self) -> Result<String, QueueError>;

	/// Queries the backend for the current queue length.
	fn len(&mut self) -> Result<usize, QueueError>;
}
