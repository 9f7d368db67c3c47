//! Flow-controlled producer/consumer pipeline.
//!
//! Two long-running roles pace sentence generation against a bounded
//! queue's fill level. The producer pushes freshly generated lines while
//! the queue is below its full threshold; the consumer pops lines and
//! forwards them while the queue is above its low threshold. Each role
//! self-halts when it hits its own threshold and is woken again by the
//! peer over a shared signal channel.
//!
//! Channel topology, in order of priority inside each role's loop:
//! - **sync**: one shared channel carrying enable/disable signals, sent
//!   and received by both roles. Sends are non-blocking and lossy
//!   (capacity 2); a dropped wake signal is tolerable because Enable is
//!   idempotent and re-sent on every productive tick. A received
//!   Disable is deliberately a no-op: a role's own threshold check is
//!   authoritative for its state, so one role's self-halt broadcast
//!   cannot switch off a healthy peer.
//! - **control**: the shared cancellation channel; each role exits on
//!   its first control message, acknowledging on a shared ack channel.
//! - **default**: one unit of work, taken only while enabled. A
//!   disabled role blocks on {sync, control} instead of spinning.

use std::sync::{Arc, Mutex};

use crate::error::QueueError;
use crate::queue::{BoundedQueue, QueueGauge};

mod roles;

/// Pipeline orchestration (spawn, output, shutdown).
pub mod pipeline;

pub use pipeline::{DEFAULT_BATCH, Pipeline, PipelineConfig};

/// A unit forwarded by the consumer: a generated line, or the queue
/// failure that interrupted it. Errors travel the same channel as data
/// but stay discriminated.
pub type PipelineItem = Result<String, QueueError>;

/// Enable/disable broadcast shared by both roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SyncSignal {
	Enable,
	Disable,
}

/// The queue gauge both roles consult; occupancy is only ever mutated by
/// the role doing the push or pop, but reads cross threads, hence the
/// explicit lock.
pub(crate) type SharedGauge<Q> = Arc<Mutex<QueueGauge<Q>>>;

/// Locks the gauge, recovering the inner value if the peer panicked
/// while holding the lock.
pub(crate) fn lock_gauge<Q: BoundedQueue>(gauge: &SharedGauge<Q>) -> std::sync::MutexGuard<'_, QueueGauge<Q>> {
	match gauge.lock() {
		Ok(guard) => guard,
		Err(poisoned) => poisoned.into_inner(),
	}
}
