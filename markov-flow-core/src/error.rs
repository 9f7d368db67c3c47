use std::io;

/// Failure modes of the bounded-queue adapters and the pipeline that
/// drives them.
///
/// Steady-state push/pop failures are forwarded on the pipeline output
/// channel as `Err` values rather than being folded into the data
/// stream, so consumers can tell a generated line from a fault.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
	/// The transport to the queue backend failed.
	#[error("queue i/o failed: {0}")]
	Io(#[from] io::Error),

	/// A pop was attempted on an empty queue.
	#[error("queue is empty")]
	Empty,

	/// The backend replied with something the adapter cannot parse.
	#[error("unexpected reply from queue backend: {0}")]
	Protocol(String),

	/// The backend reported an error of its own.
	#[error("queue backend error: {0}")]
	Backend(String),
}
