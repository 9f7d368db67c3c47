use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, select};
use log::debug;
use rand::rngs::StdRng;

use super::{PipelineItem, SharedGauge, SyncSignal, lock_gauge};
use crate::chain::generator::SentenceGenerator;
use crate::chain::model::ChainModel;
use crate::queue::BoundedQueue;

/// A flow-controlled role: some state plus one unit of work per tick.
pub(crate) trait Role {
	fn name(&self) -> &'static str;
	fn enabled(&self) -> bool;
	fn enable(&mut self);
	fn tick(&mut self);
}

/// Drives one role until cancellation.
///
/// While enabled, pending signals take priority over work and the
/// default arm runs one tick; while disabled, the loop blocks on
/// {sync, control} so a halted role costs no CPU. One acknowledgment is
/// sent before exiting on cancellation.
pub(crate) fn run_role<R: Role>(
	mut role: R,
	sync_rx: Receiver<SyncSignal>,
	control_rx: Receiver<()>,
	ack_tx: Sender<()>,
) {
	loop {
		if role.enabled() {
			select! {
				recv(sync_rx) -> signal => {
					let Ok(signal) = signal else { break };
					apply(&mut role, signal);
				}
				recv(control_rx) -> cancel => {
					if cancel.is_ok() {
						let _ = ack_tx.send(());
					}
					break;
				}
				default => role.tick(),
			}
		} else {
			select! {
				recv(sync_rx) -> signal => {
					let Ok(signal) = signal else { break };
					apply(&mut role, signal);
				}
				recv(control_rx) -> cancel => {
					if cancel.is_ok() {
						let _ = ack_tx.send(());
					}
					break;
				}
			}
		}
	}
	debug!("{} terminated", role.name());
}

fn apply<R: Role>(role: &mut R, signal: SyncSignal) {
	match signal {
		SyncSignal::Enable => role.enable(),
		// Self-halt is authoritative for a role's own state; the Disable
		// broadcast is information for the peer, not an order.
		SyncSignal::Disable => (),
	}
}

/// The producing role: keeps the queue topped up with generated lines.
pub(crate) struct Producer<Q: BoundedQueue> {
	queue: SharedGauge<Q>,
	model: Arc<ChainModel>,
	rng: StdRng,
	batch: usize,
	max_words: usize,
	sync_tx: Sender<SyncSignal>,
	out_tx: Sender<PipelineItem>,
	enabled: bool,
}

impl<Q: BoundedQueue> Producer<Q> {
	pub(crate) fn new(
		queue: SharedGauge<Q>,
		model: Arc<ChainModel>,
		rng: StdRng,
		batch: usize,
		max_words: usize,
		sync_tx: Sender<SyncSignal>,
		out_tx: Sender<PipelineItem>,
	) -> Self {
		Self { queue, model, rng, batch, max_words, sync_tx, out_tx, enabled: false }
	}
}

impl<Q: BoundedQueue> Role for Producer<Q> {
	fn name(&self) -> &'static str {
		"producer"
	}

	fn enabled(&self) -> bool {
		self.enabled
	}

	fn enable(&mut self) {
		self.enabled = true;
	}

	fn tick(&mut self) {
		let mut gauge = lock_gauge(&self.queue);

		// Anything above the low mark means the consumer has work.
		if !gauge.is_low() {
			let _ = self.sync_tx.try_send(SyncSignal::Enable);
		}
		if gauge.is_full() {
			self.enabled = false;
			let _ = self.sync_tx.try_send(SyncSignal::Disable);
			debug!("producer self-halted at occupancy {}", gauge.occupancy());
			return;
		}

		let generator = SentenceGenerator::new(&self.model);
		for _ in 0..self.batch {
			let line = generator.sentence(&mut self.rng, self.max_words);
			if let Err(err) = gauge.push(&line) {
				// Reported upward immediately, never retried.
				let _ = self.out_tx.send(Err(err));
				return;
			}
		}
	}
}

/// The consuming role: drains the queue into the output channel.
pub(crate) struct Consumer<Q: BoundedQueue> {
	queue: SharedGauge<Q>,
	sync_tx: Sender<SyncSignal>,
	out_tx: Sender<PipelineItem>,
	enabled: bool,
}

impl<Q: BoundedQueue> Consumer<Q> {
	pub(crate) fn new(
		queue: SharedGauge<Q>,
		sync_tx: Sender<SyncSignal>,
		out_tx: Sender<PipelineItem>,
	) -> Self {
		Self { queue, sync_tx, out_tx, enabled: false }
	}
}

impl<Q: BoundedQueue> Role for Consumer<Q> {
	fn name(&self) -> &'static str {
		"consumer"
	}

	fn enabled(&self) -> bool {
		self.enabled
	}

	fn enable(&mut self) {
		self.enabled = true;
	}

	fn tick(&mut self) {
		let mut gauge = lock_gauge(&self.queue);

		// Anything below the full mark means the producer has room.
		if !gauge.is_full() {
			let _ = self.sync_tx.try_send(SyncSignal::Enable);
		}
		if gauge.is_low() {
			self.enabled = false;
			let _ = self.sync_tx.try_send(SyncSignal::Disable);
			debug!("consumer self-halted at occupancy {}", gauge.occupancy());
			return;
		}

		let item = gauge.pop();
		drop(gauge);
		let _ = self.out_tx.send(item);
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{Arc, Mutex};

	use crossbeam_channel::{bounded, unbounded};
	use rand::SeedableRng;

	use super::*;
	use crate::chain::builder::ChainBuilder;
	use crate::chain::tokenizer::tokenize;
	use crate::queue::{MemoryQueue, QueueGauge};

	fn shared_gauge(units: usize, low: usize, full: usize) -> SharedGauge<MemoryQueue> {
		let queue = MemoryQueue::with_units((0..units).map(|n| format!("line {n}")));
		Arc::new(Mutex::new(QueueGauge::new(queue, low, full).unwrap()))
	}

	fn test_model() -> Arc<ChainModel> {
		let words = tokenize("a b a b a b a b");
		Arc::new(ChainBuilder::new(1).unwrap().workers(1).build(&words).unwrap())
	}

	fn producer(
		queue: SharedGauge<MemoryQueue>,
	) -> (Producer<MemoryQueue>, Receiver<SyncSignal>, Receiver<PipelineItem>) {
		let (sync_tx, sync_rx) = bounded(2);
		let (out_tx, out_rx) = unbounded();
		let rng = StdRng::seed_from_u64(17);
		let mut role = Producer::new(queue, test_model(), rng, 3, 4, sync_tx, out_tx);
		role.enable();
		(role, sync_rx, out_rx)
	}

	fn consumer(
		queue: SharedGauge<MemoryQueue>,
	) -> (Consumer<MemoryQueue>, Receiver<SyncSignal>, Receiver<PipelineItem>) {
		let (sync_tx, sync_rx) = bounded(2);
		let (out_tx, out_rx) = unbounded();
		let mut role = Consumer::new(queue, sync_tx, out_tx);
		role.enable();
		(role, sync_rx, out_rx)
	}

	#[test]
	fn producer_halts_and_signals_disable_at_the_full_mark() {
		let queue = shared_gauge(5, 1, 5);
		let (mut role, sync_rx, _out) = producer(queue.clone());

		role.tick();

		assert!(!role.enabled());
		let signals: Vec<SyncSignal> = sync_rx.try_iter().collect();
		assert_eq!(signals.last(), Some(&SyncSignal::Disable));
		// Nothing was generated past the full mark.
		assert_eq!(lock_gauge(&queue).occupancy(), 5);
	}

	#[test]
	fn producer_fills_one_batch_below_the_full_mark() {
		let queue = shared_gauge(0, 0, 100);
		let (mut role, sync_rx, _out) = producer(queue.clone());

		role.tick();

		assert!(role.enabled());
		assert_eq!(lock_gauge(&queue).occupancy(), 3);
		// Empty queue at tick start: no wake for the consumer yet.
		assert!(sync_rx.try_iter().next().is_none());
	}

	#[test]
	fn producer_wakes_the_consumer_once_above_the_low_mark() {
		let queue = shared_gauge(2, 1, 100);
		let (mut role, sync_rx, _out) = producer(queue);

		role.tick();

		let signals: Vec<SyncSignal> = sync_rx.try_iter().collect();
		assert_eq!(signals, [SyncSignal::Enable]);
	}

	#[test]
	fn consumer_halts_and_signals_disable_at_the_low_mark() {
		let queue = shared_gauge(1, 1, 5);
		let (mut role, sync_rx, out_rx) = consumer(queue.clone());

		role.tick();

		assert!(!role.enabled());
		let signals: Vec<SyncSignal> = sync_rx.try_iter().collect();
		assert_eq!(signals.last(), Some(&SyncSignal::Disable));
		// Nothing was drained past the low mark.
		assert_eq!(lock_gauge(&queue).occupancy(), 1);
		assert!(out_rx.try_iter().next().is_none());
	}

	#[test]
	fn consumer_forwards_one_unit_above_the_low_mark() {
		let queue = shared_gauge(3, 1, 5);
		let (mut role, sync_rx, out_rx) = consumer(queue.clone());

		role.tick();

		assert!(role.enabled());
		assert_eq!(out_rx.try_recv().unwrap().unwrap(), "line 0");
		assert_eq!(lock_gauge(&queue).occupancy(), 2);
		let signals: Vec<SyncSignal> = sync_rx.try_iter().collect();
		assert_eq!(signals, [SyncSignal::Enable]);
	}

	#[test]
	fn consumer_forwards_pop_failures_as_errors() {
		// Occupancy drifted above the real backend length: the pop hits
		// an empty queue and the failure travels the output channel.
		let mut gauge = QueueGauge::new(MemoryQueue::new(), 0, 10).unwrap();
		gauge.set_occupancy(5);
		let shared = Arc::new(Mutex::new(gauge));

		let (mut role, _sync, out_rx) = consumer(shared);
		role.tick();

		assert!(out_rx.try_recv().unwrap().is_err());
	}

	#[test]
	fn received_disable_does_not_switch_off_a_role() {
		let queue = shared_gauge(3, 1, 5);
		let (mut role, _sync, _out) = consumer(queue);

		super::apply(&mut role, SyncSignal::Disable);
		assert!(role.enabled());
	}
}
