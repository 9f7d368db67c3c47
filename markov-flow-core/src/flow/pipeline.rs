use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::roles::{Consumer, Producer, run_role};
use super::{PipelineItem, SyncSignal};
use crate::chain::model::ChainModel;
use crate::queue::{BoundedQueue, QueueGauge};

/// How many sentences the producer pushes per productive tick.
pub const DEFAULT_BATCH: usize = 10;

/// Tuning knobs for a pipeline run.
#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
	/// Sentences generated and pushed per producer tick.
	pub batch: usize,
	/// Maximum words per generated sentence.
	pub max_words: usize,
	/// Fixed RNG seed for the producer; `None` seeds from the OS.
	pub seed: Option<u64>,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self { batch: DEFAULT_BATCH, max_words: 8, seed: None }
	}
}

/// A running producer/consumer pair and the channels to observe and
/// stop it.
///
/// `spawn` starts both roles disabled on their own OS threads and sends
/// one initial enable on the shared sync channel; whichever role picks
/// it up wakes the other through the upkeep signals of its first tick.
/// `shutdown` cancels both roles, waits for their acknowledgments and
/// joins the threads.
pub struct Pipeline {
	control_tx: Sender<()>,
	ack_rx: Receiver<()>,
	out_rx: Receiver<PipelineItem>,
	workers: Vec<JoinHandle<()>>,
}

impl Pipeline {
	/// Spawns the two roles over a finished model and a gauged queue.
	///
	/// The model must be fully built; the pipeline only reads it.
	pub fn spawn<Q>(model: Arc<ChainModel>, gauge: QueueGauge<Q>, config: PipelineConfig) -> Self
	where
		Q: BoundedQueue + Send + 'static,
	{
		let queue = Arc::new(Mutex::new(gauge));

		let (sync_tx, sync_rx) = bounded(2);
		let (control_tx, control_rx) = bounded(2);
		let (ack_tx, ack_rx) = bounded(2);
		let (out_tx, out_rx) = unbounded();

		let rng = match config.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		};
		let producer = Producer::new(
			queue.clone(),
			model,
			rng,
			config.batch.max(1),
			config.max_words,
			sync_tx.clone(),
			out_tx.clone(),
		);
		let consumer = Consumer::new(queue, sync_tx.clone(), out_tx);

		let workers = vec![
			thread::spawn({
				let sync_rx = sync_rx.clone();
				let control_rx = control_rx.clone();
				let ack_tx = ack_tx.clone();
				move || run_role(producer, sync_rx, control_rx, ack_tx)
			}),
			thread::spawn(move || run_role(consumer, sync_rx, control_rx, ack_tx)),
		];

		// Both roles start disabled; one enable gets the pipeline moving.
		let _ = sync_tx.try_send(SyncSignal::Enable);
		info!("pipeline started");

		Self { control_tx, ack_rx, out_rx, workers }
	}

	/// The channel on which the consumer forwards lines and failures.
	pub fn output(&self) -> &Receiver<PipelineItem> {
		&self.out_rx
	}

	/// Cancels both roles, waits for their acknowledgments and joins
	/// the worker threads.
	pub fn shutdown(self) {
		for _ in 0..2 {
			let _ = self.control_tx.send(());
		}
		for _ in 0..2 {
			let _ = self.ack_rx.recv();
		}
		for worker in self.workers {
			let _ = worker.join();
		}
		info!("pipeline terminated");
	}
}
