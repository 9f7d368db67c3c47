use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};

use super::Prefix;
use super::model::ChainModel;
use super::tokenizer::tokenize;
use crate::io::{build_output_path, read_file};

/// Sharded, bulk-synchronous construction of a `ChainModel`.
///
/// The token sequence is split into `workers` contiguous, non-overlapping
/// shards of `count / workers` tokens each; trailing remainder tokens
/// beyond the last shard boundary are silently dropped. Each worker walks
/// its shard once with its own fresh window and fills its own partial
/// model, so the build phase needs no lock; partials are merged in shard
/// order after the join barrier, which makes the merged mapping
/// deterministic for a given corpus and worker count.
///
/// Cross-shard transitions (a prefix spanning a shard boundary) are never
/// recorded: each shard starts as if preceded by unobserved tokens. One
/// worker reproduces a fully sequential, lossless build; more workers
/// trade a little fidelity for wall-clock speed.
///
/// # Invariants
/// - With one worker, observation count = token count − prefix_len
/// - With K workers, observation count = Σ max(0, count/K − prefix_len)
/// - No read of the model happens before every worker has joined
pub struct ChainBuilder {
	prefix_len: usize,
	workers: usize,
}

impl ChainBuilder {
	/// Creates a builder with the given prefix length and one worker per
	/// available execution unit.
	///
	/// # Errors
	/// Returns an error if `prefix_len < 1`.
	pub fn new(prefix_len: usize) -> Result<Self, String> {
		if prefix_len < 1 {
			return Err("prefix_len must be >= 1".to_owned());
		}
		Ok(Self { prefix_len, workers: num_cpus::get().max(1) })
	}

	/// Sets the concurrency degree. One worker selects the sequential,
	/// lossless build; values below one are clamped to one.
	pub fn workers(mut self, workers: usize) -> Self {
		self.workers = workers.max(1);
		self
	}

	/// Builds a model from an already tokenized corpus.
	///
	/// Blocks until every worker has contributed its partial model (the
	/// join barrier), then merges the partials in shard order.
	///
	/// # Errors
	/// Returns an error if a build worker terminated abnormally.
	pub fn build(&self, words: &[String]) -> Result<ChainModel, String> {
		let shard_len = words.len() / self.workers;

		let (tx, rx) = mpsc::channel();
		for index in 0..self.workers {
			let tx = tx.clone();
			let shard: Vec<String> = words[index * shard_len..(index + 1) * shard_len].to_vec();
			debug!(
				"launching build worker {} over tokens {}..{}",
				index,
				index * shard_len,
				(index + 1) * shard_len
			);

			let prefix_len = self.prefix_len;
			thread::spawn(move || {
				// Impossible to panic, prefix_len is validated in new()
				let mut partial = ChainModel::new(prefix_len).unwrap();
				let mut window = Prefix::new(prefix_len);
				for (position, word) in shard.iter().enumerate() {
					// The window only becomes a real prefix once the
					// first prefix_len shard tokens have filled it.
					if position >= prefix_len {
						partial.record(window.key(), word);
					}
					window.shift(word);
				}
				let _ = tx.send((index, partial));
			});
		}
		drop(tx);

		let mut partials: Vec<(usize, ChainModel)> = rx.iter().collect();
		if partials.len() != self.workers {
			return Err("a build worker terminated abnormally".to_owned());
		}
		partials.sort_by_key(|(index, _)| *index);

		// Impossible to panic, prefix_len is validated in new()
		let mut model = ChainModel::new(self.prefix_len).unwrap();
		for (_, partial) in partials {
			model.merge(partial)?;
		}
		info!(
			"all {} build workers joined, {} observations recorded",
			self.workers,
			model.observation_count()
		);

		Ok(model)
	}

	/// Builds a model from a corpus file, with a binary cache next to it.
	///
	/// If a `.bin` sibling of the corpus exists and holds a model with the
	/// requested prefix length, it is loaded instead of rebuilding;
	/// otherwise the corpus is tokenized, built and the cache rewritten.
	///
	/// # Errors
	/// Fails if the corpus is unreadable (before any build work) or if
	/// building or caching fails.
	pub fn build_from_file<P: AsRef<Path>>(&self, path: P) -> Result<ChainModel, Box<dyn std::error::Error>> {
		let cache_path = build_output_path(&path, "bin")?;
		if cache_path.exists() {
			let cached = ChainModel::load(&cache_path)?;
			if cached.prefix_len() == self.prefix_len {
				info!("loaded cached model from {}", cache_path.display());
				return Ok(cached);
			}
			debug!(
				"cached model has prefix_len {}, want {}, rebuilding",
				cached.prefix_len(),
				self.prefix_len
			);
		}

		let contents = read_file(&path)?;
		let words = tokenize(&contents);
		let model = self.build(&words)?;
		model.store(&cache_path)?;
		Ok(model)
	}
}
