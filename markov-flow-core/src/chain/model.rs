use std::collections::HashMap;
use std::path::Path;

use rand::Rng;
use rand::prelude::IteratorRandom;
use serde::{Deserialize, Serialize};

use super::Prefix;

/// The prefix → suffix-list mapping at the heart of the chain.
///
/// Each key is the canonical form of a fixed-length prefix; the value is
/// the list of tokens observed immediately after that prefix in the
/// corpus. Duplicates are meaningful: repeated observations stay in the
/// list and weight random selection by frequency.
///
/// # Responsibilities
/// - Accumulate observations during the build phase
/// - Serve suffix lookups and random seed prefixes during generation
/// - Merge with another model of the same prefix length (parallel build)
/// - Round-trip through a compact binary cache
///
/// # Invariants
/// - `prefix_len` is >= 1 and constant for the lifetime of the model
/// - Suffix lists preserve insertion order and are never deduplicated
/// - After the build barrier the model is only read, so sharing it
///   across threads without a lock is safe
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChainModel {
	/// Number of tokens in every lookup prefix.
	prefix_len: usize,

	/// Mapping from a canonical prefix key to its observed suffixes.
	chain: HashMap<String, Vec<String>>,
}

impl ChainModel {
	/// Creates an empty model with prefixes of `prefix_len` tokens.
	///
	/// # Errors
	/// Returns an error if `prefix_len < 1`.
	pub fn new(prefix_len: usize) -> Result<Self, String> {
		if prefix_len < 1 {
			return Err("prefix_len must be >= 1".to_owned());
		}
		Ok(Self { prefix_len, chain: HashMap::new() })
	}

	/// Returns the fixed prefix length of this model.
	pub fn prefix_len(&self) -> usize {
		self.prefix_len
	}

	/// Records one observation: `suffix` was seen right after `key`.
	pub(crate) fn record(&mut self, key: String, suffix: &str) {
		self.chain.entry(key).or_default().push(suffix.to_owned());
	}

	/// Returns the suffix list recorded for `key`, if any.
	pub fn suffixes(&self, key: &str) -> Option<&[String]> {
		self.chain.get(key).map(Vec::as_slice)
	}

	/// Total number of recorded observations (sum of suffix-list lengths).
	pub fn observation_count(&self) -> usize {
		self.chain.values().map(Vec::len).sum()
	}

	/// Returns true if no observation has been recorded.
	pub fn is_empty(&self) -> bool {
		self.chain.is_empty()
	}

	/// Picks a uniformly random recorded prefix to seed a generation walk.
	///
	/// Returns `None` if the model has no observations.
	pub(crate) fn random_prefix<R: Rng>(&self, rng: &mut R) -> Option<Prefix> {
		self.chain
			.keys()
			.choose(rng)
			.map(|key| Prefix::from_key(key, self.prefix_len))
	}

	/// Merges another model into this one.
	///
	/// Suffix lists for matching keys are appended in the other model's
	/// order; missing keys are moved over. Intended for combining the
	/// per-worker partial models after the build barrier.
	///
	/// # Errors
	/// Returns an error if the prefix lengths differ.
	pub fn merge(&mut self, other: Self) -> Result<(), String> {
		if self.prefix_len != other.prefix_len {
			return Err("prefix_len mismatch".to_owned());
		}

		for (key, mut suffixes) in other.chain {
			self.chain.entry(key).or_default().append(&mut suffixes);
		}

		Ok(())
	}

	/// Loads a model from a postcard binary cache file.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
		let bytes = std::fs::read(path)?;
		Ok(postcard::from_bytes(&bytes)?)
	}

	/// Serializes the model to a postcard binary cache file.
	pub fn store<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_zero_prefix_len() {
		assert!(ChainModel::new(0).is_err());
	}

	#[test]
	fn record_preserves_duplicates_in_order() {
		let mut model = ChainModel::new(1).unwrap();
		model.record("a".to_owned(), "b");
		model.record("a".to_owned(), "b");
		model.record("a".to_owned(), "c");
		assert_eq!(model.suffixes("a").unwrap(), ["b", "b", "c"]);
		assert_eq!(model.observation_count(), 3);
	}

	#[test]
	fn merge_appends_and_moves_keys() {
		let mut left = ChainModel::new(1).unwrap();
		left.record("a".to_owned(), "b");

		let mut right = ChainModel::new(1).unwrap();
		right.record("a".to_owned(), "c");
		right.record("b".to_owned(), "a");

		left.merge(right).unwrap();
		assert_eq!(left.suffixes("a").unwrap(), ["b", "c"]);
		assert_eq!(left.suffixes("b").unwrap(), ["a"]);
	}

	#[test]
	fn merge_rejects_prefix_len_mismatch() {
		let mut left = ChainModel::new(1).unwrap();
		let right = ChainModel::new(2).unwrap();
		assert!(left.merge(right).is_err());
	}

	#[test]
	fn cache_round_trip() {
		let mut model = ChainModel::new(2).unwrap();
		model.record("a b".to_owned(), "c");
		model.record("b c".to_owned(), "d");

		let dir = std::env::temp_dir().join("markov-flow-model-cache-test");
		std::fs::create_dir_all(&dir).unwrap();
		let path = dir.join("model.bin");

		model.store(&path).unwrap();
		let loaded = ChainModel::load(&path).unwrap();

		assert_eq!(loaded.prefix_len(), 2);
		assert_eq!(loaded.suffixes("a b").unwrap(), ["c"]);
		assert_eq!(loaded.observation_count(), model.observation_count());
	}
}
