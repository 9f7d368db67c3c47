//! Top-level module for the prefix-chain system.
//!
//! This module provides the Markov-chain half of the pipeline, including:
//! - Whitespace tokenization (`tokenizer`)
//! - A fixed-length sliding prefix window (`Prefix`)
//! - The prefix → suffix-list mapping (`ChainModel`)
//! - Concurrent construction with ordered merging (`ChainBuilder`)
//! - Bounded-length sentence generation (`SentenceGenerator`)

/// Whitespace tokenization of a corpus.
pub mod tokenizer;

/// Fixed-length ordered token window used as the chain lookup key.
///
/// Internal: windowing is an implementation detail of build and
/// generation traversals.
mod prefix;

/// The prefix → suffix-list mapping with postcard caching support.
pub mod model;

/// Sharded concurrent construction of a `ChainModel`.
///
/// Supports a sequential-exact mode (one worker) and a
/// parallel-approximate mode (several workers, per-shard discontinuity).
pub mod builder;

/// Random-walk sentence generation over a finished `ChainModel`.
pub mod generator;

pub(crate) use prefix::Prefix;
