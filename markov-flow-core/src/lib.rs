//! Markov sentence-pipeline library.
//!
//! This crate provides a prefix-based Markov text system including:
//! - Whitespace tokenization and a fixed-length sliding prefix window
//! - Concurrent chain construction (one local table per worker, merged in order)
//! - Random-walk sentence generation with bounded length
//! - A flow-controlled producer/consumer pipeline paced against a bounded queue
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Chain model, tokenizer, builder and generator.
///
/// This module exposes the model construction and generation interface
/// while keeping the sliding-window internals private.
pub mod chain;

/// Flow-controlled producer/consumer pipeline.
///
/// Paces sentence generation against a bounded queue's fill level using
/// a shared signal channel and a shared cancellation channel.
pub mod flow;

/// Bounded-queue adapters (in-memory and remote list store).
pub mod queue;

/// Error types shared by the queue adapters and the pipeline.
pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;
