//! A core Rust library for ingesting Solana program accounts into a backing store.
//!
//! This crate turns the full account set of a list of watched on-chain programs
//! into typed, queryable records. It loads every existing account owned by each
//! program, decodes the raw bytes into zero or more domain records, persists them
//! idempotently, and then applies live account-change notifications in arrival
//! order — including notifications that raced with the initial backlog load.
//!
//! # Key Components
//!
//! *   [`loader::Loader`]: The orchestrator and single entry point. Its idempotent
//!     `load()` runs the backlog pass per program and hands the change queues
//!     over from buffering to draining.
//! *   [`pipeline`]: A generic bounded-concurrency executor with periodic flush
//!     checkpoints, used for the backlog pass.
//! *   [`queue::ChangeQueue`]: A single-worker FIFO that buffers live updates
//!     until the backlog has settled, then drains them strictly in order.
//! *   [`decode`]: The per-program record-kind dispatch framework, with the
//!     Metaplex auction program as the worked example.
//! *   [`writer::WriterAdapter`]: The staged-write contract towards the backing
//!     store, with an in-memory default implementation.

/// Raw account snapshots and buffered change notifications.
pub mod account;
/// Configuration structures and file/environment loading.
pub mod config;
/// The chain boundary: snapshot reads and account-change subscriptions.
pub mod connection;
/// Record-kind decoders and the per-program dispatch framework.
pub mod decode;
/// Fatal pipeline errors.
pub mod error;
/// Backlog orchestration and the buffering-to-draining handoff.
pub mod loader;
/// The bounded-concurrency pipeline executor.
pub mod pipeline;
/// The ordered, single-worker change queue.
pub mod queue;
/// Typed domain records and their on-chain byte layouts.
pub mod records;
/// The writer-adapter contract and default implementations.
pub mod writer;

pub use config::IngesterConfig;
pub use error::IngestError;
pub use loader::Loader;
