//! # Railyard In-Process Storage Adapter
//!
//! Implements the domain's storage ports against process-local state:
//!
//! - [`MemoryComponentStore`]: the component table behind serialized snapshot
//!   transactions - a transaction clones the table, mutates the clone and
//!   swaps it back on commit, so an uncommitted transaction has no
//!   observable effect.
//! - [`MemoryIdempotencyStore`]: append-only idempotency records keyed by the
//!   caller-supplied token.
//!
//! The adapter also ships the [`seed`] catalog the service boots with.

pub mod infrastructure;
pub mod seed;

pub use infrastructure::{MemoryComponentStore, MemoryIdempotencyStore, MemoryTransaction};
