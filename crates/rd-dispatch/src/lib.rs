//! `rd-dispatch` — which pending tasks go into the next batch.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`queue`]   | `PendingEntry`, `PendingQueue`, `Batch`                        |
//! | [`cutoff`]  | `CutoffPolicy` trait, `UrgencyThreshold`, `DispatchAll`, `UniformPrefix`, `CutoffSelector` |
//! | [`loader`]  | `load_stream_csv`, `load_stream_reader`                        |
//! | [`error`]   | `DispatchError`, `DispatchResult<T>`                           |
//!
//! # Selection round (summary)
//!
//! ```text
//! sort pending by (urgency desc, task index asc)
//! n     = policy.batch_len(sorted, rng)   clamped to 1..=len
//! batch = first n entries, removed from the queue
//! ```
//!
//! Entries past the cutoff stay pending and compete again next round,
//! together with whatever arrived in the meantime.

pub mod cutoff;
pub mod error;
pub mod loader;
pub mod queue;


pub use cutoff::{CutoffPolicy, CutoffSelector, DispatchAll, UniformPrefix, UrgencyThreshold, prefix_len};
pub use error::{DispatchError, DispatchResult};
pub use loader::{load_stream_csv, load_stream_reader};
pub use queue::{Batch, PendingEntry, PendingQueue};
