//! State plumbing shared by the QR Code Verse crates.
//!
//! - [`StateCtx`] stores one value per [`State`] type for the lifetime of a UI session.
//! - [`TaskId`] / [`TaskSlot`] tag background work so stale results can be dropped.
//! - [`TaskHandle`] carries a cancellation token for long-running workers.
//! - [`JobRunner`] runs blocking jobs on a tokio pool and hands results back to the UI thread.

mod ctx;
mod error;
mod runner;
mod state;
mod task;

pub use ctx::StateCtx;
pub use error::Error;
pub use runner::{JobRunner, Runtime, build_runtime};
pub use state::State;
pub use task::{TaskHandle, TaskId, TaskSlot};
pub use tokio_util::sync::CancellationToken;
