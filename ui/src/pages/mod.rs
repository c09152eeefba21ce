//! The two panels behind the header tabs.
//!
//! - `generator_page`: form, preview and download
//! - `scanner_page`: camera feed, scan result and its actions
//!
//! Each panel's state is a [`qrverse_states::State`] stored in the
//! `StateCtx` while its tab is active.

mod generator_page;
mod scanner_page;

pub use generator_page::{GeneratorPanel, generator_page};
pub use scanner_page::{ScannerPanel, scanner_page};
