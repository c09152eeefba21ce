//! Native adapters and shared UI helpers.

pub mod camera;
pub mod clipboard;
pub mod colors;
pub mod file_sink;
pub mod texture;

pub use camera::{NokhwaCamera, NokhwaSource};
pub use clipboard::ArboardClipboard;
pub use file_sink::RfdFileSink;
