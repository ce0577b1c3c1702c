//! BiblioTech application library
//!
//! Application modules (the book catalog and the cover file server) and the
//! bootstrap used by both binaries.

pub mod app;
pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use modules::*;
