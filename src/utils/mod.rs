//! Small helpers shared by the application modules.

/// Formats a shared log prefix for module logs.
pub fn log_prefix(module: &str) -> String {
    format!("bibliotech::{module}")
}
