//! Utility functions for terminal display formatting.

pub mod format;

pub use format::{format_date, format_optional_date, format_percent, truncate_string};
