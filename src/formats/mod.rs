//! Human-readable output formats.

pub mod report;

pub use report::*;
