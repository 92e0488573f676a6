//! Platform-specific plumbing: data directories and shell integration.

pub mod paths;
pub mod shell;
