//! Subcommand implementations. Each returns `anyhow::Result` and prints to stdout.

pub mod check;
pub mod describe;
pub mod groups;
pub mod options;
pub mod resolve;
