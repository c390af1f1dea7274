//! Underwrite CLI - inspect a data dictionary against application records.
//!
//! The binary wraps three steps, all exposed here so they can be tested
//! without spawning a process:
//!
//! 1. [`load`] builds the effective settings (configuration files,
//!    environment, command-line flags) and opens the dictionary
//! 2. [`commands`] render one view of the dictionary as a table or document
//! 3. `main` maps the outcome to an exit code
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error (including a key with no definition)

pub mod cli;
pub mod commands;
pub mod load;
pub mod table;

pub use cli::{Cli, Commands, MatcherArg};
