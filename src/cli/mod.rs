//! CLI command handlers
//!
//! Argument parsing structures and the command implementations behind them.

pub mod args;
pub mod commands;
pub mod router;

pub use args::{Cli, Commands, SelectionArgs};
pub use router::execute_command;
