//! Error handling utilities
//!
//! This module provides centralized handling of errors that end the process.

use tracing::error;

/// Exit code for unusable configuration or arguments
pub const ARGUMENT_ERROR: i32 = 2;
/// Exit code for everything else
pub const GENERAL_ERROR: i32 = 1;

/// Exit code for an error that ended the run
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    let is_config = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<crate::error::Error>())
        .any(|e| e.is_config());

    if is_config {
        ARGUMENT_ERROR
    } else {
        GENERAL_ERROR
    }
}

/// Report a fatal error and exit
///
/// - `verbose = 0`: the top-level message only
/// - `verbose >= 1`: the full cause chain
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    eprintln!("Error: {error}");
    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code_for(&error))
}
