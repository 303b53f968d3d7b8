//! Command routing and execution

use crate::app::AppConfig;
use crate::cli::args::Commands;
use crate::cli::commands::{run_batch_command, run_status_command};
use anyhow::Result;

/// Execute a CLI command based on the parsed arguments
pub fn execute_command(command: Commands, app: &AppConfig) -> Result<()> {
    match command {
        Commands::Run {
            selection,
            output,
            no_progress,
        } => {
            let app = app.clone().with_progress(!no_progress);
            run_batch_command(&selection, output, &app)
        }
        Commands::Status { selection, missing } => run_status_command(&selection, missing),
    }
}
