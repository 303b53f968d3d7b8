use clap::Parser;
use qcew_etl::app::{handle_fatal_error, init_logging, AppConfig};
use qcew_etl::cli::{execute_command, Cli};

fn main() {
    let cli = Cli::parse();

    let app = AppConfig::new(cli.verbose).with_progress(true);
    init_logging(&app);

    if let Err(e) = execute_command(cli.command, &app) {
        handle_fatal_error(e, cli.verbose);
    }
}
