// mediaprobe-cli/src/main.rs
//
// Entry point for the `mediaprobe` binary: parses arguments, sets up logging,
// dispatches to the selected command and maps failures to exit codes.

use clap::Parser;
use mediaprobe_cli::{Cli, Commands, exit_code_for, logging, run_command, run_info};
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Info(args) => run_info(args),
        Commands::Command(args) => run_command(args),
    };

    if let Err(err) = result {
        log::debug!("Command failed: {err:?}");
        eprintln!("Error: {err:#}");
        process::exit(exit_code_for(&err));
    }
}
