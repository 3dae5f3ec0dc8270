// mediaprobe-cli/src/commands/command.rs
//
// Prints the ffprobe invocation for a file without running it.

use anyhow::{Context, Result};
use mediaprobe_core::MediaProbe;

use crate::cli::CommandArgs;

pub fn run_command(args: CommandArgs) -> Result<()> {
    let config = args
        .probe
        .to_config()
        .context("Invalid probe configuration")?;
    let invocation = MediaProbe::new(config)
        .invocation(&args.input)
        .with_context(|| format!("Cannot probe '{}'", args.input.display()))?;

    println!("{invocation}");
    Ok(())
}
