// mediaprobe-cli/src/commands/info.rs
//
// Probes one file and prints the result as a summary or as JSON.

use anyhow::{Context, Result};
use log::info;
use mediaprobe_core::MediaProbe;
use std::time::Instant;

use crate::cli::InfoArgs;
use crate::output::print_media_info;

pub fn run_info(args: InfoArgs) -> Result<()> {
    let config = args
        .probe
        .to_config()
        .context("Invalid probe configuration")?;
    let probe = MediaProbe::new(config);

    info!("Probing {}", args.input.display());
    let start_time = Instant::now();
    let media_info = probe
        .get_info(&args.input)
        .with_context(|| format!("Failed to probe '{}'", args.input.display()))?;
    info!(
        "Probed {} in {:.2?}",
        args.input.display(),
        start_time.elapsed()
    );

    if args.json {
        let json = serde_json::to_string_pretty(&media_info)
            .context("Failed to serialize probe result")?;
        println!("{json}");
    } else {
        print_media_info(&media_info);
    }
    Ok(())
}
