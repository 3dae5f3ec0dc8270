// mediaprobe-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use mediaprobe_core::DEFAULT_FFPROBE_BINARY;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{parse_env_pair, parse_seconds};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Mediaprobe: media metadata via ffprobe",
    long_about = "Runs ffprobe under a total and an idle timeout and prints the container and stream metadata it reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log output (-v info, -vv debug, -vvv trace). RUST_LOG also works.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probes a media file and prints its format and streams
    Info(InfoArgs),
    /// Prints the ffprobe command that `info` would run, without running it
    Command(CommandArgs),
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Media file to probe
    #[arg(required = true, value_name = "FILE")]
    pub input: PathBuf,

    /// Print the result as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub probe: ProbeArgs,
}

#[derive(Args, Debug)]
pub struct CommandArgs {
    /// Media file the command would probe
    #[arg(required = true, value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub probe: ProbeArgs,
}

/// Settings that end up in a `ProbeConfig`.
#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// ffprobe executable name or path
    #[arg(long, value_name = "PATH", env = "MEDIAPROBE_FFPROBE", default_value = DEFAULT_FFPROBE_BINARY)]
    pub ffprobe: String,

    /// Maximum total run time in seconds (fractions allowed)
    #[arg(long, value_name = "SECONDS", env = "MEDIAPROBE_TIMEOUT", value_parser = parse_seconds)]
    pub timeout: Option<Duration>,

    /// Maximum time in seconds without any output from ffprobe
    #[arg(long, value_name = "SECONDS", env = "MEDIAPROBE_IDLE_TIMEOUT", value_parser = parse_seconds)]
    pub idle_timeout: Option<Duration>,

    /// Extra environment variable for ffprobe (repeatable)
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub envs: Vec<(String, String)>,
}
