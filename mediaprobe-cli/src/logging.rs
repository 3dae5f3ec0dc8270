// ============================================================================
// mediaprobe-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger Initialization for the CLI
//
// mediaprobe-core logs through the `log` facade; this module installs
// env_logger as the backend, writing to stderr so stdout stays reserved for
// probe results.
//
// USAGE:
// - no flag: warnings and errors only
// - -v / -vv / -vvv: info / debug / trace
// - RUST_LOG, when set, takes precedence over the flag

use log::LevelFilter;
use std::io::Write;

/// Maps the number of `-v` flags to a level filter.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the global logger. Safe to call once per process.
pub fn init_logging(verbose: u8) {
    let default_level = level_for_verbosity(verbose);
    let env = env_logger::Env::default().default_filter_or(default_level.as_str());

    env_logger::Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:<5}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .init();

    log::debug!("Logger initialized with default level: {}", default_level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(9), LevelFilter::Trace);
    }
}
