//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `info` command.
/// This command probes a file and prints its metadata.
pub mod info;

/// Module containing the implementation of the `command` command.
pub mod command;
