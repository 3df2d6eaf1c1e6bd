//! CLI module for telepoll - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
