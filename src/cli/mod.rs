//! CLI module - argument parsing and subcommands

mod args;
pub mod columns;

pub use args::{Cli, Commands};
