//! # Command line interface
//!
//! - `rusted-calc serve [--host H] [--port P]` (default when no subcommand is given)
//! - `rusted-calc generate-problems [--output FILE]`
//! - `rusted-calc generate-sitemap [--problems FILE] [--output FILE] [--base-url URL]`
//!
//! Every command accepts `--config FILE` (TOML).

pub mod args;
pub mod commands;
pub mod errors;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use errors::{CliError, CliResult};
