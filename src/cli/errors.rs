//! CLI error types; every one ends the process with a non-zero exit code

use std::io;

use thiserror::Error;

use crate::catalogue::CatalogueError;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error("failed to create tokio runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("HTTP server failed: {0}")]
    Server(#[source] io::Error),
}

pub type CliResult<T> = Result<T, CliError>;
