//! # Problem catalogue and sitemap
//!
//! Offline batch generators for the marketing site: a JSON list of derivative
//! practice problems and a sitemap XML that links every problem page. Neither runs
//! on the request path.

pub mod problems;
pub mod sitemap;

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use problems::{Problem, ProblemCatalogue};

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid problem list {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogueError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CatalogueError::Io {
            path: path.into(),
            source,
        }
    }
}

/// `[catalogue]` section of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueConfig {
    /// Site the sitemap links point to (default: "https://derivativecalculatorai.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Problem list (default: "data/problems.json")
    #[serde(default = "default_problems_file")]
    pub problems_file: PathBuf,

    /// Sitemap output (default: "public/sitemap.xml")
    #[serde(default = "default_sitemap_file")]
    pub sitemap_file: PathBuf,
}

fn default_base_url() -> String {
    "https://derivativecalculatorai.com".to_string()
}

fn default_problems_file() -> PathBuf {
    PathBuf::from("data/problems.json")
}

fn default_sitemap_file() -> PathBuf {
    PathBuf::from("public/sitemap.xml")
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            problems_file: default_problems_file(),
            sitemap_file: default_sitemap_file(),
        }
    }
}
