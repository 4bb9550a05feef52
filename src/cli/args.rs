//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Calculus solver: JSON API server and offline site generators
#[derive(Parser, Debug)]
#[command(name = "rusted-calc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Host to bind to, overrides [server].host
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to, overrides [server].port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Generate derivative practice problems and merge them into the problem list
    GenerateProblems {
        /// Problem list, overrides [catalogue].problems_file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write sitemap.xml for the static pages and every problem
    GenerateSitemap {
        /// Problem list to read, overrides [catalogue].problems_file
        #[arg(long)]
        problems: Option<PathBuf>,

        /// Sitemap to write, overrides [catalogue].sitemap_file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Site root, overrides [catalogue].base_url
        #[arg(long)]
        base_url: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// `serve` without overrides when no subcommand was given
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            host: None,
            port: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_serve() {
        let cli = Cli::try_parse_from(["rusted-calc"]).unwrap();
        assert_eq!(cli.config, None);
        assert_eq!(
            cli.command_or_default(),
            Command::Serve {
                host: None,
                port: None
            }
        );
    }

    #[test]
    fn test_serve_overrides() {
        let cli =
            Cli::try_parse_from(["rusted-calc", "serve", "--port", "8080", "--config", "calc.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("calc.toml")));
        assert_eq!(
            cli.command_or_default(),
            Command::Serve {
                host: None,
                port: Some(8080)
            }
        );
    }

    #[test]
    fn test_generator_commands() {
        let cli = Cli::try_parse_from(["rusted-calc", "generate-problems", "--output", "p.json"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::GenerateProblems {
                output: Some(PathBuf::from("p.json"))
            })
        );
        let cli = Cli::try_parse_from([
            "rusted-calc",
            "generate-sitemap",
            "--base-url",
            "https://calc.example.org",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::GenerateSitemap {
                problems: None,
                output: None,
                base_url: Some("https://calc.example.org".to_string())
            })
        );
    }

    #[test]
    fn test_bad_port_is_rejected() {
        assert!(Cli::try_parse_from(["rusted-calc", "serve", "--port", "99999"]).is_err());
    }
}
