//! CLI command implementations

use log::info;

use crate::Utils::logger::init_logger;
use crate::catalogue::problems::{UpdateSummary, update_problem_file};
use crate::catalogue::sitemap::write_sitemap;
use crate::config::AppConfig;
use crate::explanation::ExplanationEnricher;
use crate::http_server::{CalculusState, HttpServer};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments, load the configuration once and run the command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_logger(&config.logging);
    run_command(cli.command_or_default(), config)
}

pub fn run_command(cmd: Command, config: AppConfig) -> CliResult<()> {
    match cmd {
        Command::Serve { host, port } => serve(config, host, port),
        Command::GenerateProblems { output } => {
            let mut config = config;
            if let Some(output) = output {
                config.catalogue.problems_file = output;
            }
            generate_problems(&config).map(|_| ())
        }
        Command::GenerateSitemap {
            problems,
            output,
            base_url,
        } => {
            let mut config = config;
            if let Some(problems) = problems {
                config.catalogue.problems_file = problems;
            }
            if let Some(output) = output {
                config.catalogue.sitemap_file = output;
            }
            if let Some(base_url) = base_url {
                config.catalogue.base_url = base_url;
            }
            generate_sitemap(&config).map(|_| ())
        }
    }
}

fn serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let enricher = ExplanationEnricher::from_config(&config.explanation);
    if !enricher.is_enabled() {
        info!("no Gemini API key configured, explanations use placeholders");
    }
    let server = HttpServer::with_config(config.server, CalculusState::new(enricher));

    let rt = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    rt.block_on(server.start()).map_err(CliError::Server)
}

pub fn generate_problems(config: &AppConfig) -> CliResult<UpdateSummary> {
    let summary = update_problem_file(&config.catalogue.problems_file)?;
    println!(
        "Before: {} problems, added {}, total {} -> {}",
        summary.before,
        summary.generated,
        summary.total,
        config.catalogue.problems_file.display()
    );
    Ok(summary)
}

pub fn generate_sitemap(config: &AppConfig) -> CliResult<usize> {
    let count = write_sitemap(
        &config.catalogue.problems_file,
        &config.catalogue.sitemap_file,
        &config.catalogue.base_url,
    )?;
    println!(
        "Generated {} with {} URLs.",
        config.catalogue.sitemap_file.display(),
        count
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::sitemap::STATIC_PAGES;

    #[test]
    fn test_generators_share_the_problem_file() {
        let dir = tempfile::tempdir().unwrap();
        let problems = dir.path().join("data").join("problems.json");
        let sitemap = dir.path().join("public").join("sitemap.xml");

        run_command(
            Command::GenerateProblems {
                output: Some(problems.clone()),
            },
            AppConfig::default(),
        )
        .unwrap();
        let mut config = AppConfig::default();
        config.catalogue.problems_file = problems.clone();
        config.catalogue.sitemap_file = sitemap.clone();
        config.catalogue.base_url = "https://calc.example.org/".to_string();

        let count = generate_sitemap(&config).unwrap();
        let summary = generate_problems(&config).unwrap();
        assert_eq!(summary.generated, 0);
        assert_eq!(count, summary.total + STATIC_PAGES.len());

        let xml = std::fs::read_to_string(&sitemap).unwrap();
        assert!(xml.contains("<loc>https://calc.example.org</loc>"));
        assert!(xml.contains("<loc>https://calc.example.org/problems/derivative-of-x-to-the-2</loc>"));
    }

    #[test]
    fn test_unreadable_problem_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let problems = dir.path().join("problems.json");
        std::fs::write(&problems, "not json").unwrap();
        let err = run_command(
            Command::GenerateSitemap {
                problems: Some(problems),
                output: Some(dir.path().join("sitemap.xml")),
                base_url: None,
            },
            AppConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Catalogue(_)));
    }
}
