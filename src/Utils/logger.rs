use std::fs::File;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use simplelog::*;

/// `[logging]` section of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// off, error, warn, info, debug or trace (default: info)
    #[serde(default = "default_level")]
    pub level: String,
    /// also write the log into this file
    #[serde(default)]
    pub file: Option<String>,
    /// log to the terminal (default: true)
    #[serde(default = "default_console")]
    pub console: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_console() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            console: default_console(),
        }
    }
}

impl LoggingConfig {
    /// unknown level names fall back to Info
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.level.trim()).unwrap_or(LevelFilter::Info)
    }
}

/// Initialize the global logger based on the settings. Calling it twice keeps the first logger.
pub fn init_logger(config: &LoggingConfig) {
    let level = config.level_filter();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    // Console logger
    if config.console {
        loggers.push(TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    // File logger
    if let Some(ref filename) = config.file {
        match File::create(filename) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(e) => eprintln!("cannot create log file {}: {}", filename, e),
        }
    }

    // Initialize combined logger
    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.level_filter(), LevelFilter::Info);
        config.level = "debug".to_string();
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        config.level = "loud".to_string();
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_init_logger_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.log");
        let config = LoggingConfig {
            level: "info".to_string(),
            file: Some(path.to_string_lossy().to_string()),
            console: false,
        };
        init_logger(&config);
        init_logger(&config);
        assert!(path.exists());
    }
}
