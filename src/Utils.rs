//! different utility modules used throughout the project
/// tiny module to set up console and file logging from the `[logging]` config section
pub mod logger;
