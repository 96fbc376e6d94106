use std::io::Error as IoError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("Address parsing error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
    #[error("Configuration error: {0}")]
    Config(#[from] pinger::ConfigError),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] pinger::reqwest::Error),
}
