use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown state abbreviation: {0}")]
    UnknownState(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP status error: {0}")]
    HttpStatus(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl Error {
    /// Transport and status failures are worth another attempt; everything
    /// else (bad CSV, bad configuration, disk trouble) is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Request(_) | Error::HttpStatus(_))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_) | Error::UnknownState(_) | Error::Toml(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_are_retryable() {
        assert!(Error::HttpStatus("503 Service Unavailable".to_string()).is_retryable());
        assert!(!Error::Config("bad".to_string()).is_retryable());
        assert!(!Error::Cache("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_config_classification() {
        assert!(Error::UnknownState("ZZ".to_string()).is_config());
        assert!(!Error::HttpStatus("404".to_string()).is_config());
    }
}
