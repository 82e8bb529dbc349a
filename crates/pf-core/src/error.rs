use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortfolioError {
    /// The host platform lacks a capability a feature depends on.
    #[error("platform capability unavailable: {0}")]
    Unsupported(&'static str),
    #[error("invalid page config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("host error: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
