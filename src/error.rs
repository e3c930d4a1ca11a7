use thiserror::Error;

/// Errors that can occur while producing the feed
#[derive(Error, Debug)]
pub enum FeedError {
    /// Failed to reach FlareSolverr or decode its response
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// FlareSolverr answered but did not solve the challenge
    #[error("FlareSolverr returned an error: {0}")]
    Bypass(String),

    /// Neither extraction stage produced any articles
    #[error("No articles found in the fetched page")]
    NoArticles,

    /// Failed to write the feed document
    #[error("Failed to write feed: {0}")]
    Write(#[from] std::io::Error),

    /// A configured URL is not parseable
    #[error("Invalid URL in configuration: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
