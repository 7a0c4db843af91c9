use thiserror::Error;

/// Invalid user input that cannot be corrected to a safe default.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid duration {0:?} (expected e.g. 10s, 1m30s, 250ms)")]
    InvalidDuration(String),

    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Fatal errors: any of these ends the run without a report.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build request: {0}")]
    Request(#[from] isahc::http::Error),

    #[error("failed to build http client: {0}")]
    Client(#[from] isahc::Error),

    #[error("failed to create tokio runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
