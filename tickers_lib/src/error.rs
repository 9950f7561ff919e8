//! Error types for the library layer.

/// Configuration could not be assembled from the environment.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors that abort a collection run. No partial batch is returned.
#[derive(thiserror::Error, Debug)]
pub enum CollectError {
    /// Transport failure, non-JSON body, or a bad cursor URL.
    #[error("API error: {0}")]
    Api(#[from] polygon_api::Error),
    /// The API kept returning an in-band error past the configured retry cap.
    #[error("API still returning an error after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },
}

/// Errors from writing a table to a sink.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),
}
