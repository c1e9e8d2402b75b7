use thiserror::Error;

/// Errors surfaced by the toolforge library and CLI.
#[derive(Debug, Error)]
pub enum ToolforgeError {
    /// Document text could not be parsed.
    #[error(transparent)]
    Parse(#[from] toolforge_spec::ParseError),

    /// A string did not follow the identifier grammar.
    #[error(transparent)]
    Identifier(#[from] toolforge_naming::IdentifierFormatError),

    /// A display name could not be derived.
    #[error(transparent)]
    Naming(#[from] toolforge_naming::NamingError),

    /// Logging could not be set up.
    #[error(transparent)]
    Telemetry(#[from] toolforge_telemetry::TelemetryError),

    /// Reading the document failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A command-line value was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
