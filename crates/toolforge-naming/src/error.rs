use thiserror::Error;

/// A string that does not follow the `METHOD::path` identifier grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierFormatError {
    #[error("identifier '{0}' has no '::' method divider")]
    MissingDivider(String),

    #[error("identifier '{0}' has an empty method")]
    EmptyMethod(String),

    #[error("identifier '{0}' has an invalid method (expected uppercase letters)")]
    InvalidMethod(String),
}

/// Errors produced while deriving display names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// Abbreviation was asked for a name from an empty string.
    #[error("cannot derive a name from empty input")]
    EmptyInput,
}
