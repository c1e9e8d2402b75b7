use thiserror::Error;

use crate::document::DocumentFormat;

/// Errors produced while turning raw text into a document tree.
///
/// Reference problems are not errors: they become fallback nodes and
/// [`ReferenceWarning`](crate::resolver::ReferenceWarning)s.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input contained nothing but whitespace.
    #[error("document is empty")]
    Empty,

    /// The underlying JSON or YAML parser rejected the text.
    #[error("{format} syntax error at {}: {message}", position(.line, .column))]
    Syntax {
        format: DocumentFormat,
        /// 1-based line, when the parser reports one.
        line: Option<usize>,
        /// 1-based column, when the parser reports one.
        column: Option<usize>,
        message: String,
    },

    /// The document parsed, but its root is not a mapping.
    #[error("document root must be an object, found {0}")]
    NotAnObject(&'static str),
}

fn position(line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(line), Some(column)) => format!("line {line}, column {column}"),
        (Some(line), None) => format!("line {line}"),
        _ => "unknown position".to_string(),
    }
}

impl ParseError {
    pub(crate) fn from_json(err: serde_json::Error) -> Self {
        // serde_json reports line 0 for errors not tied to a position.
        let line = (err.line() > 0).then(|| err.line());
        let column = (err.column() > 0).then(|| err.column());
        Self::Syntax {
            format: DocumentFormat::Json,
            line,
            column,
            message: err.to_string(),
        }
    }

    pub(crate) fn from_yaml(err: serde_yaml::Error) -> Self {
        let location = err.location();
        Self::Syntax {
            format: DocumentFormat::Yaml,
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
            message: err.to_string(),
        }
    }
}
