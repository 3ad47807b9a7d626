//! Error taxonomy for the converter.
//!
//! Only one failure kind reaches the caller: [`ErrorKind::ConversionFailure`].
//! Everything else the converter cannot express is downgraded to a warning.
//! The variants below exist so the message names what actually went wrong;
//! they all collapse to the same taxonomy tag at the pipeline boundary.
//! Parser diagnostics arrive as [`ConversionError::Syntax`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ERR_CONVERSION_FAILURE: &str = "ConversionFailure";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    ConversionFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConversionFailure => ERR_CONVERSION_FAILURE,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ConversionError {
    /// The parser rejected the source.
    #[error("syntax error: {message}")]
    Syntax { message: String },

    #[error("in component {name}: {source}")]
    InComponent {
        name: String,
        #[source]
        source: Box<ConversionError>,
    },

    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConversionError {
    /// Collapses parser diagnostics into one error naming the first.
    pub fn syntax<D: std::fmt::Display>(diagnostics: &[D]) -> Self {
        let message = match diagnostics {
            [] => "source could not be parsed".to_string(),
            [first] => first.to_string(),
            [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
        };
        ConversionError::Syntax { message }
    }

    pub fn in_component(name: &str, source: ConversionError) -> Self {
        ConversionError::InComponent {
            name: name.to_string(),
            source: Box::new(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ConversionFailure
    }

    /// The single entry recorded in `ConversionResult::errors`.
    pub fn report_entry(&self) -> String {
        format!("{}: Conversion failed: {}", self.kind(), self)
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
