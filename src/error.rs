//! Error types for catalog patching.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or applying an insertion batch.
#[derive(Debug, Error)]
pub enum AppendError {
    /// The file's trimmed content does not end with `}`.
    #[error("{} does not end with a JSON object", .path.display())]
    MissingClosingBrace { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid {encoding}", .path.display())]
    Decode { path: PathBuf, encoding: &'static str },

    #[error("character {character:?} cannot be encoded as {encoding}")]
    Unencodable {
        encoding: &'static str,
        character: char,
    },

    /// Writing Latin-1 text would turn a valid UTF-8 file into mixed encodings.
    #[error("{} is UTF-8; appending as latin-1 would corrupt it", .path.display())]
    BreaksUtf8 { path: PathBuf },

    #[error("unsupported encoding '{0}'")]
    UnsupportedEncoding(String),

    #[error("invalid insertion batch: {0}")]
    InvalidBatch(String),
}

impl AppendError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_brace_message_names_file() {
        let err = AppendError::MissingClosingBrace {
            path: PathBuf::from("messages/es.json"),
        };
        assert_eq!(
            err.to_string(),
            "messages/es.json does not end with a JSON object"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = AppendError::io(
            "messages/fr.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("messages/fr.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_unencodable_message() {
        let err = AppendError::Unencodable {
            encoding: "latin-1",
            character: '→',
        };
        assert!(err.to_string().contains("latin-1"));
    }
}
