//! Error types for the STL converter
//!
//! The conversion core never fails: unrecognized tags, unmapped names and
//! unresolved collisions are all recovered from inside the pipeline. These
//! errors belong to the file, configuration and command-line shell around it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Invalid edit '{edit}': {message}")]
    InvalidEdit { edit: String, message: String },

    #[error("Configuration error in {file}: {message}")]
    Config { file: String, message: String },
}

pub type Result<T> = std::result::Result<T, ConverterError>;

impl ConverterError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn invalid_edit(edit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEdit {
            edit: edit.into(),
            message: message.into(),
        }
    }

    pub fn config(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            file: file.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConverterError::invalid_edit("ad_title_color", "expected ID=VALUE");
        assert_eq!(
            err.to_string(),
            "Invalid edit 'ad_title_color': expected ID=VALUE"
        );

        let err = ConverterError::config("stl.toml", "bad mapping");
        assert_eq!(err.to_string(), "Configuration error in stl.toml: bad mapping");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ConverterError = io.into();
        assert!(matches!(err, ConverterError::Io(_)));
    }
}
