//! Error types shared across Handwave crates.

use std::path::PathBuf;

/// Top-level error type for Handwave operations.
#[derive(Debug, thiserror::Error)]
pub enum HandwaveError {
    #[error("Sensor error: {message}")]
    Sensor { message: String },

    #[error("Input device unavailable: {message}")]
    DeviceUnavailable { message: String },

    #[error("Display error: {message}")]
    Display { message: String },

    #[error("Input injection failed: {message}")]
    Injection { message: String },

    #[error("Malformed frame at line {line}: {message}")]
    FrameFormat { line: usize, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using HandwaveError.
pub type HandwaveResult<T> = Result<T, HandwaveError>;

impl HandwaveError {
    pub fn sensor(msg: impl Into<String>) -> Self {
        Self::Sensor {
            message: msg.into(),
        }
    }

    pub fn device_unavailable(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            message: msg.into(),
        }
    }

    pub fn display(msg: impl Into<String>) -> Self {
        Self::Display {
            message: msg.into(),
        }
    }

    pub fn injection(msg: impl Into<String>) -> Self {
        Self::Injection {
            message: msg.into(),
        }
    }

    pub fn frame_format(line: usize, msg: impl Into<String>) -> Self {
        Self::FrameFormat {
            line,
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_format_message_carries_line_number() {
        let err = HandwaveError::frame_format(12, "expected value");
        assert_eq!(err.to_string(), "Malformed frame at line 12: expected value");
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = HandwaveError::FileNotFound {
            path: PathBuf::from("/tmp/frames.jsonl"),
        };
        assert_eq!(err.to_string(), "File not found: /tmp/frames.jsonl");
    }
}
