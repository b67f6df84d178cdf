//! Error types for the wlan-guest-log crate.
//!
//! Every error is fatal for a run: the tool processes a mailbox as one batch
//! and never emits partial results. Use [`Error::category`] to group errors
//! in logs, and [`Error::exit_code`] to turn them into a process status.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while analysing a mailbox.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Invalid configuration provided.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // I/O errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to read the mailbox file.
    #[error("failed to read mailbox {}", path.display())]
    ReadMailbox {
        /// The mailbox path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Parsing errors (malformed content won't change on a second attempt)
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to parse a message from the mailbox.
    #[error("failed to parse message #{index}")]
    ParseEmail {
        /// Zero-based position of the message in the mailbox.
        index: usize,
        /// The underlying parse error.
        #[source]
        source: mailparse::MailParseError,
    },

    /// Failed to decode the body of a message.
    #[error("failed to extract body of message #{index}")]
    ExtractBody {
        /// Zero-based position of the message in the mailbox.
        index: usize,
        /// The underlying parse error.
        #[source]
        source: mailparse::MailParseError,
    },

    /// A timestamp cell could not be parsed as a date-time.
    #[error("unparseable timestamp: {value:?}")]
    UnparseableTimestamp {
        /// The cell text as found in the message.
        value: String,
    },

    /// A known login phrasing carried a link speed too large to represent.
    #[error("link speed out of range: {text}")]
    LinkSpeedOutOfRange {
        /// The event description, trimmed of surrounding whitespace.
        text: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Classification errors
    // ─────────────────────────────────────────────────────────────────────────
    /// An event description matched none of the known phrasings.
    #[error("Could not match: {text}")]
    UnmatchedEvent {
        /// The event description as extracted from its table cell: verbatim
        /// apart from surrounding whitespace, which is trimmed.
        text: String,
    },

    /// Several event descriptions matched none of the known phrasings.
    #[error("could not match {} event descriptions", texts.len())]
    UnmatchedEvents {
        /// Every unmatched event description in order, each trimmed like
        /// [`Error::UnmatchedEvent::text`](Error::UnmatchedEvent).
        texts: Vec<String>,
    },
}

impl Error {
    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidConfig { .. } => ErrorCategory::Configuration,
            Error::ReadMailbox { .. } => ErrorCategory::Io,
            Error::ParseEmail { .. }
            | Error::ExtractBody { .. }
            | Error::UnparseableTimestamp { .. }
            | Error::LinkSpeedOutOfRange { .. } => ErrorCategory::Parse,
            Error::UnmatchedEvent { .. } | Error::UnmatchedEvents { .. } => {
                ErrorCategory::Classification
            }
        }
    }

    /// Returns the process exit status the command line tools use for this error.
    ///
    /// Unmatched event descriptions exit with `1`; everything else with `2`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Classification => 1,
            _ => 2,
        }
    }

    /// Returns the unmatched event descriptions carried by this error, if any.
    #[must_use]
    pub fn unmatched_texts(&self) -> Vec<&str> {
        match self {
            Error::UnmatchedEvent { text } => vec![text.as_str()],
            Error::UnmatchedEvents { texts } => texts.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// Error categories for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Configuration or validation errors.
    Configuration,
    /// Reading the mailbox failed.
    Io,
    /// Message or timestamp parsing errors.
    Parse,
    /// Unknown event phrasing.
    Classification,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Parse => write!(f, "parse"),
            ErrorCategory::Classification => write!(f, "classification"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = Error::InvalidConfig {
            message: "bad".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let err = Error::UnparseableTimestamp {
            value: "yesterday".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Parse);

        let err = Error::LinkSpeedOutOfRange {
            text: "Geschwindigkeit 99999999999999999999999 Mbit/s.".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Parse);
        assert_eq!(err.exit_code(), 2);
        assert!(err.unmatched_texts().is_empty());

        let err = Error::UnmatchedEvent {
            text: "Something new".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Classification);
    }

    #[test]
    fn test_exit_codes() {
        let err = Error::UnmatchedEvent {
            text: "Something new".into(),
        };
        assert_eq!(err.exit_code(), 1);

        let err = Error::ReadMailbox {
            path: "missing.mbox".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_unmatched_message_is_verbatim() {
        let err = Error::UnmatchedEvent {
            text: "WLAN-Gerät tanzt.".into(),
        };
        assert_eq!(err.to_string(), "Could not match: WLAN-Gerät tanzt.");
        assert_eq!(err.unmatched_texts(), vec!["WLAN-Gerät tanzt."]);
    }

    #[test]
    fn test_collected_unmatched_texts() {
        let err = Error::UnmatchedEvents {
            texts: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "could not match 2 event descriptions");
        assert_eq!(err.unmatched_texts(), vec!["a", "b"]);
        assert_eq!(err.exit_code(), 1);
    }
}
