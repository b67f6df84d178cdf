//! Loading messages from an mbox file.
//!
//! The whole file is read into memory and split at `From ` separator lines.
//! A separator only counts at the very start of the file or right after an
//! empty line; anywhere else a line starting with `From ` is body text.
//!
//! # Example
//!
//! ```
//! use wlan_guest_log::Mailbox;
//!
//! let mbox = b"From box@fritz.box Mon Mar  2 10:00:00 2015\n\
//! Subject: Gastzugang\n\
//! \n\
//! <td>02.03.15 09:59:00</td>\n";
//!
//! let mailbox = Mailbox::from_bytes(mbox);
//! assert_eq!(mailbox.len(), 1);
//! let bodies = mailbox.bodies().unwrap();
//! assert!(bodies[0].contains("02.03.15"));
//! ```

use crate::error::{Error, Result};
use crate::parser;
use std::path::Path;
use tracing::{debug, instrument};

const SEPARATOR: &[u8] = b"From ";

/// Raw messages of one mbox file, in file order.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    messages: Vec<Vec<u8>>,
}

impl Mailbox {
    /// Reads and splits the mbox file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadMailbox`] if the file cannot be read.
    #[instrument(name = "Mailbox::open", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::ReadMailbox {
            path: path.to_path_buf(),
            source,
        })?;

        let mailbox = Self::from_bytes(&bytes);
        debug!(
            bytes = bytes.len(),
            messages = mailbox.len(),
            "Mailbox loaded"
        );
        Ok(mailbox)
    }

    /// Splits in-memory mbox content into messages.
    ///
    /// Content before the first separator line is ignored.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut messages = Vec::new();
        let mut current: Option<Vec<u8>> = None;
        let mut previous_blank = true;

        for line in bytes.split_inclusive(|&b| b == b'\n') {
            if previous_blank && line.starts_with(SEPARATOR) {
                if let Some(message) = current.take() {
                    messages.push(message);
                }
                current = Some(Vec::new());
                previous_blank = false;
                continue;
            }

            previous_blank = is_blank(line);
            if let Some(message) = current.as_mut() {
                message.extend_from_slice(line);
            }
        }

        if let Some(message) = current {
            messages.push(message);
        }

        Self { messages }
    }

    /// Returns the number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the mailbox holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the raw messages without their separator lines.
    #[must_use]
    pub fn messages(&self) -> &[Vec<u8>] {
        &self.messages
    }

    /// Decodes the body text of every message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseEmail`] or [`Error::ExtractBody`] for the first
    /// message that cannot be decoded.
    pub fn bodies(&self) -> Result<Vec<String>> {
        self.messages
            .iter()
            .enumerate()
            .map(|(index, raw)| parser::message_body(index, raw))
            .collect()
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|&b| b == b'\n' || b == b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_MESSAGES: &[u8] = b"From a@b Mon Mar  2 10:00:00 2015\n\
Subject: one\n\
\n\
first body\n\
\n\
From a@b Tue Mar  3 10:00:00 2015\n\
Subject: two\n\
\n\
second body\n";

    #[test]
    fn test_splits_on_separator_lines() {
        let mailbox = Mailbox::from_bytes(TWO_MESSAGES);
        assert_eq!(mailbox.len(), 2);
        assert!(mailbox.messages()[0].starts_with(b"Subject: one"));
        assert!(mailbox.messages()[1].starts_with(b"Subject: two"));
    }

    #[test]
    fn test_from_inside_body_is_not_a_separator() {
        let raw = b"From a@b Mon Mar  2 10:00:00 2015\n\
Subject: one\n\
\n\
line\n\
From here on it is body text\n";
        let mailbox = Mailbox::from_bytes(raw);
        assert_eq!(mailbox.len(), 1);
        let bodies = mailbox.bodies().unwrap();
        assert!(bodies[0].contains("From here on"));
    }

    #[test]
    fn test_preamble_is_ignored() {
        let raw = b"garbage before\n\nFrom a@b Mon Mar  2 10:00:00 2015\nSubject: x\n\nbody\n";
        let mailbox = Mailbox::from_bytes(raw);
        assert_eq!(mailbox.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let mailbox = Mailbox::from_bytes(b"");
        assert!(mailbox.is_empty());
        assert!(mailbox.bodies().unwrap().is_empty());
    }

    #[test]
    fn test_crlf_blank_lines() {
        let raw = b"From a@b x\r\nSubject: one\r\n\r\nbody\r\n\r\nFrom a@b y\r\nSubject: two\r\n\r\nbody\r\n";
        let mailbox = Mailbox::from_bytes(raw);
        assert_eq!(mailbox.len(), 2);
    }

    #[test]
    fn test_undecodable_body_names_its_message() {
        let raw = b"From a@b x\n\
Subject: fine\n\
\n\
body\n\
\n\
From a@b y\n\
Content-Transfer-Encoding: base64\n\
\n\
!!!! not base64 ????\n";
        let mailbox = Mailbox::from_bytes(raw);
        assert_eq!(mailbox.len(), 2);
        let err = mailbox.bodies().unwrap_err();
        assert!(matches!(err, Error::ExtractBody { index: 1, .. }));
    }

    #[test]
    fn test_open_missing_file() {
        let result = Mailbox::open("/definitely/not/here.mbox");
        assert!(matches!(result, Err(Error::ReadMailbox { .. })));
    }
}
