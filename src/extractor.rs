//! Pulling (timestamp, event description) pairs out of notification bodies.
//!
//! The router lays its log out as an HTML table whose cells alternate between
//! a timestamp and an event description. Digest emails repeat lines that were
//! already sent, so pairs are collected across all messages, deduplicated by
//! value and sorted.

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

static CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<td>([^<]+)</td>").expect("valid regex"));

/// One log line: when it happened and what the router said about it.
///
/// Ordering is by timestamp, then by text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawPair {
    /// When the event was logged.
    pub timestamp: NaiveDateTime,
    /// The event description, verbatim apart from surrounding whitespace.
    pub text: String,
}

impl RawPair {
    /// Creates a pair.
    #[must_use]
    pub fn new(timestamp: NaiveDateTime, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }
}

/// Parses day-first timestamp strings against an ordered list of formats.
#[derive(Debug, Clone)]
pub struct TimestampParser {
    formats: Vec<String>,
}

impl TimestampParser {
    /// Creates a parser trying `formats` in order.
    #[must_use]
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }

    /// Parses one timestamp cell.
    ///
    /// Date-only formats resolve to midnight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnparseableTimestamp`] if no format fits.
    pub fn parse(&self, value: &str) -> Result<NaiveDateTime> {
        let trimmed = value.trim();
        self.formats
            .iter()
            .find_map(|format| {
                NaiveDateTime::parse_from_str(trimmed, format)
                    .ok()
                    .or_else(|| {
                        NaiveDate::parse_from_str(trimmed, format)
                            .ok()
                            .map(|date| date.and_time(NaiveTime::MIN))
                    })
            })
            .ok_or_else(|| Error::UnparseableTimestamp {
                value: value.to_string(),
            })
    }
}

/// Returns the inner text of every `<td>` cell in `body`, in document order.
///
/// Line breaks are removed first because cells may be wrapped.
#[must_use]
pub fn table_cells(body: &str) -> Vec<String> {
    let flat: String = body.chars().filter(|&c| c != '\n' && c != '\r').collect();
    CELL.captures_iter(&flat)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Extracts the deduplicated, chronologically sorted pairs from all bodies.
///
/// Cells pair up positionally; a trailing cell without a partner is ignored.
///
/// # Errors
///
/// Returns [`Error::UnparseableTimestamp`] for the first timestamp cell that
/// cannot be parsed. No pairs are returned in that case.
pub fn extract_pairs<S: AsRef<str>>(
    bodies: &[S],
    timestamps: &TimestampParser,
) -> Result<Vec<RawPair>> {
    let mut unique = BTreeSet::new();
    let mut total = 0usize;

    for body in bodies {
        let cells = table_cells(body.as_ref());
        for chunk in cells.chunks_exact(2) {
            let timestamp = timestamps.parse(&chunk[0])?;
            unique.insert(RawPair::new(timestamp, chunk[1].as_str()));
            total += 1;
        }
    }

    debug!(
        messages = bodies.len(),
        pairs = total,
        unique = unique.len(),
        "Extracted event pairs"
    );
    Ok(unique.into_iter().collect())
}
