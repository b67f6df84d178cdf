//! The analysis pipeline: mailbox → pairs → events → sessions.
//!
//! # Example
//!
//! ```
//! use wlan_guest_log::{AnalysisConfig, Analyzer, Mailbox};
//!
//! # fn example() -> wlan_guest_log::Result<()> {
//! let mbox = "From box@fritz.box Fri Apr  3 12:00:00 2015\n\
//! Content-Type: text/html; charset=utf-8\n\
//! \n\
//! <table>\n\
//! <tr><td>03.04.15 10:00:00</td><td>WLAN-Gerät über Gastzugang angemeldet. Geschwindigkeit 300 Mbit/s. MAC-Adresse: 11:22:33:44:55:66, Name: phone.</td></tr>\n\
//! <tr><td>03.04.15 11:00:00</td><td>WLAN-Gerät hat sich vom Gastzugang abgemeldet. MAC-Adresse: 11:22:33:44:55:66, Name: phone.</td></tr>\n\
//! </table>\n";
//!
//! let analyzer = Analyzer::new(AnalysisConfig::default());
//! let report = analyzer.sessions(&Mailbox::from_bytes(mbox.as_bytes()))?;
//! assert_eq!(report["11:22:33:44:55:66"].len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use crate::classifier::{Classification, Classifier, StructuredEvent};
use crate::config::{AnalysisConfig, ErrorMode};
use crate::error::{Error, Result};
use crate::extractor::{self, RawPair, TimestampParser};
use crate::intervals::{self, SessionReport};
use crate::mailbox::Mailbox;
use tracing::{debug, instrument, warn};

/// Runs the extraction, classification and session reconstruction steps
/// with one configuration and one compiled [`Classifier`].
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    classifier: Classifier,
    timestamps: TimestampParser,
}

impl Analyzer {
    /// Creates an analyzer, compiling the phrasing table.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_classifier(config, Classifier::new())
    }

    /// Creates an analyzer around an existing classifier.
    #[must_use]
    pub fn with_classifier(config: AnalysisConfig, classifier: Classifier) -> Self {
        let timestamps = TimestampParser::new(config.timestamp_formats.clone());
        Self {
            config,
            classifier,
            timestamps,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The classifier in use.
    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Decodes every message and extracts the sorted, deduplicated pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a message cannot be decoded or a timestamp cannot
    /// be parsed.
    #[instrument(name = "Analyzer::scan", skip_all, fields(messages = mailbox.len()))]
    pub fn scan(&self, mailbox: &Mailbox) -> Result<Vec<RawPair>> {
        let bodies = mailbox.bodies()?;
        extractor::extract_pairs(&bodies, &self.timestamps)
    }

    /// Classifies every pair according to the configured [`ErrorMode`].
    ///
    /// # Errors
    ///
    /// - [`ErrorMode::FailFast`]: [`Error::UnmatchedEvent`] for the first
    ///   unmatched description.
    /// - [`ErrorMode::CollectAll`]: [`Error::UnmatchedEvents`] listing every
    ///   unmatched description, after all pairs were tried.
    /// - In either mode, [`Error::LinkSpeedOutOfRange`] as soon as a known
    ///   phrasing carries an unrepresentable link speed.
    pub fn classify_all(&self, pairs: &[RawPair]) -> Result<Vec<StructuredEvent>> {
        self.classify_each(pairs, |_| {})
    }

    /// Like [`classify_all`](Self::classify_all), but hands every matched
    /// event to `on_event` as soon as it is classified, before any error for
    /// a later pair is returned.
    ///
    /// # Errors
    ///
    /// Same as [`classify_all`](Self::classify_all).
    #[instrument(
        name = "Analyzer::classify_all",
        skip_all,
        fields(pairs = pairs.len(), mode = ?self.config.error_mode)
    )]
    pub fn classify_each<F>(&self, pairs: &[RawPair], mut on_event: F) -> Result<Vec<StructuredEvent>>
    where
        F: FnMut(&StructuredEvent),
    {
        let mut events = Vec::with_capacity(pairs.len());
        let mut unmatched = Vec::new();

        for pair in pairs {
            match self.classifier.classify(pair) {
                Classification::Matched(event) => {
                    on_event(&event);
                    events.push(event);
                }
                Classification::SpeedOutOfRange(pair) => {
                    warn!(timestamp = %pair.timestamp, text = %pair.text, "Link speed out of range");
                    return Err(Error::LinkSpeedOutOfRange { text: pair.text });
                }
                Classification::Unmatched(pair) => {
                    warn!(timestamp = %pair.timestamp, text = %pair.text, "Unknown event phrasing");
                    match self.config.error_mode {
                        ErrorMode::FailFast => {
                            return Err(Error::UnmatchedEvent { text: pair.text });
                        }
                        ErrorMode::CollectAll => unmatched.push(pair.text),
                    }
                }
            }
        }

        if !unmatched.is_empty() {
            return Err(Error::UnmatchedEvents { texts: unmatched });
        }

        debug!(events = events.len(), "Classified all pairs");
        Ok(events)
    }

    /// Runs the whole pipeline and returns the closed sessions per device.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`scan`](Self::scan) or
    /// [`classify_all`](Self::classify_all).
    #[instrument(name = "Analyzer::sessions", skip_all, fields(messages = mailbox.len()))]
    pub fn sessions(&self, mailbox: &Mailbox) -> Result<SessionReport> {
        let pairs = self.scan(mailbox)?;
        let events = self.classify_all(&pairs)?;
        Ok(intervals::reconstruct(&events, self.config.orphan_logouts))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const LOGOUT: &str =
        "WLAN-Gerät hat sich vom Gastzugang abgemeldet. MAC-Adresse: AA:BB:CC:DD:EE:FF.";

    fn pair(hour: u32, text: &str) -> RawPair {
        let at = NaiveDate::from_ymd_opt(2015, 4, 3)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        RawPair::new(at, text)
    }

    #[test]
    fn test_fail_fast_stops_at_first_unmatched() {
        let analyzer = Analyzer::default();
        let pairs = [pair(1, LOGOUT), pair(2, "first"), pair(3, "second")];

        let err = analyzer.classify_all(&pairs).unwrap_err();
        assert!(matches!(err, Error::UnmatchedEvent { ref text } if text == "first"));
    }

    #[test]
    fn test_collect_all_reports_everything() {
        let config = AnalysisConfig::builder()
            .error_mode(ErrorMode::CollectAll)
            .build()
            .unwrap();
        let analyzer = Analyzer::new(config);
        let pairs = [pair(1, "first"), pair(2, LOGOUT), pair(3, "second")];

        let err = analyzer.classify_all(&pairs).unwrap_err();
        assert_eq!(err.unmatched_texts(), vec!["first", "second"]);
    }

    #[test]
    fn test_classify_each_reports_events_before_failing() {
        let analyzer = Analyzer::default();
        let pairs = [pair(1, LOGOUT), pair(2, "unknown"), pair(3, LOGOUT)];

        let mut seen = Vec::new();
        let err = analyzer
            .classify_each(&pairs, |event| seen.push(event.timestamp))
            .unwrap_err();

        assert_eq!(seen, vec![pairs[0].timestamp]);
        assert!(matches!(err, Error::UnmatchedEvent { ref text } if text == "unknown"));
    }

    #[test]
    fn test_speed_out_of_range_is_not_an_unmatched_phrasing() {
        let config = AnalysisConfig::builder()
            .error_mode(ErrorMode::CollectAll)
            .build()
            .unwrap();
        let text = "WLAN-Gerät über Gastzugang angemeldet. Geschwindigkeit 99999999999999999999999 Mbit/s. MAC-Adresse: AA:BB:CC:DD:EE:FF.";

        let err = Analyzer::new(config)
            .classify_all(&[pair(1, text)])
            .unwrap_err();

        assert!(matches!(err, Error::LinkSpeedOutOfRange { ref text } if text.contains("Mbit/s")));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_unmatched_text_is_trimmed_cell_text() {
        let mbox = b"From box@fritz.box x\n\
\n\
<td>03.04.15 10:00:00</td><td>  Router tanzt. \n</td>\n";
        let err = Analyzer::default()
            .sessions(&Mailbox::from_bytes(mbox))
            .unwrap_err();
        assert_eq!(err.to_string(), "Could not match: Router tanzt.");
    }

    #[test]
    fn test_all_matched() {
        let analyzer = Analyzer::default();
        let events = analyzer.classify_all(&[pair(1, LOGOUT)]).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].mac, "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_empty_mailbox_gives_empty_report() {
        let report = Analyzer::default()
            .sessions(&Mailbox::from_bytes(b""))
            .unwrap();
        assert!(report.is_empty());
    }
}
