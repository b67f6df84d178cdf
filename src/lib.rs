//! # wlan-guest-log
//!
//! Reconstructs guest WiFi sessions from a mailbox of router notification
//! emails.
//!
//! Home routers can mail their guest access log as an HTML table of
//! timestamp / event description cells, written in German. This crate:
//! - Loads the notifications from an mbox file ([`Mailbox`])
//! - Extracts deduplicated, sorted (timestamp, description) pairs ([`extractor`])
//! - Classifies each description against the known phrasings ([`classifier`])
//! - Walks each device's logins and logouts into closed sessions ([`intervals`])
//!
//! ## Quick Start
//!
//! ```no_run
//! use wlan_guest_log::{Analyzer, Mailbox};
//! use wlan_guest_log::report::render_sessions;
//!
//! # fn example() -> wlan_guest_log::Result<()> {
//! let mailbox = Mailbox::open("fritzbox.mbox")?;
//! let report = Analyzer::default().sessions(&mailbox)?;
//! print!("{}", render_sessions(&report));
//! # Ok(())
//! # }
//! ```
//!
//! ## Classifying a single description
//!
//! ```
//! use wlan_guest_log::classifier::{Action, Classifier};
//!
//! let classifier = Classifier::new();
//! let fields = classifier
//!     .match_text("WLAN-Gerät über Gastzugang angemeldet. Geschwindigkeit 300 Mbit/s. MAC-Adresse: 11:22:33:44:55:66, Name: phone.")
//!     .unwrap();
//! assert_eq!(fields.action, Action::Login);
//! assert_eq!(fields.name, Some("phone"));
//! ```
//!
//! ## Error Handling
//!
//! Every error aborts the run; nothing is reported from a partially
//! understood mailbox. An unknown phrasing surfaces as
//! [`Error::UnmatchedEvent`] with the text verbatim, or as
//! [`Error::UnmatchedEvents`] when [`ErrorMode::CollectAll`] is configured.
//!
//! ## Observability
//!
//! The crate uses `tracing`. The pipeline steps run inside the spans
//! `Mailbox::open`, `Analyzer::scan`, `Analyzer::classify_all` and
//! `Analyzer::sessions`. Unknown phrasings and logouts without a login are
//! logged at `warn`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
pub mod analyzer;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod intervals;
pub mod mailbox;
pub mod report;

// Internal modules
mod parser;

// Re-exports for ergonomic API
pub use analyzer::Analyzer;
pub use classifier::{Action, Classification, Classifier, StructuredEvent};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ErrorMode, OrphanLogoutPolicy};
pub use error::{Error, ErrorCategory, Result};
pub use extractor::RawPair;
pub use intervals::{ConnectionInterval, DeviceTimeline, SessionReport};
pub use mailbox::Mailbox;
