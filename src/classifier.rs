//! Classifying router event descriptions.
//!
//! The router words its guest access events in a small, fixed set of German
//! phrasings. Each phrasing comes with and without a trailing device name, so
//! the [`Classifier`] holds ten patterns, tried in a fixed order. A
//! description that fits none of them is reported back as
//! [`Classification::Unmatched`] instead of being guessed at.
//!
//! # Example
//!
//! ```
//! use wlan_guest_log::classifier::{Action, Classifier};
//!
//! let classifier = Classifier::new();
//! let fields = classifier
//!     .match_text("WLAN-Gerät hat sich vom Gastzugang abgemeldet. MAC-Adresse: AA:BB:CC:DD:EE:FF.")
//!     .unwrap();
//!
//! assert_eq!(fields.verb, "abgemeldet");
//! assert_eq!(fields.mac, "AA:BB:CC:DD:EE:FF");
//! assert_eq!(fields.name, None);
//! assert_eq!(fields.action, Action::Logout);
//! ```

use crate::extractor::RawPair;
use chrono::NaiveDateTime;
use regex::Regex;
use std::fmt;
use tracing::trace;

const MAC: &str = r"(?P<mac>(?:[0-9A-F]{2}:){5}[0-9A-F]{2})";
const NAME: &str = r", Name: (?P<name>.+)";
const SPEED: &str = r"Geschwindigkeit (?P<mbits>\d+) Mbit/s\. ";

/// What happened to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// The device joined guest access.
    Login,
    /// The device left guest access.
    Logout,
}

impl Action {
    /// Maps the router's verb to an action.
    ///
    /// ```
    /// use wlan_guest_log::classifier::Action;
    ///
    /// assert_eq!(Action::from_verb("angemeldet"), Some(Action::Login));
    /// assert_eq!(Action::from_verb("abgemeldet"), Some(Action::Logout));
    /// assert_eq!(Action::from_verb("gemeldet"), None);
    /// ```
    #[must_use]
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "angemeldet" => Some(Action::Login),
            "abgemeldet" => Some(Action::Logout),
            _ => None,
        }
    }

    /// The router's verb for this action.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Action::Login => "angemeldet",
            Action::Logout => "abgemeldet",
        }
    }

    /// Returns `true` for [`Action::Login`].
    #[must_use]
    pub fn is_login(self) -> bool {
        self == Action::Login
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Login => write!(f, "login"),
            Action::Logout => write!(f, "logout"),
        }
    }
}

/// The families of phrasings the router uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhrasingFamily {
    /// Logged out because the device stopped answering (`#0302`).
    DeviceNotResponding,
    /// Logged in for the first time.
    FirstLogin,
    /// Logged in again.
    Relogin,
    /// Logged out.
    Logout,
    /// Logged in.
    Login,
}

impl PhrasingFamily {
    /// The semantic action every phrasing of this family describes.
    #[must_use]
    pub fn action(self) -> Action {
        match self {
            PhrasingFamily::DeviceNotResponding | PhrasingFamily::Logout => Action::Logout,
            PhrasingFamily::FirstLogin | PhrasingFamily::Relogin | PhrasingFamily::Login => {
                Action::Login
            }
        }
    }

    fn template(self, name: &str) -> String {
        match self {
            PhrasingFamily::DeviceNotResponding => format!(
                r"WLAN-Gerät am Gastzugang wird (?P<action>abgemeldet): WLAN-Gerät antwortet nicht\. MAC-Adresse: {MAC}{name}\. \(#0302\)\."
            ),
            PhrasingFamily::FirstLogin => format!(
                r"WLAN-Gerät erstmalig über Gastzugang (?P<action>angemeldet)\. {SPEED}MAC-Adresse: {MAC}{name}\."
            ),
            PhrasingFamily::Relogin => format!(
                r"WLAN-Gerät hat sich am Gastzugang neu (?P<action>angemeldet)\. {SPEED}MAC-Adresse: {MAC}{name}\."
            ),
            PhrasingFamily::Logout => format!(
                r"WLAN-Gerät hat sich vom Gastzugang (?P<action>abgemeldet)\. MAC-Adresse: {MAC}{name}\."
            ),
            PhrasingFamily::Login => format!(
                r"WLAN-Gerät über Gastzugang (?P<action>angemeldet)\. {SPEED}MAC-Adresse: {MAC}{name}\."
            ),
        }
    }
}

/// Declared matching order. The first structural match wins.
const ORDER: [(PhrasingFamily, bool); 10] = [
    (PhrasingFamily::DeviceNotResponding, true),
    (PhrasingFamily::DeviceNotResponding, false),
    (PhrasingFamily::FirstLogin, true),
    (PhrasingFamily::FirstLogin, false),
    (PhrasingFamily::Relogin, true),
    (PhrasingFamily::Relogin, false),
    (PhrasingFamily::Logout, true),
    (PhrasingFamily::Logout, false),
    (PhrasingFamily::Login, true),
    (PhrasingFamily::Login, false),
];

/// One known phrasing: its family, whether it names the device, and the
/// compiled pattern covering the whole description.
#[derive(Debug, Clone)]
pub struct Phrasing {
    family: PhrasingFamily,
    named: bool,
    regex: Regex,
}

impl Phrasing {
    fn new(family: PhrasingFamily, named: bool) -> Self {
        let body = family.template(if named { NAME } else { "" });
        let regex = Regex::new(&format!("^(?:{body})$")).expect("valid phrasing regex");
        Self {
            family,
            named,
            regex,
        }
    }

    /// The family this phrasing belongs to.
    #[must_use]
    pub fn family(&self) -> PhrasingFamily {
        self.family
    }

    /// Whether this phrasing carries a device name.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.named
    }

    fn captures<'a>(&self, text: &'a str) -> Option<EventFields<'a>> {
        let caps = self.regex.captures(text)?;
        let verb = caps.name("action")?.as_str();
        let mac = caps.name("mac")?.as_str();
        Some(EventFields {
            family: self.family,
            action: self.family.action(),
            verb,
            mac,
            name: caps.name("name").map(|m| m.as_str()),
            mbits: caps.name("mbits").map(|m| m.as_str()),
        })
    }
}

/// The fields captured from one description, borrowed from the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFields<'a> {
    /// Family of the phrasing that matched.
    pub family: PhrasingFamily,
    /// Semantic action of that family.
    pub action: Action,
    /// The verb token as written by the router.
    pub verb: &'a str,
    /// MAC address, `XX:XX:XX:XX:XX:XX` in upper case hex.
    pub mac: &'a str,
    /// Device name, if the phrasing names it.
    pub name: Option<&'a str>,
    /// Link speed digits, login phrasings only.
    pub mbits: Option<&'a str>,
}

/// A classified event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuredEvent {
    /// When the event was logged.
    pub timestamp: NaiveDateTime,
    /// What happened.
    pub action: Action,
    /// Device MAC address.
    pub mac: String,
    /// Device name, if the router gave one.
    pub name: Option<String>,
    /// Link speed in Mbit/s, logins only.
    pub mbits: Option<u64>,
}

impl fmt::Display for StructuredEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mac={} name={} mbits=",
            self.action.verb(),
            self.mac,
            self.name.as_deref().unwrap_or("-"),
        )?;
        match self.mbits {
            Some(mbits) => write!(f, "{mbits}"),
            None => write!(f, "-"),
        }
    }
}

/// Outcome of classifying one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A known phrasing matched.
    Matched(StructuredEvent),
    /// No known phrasing matched; carries the pair unchanged.
    Unmatched(RawPair),
    /// A login phrasing matched but its link speed does not fit `u64`.
    SpeedOutOfRange(RawPair),
}

/// The ordered table of known phrasings.
///
/// Build it once and pass it to whatever needs to classify; it holds no
/// state between calls.
#[derive(Debug, Clone)]
pub struct Classifier {
    phrasings: Vec<Phrasing>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// Compiles the ten known phrasings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phrasings: ORDER
                .iter()
                .map(|&(family, named)| Phrasing::new(family, named))
                .collect(),
        }
    }

    /// The phrasings in matching order.
    #[must_use]
    pub fn phrasings(&self) -> &[Phrasing] {
        &self.phrasings
    }

    /// Matches `text` against the phrasings in order and returns the raw
    /// captures of the first one that covers the whole text.
    #[must_use]
    pub fn match_text<'a>(&self, text: &'a str) -> Option<EventFields<'a>> {
        self.phrasings.iter().find_map(|p| p.captures(text))
    }

    /// Classifies one pair.
    ///
    /// A link speed too large for `u64` is reported as
    /// [`Classification::SpeedOutOfRange`]; the phrasing itself is known.
    #[must_use]
    pub fn classify(&self, pair: &RawPair) -> Classification {
        let Some(fields) = self.match_text(&pair.text) else {
            trace!(text = %pair.text, "No phrasing matched");
            return Classification::Unmatched(pair.clone());
        };

        let Ok(mbits) = fields.mbits.map(str::parse::<u64>).transpose() else {
            trace!(text = %pair.text, "Link speed out of range");
            return Classification::SpeedOutOfRange(pair.clone());
        };

        trace!(
            family = ?fields.family,
            named = fields.name.is_some(),
            mac = fields.mac,
            "Phrasing matched"
        );
        Classification::Matched(StructuredEvent {
            timestamp: pair.timestamp,
            action: fields.action,
            mac: fields.mac.to_string(),
            name: fields.name.map(ToString::to_string),
            mbits,
        })
    }
}
