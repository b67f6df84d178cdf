//! Configuration for mailbox analysis.
//!
//! Use [`AnalysisConfigBuilder`] to create a configuration with sensible defaults:
//!
//! ```
//! use wlan_guest_log::{AnalysisConfig, ErrorMode};
//!
//! let config = AnalysisConfig::builder()
//!     .error_mode(ErrorMode::CollectAll)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.error_mode, ErrorMode::CollectAll);
//! ```

use crate::error::{Error, Result};

/// Timestamp layouts tried in order, all day-first.
///
/// Date-only layouts resolve to midnight.
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%d.%m.%y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%y %H:%M",
    "%d.%m.%Y %H:%M",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y-%m-%d",
];

/// How unmatched event descriptions are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Stop at the first unmatched description.
    #[default]
    FailFast,
    /// Classify everything, then report every unmatched description at once.
    CollectAll,
}

/// What to do with a logout that arrives while a device is not logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrphanLogoutPolicy {
    /// Emit an interval anyway. Its start is the device's previous login in
    /// this run, or unknown if there was none.
    #[default]
    Keep,
    /// Emit nothing for such a logout.
    Drop,
}

/// Configuration for an analysis run.
///
/// Create using [`AnalysisConfig::builder()`].
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Handling of unmatched event descriptions.
    pub error_mode: ErrorMode,
    /// Handling of logouts without a preceding login.
    pub orphan_logouts: OrphanLogoutPolicy,
    /// chrono format strings for timestamp cells, tried in order.
    pub timestamp_formats: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::default(),
            orphan_logouts: OrphanLogoutPolicy::default(),
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl AnalysisConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    error_mode: Option<ErrorMode>,
    orphan_logouts: Option<OrphanLogoutPolicy>,
    timestamp_formats: Option<Vec<String>>,
}

impl AnalysisConfigBuilder {
    /// Sets how unmatched event descriptions are handled.
    ///
    /// Default is [`ErrorMode::FailFast`].
    #[must_use]
    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = Some(mode);
        self
    }

    /// Sets what happens to logouts without a preceding login.
    ///
    /// Default is [`OrphanLogoutPolicy::Keep`].
    #[must_use]
    pub fn orphan_logouts(mut self, policy: OrphanLogoutPolicy) -> Self {
        self.orphan_logouts = Some(policy);
        self
    }

    /// Replaces the timestamp formats.
    ///
    /// Formats use chrono's `strftime` syntax and are tried in order.
    #[must_use]
    pub fn timestamp_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timestamp_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Appends a timestamp format after the current ones.
    #[must_use]
    pub fn add_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_formats
            .get_or_insert_with(|| AnalysisConfig::default().timestamp_formats)
            .push(format.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if no timestamp format is left.
    pub fn build(self) -> Result<AnalysisConfig> {
        let defaults = AnalysisConfig::default();

        let timestamp_formats = self
            .timestamp_formats
            .unwrap_or(defaults.timestamp_formats);
        if timestamp_formats.is_empty() {
            return Err(Error::InvalidConfig {
                message: "at least one timestamp format is required".into(),
            });
        }
        if let Some(blank) = timestamp_formats.iter().find(|f| f.trim().is_empty()) {
            return Err(Error::InvalidConfig {
                message: format!("blank timestamp format {blank:?}"),
            });
        }

        Ok(AnalysisConfig {
            error_mode: self.error_mode.unwrap_or(defaults.error_mode),
            orphan_logouts: self.orphan_logouts.unwrap_or(defaults.orphan_logouts),
            timestamp_formats,
        })
    }
}
