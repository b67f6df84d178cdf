//! Shared plumbing for the `wlan-guest-events` and `wlan-guest-sessions` binaries.

use crate::error::Error;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Arguments of `wlan-guest-events`.
#[derive(Debug, Parser)]
#[command(version, about = "Print every guest access event found in a router mailbox")]
pub struct EventsArgs {
    /// Path to the mbox file with the router's notification emails
    pub mbox: PathBuf,

    /// Report every unmatched event description instead of stopping at the first
    #[arg(long)]
    pub collect_errors: bool,
}

/// Arguments of `wlan-guest-sessions`.
#[derive(Debug, Parser)]
#[command(version, about = "Print the guest access sessions of every device in a router mailbox")]
pub struct SessionsArgs {
    /// Path to the mbox file with the router's notification emails
    pub mbox: PathBuf,

    /// Report every unmatched event description instead of stopping at the first
    #[arg(long)]
    pub collect_errors: bool,

    /// Skip logouts that have no login before them
    #[arg(long)]
    pub drop_orphan_logouts: bool,
}

/// Installs a stderr `tracing` subscriber controlled by `RUST_LOG`.
///
/// Defaults to `wlan_guest_log=warn` so stdout only carries the report.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wlan_guest_log=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Prints a diagnostic for `error` and returns the exit status to use.
///
/// Unmatched descriptions are printed verbatim to stdout, one per line, as
/// `Could not match: <text>`. Other errors go to stderr with their causes.
#[must_use]
pub fn report_error(error: &Error) -> i32 {
    let unmatched = error.unmatched_texts();
    if unmatched.is_empty() {
        eprintln!("error: {error}");
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
    } else {
        for text in unmatched {
            println!("Could not match: {text}");
        }
    }

    tracing::debug!(category = %error.category(), "Run failed");
    error.exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definitions() {
        EventsArgs::command().debug_assert();
        SessionsArgs::command().debug_assert();
    }

    #[test]
    fn test_positional_only() {
        let args = SessionsArgs::try_parse_from(["wlan-guest-sessions", "box.mbox"]).unwrap();
        assert_eq!(args.mbox, PathBuf::from("box.mbox"));
        assert!(!args.collect_errors);
        assert!(!args.drop_orphan_logouts);
    }

    #[test]
    fn test_mbox_is_required() {
        assert!(EventsArgs::try_parse_from(["wlan-guest-events"]).is_err());
    }

    #[test]
    fn test_report_error_exit_codes() {
        let err = Error::UnmatchedEvent { text: "x".into() };
        assert_eq!(report_error(&err), 1);

        let err = Error::UnparseableTimestamp { value: "x".into() };
        assert_eq!(report_error(&err), 2);
    }
}
