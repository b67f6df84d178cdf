//! Example: session report that lists every unknown phrasing and skips
//! logouts without a login.
//!
//! # Usage
//!
//! ```bash
//! export RUST_LOG=wlan_guest_log=debug
//! cargo run --example strict_sessions -- ~/Mail/fritzbox.mbox
//! ```

use std::env;
use tracing_subscriber::EnvFilter;
use wlan_guest_log::report::interval_line;
use wlan_guest_log::{AnalysisConfig, Analyzer, ErrorMode, Mailbox, OrphanLogoutPolicy};

fn main() -> wlan_guest_log::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wlan_guest_log=info")),
        )
        .with_target(true)
        .init();

    let path = env::args().nth(1).expect("usage: strict_sessions <MBOX>");

    let config = AnalysisConfig::builder()
        .error_mode(ErrorMode::CollectAll)
        .orphan_logouts(OrphanLogoutPolicy::Drop)
        .build()?;
    let analyzer = Analyzer::new(config);

    let mailbox = Mailbox::open(&path)?;
    tracing::info!(messages = mailbox.len(), "Mailbox loaded");

    let report = match analyzer.sessions(&mailbox) {
        Ok(report) => report,
        Err(e) => {
            for text in e.unmatched_texts() {
                println!("unknown phrasing: {text}");
            }
            return Err(e);
        }
    };

    for (mac, intervals) in &report {
        let total = intervals
            .iter()
            .filter_map(|i| i.duration())
            .fold(chrono::Duration::zero(), |acc, d| acc + d);
        println!("{mac}: {} sessions, {} minutes", intervals.len(), total.num_minutes());
        for interval in intervals {
            println!("  {}", interval_line(interval));
        }
    }

    Ok(())
}
