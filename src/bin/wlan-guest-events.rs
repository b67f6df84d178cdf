//! Prints one line per guest access event found in a router mailbox.
//!
//! ```bash
//! wlan-guest-events ~/Mail/fritzbox.mbox
//! RUST_LOG=wlan_guest_log=debug wlan-guest-events --collect-errors ~/Mail/fritzbox.mbox
//! ```

use clap::Parser;
use std::process::ExitCode;
use wlan_guest_log::cli::{self, EventsArgs};
use wlan_guest_log::report::event_line;
use wlan_guest_log::{AnalysisConfig, Analyzer, ErrorMode, Mailbox};

fn main() -> ExitCode {
    let args = EventsArgs::parse();
    cli::init_tracing();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => exit_code(cli::report_error(&e)),
    }
}

fn run(args: &EventsArgs) -> wlan_guest_log::Result<()> {
    let config = AnalysisConfig::builder()
        .error_mode(if args.collect_errors {
            ErrorMode::CollectAll
        } else {
            ErrorMode::FailFast
        })
        .build()?;
    let analyzer = Analyzer::new(config);

    let mailbox = Mailbox::open(&args.mbox)?;
    let pairs = analyzer.scan(&mailbox)?;

    // Records are printed as they are classified, so a fail-fast run still
    // shows everything before the first unknown phrasing.
    analyzer.classify_each(&pairs, |event| println!("{}", event_line(event)))?;
    Ok(())
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
