//! Prints the reconstructed guest access sessions of every device.
//!
//! ```bash
//! wlan-guest-sessions ~/Mail/fritzbox.mbox
//! ```

use clap::Parser;
use std::process::ExitCode;
use wlan_guest_log::cli::{self, SessionsArgs};
use wlan_guest_log::report::render_sessions;
use wlan_guest_log::{AnalysisConfig, Analyzer, ErrorMode, Mailbox, OrphanLogoutPolicy};

fn main() -> ExitCode {
    let args = SessionsArgs::parse();
    cli::init_tracing();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => exit_code(cli::report_error(&e)),
    }
}

fn run(args: &SessionsArgs) -> wlan_guest_log::Result<()> {
    let config = AnalysisConfig::builder()
        .error_mode(if args.collect_errors {
            ErrorMode::CollectAll
        } else {
            ErrorMode::FailFast
        })
        .orphan_logouts(if args.drop_orphan_logouts {
            OrphanLogoutPolicy::Drop
        } else {
            OrphanLogoutPolicy::Keep
        })
        .build()?;

    let mailbox = Mailbox::open(&args.mbox)?;
    let report = Analyzer::new(config).sessions(&mailbox)?;

    print!("{}", render_sessions(&report));
    Ok(())
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
