use std::path::PathBuf;

use clap::Args;
use hnpulse_core::{PollDriver, Session};

use super::CliResult;
use crate::render::{ConsoleNotifier, TerminalRenderer};

#[derive(Args)]
pub struct CheckArgs {
    /// Print the menu and notifications as JSON lines
    #[arg(long)]
    pub json: bool,
    /// Open notified stories in the browser
    #[arg(long)]
    pub open: bool,
    /// Alternative API root (for mirrors and testing)
    #[arg(long, hide = true)]
    pub api_base: Option<String>,
}

pub fn run(data_dir: Option<PathBuf>, args: CheckArgs) -> CliResult {
    let store = super::open_store(data_dir)?;
    let source = super::client(args.api_base.as_deref())?;
    let session = Session::open(store);
    let renderer = TerminalRenderer::new(args.json);
    let notifier = ConsoleNotifier::new(args.json, args.open);

    let (mut driver, _handle) = PollDriver::new(source, session, notifier, renderer);
    let report = super::runtime()?.block_on(driver.tick());

    match report {
        Some(report) => {
            if report.baseline && !args.json {
                println!("First run: {} stories recorded as seen.", report.newly_seen);
            }
            Ok(())
        }
        None => Err("could not fetch top stories".into()),
    }
}
