use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use hnpulse_core::poller::DEFAULT_INTERVAL;
use hnpulse_core::{DisplayCount, DriverHandle, FilterSet, PollDriver, Session};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::CliResult;
use crate::render::{ConsoleNotifier, SharedRows, TerminalRenderer};

#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between automatic refreshes
    #[arg(long, default_value_t = DEFAULT_INTERVAL.as_secs())]
    pub interval_secs: u64,
    /// Print menus and notifications as JSON lines
    #[arg(long)]
    pub json: bool,
    /// Open notified stories in the browser
    #[arg(long)]
    pub open: bool,
    /// Alternative API root (for mirrors and testing)
    #[arg(long, hide = true)]
    pub api_base: Option<String>,
}

/// One line typed at the watch prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum PromptAction {
    Refresh,
    Max(DisplayCount),
    Filters(FilterSet),
    Open(usize),
    Help,
    Quit,
}

const PROMPT_HELP: &str = "commands: r | max <5|10|15|20|25> | filters <a, b> | open <rank> | q";

/// Parse a prompt line. Blank lines yield `Ok(None)`.
pub fn parse_prompt(line: &str) -> Result<Option<PromptAction>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let action = match word.to_lowercase().as_str() {
        "r" | "refresh" => PromptAction::Refresh,
        "q" | "quit" | "exit" => PromptAction::Quit,
        "h" | "help" | "?" => PromptAction::Help,
        "max" => {
            let n: u32 = rest
                .parse()
                .map_err(|_| format!("expected a number, got '{rest}'"))?;
            PromptAction::Max(DisplayCount::new(n).map_err(|e| e.to_string())?)
        }
        "filters" | "filter" => PromptAction::Filters(FilterSet::parse(rest)),
        "open" | "o" => {
            let rank: usize = rest
                .parse()
                .map_err(|_| format!("expected a rank, got '{rest}'"))?;
            PromptAction::Open(rank)
        }
        other => return Err(format!("unknown command '{other}' ({PROMPT_HELP})")),
    };
    Ok(Some(action))
}

fn open_rank(rows: &SharedRows, rank: usize) {
    let url = rows
        .lock()
        .ok()
        .and_then(|rows| rows.iter().find(|row| row.rank == rank).map(|row| row.url.clone()));
    match url {
        Some(url) => {
            if let Err(e) = open::that(&url) {
                eprintln!("could not open {url}: {e}");
            }
        }
        None => eprintln!("no story at rank {rank}"),
    }
}

/// Forward stdin lines to the driver. Stops at end of input without quitting,
/// so the watcher keeps running when stdin is not a terminal.
async fn read_prompt(handle: DriverHandle, rows: SharedRows) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("stdin closed: {e}");
                break;
            }
        };

        match parse_prompt(&line) {
            Ok(None) => {}
            Ok(Some(PromptAction::Refresh)) => {
                if !handle.refresh() {
                    eprintln!("refresh already pending");
                }
            }
            Ok(Some(PromptAction::Max(count))) => {
                handle.set_max_display_count(count);
            }
            Ok(Some(PromptAction::Filters(filters))) => {
                handle.set_filters(filters);
            }
            Ok(Some(PromptAction::Open(rank))) => open_rank(&rows, rank),
            Ok(Some(PromptAction::Help)) => eprintln!("{PROMPT_HELP}"),
            Ok(Some(PromptAction::Quit)) => {
                handle.quit();
                break;
            }
            Err(message) => eprintln!("{message}"),
        }
    }
}

pub fn run(data_dir: Option<PathBuf>, args: WatchArgs) -> CliResult {
    if args.interval_secs == 0 {
        return Err("--interval-secs must be at least 1".into());
    }

    let store = super::open_store(data_dir)?;
    let source = super::client(args.api_base.as_deref())?;
    let session = Session::open(store);
    let renderer = TerminalRenderer::new(args.json);
    let rows = renderer.rows();
    let notifier = ConsoleNotifier::new(args.json, args.open);

    let runtime = super::runtime()?;
    runtime.block_on(async {
        let (driver, handle) = PollDriver::new(source, session, notifier, renderer);
        let driver = driver.with_interval(Duration::from_secs(args.interval_secs));

        tokio::spawn(read_prompt(handle, rows));

        if !args.json {
            eprintln!("{PROMPT_HELP}");
        }
        driver.run().await;
    });
    // The stdin reader sits in a blocking read; don't wait for it.
    runtime.shutdown_background();
    Ok(())
}
