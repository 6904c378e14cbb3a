use std::path::PathBuf;

use clap::Subcommand;
use hnpulse_core::{Session, StateStore};

use super::CliResult;

#[derive(Subcommand)]
pub enum SeenAction {
    /// Number of stories already seen
    Count,
    /// Forget every seen story; the next check records a fresh baseline
    Reset,
}

pub fn run(data_dir: Option<PathBuf>, action: SeenAction) -> CliResult {
    let store = super::open_store(data_dir)?;
    match action {
        SeenAction::Count => {
            println!("{}", store.load_seen().len());
        }
        SeenAction::Reset => {
            let mut session = Session::open(store);
            let forgotten = session.seen().len();
            session.reset_seen()?;
            println!("forgot {forgotten} seen stories");
        }
    }
    Ok(())
}
