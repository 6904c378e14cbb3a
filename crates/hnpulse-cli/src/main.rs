use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "hnpulse", version, about = "Hacker News top stories, with notifications for what's new")]
struct Cli {
    /// Directory holding seen.json and config.json (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll top stories until quit
    Watch(commands::watch::WatchArgs),
    /// Run a single tick and exit
    Check(commands::check::CheckArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Seen-story bookkeeping
    Seen {
        #[command(subcommand)]
        action: commands::seen::SeenAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let data_dir = cli.data_dir;
    let result = match cli.command {
        Commands::Watch(args) => commands::watch::run(data_dir, args),
        Commands::Check(args) => commands::check::run(data_dir, args),
        Commands::Config { action } => commands::config::run(data_dir, action),
        Commands::Seen { action } => commands::seen::run(data_dir, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
