use clap::{Parser, Subcommand};
use streakroom_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

/// Environment variable that overrides `log.filter` from the config file.
const LOG_ENV: &str = "STREAKROOM_LOG";

#[derive(Parser)]
#[command(name = "streakroom-cli", version, about = "Streakroom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check-in records
    Record {
        #[command(subcommand)]
        action: commands::record::RecordAction,
    },
    /// Streak and count statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Achievement catalog and unlock state
    Achievement {
        #[command(subcommand)]
        action: commands::achievement::AchievementAction,
    },
    /// Daily and weekly goals, reminder settings
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Friends, head-to-heads and the leaderboard
    Friend {
        #[command(subcommand)]
        action: commands::friend::FriendAction,
    },
    /// Advice from the remote advisor
    Advice {
        #[command(subcommand)]
        action: commands::advice::AdviceAction,
    },
    /// Export check-ins
    Export {
        #[command(subcommand)]
        action: commands::export::ExportAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Advisor API key management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
}

fn init_tracing() {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| Config::load_or_default().log.filter);
    let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Record { action } => commands::record::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Achievement { action } => commands::achievement::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Friend { action } => commands::friend::run(action),
        Commands::Advice { action } => commands::advice::run(action),
        Commands::Export { action } => commands::export::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
