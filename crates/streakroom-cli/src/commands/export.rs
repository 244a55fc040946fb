use std::path::PathBuf;

use clap::Subcommand;
use streakroom_core::Config;

use super::{open_tracker, CliResult};

#[derive(Subcommand)]
pub enum ExportAction {
    /// Write all check-ins as CSV
    Csv {
        /// Output file (defaults to streakroom_<date>.csv in the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
}

pub fn run(action: ExportAction) -> CliResult {
    let tracker = open_tracker(&Config::load()?)?;

    match action {
        ExportAction::Csv { out, stdout } => {
            if stdout {
                print!("{}", tracker.export_csv()?);
                return Ok(());
            }
            let path = out.unwrap_or_else(|| PathBuf::from(tracker.default_export_name()));
            let rows = tracker.write_csv(&path)?;
            println!("exported {rows} check-ins to {}", path.display());
        }
    }
    Ok(())
}
