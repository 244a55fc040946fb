use clap::Subcommand;
use streakroom_core::storage::keyring_store;

use super::CliResult;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the advisor API key in the OS keyring
    Login {
        /// API key
        #[arg(long)]
        token: String,
    },
    /// Remove the stored API key
    Logout,
    /// Show whether an API key is available
    Status,
}

pub fn run(action: AuthAction) -> CliResult {
    match action {
        AuthAction::Login { token } => {
            let token = token.trim();
            if token.is_empty() {
                return Err("API key must not be empty".into());
            }
            keyring_store::set(keyring_store::API_KEY, token)?;
            println!("advisor API key saved");
        }
        AuthAction::Logout => {
            keyring_store::delete(keyring_store::API_KEY)?;
            println!("advisor API key removed");
        }
        AuthAction::Status => {
            let source = if std::env::var(keyring_store::API_KEY_ENV)
                .is_ok_and(|k| !k.trim().is_empty())
            {
                Some(keyring_store::API_KEY_ENV)
            } else if keyring_store::get(keyring_store::API_KEY)?.is_some() {
                Some("keyring")
            } else {
                None
            };
            match source {
                Some(source) => println!("advisor: configured ({source})"),
                None => println!("advisor: not configured"),
            }
        }
    }
    Ok(())
}
