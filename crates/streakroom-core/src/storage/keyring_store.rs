//! Thin wrapper around the OS keyring for the advisor API key.

use crate::error::ConfigError;

const SERVICE: &str = "streakroom";

/// Keyring account under which the advisor key is stored.
pub const API_KEY: &str = "advisor_api_key";

/// Environment variable that overrides the stored key.
pub const API_KEY_ENV: &str = "STREAKROOM_API_KEY";

fn entry(key: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(SERVICE, key).map_err(|e| ConfigError::Keyring(e.to_string()))
}

pub fn get(key: &str) -> Result<Option<String>, ConfigError> {
    match entry(key)?.get_password() {
        Ok(pw) => Ok(Some(pw)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(ConfigError::Keyring(e.to_string())),
    }
}

pub fn set(key: &str, value: &str) -> Result<(), ConfigError> {
    entry(key)?
        .set_password(value)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

pub fn delete(key: &str) -> Result<(), ConfigError> {
    match entry(key)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(ConfigError::Keyring(e.to_string())),
    }
}

/// Advisor API key: `STREAKROOM_API_KEY` if set and non-blank, else the
/// keyring entry. A keyring failure is logged and treated as "no key".
pub fn api_key() -> Option<String> {
    if let Some(key) = env_api_key() {
        return Some(key);
    }
    match get(API_KEY) {
        Ok(key) => key.filter(|k| !k.trim().is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "could not read advisor key from keyring");
            None
        }
    }
}

fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}
