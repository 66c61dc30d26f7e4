//! API key storage: load and persist provider keys in the config directory.
//!
//! Each provider's key is stored in a dedicated file with restrictive permissions (0o600 on Unix).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::core::models::Provider;
use crate::core::paths;

/// Errors when loading or storing an API key.
#[derive(Debug, thiserror::Error)]
pub enum ApiKeyError {
    #[error("No config directory available")]
    NoConfigDir,
    #[error("API key is empty")]
    Empty,
    #[error("Failed to store API key: {0}")]
    Io(#[from] io::Error),
}

/// Path to a provider's key file in the config directory.
pub fn credentials_path(provider: Provider) -> Option<PathBuf> {
    paths::config_dir().map(|d| key_path(&d, provider))
}

fn key_path(dir: &Path, provider: Provider) -> PathBuf {
    dir.join(format!("{}-api-key", provider.slug()))
}

/// Load a provider's API key from the config directory.
/// Returns `None` if the file is absent, empty, or unreadable.
pub fn load_api_key(provider: Provider) -> Option<String> {
    let dir = paths::config_dir()?;
    load_api_key_from(&dir, provider)
}

fn load_api_key_from(dir: &Path, provider: Provider) -> Option<String> {
    let content = fs::read_to_string(key_path(dir, provider)).ok()?;
    let key = content.trim().to_string();
    if key.is_empty() { None } else { Some(key) }
}

/// Store a provider's API key in the config directory. Returns the written path.
pub fn store_api_key(provider: Provider, key: &str) -> Result<PathBuf, ApiKeyError> {
    let dir = paths::config_dir().ok_or(ApiKeyError::NoConfigDir)?;
    store_api_key_in(&dir, provider, key)
}

fn store_api_key_in(dir: &Path, provider: Provider, key: &str) -> Result<PathBuf, ApiKeyError> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(ApiKeyError::Empty);
    }
    fs::create_dir_all(dir)?;

    let path = key_path(dir, provider);
    let mut file = fs::File::create(&path)?;
    file.write_all(trimmed.as_bytes())?;
    file.write_all(b"\n")?;

    #[cfg(unix)]
    {
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        store_api_key_in(dir.path(), Provider::OpenRouter, "  sk-or-test-123 \n").unwrap();
        let loaded = load_api_key_from(dir.path(), Provider::OpenRouter);
        assert_eq!(loaded.as_deref(), Some("sk-or-test-123"));
    }

    #[test]
    fn keys_are_stored_per_provider() {
        let dir = tempfile::tempdir().unwrap();
        store_api_key_in(dir.path(), Provider::OpenAi, "sk-openai").unwrap();
        assert_eq!(
            load_api_key_from(dir.path(), Provider::OpenAi).as_deref(),
            Some("sk-openai")
        );
        assert_eq!(load_api_key_from(dir.path(), Provider::OpenRouter), None);
    }

    #[test]
    fn store_rejects_blank_key() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_api_key_in(dir.path(), Provider::OpenAi, "   ").unwrap_err();
        assert!(matches!(err, ApiKeyError::Empty));
    }

    #[test]
    fn load_ignores_blank_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(key_path(dir.path(), Provider::OpenAi), "\n").unwrap();
        assert_eq!(load_api_key_from(dir.path(), Provider::OpenAi), None);
    }

    #[cfg(unix)]
    #[test]
    fn stored_key_is_owner_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_api_key_in(dir.path(), Provider::OpenAi, "sk-openai").unwrap();
        let mode = fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
