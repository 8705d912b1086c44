use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{Credentials, Scope};

/// Stored application and account credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CredentialsConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub scopes: Vec<Scope>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&Credentials::from(self.clone()), f)
    }
}

impl From<CredentialsConfig> for Credentials {
    fn from(cfg: CredentialsConfig) -> Self {
        Credentials {
            client_id: cfg.client_id,
            client_secret: cfg.client_secret,
            username: cfg.username,
            password: cfg.password,
            scopes: cfg.scopes,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_device_id = "70:ee:50:00:00:14"
///
/// [credentials]
/// client_id = "..."
/// client_secret = "..."
/// username = "someone@example.com"
/// password = "..."
/// scopes = ["read_station"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Station queried when none is given on the command line.
    pub default_device_id: Option<String>,

    pub credentials: Option<CredentialsConfig>,
}

impl Config {
    /// Credentials for the password grant, or a hint on how to configure them.
    pub fn credentials(&self) -> Result<Credentials> {
        let creds = self.credentials.clone().ok_or_else(|| {
            anyhow!(
                "No Netatmo credentials configured.\n\
                 Hint: run `netatmo configure` first."
            )
        })?;

        let missing: Vec<&str> = [
            ("client_id", creds.client_id.is_empty()),
            ("client_secret", creds.client_secret.is_empty()),
            ("username", creds.username.is_empty()),
            ("password", creds.password.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, empty)| empty.then_some(name))
        .collect();

        if !missing.is_empty() {
            return Err(anyhow!(
                "Incomplete Netatmo credentials, missing: {}.\n\
                 Hint: run `netatmo configure` again.",
                missing.join(", ")
            ));
        }

        Ok(creds.into())
    }

    pub fn set_credentials(&mut self, creds: CredentialsConfig) {
        self.credentials = Some(creds);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "netatmo", "netatmo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
