use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{MultiSelect, Password, Text};
use netatmo_core::{
    AuthenticatedClient, Config, Credentials, CredentialsConfig, Scope, StationDataRequest,
};
use tracing_subscriber::filter::Targets;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "netatmo", version, about = "Netatmo weather station CLI")]
pub struct Cli {
    /// Log filter, e.g. `debug` or `netatmo_core=debug,warn`. Logs go to stderr.
    #[arg(long, global = true, default_value = "warn", env = "NETATMO_LOG")]
    pub log_filter: Targets,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store application and account credentials.
    Configure,

    /// Show the latest readings of your weather stations.
    Stations {
        /// Only this station. Defaults to `default_device_id` from the config.
        #[arg(long)]
        device_id: Option<String>,

        /// Include favorite stations shared with the account.
        #[arg(long)]
        favorites: bool,

        /// Print the raw response as JSON.
        #[arg(long)]
        json: bool,

        /// Give up after this many seconds.
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        #[command(flatten)]
        credentials: CredentialArgs,
    },
}

/// Per-field overrides of the stored credentials.
#[derive(Debug, Args)]
pub struct CredentialArgs {
    #[arg(long, env = "NETATMO_CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,

    #[arg(long, env = "NETATMO_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    #[arg(long, env = "NETATMO_USERNAME", hide_env_values = true)]
    username: Option<String>,

    #[arg(long, env = "NETATMO_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl CredentialArgs {
    fn is_empty(&self) -> bool {
        self.client_id.is_none()
            && self.client_secret.is_none()
            && self.username.is_none()
            && self.password.is_none()
    }

    fn resolve(&self, config: &Config) -> anyhow::Result<Credentials> {
        if self.is_empty() {
            return config.credentials();
        }

        let mut stored = config.credentials.clone().unwrap_or_default();
        let overrides = [
            (&mut stored.client_id, &self.client_id),
            (&mut stored.client_secret, &self.client_secret),
            (&mut stored.username, &self.username),
            (&mut stored.password, &self.password),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                field.clone_from(value);
            }
        }

        let mut merged = config.clone();
        merged.set_credentials(stored);
        merged.credentials()
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Stations {
                device_id,
                favorites,
                json,
                timeout,
                credentials,
            } => {
                let config = Config::load()?;
                let creds = credentials.resolve(&config)?;

                let mut request = StationDataRequest::new()
                    .include_favorites(favorites)
                    .deadline(Duration::from_secs(timeout));
                if let Some(id) = device_id.or(config.default_device_id) {
                    request = request.device_id(id);
                }

                let client = AuthenticatedClient::new(creds)?;
                let data = client
                    .get_station_data(&request)
                    .await
                    .context("Failed to fetch station data")?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&data)?);
                } else {
                    print!("{}", render::summary(&data));
                }
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let current = config.credentials.clone().unwrap_or_default();

    let client_id = Text::new("Client id:")
        .with_initial_value(&current.client_id)
        .prompt()?;
    let client_secret = Password::new("Client secret:")
        .without_confirmation()
        .prompt()?;
    let username = Text::new("Netatmo account e-mail:")
        .with_initial_value(&current.username)
        .prompt()?;
    let password = Password::new("Netatmo account password:")
        .without_confirmation()
        .prompt()?;

    let defaults: Vec<usize> = Scope::all()
        .iter()
        .enumerate()
        .filter(|(_, scope)| {
            current.scopes.contains(scope) || (current.scopes.is_empty() && **scope == Scope::DEFAULT)
        })
        .map(|(idx, _)| idx)
        .collect();
    let scopes = MultiSelect::new("Scopes:", Scope::all().to_vec())
        .with_default(&defaults)
        .prompt()?;

    let device_id = Text::new("Default station id (optional):")
        .with_initial_value(config.default_device_id.as_deref().unwrap_or_default())
        .prompt_skippable()?
        .filter(|id| !id.trim().is_empty());

    config.set_credentials(CredentialsConfig {
        client_id,
        client_secret,
        username,
        password,
        scopes,
    });
    config.default_device_id = device_id;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Config {
        let mut cfg = Config::default();
        cfg.set_credentials(CredentialsConfig {
            client_id: "stored-id".into(),
            client_secret: "stored-secret".into(),
            username: "stored@example.com".into(),
            password: "stored-pw".into(),
            scopes: vec![Scope::ReadStation],
        });
        cfg
    }

    fn no_overrides() -> CredentialArgs {
        CredentialArgs {
            client_id: None,
            client_secret: None,
            username: None,
            password: None,
        }
    }

    #[test]
    fn stored_credentials_are_used_without_overrides() {
        let creds = no_overrides().resolve(&stored()).unwrap();
        assert_eq!(creds.client_id, "stored-id");
        assert_eq!(creds.password, "stored-pw");
    }

    #[test]
    fn overrides_replace_single_fields() {
        let args = CredentialArgs {
            password: Some("env-pw".into()),
            ..no_overrides()
        };

        let creds = args.resolve(&stored()).unwrap();
        assert_eq!(creds.client_id, "stored-id");
        assert_eq!(creds.password, "env-pw");
        assert_eq!(creds.scopes, vec![Scope::ReadStation]);
    }

    #[test]
    fn overrides_alone_must_be_complete() {
        let args = CredentialArgs {
            client_id: Some("id".into()),
            ..no_overrides()
        };

        let err = args.resolve(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("missing: client_secret, username, password"));
    }

    #[test]
    fn parses_stations_arguments() {
        let cli = Cli::try_parse_from([
            "netatmo",
            "--log-filter",
            "debug",
            "stations",
            "--device-id",
            "70:ee:50:00:00:14",
            "--favorites",
            "--timeout",
            "5",
        ])
        .unwrap();

        match cli.command {
            Command::Stations {
                device_id,
                favorites,
                json,
                timeout,
                ..
            } => {
                assert_eq!(device_id.as_deref(), Some("70:ee:50:00:00:14"));
                assert!(favorites);
                assert!(!json);
                assert_eq!(timeout, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
