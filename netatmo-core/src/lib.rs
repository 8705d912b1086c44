//! Core library for the `netatmo` CLI.
//!
//! This crate defines:
//! - OAuth2 password-grant authentication against the Netatmo token endpoint
//! - The station data request (`/api/getstationsdata`) and its typed response
//! - Configuration & credentials handling
//!
//! ```no_run
//! # async fn demo() -> Result<(), netatmo_core::Error> {
//! use netatmo_core::{AuthenticatedClient, Credentials, Scope, StationDataRequest};
//!
//! let client = AuthenticatedClient::new(Credentials {
//!     client_id: "app-id".into(),
//!     client_secret: "app-secret".into(),
//!     username: "someone@example.com".into(),
//!     password: "password".into(),
//!     scopes: vec![Scope::ReadStation],
//! })?;
//!
//! let data = client.get_station_data(&StationDataRequest::new()).await?;
//! for device in &data.body.devices {
//!     println!("{}: {} modules", device.station_name, device.modules.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod scope;
pub mod station;

pub use auth::{
    AccessToken, AuthenticatedClient, Credentials, PasswordGrant, StaticToken, TokenSource,
    http_client,
};
pub use config::{Config, CredentialsConfig};
pub use error::{ApiError, Error};
pub use model::StationDataResponse;
pub use scope::{Scope, UnknownScope};
pub use station::StationDataRequest;
