//! Bearer-token acquisition for the Netatmo API.
//!
//! The OAuth2 exchange itself is performed by the `oauth2` crate; this module
//! only decides when a token has to be (re)requested.

use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use oauth2::{
    AuthType, ClientId, ClientSecret, RefreshToken, ResourceOwnerPassword,
    ResourceOwnerUsername, StandardRevocableToken, TokenResponse, TokenUrl,
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenType,
    },
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{Error, Scope};

pub use oauth2::AccessToken;

pub const TOKEN_URL: &str = "https://api.netatmo.com/oauth2/token";
pub const API_BASE_URL: &str = "https://api.netatmo.com";

/// HTTP client for both the token exchange and API requests. Redirects are
/// not followed: a redirected token request fails instead of forwarding the
/// credentials.
pub fn http_client() -> Result<reqwest::Client, Error> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?)
}

/// Tokens this close to expiry are treated as already expired.
const TOKEN_EXPIRATION_HEADROOM: Duration = Duration::new(30, 0);

/// Application and resource-owner credentials for the password grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    /// Empty means the server default, [`Scope::DEFAULT`].
    pub scopes: Vec<Scope>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Something that can hand out a currently valid bearer token.
#[async_trait]
pub trait TokenSource: Send + Sync + fmt::Debug {
    async fn access_token(&self) -> Result<AccessToken, Error>;
}

/// A fixed token supplied by the caller. Never refreshed.
#[derive(Debug, Clone)]
pub struct StaticToken(AccessToken);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(AccessToken::new(token.into()))
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<AccessToken, Error> {
        Ok(self.0.clone())
    }
}

/// Token endpoint response as Netatmo sends it: `token_type` is omitted and
/// `scope` is a JSON array rather than a space separated string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetatmoTokenResponse {
    access_token: AccessToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<RefreshToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_in: Option<u64>,
    #[serde(default = "bearer")]
    token_type: BasicTokenType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<Vec<oauth2::Scope>>,
}

fn bearer() -> BasicTokenType {
    BasicTokenType::Bearer
}

impl TokenResponse for NetatmoTokenResponse {
    type TokenType = BasicTokenType;

    fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    fn token_type(&self) -> &BasicTokenType {
        &self.token_type
    }

    fn expires_in(&self) -> Option<Duration> {
        self.expires_in.map(Duration::from_secs)
    }

    fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    fn scopes(&self) -> Option<&Vec<oauth2::Scope>> {
        self.scope.as_ref()
    }
}

type OAuthClient = oauth2::Client<
    BasicErrorResponse,
    NetatmoTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
>;

#[derive(Debug)]
struct CachedToken {
    token: AccessToken,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// OAuth2 resource owner password grant against the Netatmo token endpoint.
///
/// No request is made until the first token is needed. The token is cached
/// and requested again once it expires.
#[derive(Debug)]
pub struct PasswordGrant {
    credentials: Credentials,
    token_url: String,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl PasswordGrant {
    /// `http` carries the token request; build it with [`http_client`] or
    /// with redirects disabled, so credentials are never re-posted elsewhere.
    pub fn new(credentials: Credentials, http: reqwest::Client) -> Self {
        Self {
            credentials,
            token_url: TOKEN_URL.to_string(),
            http,
            cached: Mutex::new(None),
        }
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    async fn request_token(&self) -> Result<CachedToken, Error> {
        let creds = &self.credentials;
        let oauth = OAuthClient::new(ClientId::new(creds.client_id.clone()))
            .set_client_secret(ClientSecret::new(creds.client_secret.clone()))
            .set_auth_type(AuthType::RequestBody)
            .set_token_uri(TokenUrl::new(self.token_url.clone())?);

        let username = ResourceOwnerUsername::new(creds.username.clone());
        let password = ResourceOwnerPassword::new(creds.password.clone());

        tracing::debug!(url = %self.token_url, scopes = ?creds.scopes, "requesting access token");
        let response = oauth
            .exchange_password(&username, &password)
            .add_scopes(
                creds
                    .scopes
                    .iter()
                    .map(|scope| oauth2::Scope::new(scope.as_str().to_string())),
            )
            .request_async(&self.http)
            .await?;

        let expires_in = response.expires_in();
        tracing::debug!(?expires_in, granted = ?response.scopes(), "access token obtained");

        let obtained = Instant::now();
        Ok(CachedToken {
            token: response.access_token().clone(),
            expires_at: expires_in
                .map(|ttl| obtained + ttl.saturating_sub(TOKEN_EXPIRATION_HEADROOM)),
        })
    }
}

#[async_trait]
impl TokenSource for PasswordGrant {
    async fn access_token(&self) -> Result<AccessToken, Error> {
        // Held across the exchange so concurrent callers wait for a single refresh.
        let mut cached = self.cached.lock().await;

        if let Some(current) = cached.as_ref().filter(|c| c.is_fresh(Instant::now())) {
            return Ok(current.token.clone());
        }

        let fresh = self.request_token().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}

/// HTTP client that attaches a bearer token to every Netatmo API request.
///
/// Cloning is cheap and clones share the token cache.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    pub(crate) http: reqwest::Client,
    pub(crate) tokens: Arc<dyn TokenSource>,
    pub(crate) api_base_url: String,
}

impl AuthenticatedClient {
    /// Client authenticating with the password grant. Performs no I/O; bad
    /// credentials are only reported by the first request. The token
    /// exchange and API requests share one connection pool.
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        let http = http_client()?;
        let grant = PasswordGrant::new(credentials, http.clone());
        Ok(Self::with_token_source(grant, http))
    }

    pub fn from_access_token(token: impl Into<String>) -> Result<Self, Error> {
        Ok(Self::with_token_source(StaticToken::new(token), http_client()?))
    }

    /// `http` sends the API requests. A [`PasswordGrant`] keeps the client it
    /// was built with; pass it the same one to share settings and pool.
    pub fn with_token_source(tokens: impl TokenSource + 'static, http: reqwest::Client) -> Self {
        Self {
            http,
            tokens: Arc::new(tokens),
            api_base_url: API_BASE_URL.to_string(),
        }
    }

    /// Point API requests at another host, e.g. a local mock server.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub async fn access_token(&self) -> Result<AccessToken, Error> {
        self.tokens.access_token().await
    }
}
