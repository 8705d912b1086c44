//! `GET /api/getstationsdata`.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};
use url::Url;

use crate::{AuthenticatedClient, Error, error::ErrorResponse, model::StationDataResponse};

const STATIONS_DATA_PATH: &str = "/api/getstationsdata";

/// Parameters of a station data request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationDataRequest {
    /// Restrict the answer to one station. `None` or empty means every
    /// station visible to the account.
    pub device_id: Option<String>,
    /// Also return favorite stations shared with the account.
    pub include_favorites: bool,
    /// Upper bound for the whole exchange, token acquisition included.
    pub deadline: Option<Duration>,
}

impl StationDataRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = Some(id.into());
        self
    }

    pub fn include_favorites(mut self, include: bool) -> Self {
        self.include_favorites = include;
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Build the request URL. `get_favorites` is always present, `device_id`
/// only when non-empty.
pub fn station_data_url(base_url: &str, request: &StationDataRequest) -> Result<Url, Error> {
    let mut url = Url::parse(base_url)?.join(STATIONS_DATA_PATH)?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair(
            "get_favorites",
            if request.include_favorites { "true" } else { "false" },
        );
        if let Some(id) = request.device_id.as_deref().filter(|id| !id.is_empty()) {
            query.append_pair("device_id", id);
        }
    }

    Ok(url)
}

/// Map a finished exchange to the typed outcome.
fn decode_response(
    status: reqwest::StatusCode,
    body: &[u8],
) -> Result<StationDataResponse, Error> {
    if status.as_u16() >= 400 {
        let envelope: ErrorResponse = serde_json::from_slice(body)?;
        tracing::warn!(
            %status,
            code = envelope.error.code,
            message = %envelope.error.message,
            "Netatmo API error"
        );
        return Err(Error::Api(envelope.error));
    }

    Ok(serde_json::from_slice(body)?)
}

impl AuthenticatedClient {
    /// Fetch station data. Performs exactly one API request; nothing is retried.
    ///
    /// Dropping the returned future aborts the request in flight.
    pub async fn get_station_data(
        &self,
        request: &StationDataRequest,
    ) -> Result<StationDataResponse, Error> {
        match request.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.fetch_station_data(request))
                .await
                .map_err(|_| Error::DeadlineExceeded(deadline))?,
            None => self.fetch_station_data(request).await,
        }
    }

    async fn fetch_station_data(
        &self,
        request: &StationDataRequest,
    ) -> Result<StationDataResponse, Error> {
        let url = station_data_url(&self.api_base_url, request)?;
        let token = self.access_token().await?;

        tracing::debug!(%url, favorites = request.include_favorites, "requesting station data");
        let res = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .bearer_auth(token.secret())
            .send()
            .await?;

        let status = res.status();
        // Consumes the response, releasing the connection on every path below.
        let body = res.bytes().await?;
        tracing::debug!(%status, bytes = body.len(), "station data response received");

        decode_response(status, &body)
    }
}
