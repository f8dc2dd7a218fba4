//! Reqwest-based portal client and peer POST helper.

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use palisade_capability::CapabilityIssuer;
use palisade_core::AnchorRecord;

use crate::error::HttpError;

/// Bound on every request; a stalled endpoint must not hang a poll tick.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the shared client used for peer deliveries.
pub fn peer_client() -> Result<Client, HttpError> {
    Ok(Client::builder().timeout(DEFAULT_TIMEOUT).build()?)
}

/// POST a JSON body to an arbitrary URL, treating any non-2xx status as
/// an error. Used for best-effort peer fan-out.
pub async fn post_json<T: Serialize>(client: &Client, url: &str, body: &T) -> Result<(), HttpError> {
    let response = client.post(url).json(body).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(HttpError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}

/// Authenticated client for the central portal.
///
/// Carries an optional [`CapabilityIssuer`]; when present, every request
/// is sent with `Authorization: Bearer <capability token>`.
pub struct PortalClient {
    client: Client,
    base_url: String,
    issuer: Option<Arc<CapabilityIssuer>>,
}

impl PortalClient {
    pub fn new(
        base_url: impl Into<String>,
        issuer: Option<Arc<CapabilityIssuer>>,
    ) -> Result<Self, HttpError> {
        Ok(PortalClient {
            client: Client::builder().timeout(DEFAULT_TIMEOUT).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            issuer,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> Result<Option<String>, HttpError> {
        match &self.issuer {
            Some(issuer) => Ok(Some(format!("Bearer {}", issuer.token()?))),
            None => Ok(None),
        }
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, HttpError> {
        Ok(match self.bearer()? {
            Some(header) => builder.header(AUTHORIZATION, header),
            None => builder,
        })
    }

    /// `GET /receipts?limit=N`: identifiers of recent audit receipts.
    pub async fn recent_receipts(&self, limit: usize) -> Result<Vec<Value>, HttpError> {
        let url = format!("{}/receipts", self.base_url);
        let request = self.authed(self.client.get(&url).query(&[("limit", limit)]))?;
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        match body {
            Value::Array(items) => Ok(items),
            other => Err(HttpError::BadResponse {
                url,
                reason: format!("expected an array, got {other}"),
            }),
        }
    }

    /// `GET /proof/{id}`: the proof bundle for one receipt.
    pub async fn proof_bundle(&self, receipt_id: &str) -> Result<Value, HttpError> {
        let url = format!("{}/proof/{receipt_id}", self.base_url);
        let request = self.authed(self.client.get(&url))?;
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    /// `POST /anchor`: notify the portal of a fresh anchor record.
    pub async fn post_anchor(&self, record: &AnchorRecord) -> Result<(), HttpError> {
        self.post("anchor", record).await
    }

    /// `POST /ingest`: forward a detected event.
    pub async fn ingest_event(&self, event: &Value) -> Result<(), HttpError> {
        self.post("ingest", event).await
    }

    /// `POST /action`: submit an action request.
    pub async fn submit_action(&self, action: &Value) -> Result<(), HttpError> {
        self.post("action", action).await
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<(), HttpError> {
        let url = format!("{}/{path}", self.base_url);
        let request = self.authed(self.client.post(&url).json(body))?;
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
