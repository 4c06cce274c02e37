//! [`Pinner`] backed by an HTTP pinning gateway (e.g. Pinata- or
//! web3.storage-shaped APIs): POST the bytes, expect back `{cid,
//! gateway_url}`.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{MediaError, MediaResult};
use crate::ports::outbound::{PinOutcome, Pinner};

#[derive(Deserialize)]
struct PinResponse {
    cid: String,
    gateway_url: String,
}

pub struct HttpPinner {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPinner {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), endpoint: endpoint.into() }
    }
}

#[async_trait]
impl Pinner for HttpPinner {
    async fn request_pin(&self, asset_id: Uuid, bytes: &[u8]) -> MediaResult<PinOutcome> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("asset_id", asset_id.to_string())])
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| MediaError::Pinning(e.to_string()))?
            .error_for_status()
            .map_err(|e| MediaError::Pinning(e.to_string()))?
            .json::<PinResponse>()
            .await
            .map_err(|e| MediaError::Pinning(e.to_string()))?;

        Ok(PinOutcome { cid: response.cid, gateway_url: response.gateway_url })
    }
}
