//! Implements the `Remote` trait over HTTP with `reqwest`.

use crate::api::wire::{AckEnvelope, CollectionEnvelope, RecordEnvelope};
use crate::api::{Remote, RemoteError};
use crate::model::{Transaction, TransactionDraft};
use serde::de::DeserializeOwned;
use tracing::trace;

/// Talks to a server implementing the wallet transaction API:
/// `GET/POST /transactions` and `PUT/DELETE /transactions/{id}`.
///
/// Error responses still carry an envelope body, so the status code is not
/// consulted; the envelope's `success` flag is authoritative.
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// `base_url` is the scheme-and-authority part, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Reads a response body and decodes the expected envelope type.
async fn decode<T>(response: reqwest::Response) -> Result<T, RemoteError>
where
    T: DeserializeOwned,
{
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(RemoteError::Decode)
}

#[async_trait::async_trait]
impl Remote for HttpRemote {
    async fn fetch(&self) -> Result<Vec<Transaction>, RemoteError> {
        trace!("GET /transactions");
        let response = self.client.get(self.url("/transactions")).send().await?;
        let envelope: CollectionEnvelope = decode(response).await?;
        envelope.into_data()
    }

    async fn create(&self, draft: &TransactionDraft) -> Result<Transaction, RemoteError> {
        trace!("POST /transactions");
        let response = self
            .client
            .post(self.url("/transactions"))
            .json(draft)
            .send()
            .await?;
        let envelope: RecordEnvelope = decode(response).await?;
        envelope.into_data()
    }

    async fn update(&self, transaction: &Transaction) -> Result<Transaction, RemoteError> {
        trace!("PUT /transactions/{}", transaction.id);
        let response = self
            .client
            .put(self.url(&format!("/transactions/{}", transaction.id)))
            .json(transaction)
            .send()
            .await?;
        let envelope: RecordEnvelope = decode(response).await?;
        envelope.into_data()
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        trace!("DELETE /transactions/{id}");
        let response = self
            .client
            .delete(self.url(&format!("/transactions/{id}")))
            .send()
            .await?;
        let envelope: AckEnvelope = decode(response).await?;
        envelope.into_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let remote = HttpRemote::new("http://localhost:8000/");
        assert_eq!(remote.url("/transactions"), "http://localhost:8000/transactions");
    }
}
