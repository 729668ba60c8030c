//! The JSON envelopes the wallet API wraps every response in, and the error
//! taxonomy for talking to it.
//!
//! Both sides of this crate use these types: the HTTP client decodes them and
//! the mock backend produces them.

use crate::model::Transaction;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// An error from the remote transaction API.
///
/// The three kinds are deliberately distinct: a request that never produced a
/// response, a response that was not a well-formed envelope, and a well-formed
/// envelope that reported `success: false`. The sync store absorbs all three,
/// but logs and tests can tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The request never completed (connection refused, DNS failure, ...).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded as the expected envelope.
    #[error("malformed response envelope: {0}")]
    Decode(#[source] serde_json::Error),

    /// The remote answered, but with `success: false`.
    #[error("remote rejected the request: {message}")]
    Rejected { message: String },
}

impl RemoteError {
    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        RemoteError::Rejected {
            message: message.into(),
        }
    }
}

/// Envelope for `GET /transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Transaction>,
    #[serde(default)]
    pub timestamp: String,
}

impl CollectionEnvelope {
    /// A successful envelope stamped with the current time.
    pub fn ok(data: Vec<Transaction>) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Unwraps the envelope, turning `success: false` into a `Rejected` error.
    pub(crate) fn into_data(self) -> Result<Vec<Transaction>, RemoteError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(RemoteError::rejected("unsuccessful response"))
        }
    }
}

/// Envelope for `POST /transactions` and `PUT /transactions/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Transaction>,
    #[serde(default)]
    pub message: String,
}

impl RecordEnvelope {
    pub fn ok(data: Transaction, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
        }
    }

    /// Unwraps the envelope. A success envelope that carries no record is a
    /// protocol violation and reported as a decode failure.
    pub(crate) fn into_data(self) -> Result<Transaction, RemoteError> {
        if !self.success {
            return Err(RemoteError::rejected(self.message));
        }
        match self.data {
            Some(transaction) => Ok(transaction),
            None => Err(RemoteError::Decode(serde::de::Error::custom(
                "success envelope carried no transaction",
            ))),
        }
    }
}

/// Envelope for `DELETE /transactions/{id}` and error responses with no data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl AckEnvelope {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    pub(crate) fn into_ok(self) -> Result<(), RemoteError> {
        if self.success {
            Ok(())
        } else {
            Err(RemoteError::rejected(self.message))
        }
    }
}
