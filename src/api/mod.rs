//! The remote transaction API: the trait seam, its HTTP implementation, and an
//! in-memory implementation for running without a network.

mod http;
mod test_remote;
mod wire;

use crate::model::{Transaction, TransactionDraft};
use crate::Config;

pub use http::HttpRemote;
pub use test_remote::TestRemote;
pub use wire::{AckEnvelope, CollectionEnvelope, RecordEnvelope, RemoteError};

pub(crate) use test_remote::seed_transactions;

/// The source-of-record for transactions. On conflict, whatever this returns
/// wins over the local cache.
#[async_trait::async_trait]
pub trait Remote: Send + Sync {
    /// Fetch the full transaction collection.
    async fn fetch(&self) -> Result<Vec<Transaction>, RemoteError>;

    /// Create a transaction. The returned record carries the remote-assigned id.
    async fn create(&self, draft: &TransactionDraft) -> Result<Transaction, RemoteError>;

    /// Replace the transaction with the same id. Returns the authoritative record.
    async fn update(&self, transaction: &Transaction) -> Result<Transaction, RemoteError>;

    /// Delete the transaction with this id.
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;
}

/// Selects the remote implementation.
///
/// This allows for exercising the whole program without a server. When
/// `WALLET_SYNC_IN_TEST_MODE` is set and non-zero in length the mode is
/// `Mode::Test`, otherwise it is `Mode::Http`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Mode {
    #[default]
    Http,
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var_os("WALLET_SYNC_IN_TEST_MODE") {
            Some(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Constructs the remote for the configured base address and mode.
pub fn remote(config: &Config, mode: Mode) -> Box<dyn Remote> {
    match mode {
        Mode::Http => Box::new(HttpRemote::new(config.api_base_url())),
        Mode::Test => Box::new(TestRemote::seeded()),
    }
}
