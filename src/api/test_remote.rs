//! Implements the `Remote` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that
//! we can run the whole app, top-to-bottom, without a server (see `Mode`).

use crate::api::{Remote, RemoteError};
use crate::model::{Transaction, TransactionDraft};
use std::sync::{Arc, Mutex, MutexGuard};

/// An implementation of the `Remote` trait that holds its collection in
/// memory. Clones share the same underlying collection, so a test can keep a
/// handle for assertions after handing a clone to the sync store.
#[derive(Clone)]
pub struct TestRemote {
    state: Arc<Mutex<State>>,
}

struct State {
    transactions: Vec<Transaction>,
    /// Monotonic; ids are never handed out twice, even across deletions.
    next_id: u64,
    failing: bool,
}

impl TestRemote {
    /// Creates a remote holding `transactions`.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        let next_id = transactions.len() as u64 + 1;
        Self {
            state: Arc::new(Mutex::new(State {
                transactions,
                next_id,
                failing: false,
            })),
        }
    }

    /// Creates a remote with no transactions.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Creates a remote seeded with the sample ledger.
    pub fn seeded() -> Self {
        Self::new(seed_transactions())
    }

    /// When `failing` is true, every call returns an error until it is unset.
    pub fn set_failing(&self, failing: bool) {
        self.guard().failing = failing;
    }

    /// A snapshot of the current remote-side collection.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.guard().transactions.clone()
    }

    /// Replaces the remote-side collection, simulating an out-of-band change
    /// made by another device.
    pub fn set_transactions(&self, transactions: Vec<Transaction>) {
        self.guard().transactions = transactions;
    }

    fn guard(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(state: &State) -> Result<(), RemoteError> {
        if state.failing {
            Err(RemoteError::rejected("injected failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl Remote for TestRemote {
    async fn fetch(&self) -> Result<Vec<Transaction>, RemoteError> {
        let state = self.guard();
        Self::check_available(&state)?;
        Ok(state.transactions.clone())
    }

    async fn create(&self, draft: &TransactionDraft) -> Result<Transaction, RemoteError> {
        let mut state = self.guard();
        Self::check_available(&state)?;
        let id = state.next_id.to_string();
        state.next_id += 1;
        let transaction = draft.clone().with_id(id);
        state.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn update(&self, transaction: &Transaction) -> Result<Transaction, RemoteError> {
        let mut state = self.guard();
        Self::check_available(&state)?;
        match state
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction.id)
        {
            Some(slot) => {
                *slot = transaction.clone();
                Ok(transaction.clone())
            }
            None => Err(RemoteError::rejected("Transaction not found")),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let mut state = self.guard();
        Self::check_available(&state)?;
        let before = state.transactions.len();
        state.transactions.retain(|t| t.id != id);
        if state.transactions.len() == before {
            return Err(RemoteError::rejected("Transaction not found"));
        }
        Ok(())
    }
}

/// The sample ledger used by the seeded test remote and the mock server.
pub(crate) fn seed_transactions() -> Vec<Transaction> {
    serde_json::from_str(SEED_DATA).expect("seed transaction data is valid")
}

/// Seed transaction data.
const SEED_DATA: &str = r#"[
  {"id":"1","date":"10.22.2024","day":"Tue","category":"Groceries","note":"Weekly shopping","amount":-50.0},
  {"id":"2","date":"10.22.2024","day":"Tue","category":"Meals","note":"Lunch with colleagues","amount":-25.67},
  {"id":"3","date":"10.16.2024","day":"Wed","category":"Groceries","note":"Household items","amount":-14.03},
  {"id":"4","date":"10.15.2024","day":"Tue","category":"Meals","note":"Dinner delivery","amount":-540.0},
  {"id":"5","date":"10.12.2024","day":"Sat","category":"Salary","note":"Monthly salary","amount":3000.0},
  {"id":"6","date":"10.10.2024","day":"Thu","category":"Groceries","note":"Fresh produce","amount":-46.0},
  {"id":"7","date":"09.25.2024","day":"Wed","category":"Utilities","note":"Electricity bill","amount":-120.45},
  {"id":"8","date":"09.15.2024","day":"Sun","category":"Salary","note":"Monthly salary","amount":3000.0}
]"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, NewTransaction, TxDate};
    use std::str::FromStr;

    fn draft(category: &str, amount: &str) -> TransactionDraft {
        NewTransaction {
            date: TxDate::from_str("11.01.2024").unwrap(),
            day: None,
            category: category.to_string(),
            note: None,
            amount: Amount::from_str(amount).unwrap(),
        }
        .normalize()
    }

    #[test]
    fn test_seed_parses() {
        let seed = seed_transactions();
        assert_eq!(seed.len(), 8);
        assert!(seed.iter().any(|t| t.category == "Utilities"));
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids_after_delete() {
        let remote = TestRemote::seeded();
        remote.delete("8").await.unwrap();

        let created = remote.create(&draft("Meals", "-12.00")).await.unwrap();
        // The freed id must not come back
        assert_ne!(created.id, "8");
        assert_eq!(created.id, "9");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_rejected() {
        let remote = TestRemote::empty();
        let transaction = draft("Meals", "-12.00").with_id("missing");
        let err = remote.update(&transaction).await.unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let remote = TestRemote::seeded();
        remote.set_failing(true);
        assert!(remote.fetch().await.is_err());
        remote.set_failing(false);
        assert_eq!(remote.fetch().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let remote = TestRemote::empty();
        let handle = remote.clone();
        remote.create(&draft("Meals", "-5.00")).await.unwrap();
        assert_eq!(handle.transactions().len(), 1);
    }
}
