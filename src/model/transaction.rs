//! The transaction record, the sole domain entity of the ledger.

use crate::model::{Amount, TxDate, Weekday};
use serde::{Deserialize, Serialize};

/// The placeholder note used when a transaction is entered without one.
pub const DEFAULT_NOTE: &str = "No note";

/// A single ledger entry, field-for-field the record the remote API exchanges.
///
/// The `day` field is denormalized: it repeats what `date` already determines,
/// because the wire format carries both. This layer never detects or repairs a
/// mismatch; the remote value is taken as-is.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque identifier assigned by the remote source on creation. Never
    /// client-generated for persisted records, never reused after deletion.
    pub id: String,
    pub date: TxDate,
    pub day: Weekday,
    pub category: String,
    pub note: String,
    /// Negative = expense, positive = income.
    pub amount: Amount,
}

/// A transaction as entered by the user, before the remote source has accepted
/// it and assigned an id. The weekday and note are optional here; see
/// [`NewTransaction::normalize`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewTransaction {
    pub date: TxDate,
    pub day: Option<Weekday>,
    pub category: String,
    pub note: Option<String>,
    pub amount: Amount,
}

impl NewTransaction {
    /// Fills the derivable fields: a missing weekday is computed from the
    /// calendar date and a missing note becomes [`DEFAULT_NOTE`].
    pub fn normalize(self) -> TransactionDraft {
        TransactionDraft {
            day: self.day.unwrap_or_else(|| self.date.weekday()),
            date: self.date,
            category: self.category,
            note: self.note.unwrap_or_else(|| DEFAULT_NOTE.to_string()),
            amount: self.amount,
        }
    }
}

/// The normalized create-request body: a [`Transaction`] minus the `id`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub date: TxDate,
    pub day: Weekday,
    pub category: String,
    pub note: String,
    pub amount: Amount,
}

impl TransactionDraft {
    /// Attaches an id, producing a full record. Only the remote source (or a
    /// stand-in for it) assigns ids.
    pub fn with_id(self, id: impl Into<String>) -> Transaction {
        Transaction {
            id: id.into(),
            date: self.date,
            day: self.day,
            category: self.category,
            note: self.note,
            amount: self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn new_transaction() -> NewTransaction {
        NewTransaction {
            date: TxDate::from_str("05.30.2025").unwrap(),
            day: None,
            category: "Shopping".to_string(),
            note: None,
            amount: Amount::from_str("-89.99").unwrap(),
        }
    }

    #[test]
    fn test_wire_format_round_trip() {
        let json = r#"{"id":"1","date":"05.30.2025","day":"Fri","category":"Shopping","note":"Clothing purchase","amount":-89.99}"#;
        let transaction: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(transaction.id, "1");
        assert_eq!(transaction.day, Weekday::Fri);
        assert!(transaction.amount.is_expense());
        assert_eq!(serde_json::to_string(&transaction).unwrap(), json);
    }

    #[test]
    fn test_normalize_derives_weekday() {
        let draft = new_transaction().normalize();
        assert_eq!(draft.day, Weekday::Fri);
    }

    #[test]
    fn test_normalize_keeps_explicit_weekday() {
        // A supplied weekday wins even when it disagrees with the date; this
        // layer does not repair the denormalization.
        let mut new = new_transaction();
        new.day = Some(Weekday::Mon);
        assert_eq!(new.normalize().day, Weekday::Mon);
    }

    #[test]
    fn test_normalize_defaults_note() {
        let draft = new_transaction().normalize();
        assert_eq!(draft.note, DEFAULT_NOTE);

        let mut new = new_transaction();
        new.note = Some("Clothing purchase".to_string());
        assert_eq!(new.normalize().note, "Clothing purchase");
    }

    #[test]
    fn test_draft_with_id() {
        let transaction = new_transaction().normalize().with_id("tx-42");
        assert_eq!(transaction.id, "tx-42");
        assert_eq!(transaction.category, "Shopping");
    }
}
