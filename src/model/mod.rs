//! The ledger domain model.

mod amount;
mod category;
mod date;
mod transaction;

pub use amount::{Amount, AmountError};
pub use category::{Polarity, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
pub use date::{TxDate, Weekday};
pub use transaction::{NewTransaction, Transaction, TransactionDraft, DEFAULT_NOTE};
