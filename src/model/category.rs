//! Category labels and transaction polarity.
//!
//! Categories are free-form strings on the wire and in the cache; the fixed
//! lists below are the suggestion sets the entry forms offer, split by
//! polarity. Nothing validates a stored transaction against them.

use serde::{Deserialize, Serialize};

/// Whether a transaction takes money out of or puts money into the wallet.
///
/// There is no polarity field on a transaction; the sign of the amount is the
/// only signal (negative = expense).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Expense,
    Income,
}

serde_plain::derive_display_from_serialize!(Polarity);
serde_plain::derive_fromstr_from_deserialize!(Polarity);

impl Polarity {
    /// The category labels suggested for this polarity.
    pub fn suggested_categories(self) -> &'static [&'static str] {
        match self {
            Polarity::Expense => EXPENSE_CATEGORIES,
            Polarity::Income => INCOME_CATEGORIES,
        }
    }
}

/// Suggested labels for expenses.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Groceries",
    "Transportation",
    "Housing",
    "Entertainment",
    "Shopping",
    "Utilities",
    "Health",
    "Education",
    "Travel",
    "Other",
];

/// Suggested labels for income.
pub const INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Bonus",
    "Gift",
    "Investment",
    "Refund",
    "Other",
];
