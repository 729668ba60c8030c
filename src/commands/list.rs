//! The `wallet list` command: a store-backed ledger listing with an optional
//! month/year filter and running totals.

use crate::api::Mode;
use crate::args::ListArgs;
use crate::commands::{open_store, Out};
use crate::model::Transaction;
use crate::{Config, Result};
use rust_decimal::Decimal;

pub async fn list(config: Config, mode: Mode, args: ListArgs) -> Result<Out<Vec<Transaction>>> {
    let store = open_store(&config, mode);
    let transactions = store.list().await;

    let filtered: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| {
            args.month().is_none_or(|m| t.date.month() == m)
                && args.year().is_none_or(|y| t.date.year() == y)
        })
        .collect();

    let mut message = format!(
        "{} transaction{}",
        filtered.len(),
        if filtered.len() == 1 { "" } else { "s" }
    );
    if !filtered.is_empty() {
        message.push('\n');
        message.push_str(&render(&filtered));
    }
    if let Some(last_sync) = store.last_sync().await {
        message.push_str(&format!("\nlast synced {}", last_sync.to_rfc3339()));
    }

    Ok(Out::new(message, filtered))
}

/// Formats the ledger as aligned rows followed by income/expense totals.
fn render(transactions: &[Transaction]) -> String {
    let mut lines = Vec::with_capacity(transactions.len() + 1);
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;

    for t in transactions {
        if t.amount.is_expense() {
            expense += t.amount.value();
        } else {
            income += t.amount.value();
        }
        lines.push(format!(
            "{}  {}  {:<16} {:>12}  {}",
            t.date,
            t.day,
            t.category,
            t.amount.to_string(),
            t.note
        ));
    }

    let balance = income + expense;
    lines.push(format!(
        "income {income:.2}, expenses {expense:.2}, balance {balance:.2}"
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::seed_transactions;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_unfiltered() {
        let env = TestEnv::new().await;

        // Mode::Test wires the store to the seeded in-memory remote
        let out = list(env.config(), Mode::Test, ListArgs::new(None, None))
            .await
            .unwrap();

        let listed = out.structure().unwrap();
        assert_eq!(listed, &seed_transactions());
        assert!(out.message().contains("8 transactions"));
    }

    #[tokio::test]
    async fn test_list_filters_by_month_and_year() {
        let env = TestEnv::new().await;

        let out = list(env.config(), Mode::Test, ListArgs::new(Some(9), Some(2024)))
            .await
            .unwrap();

        let listed = out.structure().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|t| t.date.month() == 9));
    }

    #[tokio::test]
    async fn test_list_filter_with_no_matches() {
        let env = TestEnv::new().await;

        let out = list(env.config(), Mode::Test, ListArgs::new(Some(1), Some(1999)))
            .await
            .unwrap();

        assert!(out.structure().unwrap().is_empty());
        assert!(out.message().contains("0 transactions"));
    }

    #[test]
    fn test_render_totals() {
        let rendered = render(&seed_transactions());
        assert!(rendered.contains("income 6000.00"));
        assert!(rendered.contains("expenses -796.15"));
        assert!(rendered.contains("balance 5203.85"));
    }
}
