//! The `wallet add` command.

use crate::api::Mode;
use crate::args::AddArgs;
use crate::commands::{open_store, Out};
use crate::model::{NewTransaction, Transaction};
use crate::{Config, Result};
use anyhow::bail;
use tracing::debug;

/// Adds a transaction through the sync store. The entry form collects a
/// magnitude plus an expense/income choice; the sign is applied here.
pub async fn add(config: Config, mode: Mode, args: AddArgs) -> Result<Out<Transaction>> {
    let store = open_store(&config, mode);

    let polarity = args.polarity();
    if !polarity.suggested_categories().contains(&args.category()) {
        // Categories are free-form; this is informational only
        debug!(
            "category '{}' is not one of the usual {polarity} labels",
            args.category()
        );
    }

    let new = NewTransaction {
        date: args.date(),
        day: args.day(),
        category: args.category().to_string(),
        note: args.note().map(str::to_string),
        amount: args.amount().with_polarity(polarity),
    };

    match store.add(new).await {
        Some(transaction) => Ok(Out::new(
            format!(
                "Added transaction {}: {} {} {}",
                transaction.id, transaction.date, transaction.category, transaction.amount
            ),
            transaction,
        )),
        None => bail!("The remote source rejected the new transaction; nothing was saved"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weekday;
    use crate::test::TestEnv;

    fn args() -> AddArgs {
        AddArgs::new(
            "11.02.2024".parse().unwrap(),
            "Groceries",
            "42.00".parse().unwrap(),
            Some("Market run".to_string()),
            false,
        )
    }

    #[tokio::test]
    async fn test_add_defaults_to_expense() {
        let env = TestEnv::new().await;

        let out = add(env.config(), Mode::Test, args()).await.unwrap();

        let transaction = out.structure().unwrap();
        assert!(transaction.amount.is_expense());
        assert_eq!(transaction.note, "Market run");
        // 11.02.2024 was a Saturday
        assert_eq!(transaction.day, Weekday::Sat);
    }

    #[tokio::test]
    async fn test_add_income() {
        let env = TestEnv::new().await;
        let args = AddArgs::new(
            "11.01.2024".parse().unwrap(),
            "Salary",
            "3000".parse().unwrap(),
            None,
            true,
        );

        let out = add(env.config(), Mode::Test, args).await.unwrap();

        assert!(out.structure().unwrap().amount.is_income());
    }
}
