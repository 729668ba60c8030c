//! The `wallet update` command.

use crate::api::Mode;
use crate::args::UpdateArgs;
use crate::commands::{open_store, Out};
use crate::model::{Transaction, DEFAULT_NOTE};
use crate::{Config, Result};
use anyhow::bail;

/// Replaces a transaction through the sync store. The full record is sent;
/// the remote's returned value is what ends up in the cache.
pub async fn update(config: Config, mode: Mode, args: UpdateArgs) -> Result<Out<Transaction>> {
    let store = open_store(&config, mode);

    let transaction = Transaction {
        id: args.id().to_string(),
        date: args.date(),
        day: args.day().unwrap_or_else(|| args.date().weekday()),
        category: args.category().to_string(),
        note: args
            .note()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_NOTE.to_string()),
        amount: args.amount().with_polarity(args.polarity()),
    };

    match store.update(transaction).await {
        Some(transaction) => Ok(Out::new(
            format!("Updated transaction {}", transaction.id),
            transaction,
        )),
        None => bail!("The remote source rejected the update; nothing was changed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_update_existing_transaction() {
        let env = TestEnv::new().await;
        // Mode::Test seeds the remote with the sample ledger; edit entry "1"
        let args = UpdateArgs::new(
            "1",
            "10.22.2024".parse().unwrap(),
            "Groceries",
            "63.20".parse().unwrap(),
            Some("Bigger weekly shop".to_string()),
            false,
        );

        let out = update(env.config(), Mode::Test, args).await.unwrap();

        let transaction = out.structure().unwrap();
        assert_eq!(transaction.id, "1");
        assert_eq!(transaction.note, "Bigger weekly shop");
        assert!(transaction.amount.is_expense());
    }

    #[tokio::test]
    async fn test_update_unknown_id_fails() {
        let env = TestEnv::new().await;
        let args = UpdateArgs::new(
            "no-such-id",
            "10.22.2024".parse().unwrap(),
            "Groceries",
            "63.20".parse().unwrap(),
            None,
            false,
        );

        assert!(update(env.config(), Mode::Test, args).await.is_err());
    }
}
