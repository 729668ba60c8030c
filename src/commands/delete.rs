//! The `wallet delete` command.

use crate::api::Mode;
use crate::args::DeleteArgs;
use crate::commands::{open_store, Out};
use crate::{Config, Result};
use anyhow::bail;

pub async fn delete(config: Config, mode: Mode, args: DeleteArgs) -> Result<Out<String>> {
    let store = open_store(&config, mode);
    if !store.delete(args.id()).await {
        bail!(
            "The remote source rejected deleting transaction '{}'; nothing was removed",
            args.id()
        );
    }
    Ok(Out::new(
        format!("Deleted transaction {}", args.id()),
        args.id().to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_delete_existing_transaction() {
        let env = TestEnv::new().await;

        let out = delete(env.config(), Mode::Test, DeleteArgs::new("1"))
            .await
            .unwrap();

        assert!(out.message().contains("Deleted transaction 1"));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_fails() {
        let env = TestEnv::new().await;

        let result = delete(env.config(), Mode::Test, DeleteArgs::new("no-such-id")).await;

        assert!(result.is_err());
    }
}
