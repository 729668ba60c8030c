//! The `wallet watch` command: stay subscribed to the sync store and report
//! every change background revalidation finds, until interrupted.

use crate::api::Mode;
use crate::commands::{open_store, Out};
use crate::{Config, Result};
use anyhow::Context;
use std::time::Duration;
use tracing::info;

pub async fn watch(config: Config, mode: Mode, period: Option<Duration>) -> Result<Out<()>> {
    let period = period.unwrap_or_else(|| config.refresh_period());
    let store = open_store(&config, mode);

    let initial = store.list().await;
    info!(
        "watching the ledger ({} transactions), refreshing every {}s",
        initial.len(),
        period.as_secs()
    );

    let subscription = store.subscribe(|transactions| {
        info!("ledger changed: now {} transactions", transactions.len());
    });
    let refresh = store.spawn_periodic(period);

    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for interrupt")?;

    refresh.abort();
    store.unsubscribe(subscription);
    Ok(Out::new_message("Stopped watching"))
}
