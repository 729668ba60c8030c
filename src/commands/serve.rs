//! The `wallet serve` command: run the mock transaction API.

use crate::api::seed_transactions;
use crate::commands::Out;
use crate::server::MockApi;
use crate::Result;
use std::net::SocketAddr;

pub async fn serve(port: u16) -> Result<Out<()>> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let api = MockApi::bind(addr, seed_transactions()).await?;
    api.run().await?;
    Ok(Out::new_message("Mock API stopped"))
}
