//! A mock implementation of the wallet transaction API.
//!
//! Serves the four REST endpoints over a seeded in-memory collection so the
//! whole app (and its integration tests) can run against a real HTTP server
//! without any external backing store. The collection lives in process
//! memory; restarting the server resets it to the seed.

use crate::api::{AckEnvelope, CollectionEnvelope, RecordEnvelope};
use crate::model::{Transaction, TransactionDraft};
use crate::Result;
use anyhow::Context;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tracing::{debug, info};
use uuid::Uuid;

/// The in-memory transaction collection behind the mock API.
#[derive(Clone)]
struct Ledger {
    transactions: Arc<Mutex<Vec<Transaction>>>,
}

impl Ledger {
    fn new(seed: Vec<Transaction>) -> Self {
        Self {
            transactions: Arc::new(Mutex::new(seed)),
        }
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Transaction>> {
        self.transactions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn snapshot(&self) -> Vec<Transaction> {
        self.guard().clone()
    }

    /// Appends a draft under a freshly assigned id. Ids are random, so they
    /// are never reused after a deletion.
    fn create(&self, draft: TransactionDraft) -> Transaction {
        let id = format!("tx-{}", Uuid::new_v4().simple());
        let transaction = draft.with_id(id);
        self.guard().push(transaction.clone());
        transaction
    }

    /// Replaces the record with this id, keeping the id itself fixed.
    fn update(&self, id: &str, mut body: Transaction) -> Option<Transaction> {
        let mut transactions = self.guard();
        let slot = transactions.iter_mut().find(|t| t.id == id)?;
        body.id = id.to_string();
        *slot = body.clone();
        Some(body)
    }

    fn delete(&self, id: &str) -> bool {
        let mut transactions = self.guard();
        let before = transactions.len();
        transactions.retain(|t| t.id != id);
        transactions.len() < before
    }
}

/// The mock wallet API, bound to a local address.
pub struct MockApi {
    listener: TcpListener,
    addr: SocketAddr,
    ledger: Ledger,
}

impl MockApi {
    /// Binds to `addr` (use port 0 to let the OS pick) with `seed` as the
    /// initial collection.
    pub async fn bind(addr: SocketAddr, seed: Vec<Transaction>) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Unable to bind the mock API to {addr}"))?;
        let addr = listener
            .local_addr()
            .context("Unable to read the bound address")?;
        Ok(Self {
            listener,
            addr,
            ledger: Ledger::new(seed),
        })
    }

    /// The address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Accepts connections until the task is aborted or accept fails.
    pub async fn run(self) -> Result<()> {
        info!("mock wallet API listening on http://{}", self.addr);
        loop {
            let (stream, _) = self
                .listener
                .accept()
                .await
                .context("Failed to accept a connection")?;
            let ledger = self.ledger.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| handle(ledger.clone(), req));
                if let Err(e) = hyper::server::conn::http1::Builder::new()
                    .serve_connection(io, service)
                    .await
                {
                    debug!("mock API connection ended with an error: {e}");
                }
            });
        }
    }
}

async fn handle(
    ledger: Ledger,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().trim_end_matches('/').to_string();
    debug!("{method} {path}");

    let response = match (method, path.as_str()) {
        (Method::GET, "/transactions") => json(
            StatusCode::OK,
            &CollectionEnvelope::ok(ledger.snapshot()),
        ),
        (Method::POST, "/transactions") => match read_json::<TransactionDraft>(req).await {
            Ok(draft) => json(
                StatusCode::OK,
                &RecordEnvelope::ok(ledger.create(draft), "Transaction added successfully"),
            ),
            Err(message) => json(StatusCode::BAD_REQUEST, &RecordEnvelope::rejected(message)),
        },
        (method, path) if path.starts_with("/transactions/") => {
            let id = path["/transactions/".len()..].to_string();
            transaction_route(ledger, method, &id, req).await
        }
        _ => json(StatusCode::NOT_FOUND, &AckEnvelope::rejected("Not found")),
    };
    Ok(response)
}

/// `PUT` and `DELETE` on `/transactions/{id}`.
async fn transaction_route(
    ledger: Ledger,
    method: Method,
    id: &str,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    match method {
        Method::PUT => match read_json::<Transaction>(req).await {
            Ok(body) => match ledger.update(id, body) {
                Some(updated) => json(
                    StatusCode::OK,
                    &RecordEnvelope::ok(updated, "Transaction updated successfully"),
                ),
                None => json(
                    StatusCode::NOT_FOUND,
                    &RecordEnvelope::rejected("Transaction not found"),
                ),
            },
            Err(message) => json(StatusCode::BAD_REQUEST, &RecordEnvelope::rejected(message)),
        },
        Method::DELETE => {
            if ledger.delete(id) {
                json(
                    StatusCode::OK,
                    &AckEnvelope::ok("Transaction deleted successfully"),
                )
            } else {
                json(
                    StatusCode::NOT_FOUND,
                    &AckEnvelope::rejected("Transaction not found"),
                )
            }
        }
        _ => json(
            StatusCode::METHOD_NOT_ALLOWED,
            &AckEnvelope::rejected("Method not allowed"),
        ),
    }
}

/// Collects a request body and parses it as JSON, reporting a printable
/// message on failure.
async fn read_json<T>(req: Request<Incoming>) -> std::result::Result<T, String>
where
    T: serde::de::DeserializeOwned,
{
    let body = req
        .into_body()
        .collect()
        .await
        .map_err(|e| format!("Failed to read request body: {e}"))?
        .to_bytes();
    serde_json::from_slice(&body).map_err(|e| format!("Invalid request body: {e}"))
}

fn json<T: serde::Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    Response::builder()
        .status(status)
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(bytes)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}
