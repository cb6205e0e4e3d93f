//! Read-only HTTP status API, built on `axum` in the style of
//! `explorer`'s `ApiServer`/`routes::stats` (state struct + `Router::new()
//! .route(...).with_state(state)`, CORS via `tower_http`).

use crate::block_account::{BlockAccount, BlockRecord};
use crate::broadcaster::Broadcaster;
use crate::ledger::ShareLedger;
use crate::payout::PayoutSender;
use crate::store::{HashrateSample, PayoutRecord, PersistentStore};
use axum::extract::{Query, State};
use axum::http::Method;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct HttpState<P: PersistentStore, S: PayoutSender> {
    pub ledger: Arc<Mutex<ShareLedger>>,
    pub broadcaster: Arc<Broadcaster>,
    pub block_account: Arc<BlockAccount<P, S>>,
    pub store: Arc<P>,
    pub started_at: Instant,
}

pub fn router<P: PersistentStore + 'static, S: PayoutSender + 'static>(state: HttpState<P, S>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]).allow_headers(Any);

    Router::new()
        .route("/status", get(get_status::<P, S>))
        .route("/miner", get(get_miner::<P, S>))
        .route("/miners", get(get_miners::<P, S>))
        .route("/blocks", get(get_blocks::<P, S>))
        .route("/payouts", get(get_payouts::<P, S>))
        .route("/hashrate-history", get(get_hashrate_history::<P, S>))
        .route("/version", get(get_version))
        .with_state(state)
        .layer(cors)
}

#[derive(Serialize)]
struct StatusResponse {
    version: String,
    uptime_secs: u64,
    session_count: usize,
    pool_hashrate: f64,
    pplns_window_len: usize,
}

async fn get_status<P: PersistentStore, S: PayoutSender>(State(state): State<HttpState<P, S>>) -> Json<StatusResponse> {
    let ledger = state.ledger.lock().await;
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        session_count: state.broadcaster.session_count().await,
        pool_hashrate: ledger.pool_hashrate(),
        pplns_window_len: ledger.window_len(),
    })
}

#[derive(Deserialize)]
struct AddressQuery {
    address: String,
}

#[derive(Serialize)]
struct MinerResponse {
    address: String,
    balance_sompi: i64,
    shares_count: u64,
    hashrate: f64,
}

async fn get_miner<P: PersistentStore, S: PayoutSender>(
    State(state): State<HttpState<P, S>>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<MinerResponse>, axum::http::StatusCode> {
    let record = state.store.get_miner(&query.address).await.map_err(|_| axum::http::StatusCode::INTERNAL_SERVER_ERROR)?;
    let ledger = state.ledger.lock().await;
    let shares_count = ledger.miner_stats(&query.address).map(|s| s.shares_count).unwrap_or(0);
    Ok(Json(MinerResponse {
        address: record.address,
        balance_sompi: record.balance_sompi,
        shares_count,
        hashrate: ledger.miner_hashrate(&query.address),
    }))
}

async fn get_miners<P: PersistentStore, S: PayoutSender>(State(state): State<HttpState<P, S>>) -> Json<Vec<MinerResponse>> {
    let ledger = state.ledger.lock().await;
    let miners = ledger
        .all_miner_stats()
        .iter()
        .map(|(address, stats)| MinerResponse {
            address: address.clone(),
            balance_sompi: 0,
            shares_count: stats.shares_count,
            hashrate: ledger.miner_hashrate(address),
        })
        .collect();
    Json(miners)
}

async fn get_blocks<P: PersistentStore, S: PayoutSender>(State(state): State<HttpState<P, S>>) -> Json<Vec<BlockRecord>> {
    Json(state.block_account.all_records().await)
}

#[derive(Deserialize)]
struct PayoutsQuery {
    address: String,
    #[serde(default = "default_payout_limit")]
    limit: usize,
}

fn default_payout_limit() -> usize {
    20
}

async fn get_payouts<P: PersistentStore, S: PayoutSender>(
    State(state): State<HttpState<P, S>>,
    Query(query): Query<PayoutsQuery>,
) -> Result<Json<Vec<PayoutRecord>>, axum::http::StatusCode> {
    state
        .store
        .get_recent_payouts(&query.address, query.limit)
        .await
        .map(Json)
        .map_err(|_| axum::http::StatusCode::INTERNAL_SERVER_ERROR)
}

async fn get_hashrate_history<P: PersistentStore, S: PayoutSender>(
    State(state): State<HttpState<P, S>>,
) -> Result<Json<Vec<HashrateSample>>, axum::http::StatusCode> {
    state.store.get_hashrate_history().await.map(Json).map_err(|_| axum::http::StatusCode::INTERNAL_SERVER_ERROR)
}

async fn get_version() -> Json<&'static str> {
    Json(env!("CARGO_PKG_VERSION"))
}
