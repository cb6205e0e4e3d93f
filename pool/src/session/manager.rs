//! `SessionManager`: per-connection state machine, line-delimited JSON
//! read/write, subscribe/authorize/submit handlers.
//!
//! Grounded in `jiopad::network_manager::NetworkManager::start`'s accept-loop
//! shape, generalized to spawn one task per connection that owns the
//! connection end-to-end (read, dispatch, write), matching the
//! `StratumContext`-per-client pattern of the stratum-bridge grounding
//! material (`other_examples/.../client_handler.rs.rs`).

use crate::block_account::BlockAccepted;
use crate::broadcaster::Broadcaster;
use crate::error::SubmitError;
use crate::ledger::{Contribution, ShareLedger, SubmitRejection};
use crate::node_rpc::NodeRpcClient;
use crate::protocol::{StratumError, StratumNotification, StratumRequest, StratumResponse};
use crate::session::{Encoding, Session, Worker};
use crate::template::TemplateService;
use consensus_core::Hash;
use rand::RngCore;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

/// Splits a `mining.authorize`/`mining.submit` identity string of the form
/// `"address.workerName"`. An identity with no `.` is treated as an address
/// with an unnamed worker — some miners omit the worker name entirely.
fn split_identity(identity: &str) -> (String, String) {
    match identity.split_once('.') {
        Some((address, worker)) => (address.to_string(), worker.to_string()),
        None => (identity.to_string(), "default".to_string()),
    }
}

fn parse_nonce_hex(nonce_hex: &str) -> Option<u64> {
    let trimmed = nonce_hex.strip_prefix("0x").unwrap_or(nonce_hex);
    u64::from_str_radix(trimmed, 16).ok()
}

/// Owns the accept loop and the per-connection state machine. Generic over
/// the node client only because it holds the `TemplateService` that drives
/// block submission on a share hit.
pub struct SessionManager<N: NodeRpcClient> {
    template_service: Arc<TemplateService<N>>,
    ledger: Arc<Mutex<ShareLedger>>,
    broadcaster: Arc<Broadcaster>,
    block_accepted_tx: mpsc::UnboundedSender<BlockAccepted>,
    initial_difficulty: f64,
    next_session_id: AtomicU64,
}

impl<N: NodeRpcClient + 'static> SessionManager<N> {
    pub fn new(
        template_service: Arc<TemplateService<N>>,
        ledger: Arc<Mutex<ShareLedger>>,
        broadcaster: Arc<Broadcaster>,
        block_accepted_tx: mpsc::UnboundedSender<BlockAccepted>,
        initial_difficulty: f64,
    ) -> Self {
        Self { template_service, ledger, broadcaster, block_accepted_tx, initial_difficulty, next_session_id: AtomicU64::new(1) }
    }

    pub fn ledger(&self) -> Arc<Mutex<ShareLedger>> {
        self.ledger.clone()
    }

    pub fn broadcaster(&self) -> Arc<Broadcaster> {
        self.broadcaster.clone()
    }

    /// Drives one TCP connection for its whole lifetime: reads
    /// newline-delimited JSON requests in order, dispatches them, and writes
    /// responses/notifications through the session's outbox so that writes
    /// stay serialized even though notifications can arrive from the
    /// `Broadcaster` concurrently with request handling.
    pub async fn handle_connection(self: Arc<Self>, stream: TcpStream, peer: std::net::SocketAddr) {
        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let (read_half, mut write_half) = stream.into_split();
        let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel::<String>();
        let session = Arc::new(Session::new(session_id, outbox_tx, self.initial_difficulty));

        let writer_task = tokio::spawn(async move {
            while let Some(line) = outbox_rx.recv().await {
                if write_half.write_all(line.as_bytes()).await.is_err() || write_half.flush().await.is_err() {
                    break;
                }
            }
        });

        let mut lines = BufReader::new(read_half).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) if !line.trim().is_empty() => line,
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(e) => {
                    debug!(target: "pool::session_manager", session_id, peer = %peer, error = %e, "read error, closing session");
                    break;
                }
            };

            let request: StratumRequest = match serde_json::from_str(&line) {
                Ok(r) => r,
                Err(e) => {
                    warn!(target: "pool::session_manager", session_id, error = %e, "malformed request, closing session");
                    break;
                }
            };

            if !self.dispatch(&session, request).await {
                warn!(target: "pool::session_manager", session_id, "unknown method, closing session");
                break;
            }
        }

        session.mark_dead();
        self.broadcaster.remove(session_id).await;
        writer_task.abort();
        info!(target: "pool::session_manager", session_id, peer = %peer, "session closed");
    }

    /// Dispatches one parsed request. Returns `false` for unrecognized
    /// methods, signaling the caller to close the socket.
    async fn dispatch(&self, session: &Arc<Session>, request: StratumRequest) -> bool {
        let response = match request.method.as_str() {
            "mining.subscribe" => self.handle_subscribe(session, &request.params).await,
            "mining.authorize" => self.handle_authorize(session, &request.params).await,
            "mining.submit" => self.handle_submit(session, &request.params).await,
            _ => return false,
        };

        let line = match response {
            Ok(result) => StratumResponse::ok(request.id, result).to_line(),
            Err(err) => StratumResponse::err(request.id, err).to_line(),
        };
        session.send_line(line);
        true
    }

    /// `mining.subscribe(agent)`.
    async fn handle_subscribe(&self, session: &Arc<Session>, params: &[Value]) -> Result<Value, StratumError> {
        let agent = params.first().and_then(Value::as_str).unwrap_or("unknown").to_string();
        *session.encoding.write().unwrap() = Encoding::from(agent.as_str());
        *session.agent.write().unwrap() = Some(agent);
        self.broadcaster.add(session.clone()).await;
        Ok(Value::Bool(true))
    }

    /// `mining.authorize(identity, password?)`.
    async fn handle_authorize(&self, session: &Arc<Session>, params: &[Value]) -> Result<Value, StratumError> {
        if session.agent.read().unwrap().is_none() {
            return Err(StratumError::Unauthorized);
        }
        let identity = params.first().and_then(Value::as_str).ok_or(StratumError::Unauthorized)?;
        let (address, worker_name) = split_identity(identity);
        if !crate::address::validate(&address) {
            return Err(StratumError::Unauthorized);
        }

        let worker = Worker { address: address.clone(), worker_name };
        session.workers.write().unwrap().insert(worker.clone());
        session.authorized.store(true, Ordering::Relaxed);
        self.broadcaster.register_worker(session.id, &worker).await;

        let mut extranonce = [0u8; 4];
        rand::thread_rng().fill_bytes(&mut extranonce);
        *session.extranonce.write().unwrap() = Some(extranonce);

        let difficulty = *session.difficulty.read().unwrap();
        session.send_line(StratumNotification::set_extranonce(&hex::encode(extranonce)).to_line());
        session.send_line(StratumNotification::set_difficulty(difficulty).to_line());

        Ok(Value::Bool(true))
    }

    /// `mining.submit(identity, jobId, nonceHex)`.
    async fn handle_submit(&self, session: &Arc<Session>, params: &[Value]) -> Result<Value, StratumError> {
        if !session.authorized.load(Ordering::Relaxed) {
            return Err(StratumError::Unauthorized);
        }

        let identity = params.first().and_then(Value::as_str).ok_or(StratumError::InternalError)?;
        let job_id = params.get(1).and_then(Value::as_str).ok_or(StratumError::InternalError)?;
        let nonce_hex = params.get(2).and_then(Value::as_str).ok_or(StratumError::InternalError)?;
        let (address, worker_name) = split_identity(identity);
        let nonce = parse_nonce_hex(nonce_hex).ok_or(StratumError::InternalError)?;

        let pre_pow_hash = {
            let registry = self.template_service.registry();
            let registry = registry.read().await;
            registry.lookup(job_id).ok_or(StratumError::JobNotFound)?
        };

        let (is_block_candidate, target) = {
            let cache = self.template_service.cache();
            let cache = cache.read().await;
            let template = cache.get(&pre_pow_hash).ok_or(StratumError::JobNotFound)?;
            template.check_work(nonce)
        };

        let difficulty = *session.difficulty.read().unwrap();
        let accepted = {
            let mut ledger = self.ledger.lock().await;
            ledger
                .submit(address, worker_name, difficulty, nonce, is_block_candidate, target)
                .map_err(map_rejection)?
        };

        if accepted.is_block {
            self.handle_block_hit(pre_pow_hash, nonce, accepted.contribution).await;
        }

        Ok(Value::Bool(true))
    }

    /// Submits the winning block to the node and, on success, hands a
    /// linearized PPLNS snapshot off to `BlockAccount`. The share itself is
    /// already recorded regardless of what happens here — a `BlockInvalid`
    /// verdict or an exhausted retry budget is logged and does not change
    /// the miner-visible `{"result":true}`.
    async fn handle_block_hit(&self, pre_pow_hash: Hash, nonce: u64, _contribution: Contribution) {
        match self.template_service.submit(pre_pow_hash, nonce).await {
            Ok(block_hash) => {
                let (contributions, accepted_at_ms) = {
                    let ledger = self.ledger.lock().await;
                    (ledger.snapshot_window(), crate::ledger::now_ms())
                };
                info!(target: "pool::session_manager", hash = %block_hash, "block accepted by node");
                let _ = self.block_accepted_tx.send(BlockAccepted { hash: block_hash, contributions, accepted_at_ms });
            }
            Err(SubmitError::BlockInvalid(reason)) => {
                warn!(target: "pool::session_manager", hash = %pre_pow_hash, reason = %reason, "submitted block rejected as invalid");
            }
            Err(e) => {
                warn!(target: "pool::session_manager", hash = %pre_pow_hash, error = %e, "block submission failed");
            }
        }
    }
}

fn map_rejection(rejection: SubmitRejection) -> StratumError {
    match rejection {
        SubmitRejection::JobNotFound => StratumError::JobNotFound,
        SubmitRejection::DuplicateShare => StratumError::DuplicateShare,
        SubmitRejection::LowDifficultyShare => StratumError::LowDifficultyShare,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_rpc::mock::MockNodeClient;
    use consensus_core::block::Block;
    use consensus_core::header::Header;
    use std::time::Duration;

    fn block(nonce: u64) -> Block {
        let header = Header::new_finalized(
            1,
            vec![vec![Hash::default()]],
            Hash::default(),
            Hash::default(),
            Hash::default(),
            1_700_000_000_000,
            0x1f00_ffff,
            nonce,
            0,
            0u64.into(),
            0,
            Hash::default(),
        );
        Block::new(header, Vec::new())
    }

    async fn manager() -> (Arc<SessionManager<MockNodeClient>>, String, Hash) {
        let node = Arc::new(MockNodeClient::new());
        node.push_template(block(0));
        let svc = Arc::new(TemplateService::new(node, "pool-address".to_string(), b"id".to_vec(), 10, Duration::from_millis(1), Duration::from_secs(1)));
        let ready = svc.fetch_and_register().await.unwrap().unwrap();
        let ledger = Arc::new(Mutex::new(ShareLedger::new(100)));
        let broadcaster = Arc::new(Broadcaster::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let manager = Arc::new(SessionManager::new(svc, ledger, broadcaster, tx, 1.0));
        (manager, ready.job_id, ready.pre_pow_hash)
    }

    fn session() -> (Arc<Session>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Session::new(1, tx, 1.0)), rx)
    }

    #[tokio::test]
    async fn subscribe_then_authorize_then_submit() {
        let (manager, job_id, _hash) = manager().await;
        let (session, _rx) = session();

        manager.handle_subscribe(&session, &[Value::String("test/1.0".to_string())]).await.unwrap();
        let authorized = manager
            .handle_authorize(&session, &[Value::String("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2.worker1".to_string())])
            .await
            .unwrap();
        assert_eq!(authorized, Value::Bool(true));
        assert!(session.authorized.load(Ordering::Relaxed));

        let result = manager
            .handle_submit(&session, &[Value::String("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2.worker1".to_string()), Value::String(job_id), Value::String("0000000000000001".to_string())])
            .await;
        assert_eq!(result, Ok(Value::Bool(true)));
    }

    #[tokio::test]
    async fn duplicate_share_returns_error_code_21() {
        let (manager, job_id, _hash) = manager().await;
        let (session, _rx) = session();
        manager.handle_subscribe(&session, &[]).await.unwrap();
        manager.handle_authorize(&session, &[Value::String("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2.worker1".to_string())]).await.unwrap();

        let params = [Value::String("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2.worker1".to_string()), Value::String(job_id), Value::String("0000000000000001".to_string())];
        assert_eq!(manager.handle_submit(&session, &params).await, Ok(Value::Bool(true)));
        assert_eq!(manager.handle_submit(&session, &params).await, Err(StratumError::DuplicateShare));
    }

    #[tokio::test]
    async fn submit_before_authorize_is_unauthorized() {
        let (manager, job_id, _hash) = manager().await;
        let (session, _rx) = session();
        let params = [Value::String("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2.worker1".to_string()), Value::String(job_id), Value::String("1".to_string())];
        assert_eq!(manager.handle_submit(&session, &params).await, Err(StratumError::Unauthorized));
    }

    #[tokio::test]
    async fn submit_against_unknown_job_is_job_not_found() {
        let (manager, _job_id, _hash) = manager().await;
        let (session, _rx) = session();
        manager.handle_subscribe(&session, &[]).await.unwrap();
        manager.handle_authorize(&session, &[Value::String("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2.worker1".to_string())]).await.unwrap();
        let params = [Value::String("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2.worker1".to_string()), Value::String("nonexistent".to_string()), Value::String("1".to_string())];
        assert_eq!(manager.handle_submit(&session, &params).await, Err(StratumError::JobNotFound));
    }

    #[test]
    fn split_identity_with_and_without_worker() {
        assert_eq!(split_identity("kaspa:qrx.worker1"), ("kaspa:qrx".to_string(), "worker1".to_string()));
        assert_eq!(split_identity("kaspa:qrx"), ("kaspa:qrx".to_string(), "default".to_string()));
    }

    #[test]
    fn parse_nonce_hex_accepts_optional_prefix() {
        assert_eq!(parse_nonce_hex("0x1"), Some(1));
        assert_eq!(parse_nonce_hex("0000000000000001"), Some(1));
        assert_eq!(parse_nonce_hex("not-hex"), None);
    }
}
