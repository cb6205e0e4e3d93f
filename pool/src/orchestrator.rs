//! `PoolOrchestrator`: wires every other component into one running pool —
//! the accept loop, the template-service's job-ready stream, the
//! block-accepted hand-off to `BlockAccount`, and the periodic
//! cleanup/hashrate-snapshot tickers.

use crate::block_account::{BlockAccepted, BlockAccount, CoinbaseMaturity};
use crate::broadcaster::Broadcaster;
use crate::ledger::ShareLedger;
use crate::node_rpc::NodeRpcClient;
use crate::payout::PayoutSender;
use crate::session::manager::SessionManager;
use crate::store::PersistentStore;
use crate::template::TemplateService;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};

pub struct OrchestratorConfig {
    pub listen_address: String,
    pub initial_difficulty: f64,
    pub cleanup_tick: Duration,
    pub hashrate_snapshot_tick: Duration,
    pub miner_inactive_after: Duration,
    pub share_history_retention: Duration,
    pub block_record_retention: Duration,
}

pub struct PoolOrchestrator<N: NodeRpcClient, P: PersistentStore, S: PayoutSender> {
    config: OrchestratorConfig,
    template_service: Arc<TemplateService<N>>,
    session_manager: Arc<SessionManager<N>>,
    broadcaster: Arc<Broadcaster>,
    ledger: Arc<Mutex<ShareLedger>>,
    block_account: Arc<BlockAccount<P, S>>,
    store: Arc<P>,
    block_accepted_rx: Mutex<mpsc::UnboundedReceiver<BlockAccepted>>,
    maturity_tx: mpsc::UnboundedSender<CoinbaseMaturity>,
    maturity_rx: Mutex<mpsc::UnboundedReceiver<CoinbaseMaturity>>,
}

impl<N: NodeRpcClient + 'static, P: PersistentStore + 'static, S: PayoutSender + 'static> PoolOrchestrator<N, P, S> {
    pub fn new(
        config: OrchestratorConfig,
        template_service: Arc<TemplateService<N>>,
        block_account: Arc<BlockAccount<P, S>>,
        store: Arc<P>,
        pplns_window: usize,
    ) -> Self {
        let ledger = Arc::new(Mutex::new(ShareLedger::new(pplns_window)));
        let broadcaster = Arc::new(Broadcaster::new());
        let (block_accepted_tx, block_accepted_rx) = mpsc::unbounded_channel();
        let (maturity_tx, maturity_rx) = mpsc::unbounded_channel();
        let session_manager = Arc::new(SessionManager::new(
            template_service.clone(),
            ledger.clone(),
            broadcaster.clone(),
            block_accepted_tx,
            config.initial_difficulty,
        ));

        Self {
            config,
            template_service,
            session_manager,
            broadcaster,
            ledger,
            block_account,
            store,
            block_accepted_rx: Mutex::new(block_accepted_rx),
            maturity_tx,
            maturity_rx: Mutex::new(maturity_rx),
        }
    }

    /// Inbound side of the node-maturity -> reward path: the external UTXO
    /// processor delivers `CoinbaseMaturity` events here once a block's
    /// coinbase output matures.
    pub fn maturity_sender(&self) -> mpsc::UnboundedSender<CoinbaseMaturity> {
        self.maturity_tx.clone()
    }

    pub fn ledger(&self) -> Arc<Mutex<ShareLedger>> {
        self.ledger.clone()
    }

    pub fn broadcaster(&self) -> Arc<Broadcaster> {
        self.broadcaster.clone()
    }

    pub fn block_account(&self) -> Arc<BlockAccount<P, S>> {
        self.block_account.clone()
    }

    /// Binds the Stratum listener and runs every background task until one
    /// of them exits. Owns the accept loop and the tickers.
    pub async fn run(self: Arc<Self>) -> Result<(), crate::error::PoolError> {
        let listener = TcpListener::bind(&self.config.listen_address)
            .await
            .map_err(|e| crate::error::PoolError::Bind(self.config.listen_address.clone(), e))?;
        info!(target: "pool::orchestrator", addr = %self.config.listen_address, "stratum listener bound");

        let accept_task = {
            let this = self.clone();
            tokio::spawn(async move { this.accept_loop(listener).await })
        };

        let template_task = {
            let this = self.clone();
            tokio::spawn(async move { this.run_template_service().await })
        };

        let block_accepted_task = {
            let this = self.clone();
            tokio::spawn(async move { this.drain_block_accepted().await })
        };

        let maturity_task = {
            let this = self.clone();
            tokio::spawn(async move { this.drain_maturity().await })
        };

        let cleanup_task = {
            let this = self.clone();
            tokio::spawn(async move { this.cleanup_loop().await })
        };

        let hashrate_task = {
            let this = self.clone();
            tokio::spawn(async move { this.hashrate_snapshot_loop().await })
        };

        tokio::select! {
            res = accept_task => warn!(target: "pool::orchestrator", ?res, "accept loop exited"),
            res = template_task => warn!(target: "pool::orchestrator", ?res, "template service exited"),
            res = block_accepted_task => warn!(target: "pool::orchestrator", ?res, "block-accepted drain exited"),
            res = maturity_task => warn!(target: "pool::orchestrator", ?res, "coinbase-maturity drain exited"),
            res = cleanup_task => warn!(target: "pool::orchestrator", ?res, "cleanup loop exited"),
            res = hashrate_task => warn!(target: "pool::orchestrator", ?res, "hashrate snapshot loop exited"),
        }

        Ok(())
    }

    async fn accept_loop(&self, listener: TcpListener) {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let manager = self.session_manager.clone();
                    tokio::spawn(async move { manager.handle_connection(stream, peer).await });
                }
                Err(e) => {
                    error!(target: "pool::orchestrator", error = %e, "failed to accept connection");
                }
            }
        }
    }

    /// Drives `TemplateService::run`, broadcasting each job-ready event to
    /// every authorized session.
    async fn run_template_service(&self) {
        let broadcaster = self.broadcaster.clone();
        self.template_service
            .run(move |ready| {
                let broadcaster = broadcaster.clone();
                tokio::spawn(async move {
                    broadcaster.broadcast_job(&ready.job_id, ready.pre_pow_hash, ready.timestamp).await;
                });
            })
            .await;
    }

    /// Consumes `BlockAccepted` events raised by `SessionManager` on a
    /// block-hitting share and records them against `BlockAccount`.
    async fn drain_block_accepted(&self) {
        let mut rx = self.block_accepted_rx.lock().await;
        while let Some(event) = rx.recv().await {
            self.block_account.record_block_accepted(event.hash, event.contributions, event.accepted_at_ms).await;
        }
    }

    /// Consumes `CoinbaseMaturity` events and mediates the node-maturity ->
    /// reward path: looks up the block's current color via the node RPC
    /// handle, then lets `BlockAccount` distribute rewards or mark the block
    /// orphaned.
    async fn drain_maturity(&self) {
        let mut rx = self.maturity_rx.lock().await;
        while let Some(event) = rx.recv().await {
            let is_blue = match self.template_service.node().get_current_block_color(event.hash).await {
                Ok(blue) => blue,
                Err(e) => {
                    warn!(target: "pool::orchestrator", hash = %event.hash, error = %e, "failed to query block color, treating as orphaned");
                    false
                }
            };
            if let Err(e) = self.block_account.on_coinbase_mature(event, is_blue).await {
                error!(target: "pool::orchestrator", error = %e, "failed to process coinbase maturity event");
            }
        }
    }

    /// Periodic pruning of inactive miners, stale share history, and
    /// terminal block records.
    async fn cleanup_loop(&self) {
        let mut interval = tokio::time::interval(self.config.cleanup_tick);
        loop {
            interval.tick().await;
            let now = crate::ledger::now_ms();
            {
                let mut ledger = self.ledger.lock().await;
                ledger.cleanup(self.config.miner_inactive_after.as_millis() as u64, self.config.share_history_retention.as_millis() as u64);
            }
            self.block_account.cleanup(self.config.block_record_retention.as_millis() as u64, now).await;
        }
    }

    /// Periodic pool-wide hashrate snapshot into the persistent store, used
    /// to render `/hashrate-history`.
    async fn hashrate_snapshot_loop(&self) {
        let mut interval = tokio::time::interval(self.config.hashrate_snapshot_tick);
        loop {
            interval.tick().await;
            let hashrate = self.ledger.lock().await.pool_hashrate();
            let now = crate::ledger::now_ms();
            if let Err(e) = self.store.record_hashrate(now, hashrate).await {
                warn!(target: "pool::orchestrator", error = %e, "failed to record hashrate snapshot");
            }
        }
    }

    pub fn uptime_since(&self, started_at: Instant) -> Duration {
        started_at.elapsed()
    }
}
