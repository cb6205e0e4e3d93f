//! `TemplateService`: subscribes to the node's new-template stream, fills
//! `TemplateCache`/`JobRegistry`, submits solved blocks with retry.

use crate::error::SubmitError;
use crate::node_rpc::{NodeRpcClient, SubmitOutcome};
use crate::template::{JobRegistry, Template, TemplateCache};
use consensus_core::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Emitted once a new template has been cached and minted a job id:
/// `job-ready(id, hash, timestamp)`.
#[derive(Debug, Clone)]
pub struct JobReady {
    pub job_id: String,
    pub pre_pow_hash: Hash,
    pub timestamp: u64,
}

pub struct TemplateService<N: NodeRpcClient> {
    node: Arc<N>,
    pay_address: String,
    identity: Vec<u8>,
    cache: Arc<RwLock<TemplateCache>>,
    registry: Arc<RwLock<JobRegistry>>,
    retry_sleep: Duration,
    retry_cap: Duration,
}

impl<N: NodeRpcClient> TemplateService<N> {
    pub fn new(
        node: Arc<N>,
        pay_address: String,
        identity: Vec<u8>,
        daa_window: usize,
        retry_sleep: Duration,
        retry_cap: Duration,
    ) -> Self {
        Self {
            node,
            pay_address,
            identity,
            cache: Arc::new(RwLock::new(TemplateCache::new(daa_window))),
            registry: Arc::new(RwLock::new(JobRegistry::new())),
            retry_sleep,
            retry_cap,
        }
    }

    pub fn cache(&self) -> Arc<RwLock<TemplateCache>> {
        self.cache.clone()
    }

    pub fn registry(&self) -> Arc<RwLock<JobRegistry>> {
        self.registry.clone()
    }

    /// Exposes the node handle so the orchestrator can mediate the
    /// node-maturity -> reward path without duplicating a second RPC client.
    pub fn node(&self) -> Arc<N> {
        self.node.clone()
    }

    /// Fetches one template from the node, inserts it if it's new, and
    /// returns the resulting `job-ready` event (or `None` if the pre-PoW
    /// hash was already cached — idempotent ingest).
    pub async fn fetch_and_register(&self) -> Result<Option<JobReady>, rpc_core::RpcError> {
        let block = self.node.get_block_template(&self.pay_address, &self.identity).await?;
        let template = Template::new(block);
        let pre_pow_hash = template.pre_pow_hash;
        let timestamp = template.block.header.timestamp;

        let mut cache = self.cache.write().await;
        if !cache.insert(template) {
            return Ok(None);
        }
        if let Some(evicted) = cache.evict_if_over_capacity() {
            drop(cache);
            let mut registry = self.registry.write().await;
            registry.expire_oldest();
            info!(target: "pool::template_service", hash = %evicted, "evicted oldest template");
        }

        let mut registry = self.registry.write().await;
        let job_id = registry.mint(pre_pow_hash);
        info!(target: "pool::template_service", job_id = %job_id, hash = %pre_pow_hash, "job ready");
        Ok(Some(JobReady { job_id, pre_pow_hash, timestamp }))
    }

    /// Runs the subscribe/fetch loop, forwarding each `job-ready` to `on_ready`.
    pub async fn run<F>(&self, mut on_ready: F)
    where
        F: FnMut(JobReady) + Send,
    {
        let mut rx = self.node.subscribe_new_templates();
        loop {
            match rx.recv().await {
                Ok(()) => match self.fetch_and_register().await {
                    Ok(Some(ready)) => on_ready(ready),
                    Ok(None) => {}
                    Err(e) => warn!(target: "pool::template_service", error = %e, "failed to fetch block template"),
                },
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(target: "pool::template_service", skipped, "new-template stream lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    warn!(target: "pool::template_service", "new-template stream closed, re-subscribing");
                    rx = self.node.subscribe_new_templates();
                }
            }
        }
    }

    /// `submit(prePoWHash, nonce) -> blockHash`.
    pub async fn submit(&self, pre_pow_hash: Hash, nonce: u64) -> Result<Hash, SubmitError> {
        let block = {
            let cache = self.cache.read().await;
            let tpl = cache.get(&pre_pow_hash).ok_or(SubmitError::TemplateNotFound)?;
            let mut block = tpl.block.clone();
            block.header.nonce = nonce;
            block.header.finalize();
            block
        };

        let started = Instant::now();
        let mut retries: u32 = 0;
        loop {
            match self.node.submit_block(&block, false).await {
                Ok(SubmitOutcome::Success) => return Ok(block.header.hash),
                Ok(SubmitOutcome::RejectIsInIbd) | Ok(SubmitOutcome::RejectRouteIsFull) => {
                    if started.elapsed() >= self.retry_cap {
                        return Err(SubmitError::RetryBudgetExceeded { retries, elapsed_secs: started.elapsed().as_secs() });
                    }
                    retries += 1;
                    warn!(target: "pool::template_service", retries, hash = %pre_pow_hash, "submitBlock transient rejection, retrying");
                    tokio::time::sleep(self.retry_sleep).await;
                }
                Ok(SubmitOutcome::RejectBlockInvalid(reason)) => {
                    warn!(target: "pool::template_service", reason = %reason, hash = %pre_pow_hash, "submitBlock rejected: block invalid");
                    return Err(SubmitError::BlockInvalid(reason));
                }
                Err(e) => return Err(SubmitError::NodeRpc(e.to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_rpc::mock::MockNodeClient;
    use consensus_core::block::Block;
    use consensus_core::header::Header;

    fn block(nonce: u64, timestamp: u64) -> Block {
        let header = Header::new_finalized(
            1,
            vec![vec![Hash::default()]],
            Hash::default(),
            Hash::default(),
            Hash::default(),
            timestamp,
            0x1f00_ffff,
            nonce,
            0,
            0u64.into(),
            0,
            Hash::default(),
        );
        Block::new(header, Vec::new())
    }

    fn service(node: Arc<MockNodeClient>) -> TemplateService<MockNodeClient> {
        TemplateService::new(node, "pool-address".to_string(), b"jio-pool".to_vec(), 2, Duration::from_millis(1), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn fetch_and_register_mints_job() {
        let node = Arc::new(MockNodeClient::new());
        node.push_template(block(0, 1));
        let svc = service(node);
        let ready = svc.fetch_and_register().await.unwrap();
        assert!(ready.is_some());
        assert_eq!(svc.cache().read().await.len(), 1);
        assert_eq!(svc.registry().read().await.len(), 1);
    }

    #[tokio::test]
    async fn submit_returns_block_invalid_without_retry() {
        let node = Arc::new(MockNodeClient::new());
        node.push_template(block(0, 1));
        let svc = service(node.clone());
        let ready = svc.fetch_and_register().await.unwrap().unwrap();

        node.push_submit_outcome(crate::node_rpc::SubmitOutcome::RejectBlockInvalid("bad-merkle-root".to_string()));
        let result = svc.submit(ready.pre_pow_hash, 42).await;
        assert!(matches!(result, Err(SubmitError::BlockInvalid(_))));
    }

    #[tokio::test]
    async fn submit_retries_then_succeeds() {
        let node = Arc::new(MockNodeClient::new());
        node.push_template(block(0, 1));
        let svc = service(node.clone());
        let ready = svc.fetch_and_register().await.unwrap().unwrap();

        node.push_submit_outcome(crate::node_rpc::SubmitOutcome::Success);
        node.push_submit_outcome(crate::node_rpc::SubmitOutcome::RejectIsInIbd);
        let result = svc.submit(ready.pre_pow_hash, 42).await;
        assert!(result.is_ok());
    }
}
