use crate::config::P2PConfig;
use crate::consensus_manager::ConsensusManager;
use consensus_core::block::Block;
use consensus_core::tx::Transaction;
use consensus_core::Hash;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use std::collections::HashMap;

/// Network manager for P2P communication
pub struct NetworkManager {
    config: P2PConfig,
    peers: Arc<std::sync::RwLock<HashMap<String, PeerConnection>>>,
}

struct PeerConnection {
    address: String,
    stream: Option<TcpStream>,
    last_seen: std::time::Instant,
}

impl NetworkManager {
    /// Create a new network manager
    pub async fn new(config: &P2PConfig, consensus: Arc<ConsensusManager>) -> Result<Self, String> {
        Ok(Self {
            config: config.clone(),
            peers: Arc::new(std::sync::RwLock::new(HashMap::new())),
        })
    }

    /// Start the network manager
    pub async fn start(&self) -> Result<(), String> {
        tracing::info!("Starting P2P network on {}:{}", self.config.listen_address, self.config.port);

        // Start listening for connections
        let listener = TcpListener::bind(format!("{}:{}", self.config.listen_address, self.config.port))
            .await
            .map_err(|e| format!("Failed to bind to address: {}", e))?;

        // Spawn connection handler
        let peers = self.peers.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, addr)) => {
                        tracing::info!("Accepted connection from {}", addr);
                        // Handle connection (placeholder)
                    }
                    Err(e) => {
                        tracing::error!("Failed to accept connection: {}", e);
                    }
                }
            }
        });

        // Connect to bootstrap peers
        for peer_addr in &self.config.bootstrap_peers {
            if let Err(e) = self.connect_to_peer(peer_addr.clone()).await {
                tracing::warn!("Failed to connect to bootstrap peer {}: {}", peer_addr, e);
            }
        }

        Ok(())
    }

    /// Stop the network manager
    pub async fn stop(&self) -> Result<(), String> {
        tracing::info!("Stopping P2P network");
        // Close all connections
        Ok(())
    }

    /// Connect to a peer
    async fn connect_to_peer(&self, address: String) -> Result<(), String> {
        let stream = TcpStream::connect(&address).await
            .map_err(|e| format!("Failed to connect to {}: {}", address, e))?;

        let mut peers = self.peers.write().unwrap();
        peers.insert(address.clone(), PeerConnection {
            address,
            stream: Some(stream),
            last_seen: std::time::Instant::now(),
        });

        Ok(())
    }

    /// Broadcast a block to all peers
    pub async fn broadcast_block(&self, block: &Block) -> Result<(), String> {
        // Placeholder - would serialize and send block to all peers
        tracing::debug!("Broadcasting block {} to peers", block.header.hash);
        Ok(())
    }

    /// Broadcast a transaction to all peers
    pub async fn broadcast_transaction(&self, tx: &Transaction) -> Result<(), String> {
        // Placeholder - would serialize and send transaction to all peers
        tracing::debug!("Broadcasting transaction {} to peers", tx.hash());
        Ok(())
    }

    /// Request blocks from peers
    pub async fn request_blocks(&self, hashes: Vec<Hash>) -> Result<(), String> {
        // Placeholder - would send block requests to peers
        tracing::debug!("Requesting {} blocks from peers", hashes.len());
        Ok(())
    }

    /// Get connected peer count
    pub fn peer_count(&self) -> usize {
        let peers = self.peers.read().unwrap();
        peers.len()
    }
}
