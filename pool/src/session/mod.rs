pub mod manager;

pub use manager::SessionManager;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::mpsc;

/// `mining.notify` payload shape hint, derived from the `agent` string of
/// `mining.subscribe`. A single enum with a `From<&str>` impl, not a trait
/// per encoding — feature flags, not separate codepaths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Default,
    Bitmain,
}

impl From<&str> for Encoding {
    fn from(agent: &str) -> Self {
        if agent.to_ascii_lowercase().contains("bitmain") {
            Encoding::Bitmain
        } else {
            Encoding::Default
        }
    }
}

pub type SessionId = u64;

/// A single `(address, workerName)` pair a session mines for, registered on
/// `mining.authorize`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Worker {
    pub address: String,
    pub worker_name: String,
}

/// Per-connection state. Owned by the per-connection task; written to by
/// that task alone. Other components (Broadcaster) only ever touch a
/// session through its `outbox` sender, never its fields directly, so there
/// is a single writer.
pub struct Session {
    pub id: SessionId,
    pub agent: std::sync::RwLock<Option<String>>,
    pub authorized: AtomicBool,
    pub workers: std::sync::RwLock<HashSet<Worker>>,
    pub difficulty: std::sync::RwLock<f64>,
    pub extranonce: std::sync::RwLock<Option<[u8; 4]>>,
    pub encoding: std::sync::RwLock<Encoding>,
    pub outbox: mpsc::UnboundedSender<String>,
    alive: AtomicBool,
    last_activity_ms: AtomicU64,
}

impl Session {
    pub fn new(id: SessionId, outbox: mpsc::UnboundedSender<String>, initial_difficulty: f64) -> Self {
        Self {
            id,
            agent: std::sync::RwLock::new(None),
            authorized: AtomicBool::new(false),
            workers: std::sync::RwLock::new(HashSet::new()),
            difficulty: std::sync::RwLock::new(initial_difficulty),
            extranonce: std::sync::RwLock::new(None),
            encoding: std::sync::RwLock::new(Encoding::Default),
            outbox,
            alive: AtomicBool::new(true),
            last_activity_ms: AtomicU64::new(0),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Sends a line to the miner. Marks the session dead on write failure.
    pub fn send_line(&self, line: String) -> bool {
        if self.outbox.send(line).is_err() {
            self.alive.store(false, Ordering::Relaxed);
            false
        } else {
            true
        }
    }

    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::Relaxed);
    }

    pub fn touch(&self, now_ms: u64) {
        self.last_activity_ms.store(now_ms, Ordering::Relaxed);
    }
}
