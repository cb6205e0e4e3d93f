use thiserror::Error;

/// Crate-wide error type. Fatal startup failures surface through this type
/// from `Daemon::new`/`Daemon::run`.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] database::DbError),

    #[error("node rpc error: {0}")]
    NodeRpc(#[from] rpc_core::RpcError),

    #[error("node unreachable at startup: {0}")]
    NodeUnreachable(String),

    #[error("failed to bind {0}: {1}")]
    Bind(String, std::io::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type PoolResult<T> = Result<T, PoolError>;

/// Errors raised by `TemplateService::submit`.
#[derive(Error, Debug, Clone)]
pub enum SubmitError {
    #[error("template not found for pre-pow hash")]
    TemplateNotFound,

    #[error("block rejected by node: {0}")]
    BlockInvalid(String),

    #[error("submit retry budget exceeded after {retries} attempts over {elapsed_secs}s")]
    RetryBudgetExceeded { retries: u32, elapsed_secs: u64 },

    #[error("node rpc error: {0}")]
    NodeRpc(String),
}
