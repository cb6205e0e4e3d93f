pub mod coordinator;
pub mod api;
pub mod model;
pub mod mempool;

pub use coordinator::RpcCoordinator;
pub use api::RpcApi;
pub use model::*;
pub use mempool::MempoolInterface;
