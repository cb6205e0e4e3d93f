//! Processing flow for block pipeline
//!
//! This module provides processing queues and validation flows for
//! orchestrating block processing.

pub mod process_queue;
pub mod validation_flow;

pub use process_queue::ProcessQueue;
pub use validation_flow::ValidationFlow;

