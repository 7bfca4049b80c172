//! Per-request pipeline: collect posts, summarize, format and deliver

pub mod collect;
pub mod deliver;
pub mod handler;
pub mod summarize;

// Re-export the main handler for convenience
pub use handler::{RequestHandler, RequestOutcome, RequestStage};

