//! Ranking of raw class scores.

pub mod labels;
pub mod topk;

pub use labels::ClassLabels;
pub use topk::{rank_order, top_k};
