//! Domain layer types and invariants.

pub mod criteria;
pub mod entities;
pub mod excerpt;
pub mod posts;
pub mod types;
