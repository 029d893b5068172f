//! Application services orchestrating domain logic and repositories.

pub mod error;
pub mod pagination;
pub mod repos;
pub mod search;
pub mod taxonomy;
