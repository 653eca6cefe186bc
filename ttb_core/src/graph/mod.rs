//! The signal level dependency graph produced by tracking.

pub mod compact;
pub mod connection;
pub mod filter;
pub mod signal;
pub mod store;
