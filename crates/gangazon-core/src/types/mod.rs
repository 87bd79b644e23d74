//! Shared value types.

pub mod pagination;
