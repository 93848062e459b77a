//! Service layer holding the in-memory item collection.
//! - One `ItemStore` per process, shared with request handlers.
//! - Every operation runs under a single lock, so it is atomic with respect
//!   to the others.

pub mod errors;
pub mod item_store;
