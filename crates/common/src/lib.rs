//! Shared helpers for the item service crates: response payload types and
//! logging initialization.

pub mod types;
pub mod utils;
