//! omni-storage
//!
//! Local persistence for the chat transcript. A small string key-value
//! contract with file-backed and in-memory stores, and the transcript store
//! built on top of it.

pub mod error;
pub mod store;
pub mod transcript;
