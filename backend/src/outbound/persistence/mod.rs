//! Persistence adapters for the user store port.
//!
//! Records live in process memory only and are lost on restart. The adapter
//! keeps the same contract a durable store would: owned copies in and out,
//! concurrent readers, serialised writers.

mod in_memory_user_store;

pub use in_memory_user_store::InMemoryUserStore;
