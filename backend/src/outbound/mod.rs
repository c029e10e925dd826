//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: the process-local user store.
//!
//! Adapters are thin translators between domain types and their storage
//! representation. They contain no business logic.

pub mod persistence;
