//! Durable session identity for the triage client.
//!
//! A single opaque token correlates every turn of one conversation. It is
//! created on first use, reused across restarts, and replaced (never mutated)
//! when the service concludes the conversation or the user resets it.

pub mod identity;
pub mod store;

pub use identity::{SESSION_KEY, SessionIdentity, SessionToken};
pub use store::{FileStore, MemoryStore, default_storage_path};
