//! Client-side registry of persisted documents.
//!
//! # Responsibility
//! - Own the persisted document set and its presentation order.
//! - Fan out change notifications to listing presenters.
//!
//! # Invariants
//! - Transient (unsaved) documents never enter the registry.

pub mod document_registry;
