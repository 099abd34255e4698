//! Document domain model.
//!
//! # Responsibility
//! - Define the document entity shared by registry, controller and presenters.
//! - Keep dirty/new derivation next to the data it is derived from.
//!
//! # Invariants
//! - A document is persisted iff it carries a server-assigned `DocumentId`.
//! - "Dirty" always means "differs from the last-persisted snapshot".

pub mod document;
