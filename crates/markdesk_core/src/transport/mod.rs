//! Transport collaborator contract.
//!
//! # Responsibility
//! - Describe the document API consumed by the client core.
//! - Provide JSON decoding helpers for HTTP adapters.
//!
//! # Invariants
//! - Completions are delivered on the caller's (single-threaded) loop; futures
//!   are not required to be `Send`.
//! - Failures are always reported as `TransportError`, never panics.

use crate::model::document::{DocumentAttrs, DocumentId, DocumentRecord};
use async_trait::async_trait;

pub mod error;
pub mod memory;
pub mod wire;

pub use error::{TransportError, TransportResult};

/// Document API used by the registry and the navigation controller.
#[async_trait(?Send)]
pub trait Transport {
    /// LIST: every saved document.
    async fn list(&self) -> TransportResult<Vec<DocumentRecord>>;

    /// GET: one document by id.
    async fn get(&self, id: &DocumentId) -> TransportResult<DocumentRecord>;

    /// CREATE: persists a new document; the response carries the new id.
    async fn create(&self, attrs: &DocumentAttrs) -> TransportResult<DocumentRecord>;

    /// UPDATE: replaces the attributes of an existing document.
    async fn update(&self, id: &DocumentId, attrs: &DocumentAttrs)
        -> TransportResult<DocumentRecord>;

    /// DELETE: removes one document.
    async fn delete(&self, id: &DocumentId) -> TransportResult<()>;
}
