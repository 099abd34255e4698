//! Sorted registry of persisted documents.
//!
//! # Responsibility
//! - Hold every persisted document known to the client.
//! - Keep the materialized sequence ordered by `name`.
//! - Notify listeners synchronously on reset/add/remove.
//!
//! # Invariants
//! - Ids are unique; every entry has `is_new() == false`.
//! - Order is a stable sort by current `name` (byte-wise), re-applied on
//!   every `add`, `reset` and `refresh`; ties keep insertion order.
//! - Listeners observe the post-mutation sequence.

use crate::model::document::{Document, DocumentId, DocumentRecord};
use crate::transport::error::TransportError;
use crate::transport::Transport;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Registry change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// Contents were replaced wholesale.
    Reset,
    Added(DocumentId),
    Removed(DocumentId),
    /// A persisted edit landed; order was re-applied.
    Updated(DocumentId),
}

/// Receiver of registry notifications.
pub trait RegistryListener {
    fn on_registry_event(&mut self, event: &RegistryEvent, documents: &[Document]);
}

impl<F> RegistryListener for F
where
    F: FnMut(&RegistryEvent, &[Document]),
{
    fn on_registry_event(&mut self, event: &RegistryEvent, documents: &[Document]) {
        self(event, documents)
    }
}

/// Registry mutation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Transient documents cannot enter the registry.
    NotPersisted,
    NotFound(DocumentId),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPersisted => write!(f, "document has not been saved yet"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
        }
    }
}

impl Error for RegistryError {}

/// Ordered set of persisted documents.
#[derive(Default)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
    listeners: Vec<Box<dyn RegistryListener>>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one notification listener.
    pub fn subscribe(&mut self, listener: Box<dyn RegistryListener>) {
        self.listeners.push(listener);
    }

    /// Loads the full list from the transport and replaces contents.
    ///
    /// Returns the number of loaded documents. On failure the registry is
    /// left untouched and no notification fires.
    pub async fn fetch_all<T>(&mut self, transport: &T) -> Result<usize, TransportError>
    where
        T: Transport + ?Sized,
    {
        let records = transport.list().await.map_err(|err| {
            warn!(
                "event=registry_fetch module=registry status=error message={}",
                err.message
            );
            err
        })?;
        let count = self.reset(records);
        info!(
            "event=registry_fetch module=registry status=ok count={}",
            count
        );
        Ok(count)
    }

    /// Replaces contents with the given records and fires `Reset`.
    ///
    /// Records repeating an earlier id are dropped.
    pub fn reset(&mut self, records: Vec<DocumentRecord>) -> usize {
        let mut documents: Vec<Document> = Vec::with_capacity(records.len());
        for record in records {
            if documents.iter().any(|doc| doc.id() == Some(&record.id)) {
                warn!(
                    "event=registry_reset module=registry status=skipped reason=duplicate_id id={}",
                    record.id
                );
                continue;
            }
            documents.push(Document::from_record(record));
        }
        self.documents = documents;
        self.sort();
        self.notify(RegistryEvent::Reset);
        self.documents.len()
    }

    /// Inserts one persisted document and re-sorts.
    ///
    /// Returns `Ok(false)` without notifying when the id is already present.
    pub fn add(&mut self, document: Document) -> Result<bool, RegistryError> {
        let id = document.id().cloned().ok_or(RegistryError::NotPersisted)?;
        if self.contains(&id) {
            debug!(
                "event=registry_add module=registry status=skipped reason=present id={}",
                id
            );
            return Ok(false);
        }

        self.documents.push(document);
        self.sort();
        self.notify(RegistryEvent::Added(id));
        Ok(true)
    }

    /// Removes one document by id and returns it.
    pub fn remove(&mut self, id: &DocumentId) -> Result<Document, RegistryError> {
        let index = self
            .position(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        let removed = self.documents.remove(index);
        self.notify(RegistryEvent::Removed(id.clone()));
        Ok(removed)
    }

    /// Re-applies ordering after a persisted in-place edit and fires
    /// `Updated`.
    pub fn refresh(&mut self, id: &DocumentId) -> Result<(), RegistryError> {
        if !self.contains(id) {
            return Err(RegistryError::NotFound(id.clone()));
        }
        self.sort();
        self.notify(RegistryEvent::Updated(id.clone()));
        Ok(())
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id() == Some(id))
    }

    /// Mutable access for in-place edits.
    ///
    /// Edits do not re-sort; the next `add`, `reset` or `refresh` does.
    pub fn get_mut(&mut self, id: &DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|doc| doc.id() == Some(id))
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.position(id).is_some()
    }

    /// Documents in presentation order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn ids(&self) -> Vec<DocumentId> {
        self.documents
            .iter()
            .filter_map(|doc| doc.id().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn position(&self, id: &DocumentId) -> Option<usize> {
        self.documents.iter().position(|doc| doc.id() == Some(id))
    }

    fn sort(&mut self) {
        // `sort_by` is stable, so equal names keep insertion order.
        self.documents.sort_by(|a, b| a.name().cmp(b.name()));
    }

    fn notify(&mut self, event: RegistryEvent) {
        for listener in &mut self.listeners {
            listener.on_registry_event(&event, &self.documents);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentRegistry, RegistryError, RegistryEvent};
    use crate::model::document::{Document, DocumentAttrs, DocumentId, DocumentRecord};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(id: u64, name: &str) -> DocumentRecord {
        DocumentRecord::new(id, DocumentAttrs::new(name, "", ""))
    }

    fn names(registry: &DocumentRegistry) -> Vec<&str> {
        registry.documents().iter().map(Document::name).collect()
    }

    #[test]
    fn reset_sorts_by_name_and_notifies() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut registry = DocumentRegistry::new();
        registry.subscribe(Box::new(move |event: &RegistryEvent, docs: &[Document]| {
            sink.borrow_mut().push((event.clone(), docs.len()));
        }));

        registry.reset(vec![record(2, "Zebra"), record(1, "Apple")]);

        assert_eq!(names(&registry), vec!["Apple", "Zebra"]);
        assert_eq!(*events.borrow(), vec![(RegistryEvent::Reset, 2)]);
    }

    #[test]
    fn reset_drops_repeated_ids() {
        let mut registry = DocumentRegistry::new();
        let count = registry.reset(vec![record(1, "a"), record(1, "b")]);
        assert_eq!(count, 1);
        assert_eq!(names(&registry), vec!["a"]);
    }

    #[test]
    fn add_is_idempotent_by_id() {
        let mut registry = DocumentRegistry::new();
        let doc = Document::from_record(record(5, "five"));
        assert_eq!(registry.add(doc.clone()), Ok(true));
        assert_eq!(registry.add(doc), Ok(false));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn add_rejects_transient_documents() {
        let mut registry = DocumentRegistry::new();
        assert_eq!(
            registry.add(Document::new()),
            Err(RegistryError::NotPersisted)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_missing_id_reports_not_found() {
        let mut registry = DocumentRegistry::new();
        let err = registry
            .remove(&DocumentId::from("9"))
            .expect_err("missing id must fail");
        assert_eq!(err, RegistryError::NotFound(DocumentId::from("9")));
    }
}
