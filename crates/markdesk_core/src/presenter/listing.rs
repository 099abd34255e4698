//! Sidebar listing projection.

use crate::model::document::{Document, DocumentId};
use crate::registry::document_registry::{RegistryEvent, RegistryListener};
use std::cell::RefCell;
use std::rc::Rc;

/// One listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub id: DocumentId,
    pub name: String,
    /// Canonical link target.
    pub href: String,
}

/// Re-renders rows on every registry notification.
///
/// Clones share rows, so one clone can be subscribed while another is read.
#[derive(Debug, Clone, Default)]
pub struct ListingView {
    rows: Rc<RefCell<Vec<ListingRow>>>,
    renders: Rc<RefCell<usize>>,
}

impl ListingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<ListingRow> {
        self.rows.borrow().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.rows.borrow().iter().map(|row| row.name.clone()).collect()
    }

    /// True when the "no saved documents" placeholder should be shown.
    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    pub fn render_count(&self) -> usize {
        *self.renders.borrow()
    }

    fn render(&self, documents: &[Document]) {
        let rows: Vec<ListingRow> = documents
            .iter()
            .filter_map(|doc| {
                let id = doc.id()?.clone();
                Some(ListingRow {
                    href: format!("#documents/{id}"),
                    name: doc.name().to_string(),
                    id,
                })
            })
            .collect();
        *self.rows.borrow_mut() = rows;
        *self.renders.borrow_mut() += 1;
    }
}

impl RegistryListener for ListingView {
    fn on_registry_event(&mut self, _event: &RegistryEvent, documents: &[Document]) {
        self.render(documents);
    }
}

#[cfg(test)]
mod tests {
    use super::ListingView;
    use crate::model::document::{DocumentAttrs, DocumentRecord};
    use crate::registry::document_registry::DocumentRegistry;

    #[test]
    fn view_tracks_registry_order() {
        let view = ListingView::new();
        let mut registry = DocumentRegistry::new();
        registry.subscribe(Box::new(view.clone()));
        assert!(view.is_empty());

        registry.reset(vec![
            DocumentRecord::new(2, DocumentAttrs::new("Zebra", "", "")),
            DocumentRecord::new(1, DocumentAttrs::new("Apple", "", "")),
        ]);

        assert_eq!(view.names(), vec!["Apple", "Zebra"]);
        assert_eq!(view.rows()[0].href, "#documents/1");
        assert_eq!(view.render_count(), 1);
    }
}
