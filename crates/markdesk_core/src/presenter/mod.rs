//! Presenter contracts.
//!
//! # Responsibility
//! - Define what the controller tells the editor view.
//! - Provide the listing projection consumed by sidebar views.
//! - Provide the escape-then-render preview path.
//!
//! # Invariants
//! - Presenters never mutate documents directly; edits go through the
//!   navigation controller.

use crate::model::document::{Document, DocumentId};

pub mod listing;
pub mod preview;

/// Editor view driven by the navigation controller.
///
/// All methods default to no-ops so views implement only what they render.
pub trait EditorPresenter {
    /// Selection swapped; `None` disables the form.
    fn show(&mut self, _document: Option<&Document>) {}

    /// The current document changed through the notify channel.
    fn refresh(&mut self, _document: &Document) {}

    fn show_error(&mut self, _message: &str) {}

    fn clear_error(&mut self) {}

    /// Highlight hint for the listing; `None` when nothing persisted is
    /// selected.
    fn selection_changed(&mut self, _selected: Option<&DocumentId>) {}
}

/// Presenter that renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEditor;

impl EditorPresenter for NullEditor {}
