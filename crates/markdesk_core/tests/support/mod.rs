#![allow(dead_code)]

use markdesk_core::{
    Confirm, Document, DocumentAttrs, DocumentId, DocumentRecord, EditorPresenter, ListingView,
    MemoryTransport, NavigationController, NavigationOutcome,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCall {
    /// Name of the shown document, `None` when the form is disabled.
    Show(Option<String>),
    Refresh(String),
    Error(String),
    ClearError,
    Selected(Option<DocumentId>),
}

#[derive(Clone, Default)]
pub struct RecordingEditor {
    calls: Rc<RefCell<Vec<EditorCall>>>,
}

impl RecordingEditor {
    pub fn calls(&self) -> Vec<EditorCall> {
        self.calls.borrow().clone()
    }

    /// Error currently visible: the last one not followed by a clear.
    pub fn visible_error(&self) -> Option<String> {
        let mut visible = None;
        for call in self.calls.borrow().iter() {
            match call {
                EditorCall::Error(message) => visible = Some(message.clone()),
                EditorCall::ClearError => visible = None,
                _ => {}
            }
        }
        visible
    }

    pub fn refresh_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, EditorCall::Refresh(_)))
            .count()
    }
}

impl EditorPresenter for RecordingEditor {
    fn show(&mut self, document: Option<&Document>) {
        self.calls
            .borrow_mut()
            .push(EditorCall::Show(document.map(|doc| doc.name().to_string())));
    }

    fn refresh(&mut self, document: &Document) {
        self.calls
            .borrow_mut()
            .push(EditorCall::Refresh(document.name().to_string()));
    }

    fn show_error(&mut self, message: &str) {
        self.calls
            .borrow_mut()
            .push(EditorCall::Error(message.to_string()));
    }

    fn clear_error(&mut self) {
        self.calls.borrow_mut().push(EditorCall::ClearError);
    }

    fn selection_changed(&mut self, selected: Option<&DocumentId>) {
        self.calls
            .borrow_mut()
            .push(EditorCall::Selected(selected.cloned()));
    }
}

/// Answers prompts from a queue; an empty queue declines.
#[derive(Clone, Default)]
pub struct ScriptedConfirm {
    answers: Rc<RefCell<VecDeque<bool>>>,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedConfirm {
    pub fn answer(&self, value: bool) {
        self.answers.borrow_mut().push_back(value);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }
}

pub struct Harness {
    pub controller: NavigationController<MemoryTransport>,
    pub transport: MemoryTransport,
    pub editor: RecordingEditor,
    pub confirm: ScriptedConfirm,
    pub listing: ListingView,
}

pub fn record(id: u64, name: &str, content: &str) -> DocumentRecord {
    DocumentRecord::new(id, DocumentAttrs::new(name, content, ""))
}

/// Apple (id 1) and Zebra (id 2), seeded in reverse name order.
pub fn seed() -> Vec<DocumentRecord> {
    vec![
        record(2, "Zebra", "zebra body"),
        record(1, "Apple", "apple body"),
    ]
}

pub async fn started(
    records: Vec<DocumentRecord>,
    location: &str,
) -> (Harness, NavigationOutcome) {
    let transport = MemoryTransport::with_records(records);
    let editor = RecordingEditor::default();
    let confirm = ScriptedConfirm::default();
    let listing = ListingView::new();

    let mut controller = NavigationController::new(
        transport.clone(),
        Box::new(confirm.clone()),
        Box::new(editor.clone()),
    );
    controller.subscribe(Box::new(listing.clone()));
    let outcome = controller
        .start(location)
        .await
        .expect("start should load the registry");

    (
        Harness {
            controller,
            transport,
            editor,
            confirm,
            listing,
        },
        outcome,
    )
}

pub fn id(value: &str) -> DocumentId {
    DocumentId::from(value)
}
