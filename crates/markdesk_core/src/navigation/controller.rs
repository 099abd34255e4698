//! Selection and navigation controller.
//!
//! # Responsibility
//! - Own the current selection, the current route and the registry.
//! - Guard every selection change against silent loss of unsaved edits.
//! - Drive save/delete round-trips and reconcile the route afterwards.
//!
//! # Invariants
//! - Leaving a changed document requires confirmation; declining leaves the
//!   selection, the route and the document's attributes untouched.
//! - Confirming restores the outgoing document to its snapshot before the
//!   swap.
//! - Validation and transport errors never change selection or discard edits.
//! - At most one save/delete request is outstanding at a time.

use crate::model::document::{
    AttrKey, ClientId, Document, DocumentAttrs, DocumentId, DocumentRecord,
    DocumentValidationError, UpdateMode,
};
use crate::navigation::confirm::{Confirm, Prompts};
use crate::navigation::route::Route;
use crate::presenter::EditorPresenter;
use crate::registry::document_registry::{DocumentRegistry, RegistryError, RegistryListener};
use crate::transport::{Transport, TransportError, TransportResult};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// What the editor currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    NoSelection,
    /// A registry entry, edited in place.
    Persisted(DocumentId),
    /// A transient document owned by the controller until its first save.
    New(Document),
}

/// Result of one navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Target equals the route already shown.
    Unchanged,
    /// The user kept unsaved edits; route and selection stay put.
    Declined,
    Entered(Route),
    /// Target was unknown; the route was normalized.
    Redirected(Route),
}

/// Snapshot of a save about to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub client_id: ClientId,
    /// `None` means CREATE, otherwise UPDATE.
    pub id: Option<DocumentId>,
    pub attrs: DocumentAttrs,
}

/// Delete about to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: DocumentId,
}

/// Successful save summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub id: DocumentId,
    /// True when the save created a registry entry.
    pub created: bool,
    /// Route after the save completed.
    pub route: Route,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InFlight {
    Save(ClientId),
    Delete(DocumentId),
}

/// Controller operation errors.
#[derive(Debug)]
pub enum ControllerError {
    Validation(DocumentValidationError),
    Transport(TransportError),
    Registry(RegistryError),
    /// Operation needs a current document.
    NoSelection,
    /// Operation needs a persisted document.
    NotPersisted,
    /// A save or delete is still outstanding.
    RequestInFlight,
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Transport(err) => write!(f, "{err}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::NoSelection => write!(f, "no document is selected"),
            Self::NotPersisted => write!(f, "document has not been saved yet"),
            Self::RequestInFlight => write!(f, "a request for this document is still running"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Transport(err) => Some(err),
            Self::Registry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentValidationError> for ControllerError {
    fn from(value: DocumentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<TransportError> for ControllerError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<RegistryError> for ControllerError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

/// Application context: one per running client.
pub struct NavigationController<T: Transport> {
    transport: T,
    confirm: Box<dyn Confirm>,
    editor: Box<dyn EditorPresenter>,
    prompts: Prompts,
    registry: DocumentRegistry,
    selection: Selection,
    route: Route,
    in_flight: Option<InFlight>,
}

impl<T: Transport> NavigationController<T> {
    pub fn new(
        transport: T,
        confirm: Box<dyn Confirm>,
        editor: Box<dyn EditorPresenter>,
    ) -> Self {
        Self {
            transport,
            confirm,
            editor,
            prompts: Prompts::default(),
            registry: DocumentRegistry::new(),
            selection: Selection::NoSelection,
            route: Route::Listing,
            in_flight: None,
        }
    }

    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Subscribes a listing view to registry notifications.
    pub fn subscribe(&mut self, listener: Box<dyn RegistryListener>) {
        self.registry.subscribe(listener);
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Document shown in the editor, if any.
    pub fn current(&self) -> Option<&Document> {
        current_in(&self.selection, &self.registry)
    }

    /// True while a save or delete is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Loads the registry, then resolves the initial location.
    pub async fn start(&mut self, location: &str) -> Result<NavigationOutcome, ControllerError> {
        if let Err(err) = self.registry.fetch_all(&self.transport).await {
            self.editor.show_error(&err.message);
            return Err(err.into());
        }

        let target = Route::parse(location);
        let outcome = self.resolve(target.clone().unwrap_or(Route::Listing));
        if target.is_none() {
            return Ok(NavigationOutcome::Redirected(self.route.clone()));
        }
        Ok(outcome)
    }

    /// Requests navigation to a path or hash fragment.
    ///
    /// Unknown locations resolve to the listing.
    pub fn navigate(&mut self, location: &str) -> NavigationOutcome {
        match Route::parse(location) {
            Some(route) => self.navigate_to(route),
            None => {
                info!("event=navigate module=navigation status=redirect reason=unknown_route");
                match self.navigate_to(Route::Listing) {
                    NavigationOutcome::Entered(route) => NavigationOutcome::Redirected(route),
                    NavigationOutcome::Unchanged => {
                        NavigationOutcome::Redirected(Route::Listing)
                    }
                    other => other,
                }
            }
        }
    }

    /// Requests navigation to a resolved route.
    pub fn navigate_to(&mut self, target: Route) -> NavigationOutcome {
        if target == self.route {
            return NavigationOutcome::Unchanged;
        }
        if !self.confirm_leave() {
            info!(
                "event=navigate module=navigation status=declined from={} to={}",
                self.route, target
            );
            return NavigationOutcome::Declined;
        }
        self.resolve(target)
    }

    /// Applies one editor field edit to the current document.
    pub fn update_field(
        &mut self,
        key: AttrKey,
        value: impl Into<String>,
        mode: UpdateMode,
    ) -> Result<(), ControllerError> {
        let document = current_in_mut(&mut self.selection, &mut self.registry)
            .ok_or(ControllerError::NoSelection)?;
        if document.set_attribute(key, value, mode).is_some() {
            self.editor.refresh(document);
        }
        Ok(())
    }

    /// Restores the current document to its snapshot and clears the error.
    ///
    /// Returns whether any attribute changed.
    pub fn revert(&mut self) -> Result<bool, ControllerError> {
        let document = current_in_mut(&mut self.selection, &mut self.registry)
            .ok_or(ControllerError::NoSelection)?;
        let changed = document.revert().is_some();
        if changed {
            self.editor.refresh(document);
        }
        self.editor.clear_error();
        Ok(changed)
    }

    /// Validates the current document and marks a save as outstanding.
    ///
    /// Validation failures are shown inline and nothing is sent.
    pub fn begin_save(&mut self) -> Result<SaveRequest, ControllerError> {
        if self.in_flight.is_some() {
            warn!("event=save module=navigation status=rejected reason=in_flight");
            return Err(ControllerError::RequestInFlight);
        }
        let document =
            current_in(&self.selection, &self.registry).ok_or(ControllerError::NoSelection)?;
        if let Err(err) = Document::validate(document.attrs()) {
            debug!("event=save module=navigation status=invalid");
            self.editor.show_error(&err.to_string());
            return Err(err.into());
        }

        let request = SaveRequest {
            client_id: document.client_id(),
            id: document.id().cloned(),
            attrs: document.attrs().clone(),
        };
        self.in_flight = Some(InFlight::Save(request.client_id));
        Ok(request)
    }

    /// Applies the transport result of a save started by `begin_save`.
    pub fn complete_save(
        &mut self,
        request: SaveRequest,
        result: TransportResult<DocumentRecord>,
    ) -> Result<SaveOutcome, ControllerError> {
        self.finish(&InFlight::Save(request.client_id));

        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    "event=save module=navigation status=error fields={}",
                    err.fields.len()
                );
                self.editor.show_error(&err.message);
                return Err(err.into());
            }
        };
        let id = record.id.clone();

        match std::mem::replace(&mut self.selection, Selection::NoSelection) {
            Selection::New(mut document) if document.client_id() == request.client_id => {
                apply_saved(&mut document, &request.attrs, record);
                info!("event=save module=navigation status=ok kind=create id={}", id);
                return self.on_save_succeeded(document);
            }
            other => self.selection = other,
        }

        let shown = matches!(&self.selection, Selection::Persisted(current) if current == &id);
        let existing = match &request.id {
            Some(request_id) => self.registry.get_mut(request_id),
            None => None,
        };
        if let Some(document) = existing {
            if shown {
                apply_saved(document, &request.attrs, record);
                self.editor.refresh(document);
                self.editor.clear_error();
            } else {
                // Leaving already reverted any unsaved edits; adopt the record.
                document.mark_persisted(record);
            }
            self.registry.refresh(&id)?;
            info!("event=save module=navigation status=ok kind=update id={}", id);
            return Ok(SaveOutcome {
                id,
                created: false,
                route: self.route.clone(),
            });
        }

        // The saved document is no longer shown; keep the registry in sync
        // without moving the user.
        let created = if request.id.is_none() {
            self.registry.add(Document::from_record(record))?
        } else {
            warn!("event=save module=navigation status=orphaned id={}", id);
            false
        };
        Ok(SaveOutcome {
            id,
            created,
            route: self.route.clone(),
        })
    }

    /// Validates, sends and applies a save of the current document.
    pub async fn save(&mut self) -> Result<SaveOutcome, ControllerError> {
        let request = self.begin_save()?;
        let result = match &request.id {
            Some(id) => self.transport.update(id, &request.attrs).await,
            None => self.transport.create(&request.attrs).await,
        };
        self.complete_save(request, result)
    }

    /// Registers a freshly persisted document and moves to its location.
    ///
    /// Idempotent: repeated calls keep exactly one registry entry per id.
    pub fn on_save_succeeded(
        &mut self,
        document: Document,
    ) -> Result<SaveOutcome, ControllerError> {
        let id = document.id().cloned().ok_or(ControllerError::NotPersisted)?;
        let created = self.registry.add(document)?;
        let canonical = Route::Document(id.clone());

        let already_shown = self.route == canonical
            && matches!(&self.selection, Selection::Persisted(current) if current == &id);
        if !already_shown {
            self.enter(Selection::Persisted(id.clone()), canonical);
        }

        Ok(SaveOutcome {
            id,
            created,
            route: self.route.clone(),
        })
    }

    /// Asks for confirmation and marks a delete as outstanding.
    ///
    /// Returns `Ok(None)` when the user declines.
    pub fn begin_delete(&mut self) -> Result<Option<DeleteRequest>, ControllerError> {
        if self.in_flight.is_some() {
            warn!("event=delete module=navigation status=rejected reason=in_flight");
            return Err(ControllerError::RequestInFlight);
        }
        let document =
            current_in(&self.selection, &self.registry).ok_or(ControllerError::NoSelection)?;
        let id = document.id().cloned().ok_or(ControllerError::NotPersisted)?;

        let prompt = self.prompts.delete_prompt(document.name());
        if !self.confirm.confirm(&prompt) {
            info!("event=delete module=navigation status=declined id={}", id);
            return Ok(None);
        }

        self.in_flight = Some(InFlight::Delete(id.clone()));
        Ok(Some(DeleteRequest { id }))
    }

    /// Applies the transport result of a delete started by `begin_delete`.
    pub fn complete_delete(
        &mut self,
        request: DeleteRequest,
        result: TransportResult<()>,
    ) -> Result<(), ControllerError> {
        self.finish(&InFlight::Delete(request.id.clone()));

        if let Err(err) = result {
            warn!(
                "event=delete module=navigation status=error id={}",
                request.id
            );
            self.editor.show_error(&err.message);
            return Err(err.into());
        }
        info!("event=delete module=navigation status=ok id={}", request.id);
        self.on_delete_succeeded(&request.id)
    }

    /// Confirms, sends and applies a delete of the current document.
    ///
    /// Returns `Ok(false)` when the user declined.
    pub async fn delete(&mut self) -> Result<bool, ControllerError> {
        let Some(request) = self.begin_delete()? else {
            return Ok(false);
        };
        let result = self.transport.delete(&request.id).await;
        self.complete_delete(request, result)?;
        Ok(true)
    }

    /// Drops a deleted document and returns to the listing when it was shown.
    pub fn on_delete_succeeded(&mut self, id: &DocumentId) -> Result<(), ControllerError> {
        match self.registry.remove(id) {
            Ok(_) | Err(RegistryError::NotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }

        let was_shown = matches!(&self.selection, Selection::Persisted(current) if current == id)
            || self.route == Route::Document(id.clone());
        if was_shown {
            self.enter(Selection::NoSelection, Route::Listing);
        }
        Ok(())
    }

    /// Re-reads the current persisted document from the transport.
    ///
    /// Returns `Ok(false)` without touching it when it has unsaved edits.
    pub async fn reload_current(&mut self) -> Result<bool, ControllerError> {
        let id = match &self.selection {
            Selection::Persisted(id) => id.clone(),
            Selection::New(_) => return Err(ControllerError::NotPersisted),
            Selection::NoSelection => return Err(ControllerError::NoSelection),
        };

        let record = match self.transport.get(&id).await {
            Ok(record) => record,
            Err(err) => {
                self.editor.show_error(&err.message);
                return Err(err.into());
            }
        };

        let Some(document) = self.registry.get_mut(&id) else {
            return Ok(false);
        };
        if document.has_changed() {
            info!("event=reload module=navigation status=skipped reason=dirty id={}", id);
            return Ok(false);
        }
        document.mark_persisted(record);
        self.editor.refresh(document);
        self.registry.refresh(&id)?;
        Ok(true)
    }

    fn confirm_leave(&mut self) -> bool {
        let dirty = self.current().is_some_and(Document::has_changed);
        if !dirty {
            return true;
        }
        if !self.confirm.confirm(&self.prompts.unsaved_changes) {
            return false;
        }
        // Outgoing document is no longer shown, so the revert is not rendered.
        if let Some(document) = current_in_mut(&mut self.selection, &mut self.registry) {
            document.revert();
        }
        true
    }

    fn resolve(&mut self, target: Route) -> NavigationOutcome {
        match target {
            Route::Listing => {
                self.enter(Selection::NoSelection, Route::Listing);
                NavigationOutcome::Entered(Route::Listing)
            }
            Route::NewDocument => {
                self.enter(Selection::New(Document::new()), Route::NewDocument);
                NavigationOutcome::Entered(Route::NewDocument)
            }
            Route::Document(id) if self.registry.contains(&id) => {
                let route = Route::Document(id.clone());
                self.enter(Selection::Persisted(id), route.clone());
                NavigationOutcome::Entered(route)
            }
            Route::Document(id) => {
                info!(
                    "event=navigate module=navigation status=redirect reason=not_found id={}",
                    id
                );
                self.enter(Selection::NoSelection, Route::Listing);
                NavigationOutcome::Redirected(Route::Listing)
            }
        }
    }

    fn enter(&mut self, selection: Selection, route: Route) {
        debug!("event=navigate module=navigation status=ok route={}", route);
        self.selection = selection;
        self.route = route;

        let current = current_in(&self.selection, &self.registry);
        self.editor.clear_error();
        self.editor.selection_changed(current.and_then(Document::id));
        self.editor.show(current);
    }

    fn finish(&mut self, request: &InFlight) {
        if self.in_flight.as_ref() == Some(request) {
            self.in_flight = None;
        }
    }
}

fn current_in<'a>(
    selection: &'a Selection,
    registry: &'a DocumentRegistry,
) -> Option<&'a Document> {
    match selection {
        Selection::NoSelection => None,
        Selection::Persisted(id) => registry.get(id),
        Selection::New(document) => Some(document),
    }
}

fn current_in_mut<'a>(
    selection: &'a mut Selection,
    registry: &'a mut DocumentRegistry,
) -> Option<&'a mut Document> {
    match selection {
        Selection::NoSelection => None,
        Selection::Persisted(id) => registry.get_mut(id),
        Selection::New(document) => Some(document),
    }
}

/// Adopts a save response, keeping edits typed while the request was out.
fn apply_saved(document: &mut Document, sent: &DocumentAttrs, record: DocumentRecord) {
    if document.attrs() == sent {
        document.mark_persisted(record);
    } else {
        document.mark_persisted_keep_edits(record);
    }
}
