//! Client core for a markup document manager.
//! Owns the document entity, the sorted registry and the navigation guard
//! that keeps unsaved edits from being lost.

pub mod config;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod presenter;
pub mod registry;
pub mod transport;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{
    AttrKey, ClientId, Document, DocumentAttrs, DocumentChange, DocumentId, DocumentRecord,
    DocumentValidationError, UpdateMode,
};
pub use navigation::confirm::{AlwaysConfirm, Confirm, Prompts};
pub use navigation::controller::{
    ControllerError, DeleteRequest, NavigationController, NavigationOutcome, SaveOutcome,
    SaveRequest, Selection,
};
pub use navigation::route::Route;
pub use presenter::listing::{ListingRow, ListingView};
pub use presenter::preview::{
    escape_html, Highlighter, MarkupRenderer, PreformattedRenderer, PreviewPipeline,
    RenderOptions,
};
pub use presenter::{EditorPresenter, NullEditor};
pub use registry::document_registry::{
    DocumentRegistry, RegistryError, RegistryEvent, RegistryListener,
};
pub use transport::memory::{MemoryRequest, MemoryTransport};
pub use transport::{Transport, TransportError, TransportResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
