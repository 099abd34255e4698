//! Document entity.
//!
//! # Responsibility
//! - Hold one markup document's attributes and its last-persisted snapshot.
//! - Derive `is_new` / `has_changed` status from id and snapshot.
//! - Decode transport responses into records or tagged errors.
//!
//! # Invariants
//! - `is_new()` is true iff no `DocumentId` has been assigned.
//! - `validate()` never mutates the entity.
//! - Only `UpdateMode::Notify` mutations produce change notifications.

use crate::transport::error::{ErrorEnvelope, TransportError};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Client-local identity assigned when an entity is constructed.
///
/// Unlike `DocumentId`, this exists for transient entities too.
pub type ClientId = Uuid;

/// Server-assigned document identifier.
///
/// The API may send ids as JSON strings or integers; both decode to the same
/// textual form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for DocumentId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        let id = match WireId::deserialize(deserializer)? {
            WireId::Text(value) => value,
            WireId::Unsigned(value) => value.to_string(),
            WireId::Signed(value) => value.to_string(),
        };
        if id.trim().is_empty() {
            return Err(serde::de::Error::custom("document id must not be empty"));
        }
        Ok(Self(id))
    }
}

/// Editable attribute set of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAttrs {
    /// Display name; required before save.
    #[serde(default)]
    pub name: String,
    /// Markup source text.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
}

impl DocumentAttrs {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            description: description.into(),
        }
    }

    pub fn get(&self, key: AttrKey) -> &str {
        match key {
            AttrKey::Name => &self.name,
            AttrKey::Content => &self.content,
            AttrKey::Description => &self.description,
        }
    }

    fn slot_mut(&mut self, key: AttrKey) -> &mut String {
        match key {
            AttrKey::Name => &mut self.name,
            AttrKey::Content => &mut self.content,
            AttrKey::Description => &mut self.description,
        }
    }
}

/// Addressable document attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKey {
    Name,
    Content,
    Description,
}

impl AttrKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Content => "content",
            Self::Description => "description",
        }
    }
}

/// Update channel for attribute mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Emit a change notification so presenters re-render.
    Notify,
    /// Mutate without notification; used for keystroke updates where the
    /// editor already shows the new value.
    Quiet,
}

/// Change notification produced by a `Notify` mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    pub client_id: ClientId,
    /// Attributes whose value changed.
    pub keys: Vec<AttrKey>,
}

/// Document as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    #[serde(flatten)]
    pub attrs: DocumentAttrs,
}

impl DocumentRecord {
    pub fn new(id: impl Into<DocumentId>, attrs: DocumentAttrs) -> Self {
        Self {
            id: id.into(),
            attrs,
        }
    }
}

/// Client-side validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentValidationError {
    /// `name` is empty or whitespace only.
    MissingName,
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "Please specify a name for your document."),
        }
    }
}

impl Error for DocumentValidationError {}

/// One markup document with dirty/new status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    client_id: ClientId,
    id: Option<DocumentId>,
    attrs: DocumentAttrs,
    snapshot: DocumentAttrs,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a transient, unsaved document with empty attributes.
    pub fn new() -> Self {
        Self::with_attrs(DocumentAttrs::default())
    }

    /// Creates a transient document with initial attributes.
    ///
    /// The initial attributes form the snapshot, so a fresh entity is clean.
    pub fn with_attrs(attrs: DocumentAttrs) -> Self {
        Self {
            client_id: Uuid::new_v4(),
            id: None,
            snapshot: attrs.clone(),
            attrs,
        }
    }

    /// Creates a persisted document from an API record.
    pub fn from_record(record: DocumentRecord) -> Self {
        let mut document = Self::new();
        document.mark_persisted(record);
        document
    }

    /// Checks a candidate attribute set without touching any entity.
    pub fn validate(attrs: &DocumentAttrs) -> Result<(), DocumentValidationError> {
        if attrs.name.trim().is_empty() {
            return Err(DocumentValidationError::MissingName);
        }
        Ok(())
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn attrs(&self) -> &DocumentAttrs {
        &self.attrs
    }

    pub fn get(&self, key: AttrKey) -> &str {
        self.attrs.get(key)
    }

    pub fn name(&self) -> &str {
        &self.attrs.name
    }

    /// Attribute set as of the last successful load or persist.
    pub fn previous_attributes(&self) -> &DocumentAttrs {
        &self.snapshot
    }

    /// Returns whether attributes differ from the last-persisted snapshot.
    pub fn has_changed(&self) -> bool {
        self.attrs != self.snapshot
    }

    /// Updates one attribute.
    ///
    /// Returns a notification only for `UpdateMode::Notify` when the stored
    /// value actually changed.
    pub fn set_attribute(
        &mut self,
        key: AttrKey,
        value: impl Into<String>,
        mode: UpdateMode,
    ) -> Option<DocumentChange> {
        let value = value.into();
        let slot = self.attrs.slot_mut(key);
        if *slot == value {
            return None;
        }
        *slot = value;

        match mode {
            UpdateMode::Notify => Some(DocumentChange {
                client_id: self.client_id,
                keys: vec![key],
            }),
            UpdateMode::Quiet => None,
        }
    }

    /// Replaces the whole attribute set through the notify channel.
    pub fn set_attrs(&mut self, attrs: DocumentAttrs) -> Option<DocumentChange> {
        let keys = changed_keys(&self.attrs, &attrs);
        if keys.is_empty() {
            return None;
        }
        self.attrs = attrs;
        Some(DocumentChange {
            client_id: self.client_id,
            keys,
        })
    }

    /// Restores attributes to the last-persisted snapshot.
    pub fn revert(&mut self) -> Option<DocumentChange> {
        let snapshot = self.snapshot.clone();
        self.set_attrs(snapshot)
    }

    /// Adopts a server record as the persisted state.
    ///
    /// Assigns the id and replaces both attributes and snapshot.
    pub fn mark_persisted(&mut self, record: DocumentRecord) {
        self.id = Some(record.id);
        self.snapshot = record.attrs.clone();
        self.attrs = record.attrs;
    }

    /// Adopts a server record as the snapshot while keeping local edits.
    ///
    /// Used when the user kept typing while a save was outstanding.
    pub fn mark_persisted_keep_edits(&mut self, record: DocumentRecord) {
        self.id = Some(record.id);
        self.snapshot = record.attrs;
    }

    /// Interprets one API response body.
    ///
    /// - `{"error": {"message", "fields"}}` -> `Err` carrying both.
    /// - any other JSON object -> the new attribute set.
    /// - unparseable text -> `Err` with the raw body as message.
    pub fn parse_transport_response(body: &str) -> Result<DocumentRecord, TransportError> {
        let value: serde_json::Value =
            serde_json::from_str(body).map_err(|_| TransportError::from_body(body))?;

        if value.get("error").is_some() {
            return match serde_json::from_value::<ErrorEnvelope>(value) {
                Ok(envelope) => Err(envelope.error.into()),
                Err(_) => Err(TransportError::new(body)),
            };
        }

        serde_json::from_value::<DocumentRecord>(value)
            .map_err(|err| TransportError::new(format!("malformed document response: {err}")))
    }
}

fn changed_keys(current: &DocumentAttrs, next: &DocumentAttrs) -> Vec<AttrKey> {
    [AttrKey::Name, AttrKey::Content, AttrKey::Description]
        .into_iter()
        .filter(|key| current.get(*key) != next.get(*key))
        .collect()
}
