//! In-process transport used by the CLI walkthrough and tests.
//!
//! # Invariants
//! - Ids are sequential integers starting at 1 and never reused.
//! - A scripted failure is consumed by exactly one request.
//! - Clones share state.

use crate::model::document::{DocumentAttrs, DocumentId, DocumentRecord};
use crate::transport::error::{TransportError, TransportResult};
use crate::transport::Transport;
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Request kind recorded by `MemoryTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryRequest {
    List,
    Get(DocumentId),
    Create,
    Update(DocumentId),
    Delete(DocumentId),
}

#[derive(Default)]
struct MemoryState {
    records: Vec<DocumentRecord>,
    next_id: u64,
    scripted_failures: VecDeque<TransportError>,
    requests: Vec<MemoryRequest>,
}

/// Shared in-memory document store speaking the transport contract.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport pre-populated with records.
    ///
    /// Numeric seed ids advance the id sequence past them.
    pub fn with_records(records: Vec<DocumentRecord>) -> Self {
        let transport = Self::new();
        {
            let mut state = transport.state.borrow_mut();
            let highest = records
                .iter()
                .filter_map(|record| record.id.as_str().parse::<u64>().ok())
                .max()
                .unwrap_or(0);
            state.next_id = highest;
            state.records = records;
        }
        transport
    }

    /// Makes the next request fail with `error`.
    pub fn fail_next(&self, error: TransportError) {
        self.state.borrow_mut().scripted_failures.push_back(error);
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<MemoryRequest> {
        self.state.borrow().requests.clone()
    }

    /// Stored records in insertion order.
    pub fn records(&self) -> Vec<DocumentRecord> {
        self.state.borrow().records.clone()
    }

    fn begin(&self, request: MemoryRequest) -> TransportResult<()> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request);
        match state.scripted_failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn not_found(id: &DocumentId) -> TransportError {
    TransportError::new(format!("document not found: {id}")).with_field("id", id.as_str())
}

#[async_trait(?Send)]
impl Transport for MemoryTransport {
    async fn list(&self) -> TransportResult<Vec<DocumentRecord>> {
        self.begin(MemoryRequest::List)?;
        Ok(self.records())
    }

    async fn get(&self, id: &DocumentId) -> TransportResult<DocumentRecord> {
        self.begin(MemoryRequest::Get(id.clone()))?;
        let found = self
            .state
            .borrow()
            .records
            .iter()
            .find(|record| &record.id == id)
            .cloned();
        found.ok_or_else(|| not_found(id))
    }

    async fn create(&self, attrs: &DocumentAttrs) -> TransportResult<DocumentRecord> {
        self.begin(MemoryRequest::Create)?;
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let record = DocumentRecord::new(state.next_id, attrs.clone());
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: &DocumentId,
        attrs: &DocumentAttrs,
    ) -> TransportResult<DocumentRecord> {
        self.begin(MemoryRequest::Update(id.clone()))?;
        let mut state = self.state.borrow_mut();
        let record = state
            .records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| not_found(id))?;
        record.attrs = attrs.clone();
        Ok(record.clone())
    }

    async fn delete(&self, id: &DocumentId) -> TransportResult<()> {
        self.begin(MemoryRequest::Delete(id.clone()))?;
        let mut state = self.state.borrow_mut();
        let before = state.records.len();
        state.records.retain(|record| &record.id != id);
        if state.records.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryRequest, MemoryTransport};
    use crate::model::document::{DocumentAttrs, DocumentId, DocumentRecord};
    use crate::transport::{Transport, TransportError};

    #[tokio::test]
    async fn create_continues_after_seeded_ids() {
        let transport = MemoryTransport::with_records(vec![DocumentRecord::new(
            4,
            DocumentAttrs::new("seed", "", ""),
        )]);
        let created = transport
            .create(&DocumentAttrs::new("fresh", "", ""))
            .await
            .expect("create should succeed");
        assert_eq!(created.id, DocumentId::from("5"));
    }

    #[tokio::test]
    async fn scripted_failure_is_consumed_once() {
        let transport = MemoryTransport::new();
        transport.fail_next(TransportError::new("offline"));

        let err = transport.list().await.expect_err("first call fails");
        assert_eq!(err.message, "offline");
        assert!(transport.list().await.is_ok());
        assert_eq!(
            transport.requests(),
            vec![MemoryRequest::List, MemoryRequest::List]
        );
    }

    #[tokio::test]
    async fn unknown_ids_are_reported() {
        let transport = MemoryTransport::new();
        let missing = DocumentId::from("42");
        let err = transport.get(&missing).await.expect_err("unknown id");
        assert_eq!(err.message, "document not found: 42");
        assert_eq!(err.field("id"), Some(&serde_json::json!("42")));
        assert!(transport.delete(&missing).await.is_err());
        assert!(transport
            .update(&missing, &DocumentAttrs::default())
            .await
            .is_err());
    }
}
