mod support;

use markdesk_core::{
    Document, DocumentAttrs, DocumentId, DocumentRecord, DocumentRegistry, MemoryTransport,
    RegistryEvent, TransportError,
};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use support::{record, seed};

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    /// Index into the currently present ids, modulo their count.
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[a-c]{0,2}".prop_map(Op::Add),
        1 => any::<usize>().prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn order_is_stable_sort_by_name(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut registry = DocumentRegistry::new();
        // Insertion-ordered model of what should be present.
        let mut model: Vec<(DocumentId, String)> = Vec::new();
        let mut next_id = 0u64;

        for op in ops {
            match op {
                Op::Add(name) => {
                    next_id += 1;
                    let doc = Document::from_record(DocumentRecord::new(
                        next_id,
                        DocumentAttrs::new(name.clone(), "", ""),
                    ));
                    prop_assert_eq!(registry.add(doc), Ok(true));
                    model.push((DocumentId::from(next_id), name));
                }
                Op::Remove(index) => {
                    if model.is_empty() {
                        continue;
                    }
                    let (id, _) = model.remove(index % model.len());
                    prop_assert!(registry.remove(&id).is_ok());
                }
            }

            let mut expected = model.clone();
            expected.sort_by(|a, b| a.1.cmp(&b.1));
            let expected_ids: Vec<DocumentId> = expected.into_iter().map(|(id, _)| id).collect();
            prop_assert_eq!(registry.ids(), expected_ids);
        }
    }
}

#[tokio::test]
async fn fetch_all_orders_apple_before_zebra() {
    let transport = MemoryTransport::with_records(seed());
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);

    let mut registry = DocumentRegistry::new();
    registry.subscribe(Box::new(move |event: &RegistryEvent, docs: &[Document]| {
        let names: Vec<String> = docs.iter().map(|doc| doc.name().to_string()).collect();
        sink.borrow_mut().push((event.clone(), names));
    }));

    let count = registry
        .fetch_all(&transport)
        .await
        .expect("fetch should succeed");

    assert_eq!(count, 2);
    assert_eq!(
        *events.borrow(),
        vec![(
            RegistryEvent::Reset,
            vec!["Apple".to_string(), "Zebra".to_string()]
        )]
    );
    assert!(registry.documents().iter().all(|doc| !doc.is_new()));
}

#[tokio::test]
async fn failed_fetch_keeps_contents_and_stays_silent() {
    let transport = MemoryTransport::with_records(seed());
    let mut registry = DocumentRegistry::new();
    registry.reset(vec![record(7, "kept", "")]);

    let events = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&events);
    registry.subscribe(Box::new(move |_: &RegistryEvent, _: &[Document]| {
        *sink.borrow_mut() += 1;
    }));

    transport.fail_next(TransportError::new("offline"));
    let err = registry
        .fetch_all(&transport)
        .await
        .expect_err("fetch should fail");

    assert_eq!(err.message, "offline");
    assert_eq!(registry.ids(), vec![DocumentId::from(7)]);
    assert_eq!(*events.borrow(), 0);
}

#[test]
fn add_and_remove_fire_notifications_with_post_mutation_state() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let mut registry = DocumentRegistry::new();
    registry.subscribe(Box::new(move |event: &RegistryEvent, docs: &[Document]| {
        sink.borrow_mut().push((event.clone(), docs.len()));
    }));

    let doc = Document::from_record(record(3, "three", ""));
    registry.add(doc).expect("add should succeed");
    registry
        .remove(&DocumentId::from(3))
        .expect("remove should succeed");

    assert_eq!(
        *events.borrow(),
        vec![
            (RegistryEvent::Added(DocumentId::from(3)), 1),
            (RegistryEvent::Removed(DocumentId::from(3)), 0),
        ]
    );
}

#[test]
fn equal_names_keep_insertion_order() {
    let mut registry = DocumentRegistry::new();
    registry.reset(vec![record(5, "same", ""), record(2, "same", "")]);
    registry
        .add(Document::from_record(record(9, "same", "")))
        .expect("add should succeed");

    assert_eq!(
        registry.ids(),
        vec![
            DocumentId::from(5),
            DocumentId::from(2),
            DocumentId::from(9)
        ]
    );
}
