//! End-to-end orchestration behavior through the API facade, driven against
//! the in-memory connector.

use docuport::api::DocuportApi;
use docuport::connector::memory::fixtures::RepoFixture;
use docuport::connector::memory::InMemoryConnector;
use docuport::error::DocuportError;
use docuport::model::{ContainerKind, Document, IndexField, QueryExpression};

fn api_with(f: RepoFixture) -> DocuportApi<InMemoryConnector> {
    DocuportApi::new(f.connector, f.session)
}

#[test]
fn name_resolution_is_case_insensitive_and_strict() {
    let api = api_with(
        RepoFixture::new()
            .with_cabinet("cab-1", "Invoices")
            .with_cabinet("cab-2", "Contracts")
            .with_cabinet("cab-3", "contracts"),
    );

    for name in ["Invoices", "invoices", "INVOICES"] {
        assert_eq!(api.resolve_cabinet(name).unwrap().id, "cab-1");
    }
    assert!(matches!(
        api.resolve_cabinet("Receipts"),
        Err(DocuportError::NotFound(_))
    ));
    assert!(matches!(
        api.resolve_cabinet("Contracts"),
        Err(DocuportError::AmbiguousName(_))
    ));
}

#[test]
fn paging_reproduces_the_complete_set() {
    let api = api_with(
        RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_documents("cab", 7),
    );
    let cabinet = api.resolve_cabinet("Invoices").unwrap();

    assert_eq!(api.count(&cabinet).unwrap(), 7);
    let complete = api.all(&cabinet, None).unwrap();
    assert_eq!(complete.len(), 7);

    let mut concatenated = Vec::new();
    for k in 0.. {
        let page = api.page(&cabinet, None, k * 3, 3).unwrap();
        let short = page.items.len() < 3;
        concatenated.extend(page.items);
        if short {
            break;
        }
    }
    assert_eq!(concatenated, complete);
}

#[test]
fn transfer_round_trip_through_a_tray() {
    let api = api_with(
        RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_tray("tray", "Inbox")
            .with_document(
                "cab",
                Document::new("d1", "Invoice 42")
                    .with_fields(vec![IndexField::new("COMPANY", "Acme")]),
            ),
    );
    let cabinet = api.resolve_cabinet("Invoices").unwrap();
    let tray = api.resolve_tray("Inbox").unwrap();

    // Move out with full field preservation; the in-hand document is stale
    // afterwards, so continue with the returned one.
    let original = api.fetch_document(&cabinet, "d1").unwrap();
    let moved = api.move_full(&original, &cabinet, &tray).unwrap();
    let in_tray = &moved.items[0];
    assert_eq!(in_tray.fields, original.fields);
    assert_eq!(api.count(&cabinet).unwrap(), 0);

    // Store back with explicit values, keeping the tray copy.
    let stored = api
        .store_with_values(
            in_tray,
            &tray,
            &cabinet,
            vec![IndexField::new("STATUS", "filed")],
            true,
        )
        .unwrap();
    assert_eq!(stored.items[0].field("STATUS"), Some("filed"));
    assert_eq!(api.count(&cabinet).unwrap(), 1);
    // The tray copy stays queryable under its original id.
    assert_eq!(api.fetch_document(&tray, &in_tray.id).unwrap().id, in_tray.id);
}

#[test]
fn split_arity_is_enforced_before_any_request() {
    let f = RepoFixture::new()
        .with_cabinet("cab", "Invoices")
        .with_documents("cab", 1);
    let api = api_with(f);
    let cabinet = api.resolve_cabinet("Invoices").unwrap();
    let doc = Document::new("cab-d1", "Test Document 1");

    let err = api
        .split(&doc, &[1, 2], &["A".into(), "B".into()], &cabinet)
        .unwrap_err();
    assert!(matches!(err, DocuportError::SplitArity { .. }));

    // A two-part split goes through.
    let page = api.split(&doc, &[3], &["Tail".into()], &cabinet).unwrap();
    assert_eq!(page.items.len(), 2);
}

#[test]
fn batch_update_reports_per_document_outcomes() {
    let api = api_with(
        RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_documents("cab", 4)
            .with_document(
                "cab",
                Document::new("locked", "Locked One")
                    .with_fields(vec![IndexField::new("SEQ", "!frozen!")]),
            )
            .map_connector(|c| c.with_rejected_value("!frozen!")),
    );
    let cabinet = api.resolve_cabinet("Invoices").unwrap();

    let items = api
        .update_fields(&cabinet, None, &[IndexField::new("STATUS", "archived")])
        .unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items.iter().filter(|i| !i.succeeded()).count(), 1);
    for item in items.iter().filter(|i| i.succeeded()) {
        assert_eq!(item.document.field("STATUS"), Some("archived"));
    }
}

#[test]
fn merge_then_query_sees_the_combined_document() {
    let api = api_with(
        RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_documents("cab", 3),
    );
    let cabinet = api.resolve_cabinet("Invoices").unwrap();
    let ids = vec!["cab-d1".to_string(), "cab-d3".to_string()];

    let merged = api.staple(&ids, &cabinet).unwrap();
    assert_eq!(api.count(&cabinet).unwrap(), 2);
    let found = api
        .all(&cabinet, Some(&QueryExpression::new().field("SEQ", "1")))
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, merged.id);
}

#[test]
fn containers_are_listed_by_kind() {
    let api = api_with(
        RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_tray("t1", "Inbox")
            .with_tray("t2", "Outbox"),
    );
    assert_eq!(api.list_containers(None).unwrap().len(), 3);
    assert_eq!(
        api.list_containers(Some(ContainerKind::Tray)).unwrap().len(),
        2
    );
    assert_eq!(
        api.list_containers(Some(ContainerKind::Cabinet))
            .unwrap()
            .len(),
        1
    );
}
