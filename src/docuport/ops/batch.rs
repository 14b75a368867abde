use super::{dialogs, query};
use crate::connector::{BatchUpdateRequest, RepositoryConnector};
use crate::error::Result;
use crate::model::{
    BatchUpdateResultItem, Container, DialogKind, IndexField, QueryExpression, Session,
};
use log::debug;

/// Apply index values across every document matching `expression` in a
/// cabinet, with per-document outcomes.
///
/// One batch request carries the whole target set and a continue-past-failures
/// policy: a rejected document is left entirely unchanged and reported in its
/// result item, and never blocks the rest of the batch. Per-item errors are
/// data, not a raised error.
pub fn update_fields<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    cabinet: &Container,
    expression: Option<&QueryExpression>,
    index_values: &[IndexField],
) -> Result<Vec<BatchUpdateResultItem>> {
    let search = dialogs::expect(
        dialogs::default_search_dialog(conn, session, cabinet)?,
        DialogKind::Search,
        cabinet,
    )?;
    let store = dialogs::expect(
        dialogs::default_store_dialog(conn, session, cabinet)?,
        DialogKind::Store,
        cabinet,
    )?;

    let targets = query::run_query(conn, session, &search, expression, 0, None, false)?;
    debug!(
        "batch update on '{}': {} target document(s)",
        cabinet.name,
        targets.items.len()
    );

    let request = BatchUpdateRequest {
        container_id: cabinet.id.clone(),
        store_dialog_id: store.id,
        document_ids: targets.items.iter().map(|d| d.id.clone()).collect(),
        fields: index_values.to_vec(),
        continue_on_error: true,
    };
    conn.submit_batch_update(session, &request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::memory::fixtures::RepoFixture;
    use crate::model::{ContainerKind, Document};

    fn cabinet() -> Container {
        Container::new("cab", "Invoices", ContainerKind::Cabinet)
    }

    #[test]
    fn every_target_gets_a_result_item() {
        let f = RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_documents("cab", 5);
        let values = vec![IndexField::new("STATUS", "archived")];
        let items = update_fields(&f.connector, &f.session, &cabinet(), None, &values).unwrap();
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|i| i.succeeded()));
        assert!(items
            .iter()
            .all(|i| i.document.field("STATUS") == Some("archived")));
    }

    #[test]
    fn one_rejection_does_not_block_the_rest() {
        // Five targets, one of which carries an invalid value the server
        // rejects; the batch still updates the other four.
        let f = RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_documents("cab", 4)
            .with_document(
                "cab",
                Document::new("odd-one", "Odd One")
                    .with_fields(vec![IndexField::new("SEQ", "!bad!")]),
            )
            .map_connector(|c| c.with_rejected_value("!bad!"));

        let values = vec![IndexField::new("STATUS", "archived")];
        let items = update_fields(&f.connector, &f.session, &cabinet(), None, &values).unwrap();

        assert_eq!(items.len(), 5);
        let failed: Vec<_> = items.iter().filter(|i| !i.succeeded()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].document.id, "odd-one");
        // The rejected document is left entirely unchanged.
        assert_eq!(failed[0].document.field("STATUS"), None);
        for item in items.iter().filter(|i| i.succeeded()) {
            assert_eq!(item.document.field("STATUS"), Some("archived"));
        }
    }

    #[test]
    fn updated_fields_replace_existing_values() {
        let f = RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_document(
                "cab",
                Document::new("d1", "Invoice").with_fields(vec![IndexField::new("SEQ", "1")]),
            );
        let values = vec![IndexField::new("SEQ", "2")];
        let items = update_fields(&f.connector, &f.session, &cabinet(), None, &values).unwrap();
        assert_eq!(items[0].document.field("SEQ"), Some("2"));
        assert_eq!(items[0].document.fields.len(), 1);
    }
}
