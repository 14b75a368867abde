use crate::connector::RepositoryConnector;
use crate::error::Result;
use crate::model::{Container, Document, Session};
use log::debug;

/// Resolve a document's self reference before an operation that needs it.
///
/// Documents handed in by callers may predate the last mutation or come from
/// a partial listing; when the self reference is absent the document is
/// re-fetched from its container, otherwise it is used as-is.
pub fn ensure_fully_loaded<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    container: &Container,
    document: &Document,
) -> Result<Document> {
    if document.self_ref.is_some() {
        return Ok(document.clone());
    }
    debug!(
        "document '{}' has no resolved self reference, re-fetching from '{}'",
        document.id, container.name
    );
    conn.fetch_document(session, &container.id, &document.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::memory::fixtures::RepoFixture;
    use crate::model::Document;

    #[test]
    fn resolved_document_is_returned_without_a_fetch() {
        let f = RepoFixture::new().with_cabinet("cab", "Invoices");
        let container = Container::new("cab", "Invoices", crate::model::ContainerKind::Cabinet);
        let mut doc = Document::new("d1", "Invoice");
        doc.self_ref = Some("/containers/cab/documents/d1".into());

        let loaded = ensure_fully_loaded(&f.connector, &f.session, &container, &doc).unwrap();
        assert_eq!(loaded, doc);
        assert_eq!(f.connector.remote_calls(), 0);
    }

    #[test]
    fn unresolved_document_is_refetched() {
        let f = RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_document("cab", Document::new("d1", "Invoice"));
        let container = Container::new("cab", "Invoices", crate::model::ContainerKind::Cabinet);
        let stale = Document::new("d1", "Invoice");

        let loaded = ensure_fully_loaded(&f.connector, &f.session, &container, &stale).unwrap();
        assert!(loaded.self_ref.is_some());
        assert_eq!(f.connector.remote_calls(), 1);
    }
}
