use super::helpers;
use crate::connector::{MergeKind, MergeRequest, RepositoryConnector, SplitRequest};
use crate::error::{DocuportError, Result};
use crate::model::{Container, Document, QueryResultPage, Session};

/// Staple multiple documents' content into one, forced even across
/// incompatible source formats.
pub fn staple<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    document_ids: &[String],
    container: &Container,
) -> Result<Document> {
    merge(conn, session, document_ids, container, MergeKind::Staple)
}

/// Clip multiple documents' content into one. Identical to [`staple`] on the
/// client side; only the operation tag on the wire differs.
pub fn clip<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    document_ids: &[String],
    container: &Container,
) -> Result<Document> {
    merge(conn, session, document_ids, container, MergeKind::Clip)
}

fn merge<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    document_ids: &[String],
    container: &Container,
    kind: MergeKind,
) -> Result<Document> {
    let request = MergeRequest {
        container_id: container.id.clone(),
        document_ids: document_ids.to_vec(),
        kind,
    };
    conn.submit_merge(session, &request)
}

/// Divide a document's content in two.
///
/// The protocol itself allows N-way division, but this operation is limited
/// to a single boundary and a single result name; anything more fails with
/// `SplitArity` before any request goes out, including the re-fetch that
/// resolves an unresolved self reference.
pub fn split<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    document: &Document,
    page_boundaries: &[u32],
    result_names: &[String],
    container: &Container,
) -> Result<QueryResultPage> {
    if page_boundaries.len() > 1 || result_names.len() > 1 {
        return Err(DocuportError::SplitArity {
            boundaries: page_boundaries.len(),
            names: result_names.len(),
        });
    }
    let document = helpers::ensure_fully_loaded(conn, session, container, document)?;
    let request = SplitRequest {
        container_id: container.id.clone(),
        document_id: document.id,
        page_boundaries: page_boundaries.to_vec(),
        result_names: result_names.to_vec(),
    };
    conn.submit_split(session, &request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::memory::fixtures::RepoFixture;
    use crate::model::ContainerKind;

    fn cabinet() -> Container {
        Container::new("cab", "Invoices", ContainerKind::Cabinet)
    }

    fn fixture() -> RepoFixture {
        RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_documents("cab", 3)
    }

    #[test]
    fn staple_combines_into_a_single_document() {
        let f = fixture();
        let ids = vec!["cab-d1".to_string(), "cab-d2".to_string()];
        let merged = staple(&f.connector, &f.session, &ids, &cabinet()).unwrap();
        assert_eq!(merged.title, "Test Document 1");
        // Two sources collapsed into one new document.
        assert_eq!(f.connector.document_count("cab"), 2);
    }

    #[test]
    fn clip_behaves_like_staple_client_side() {
        let f = fixture();
        let ids = vec!["cab-d2".to_string(), "cab-d3".to_string()];
        let merged = clip(&f.connector, &f.session, &ids, &cabinet()).unwrap();
        assert_eq!(merged.title, "Test Document 2");
        assert_eq!(f.connector.document_count("cab"), 2);
    }

    #[test]
    fn merge_with_a_missing_source_is_rejected_whole() {
        let f = fixture();
        let ids = vec!["cab-d1".to_string(), "ghost".to_string()];
        let err = staple(&f.connector, &f.session, &ids, &cabinet()).unwrap_err();
        assert!(matches!(err, DocuportError::Transfer(_)));
        assert_eq!(f.connector.document_count("cab"), 3);
    }

    #[test]
    fn split_produces_two_parts() {
        let f = fixture();
        let doc = f.connector.fetch_document(&f.session, "cab", "cab-d1").unwrap();
        let page = split(
            &f.connector,
            &f.session,
            &doc,
            &[4],
            &["Appendix".to_string()],
            &cabinet(),
        )
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "cab-d1");
        assert_eq!(page.items[1].title, "Appendix");
        assert_eq!(f.connector.document_count("cab"), 4);
    }

    #[test]
    fn more_than_one_boundary_fails_without_a_request() {
        let f = fixture();
        let doc = Document::new("cab-d1", "Test Document 1");
        let err = split(
            &f.connector,
            &f.session,
            &doc,
            &[2, 5],
            &["A".to_string(), "B".to_string()],
            &cabinet(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DocuportError::SplitArity {
                boundaries: 2,
                names: 2
            }
        ));
        assert_eq!(f.connector.remote_calls(), 0);
    }

    #[test]
    fn unresolved_document_is_refetched_before_the_split() {
        let f = fixture();
        // No self reference: the engine must resolve it first.
        let stale = Document::new("cab-d2", "Test Document 2");
        let page = split(&f.connector, &f.session, &stale, &[1], &[], &cabinet()).unwrap();
        assert_eq!(page.items.len(), 2);
        // fetch_document plus submit_split.
        assert_eq!(f.connector.remote_calls(), 2);
    }
}
