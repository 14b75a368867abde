use super::dialogs;
use crate::connector::{QueryRequest, RepositoryConnector};
use crate::error::Result;
use crate::model::{
    Container, Dialog, DialogKind, Document, QueryExpression, QueryResultPage, Session,
};
use log::warn;

/// Low-level query primitive: one round trip through one dialog.
pub fn run_query<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    dialog: &Dialog,
    expression: Option<&QueryExpression>,
    start: u64,
    max_count: Option<u64>,
    count_only: bool,
) -> Result<QueryResultPage> {
    let request = QueryRequest {
        expression: expression.cloned().unwrap_or_default(),
        start,
        max_count,
        count_only,
    };
    conn.run_query(session, &dialog.id, &request)
}

/// Total match count for the container, without transferring document bodies.
pub fn count<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    container: &Container,
) -> Result<u64> {
    let dialog = search_dialog(conn, session, container)?;
    let page = run_query(conn, session, &dialog, None, 0, Some(0), true)?;
    Ok(page.total_count)
}

/// One page with explicit offset and limit. The server may return fewer than
/// `page_size` items even when more remain; check `total_count` before
/// treating a short page as the end of the set.
pub fn page<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    container: &Container,
    expression: Option<&QueryExpression>,
    start: u64,
    page_size: u64,
) -> Result<QueryResultPage> {
    let dialog = search_dialog(conn, session, container)?;
    run_query(conn, session, &dialog, expression, start, Some(page_size), false)
}

/// The complete result set, retrieved page by page within this one blocking
/// call. Memory is bounded only by the size of the result set; callers that
/// need bounded memory should drive [`page`] themselves.
pub fn all<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    container: &Container,
    expression: Option<&QueryExpression>,
) -> Result<Vec<Document>> {
    let dialog = search_dialog(conn, session, container)?;
    let mut collected: Vec<Document> = Vec::new();
    loop {
        let page = run_query(
            conn,
            session,
            &dialog,
            expression,
            collected.len() as u64,
            None,
            false,
        )?;
        let total = page.total_count;
        if page.items.is_empty() {
            if (collected.len() as u64) < total {
                warn!(
                    "query on '{}' returned an empty page at offset {} with only {} of {} items retrieved",
                    container.name,
                    collected.len(),
                    collected.len(),
                    total
                );
            }
            break;
        }
        collected.extend(page.items);
        if collected.len() as u64 >= total {
            break;
        }
    }
    Ok(collected)
}

fn search_dialog<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    container: &Container,
) -> Result<Dialog> {
    let dialog = dialogs::default_search_dialog(conn, session, container)?;
    dialogs::expect(dialog, DialogKind::Search, container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::memory::fixtures::RepoFixture;
    use crate::model::ContainerKind;

    fn cabinet() -> Container {
        Container::new("cab", "Invoices", ContainerKind::Cabinet)
    }

    #[test]
    fn count_matches_full_retrieval() {
        let f = RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_documents("cab", 7);
        let n = count(&f.connector, &f.session, &cabinet()).unwrap();
        let docs = all(&f.connector, &f.session, &cabinet(), None).unwrap();
        assert_eq!(n, 7);
        assert_eq!(docs.len() as u64, n);
    }

    #[test]
    fn successive_pages_reproduce_all_in_order() {
        let f = RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_documents("cab", 7);
        let complete = all(&f.connector, &f.session, &cabinet(), None).unwrap();

        let mut paged = Vec::new();
        let mut start = 0;
        loop {
            let p = page(&f.connector, &f.session, &cabinet(), None, start, 3).unwrap();
            let len = p.items.len() as u64;
            paged.extend(p.items);
            if len < 3 {
                break;
            }
            start += len;
        }
        assert_eq!(paged.len(), 7);
        let paged_ids: Vec<&str> = paged.iter().map(|d| d.id.as_str()).collect();
        let all_ids: Vec<&str> = complete.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(paged_ids, all_ids);
    }

    #[test]
    fn page_sizes_follow_the_seven_document_example() {
        let f = RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_documents("cab", 7);
        let c = cabinet();
        assert_eq!(count(&f.connector, &f.session, &c).unwrap(), 7);
        assert_eq!(page(&f.connector, &f.session, &c, None, 0, 3).unwrap().items.len(), 3);
        assert_eq!(page(&f.connector, &f.session, &c, None, 3, 3).unwrap().items.len(), 3);
        assert_eq!(page(&f.connector, &f.session, &c, None, 6, 3).unwrap().items.len(), 1);
    }

    #[test]
    fn all_rides_out_short_pages() {
        // The server caps pages at 2 items; `all` must still collect the set.
        let f = RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_documents("cab", 7)
            .map_connector(|c| c.with_page_cap(2));
        let docs = all(&f.connector, &f.session, &cabinet(), None).unwrap();
        assert_eq!(docs.len(), 7);
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
    }

    #[test]
    fn expression_narrows_the_result_set() {
        let f = RepoFixture::new()
            .with_cabinet("cab", "Invoices")
            .with_documents("cab", 7);
        let expr = QueryExpression::new().field("SEQ", "5");
        let docs = all(&f.connector, &f.session, &cabinet(), Some(&expr)).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "Test Document 5");
    }

    #[test]
    fn missing_search_dialog_is_a_configuration_error() {
        let f = RepoFixture::new().with_container(cabinet(), vec![]);
        let err = count(&f.connector, &f.session, &cabinet()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::DocuportError::DialogConfiguration(_)
        ));
    }
}
