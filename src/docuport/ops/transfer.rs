use super::helpers;
use crate::connector::{RepositoryConnector, TransferRequest};
use crate::error::{DocuportError, Result};
use crate::model::{Container, ContainerKind, Document, IndexField, QueryResultPage, Session};

/// Reserved index field the service maps onto a document's name.
pub const DOC_NAME_FIELD: &str = "DOC_NAME";

/// Move a document into a tray, discarding every index value except the
/// title (carried on the reserved document-name field).
///
/// The passed-in document is stale after this call; use the document in the
/// returned page.
pub fn move_dropping_fields<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    document: &Document,
    source: &Container,
    destination_tray: &Container,
) -> Result<QueryResultPage> {
    require_kind(destination_tray, ContainerKind::Tray, "destination")?;
    let document = helpers::ensure_fully_loaded(conn, session, source, document)?;
    let fields = vec![IndexField::new(DOC_NAME_FIELD, document.title.clone())];
    let request = TransferRequest {
        source_container_id: source.id.clone(),
        destination_container_id: destination_tray.id.clone(),
        document_id: document.id,
        fields: Some(fields),
        use_source_fields: false,
        auto_index_hints: false,
        keep_source: false,
    };
    conn.submit_transfer(session, &request)
}

/// Move a document into a tray, preserving all index field values. Keyed by
/// document id and source container id; no field reconstruction happens
/// client-side.
pub fn move_full<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    document: &Document,
    source: &Container,
    destination_tray: &Container,
) -> Result<QueryResultPage> {
    require_kind(destination_tray, ContainerKind::Tray, "destination")?;
    let document = helpers::ensure_fully_loaded(conn, session, source, document)?;
    let request = TransferRequest {
        source_container_id: source.id.clone(),
        destination_container_id: destination_tray.id.clone(),
        document_id: document.id,
        fields: None,
        use_source_fields: true,
        auto_index_hints: false,
        keep_source: false,
    };
    conn.submit_transfer(session, &request)
}

/// Store a document from a tray into a cabinet, applying `index_values` as
/// its new fields. With `keep_in_source` a copy stays addressable in the
/// tray; otherwise the tray copy is removed.
pub fn store_with_values<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    document: &Document,
    source_tray: &Container,
    destination_cabinet: &Container,
    index_values: Vec<IndexField>,
    keep_in_source: bool,
) -> Result<QueryResultPage> {
    require_kind(source_tray, ContainerKind::Tray, "source")?;
    require_kind(destination_cabinet, ContainerKind::Cabinet, "destination")?;
    let document = helpers::ensure_fully_loaded(conn, session, source_tray, document)?;
    let request = TransferRequest {
        source_container_id: source_tray.id.clone(),
        destination_container_id: destination_cabinet.id.clone(),
        document_id: document.id,
        fields: Some(index_values),
        use_source_fields: false,
        auto_index_hints: false,
        keep_source: keep_in_source,
    };
    conn.submit_transfer(session, &request)
}

/// Store a document from a tray into a cabinet and let the server's content
/// recognition fill in the index values. Always removes the tray copy.
pub fn store_with_auto_hints<C: RepositoryConnector>(
    conn: &C,
    session: &Session,
    document: &Document,
    source_tray: &Container,
    destination_cabinet: &Container,
) -> Result<QueryResultPage> {
    require_kind(source_tray, ContainerKind::Tray, "source")?;
    require_kind(destination_cabinet, ContainerKind::Cabinet, "destination")?;
    let document = helpers::ensure_fully_loaded(conn, session, source_tray, document)?;
    let request = TransferRequest {
        source_container_id: source_tray.id.clone(),
        destination_container_id: destination_cabinet.id.clone(),
        document_id: document.id,
        fields: None,
        use_source_fields: false,
        auto_index_hints: true,
        keep_source: false,
    };
    conn.submit_transfer(session, &request)
}

fn require_kind(container: &Container, kind: ContainerKind, role: &str) -> Result<()> {
    match container.kind {
        k if k == kind => Ok(()),
        k => Err(DocuportError::Transfer(format!(
            "{} '{}' is a {}, expected a {}",
            role,
            container.name,
            k.as_str(),
            kind.as_str()
        ))),
    }
}
