//! # API Facade
//!
//! The single entry point for all docuport operations, regardless of the
//! client driving it. The facade owns the connector and the session and
//! **dispatches** to the engine modules; it performs no orchestration logic
//! of its own and no I/O beyond what the engines request.
//!
//! ## Generic Over RepositoryConnector
//!
//! `DocuportApi<C: RepositoryConnector>` is generic over the connector:
//! - Production: `DocuportApi<HttpConnector>`
//! - Testing: `DocuportApi<InMemoryConnector>`
//!
//! which keeps every layer above the wire testable without a server.
//!
//! ## Session discipline
//!
//! The session is explicit state, created by a connector `connect` and handed
//! to the facade once. Mutating operations invalidate document objects the
//! caller obtained earlier; only documents embedded in an operation's result
//! are valid afterwards.

use crate::connector::RepositoryConnector;
use crate::error::Result;
use crate::model::{
    BatchUpdateResultItem, Container, ContainerKind, Dialog, Document, IndexField,
    QueryExpression, QueryResultPage, Session,
};
use crate::ops;
use std::time::Duration;

pub struct DocuportApi<C: RepositoryConnector> {
    connector: C,
    session: Session,
}

impl<C: RepositoryConnector> DocuportApi<C> {
    pub fn new(connector: C, session: Session) -> Self {
        Self { connector, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // --- containers ---

    pub fn list_containers(&self, kind: Option<ContainerKind>) -> Result<Vec<Container>> {
        ops::catalog::list_accessible(&self.connector, &self.session, kind)
    }

    pub fn resolve_container(&self, name: &str, kind: ContainerKind) -> Result<Container> {
        ops::catalog::resolve_by_name(&self.connector, &self.session, name, kind)
    }

    pub fn resolve_cabinet(&self, name: &str) -> Result<Container> {
        self.resolve_container(name, ContainerKind::Cabinet)
    }

    pub fn resolve_tray(&self, name: &str) -> Result<Container> {
        self.resolve_container(name, ContainerKind::Tray)
    }

    // --- dialogs ---

    pub fn default_search_dialog(&self, container: &Container) -> Result<Option<Dialog>> {
        ops::dialogs::default_search_dialog(&self.connector, &self.session, container)
    }

    pub fn default_store_dialog(&self, container: &Container) -> Result<Option<Dialog>> {
        ops::dialogs::default_store_dialog(&self.connector, &self.session, container)
    }

    // --- queries ---

    pub fn count(&self, container: &Container) -> Result<u64> {
        ops::query::count(&self.connector, &self.session, container)
    }

    pub fn page(
        &self,
        container: &Container,
        expression: Option<&QueryExpression>,
        start: u64,
        page_size: u64,
    ) -> Result<QueryResultPage> {
        ops::query::page(
            &self.connector,
            &self.session,
            container,
            expression,
            start,
            page_size,
        )
    }

    pub fn all(
        &self,
        container: &Container,
        expression: Option<&QueryExpression>,
    ) -> Result<Vec<Document>> {
        ops::query::all(&self.connector, &self.session, container, expression)
    }

    pub fn fetch_document(&self, container: &Container, document_id: &str) -> Result<Document> {
        self.connector
            .fetch_document(&self.session, &container.id, document_id)
    }

    // --- transfers ---

    pub fn move_dropping_fields(
        &self,
        document: &Document,
        source: &Container,
        destination_tray: &Container,
    ) -> Result<QueryResultPage> {
        ops::transfer::move_dropping_fields(
            &self.connector,
            &self.session,
            document,
            source,
            destination_tray,
        )
    }

    pub fn move_full(
        &self,
        document: &Document,
        source: &Container,
        destination_tray: &Container,
    ) -> Result<QueryResultPage> {
        ops::transfer::move_full(
            &self.connector,
            &self.session,
            document,
            source,
            destination_tray,
        )
    }

    pub fn store_with_values(
        &self,
        document: &Document,
        source_tray: &Container,
        destination_cabinet: &Container,
        index_values: Vec<IndexField>,
        keep_in_source: bool,
    ) -> Result<QueryResultPage> {
        ops::transfer::store_with_values(
            &self.connector,
            &self.session,
            document,
            source_tray,
            destination_cabinet,
            index_values,
            keep_in_source,
        )
    }

    pub fn store_with_auto_hints(
        &self,
        document: &Document,
        source_tray: &Container,
        destination_cabinet: &Container,
    ) -> Result<QueryResultPage> {
        ops::transfer::store_with_auto_hints(
            &self.connector,
            &self.session,
            document,
            source_tray,
            destination_cabinet,
        )
    }

    // --- merge / split ---

    pub fn staple(&self, document_ids: &[String], container: &Container) -> Result<Document> {
        ops::merge_split::staple(&self.connector, &self.session, document_ids, container)
    }

    pub fn clip(&self, document_ids: &[String], container: &Container) -> Result<Document> {
        ops::merge_split::clip(&self.connector, &self.session, document_ids, container)
    }

    pub fn split(
        &self,
        document: &Document,
        page_boundaries: &[u32],
        result_names: &[String],
        container: &Container,
    ) -> Result<QueryResultPage> {
        ops::merge_split::split(
            &self.connector,
            &self.session,
            document,
            page_boundaries,
            result_names,
            container,
        )
    }

    // --- batch updates ---

    pub fn update_fields(
        &self,
        cabinet: &Container,
        expression: Option<&QueryExpression>,
        index_values: &[IndexField],
    ) -> Result<Vec<BatchUpdateResultItem>> {
        ops::batch::update_fields(
            &self.connector,
            &self.session,
            cabinet,
            expression,
            index_values,
        )
    }

    // --- session lifecycle ---

    pub fn request_multi_use_token(&self, lifetime: Duration) -> Result<String> {
        self.connector
            .request_multi_use_token(&self.session, lifetime)
    }

    /// Release the session. Idempotent and best-effort; the facade stays
    /// usable for a retry if the release itself fails in transit.
    pub fn close(&self) -> Result<()> {
        self.connector.close(&self.session)
    }
}
