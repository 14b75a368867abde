//! # Connector Layer
//!
//! This module defines the boundary to the remote repository service. The
//! [`RepositoryConnector`] trait covers the session-scoped raw operations the
//! engines drive; connection establishment, credential exchange and cookie
//! handling belong to the concrete implementations.
//!
//! ## Implementations
//!
//! - [`http::HttpConnector`]: production connector over a blocking HTTP
//!   client with a cookie store
//! - [`memory::InMemoryConnector`]: in-memory connector for testing, faithful
//!   to the paging/transfer/batch semantics of the remote service
//!
//! The trait deliberately says nothing about retries, backoff or timeouts:
//! this layer performs exactly one round trip per call and surfaces transport
//! failures unchanged.

use crate::error::Result;
use crate::model::{
    BatchUpdateResultItem, Container, Dialog, Document, IndexField, QueryExpression,
    QueryResultPage, Session,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod http;
pub mod memory;

/// Wire form of a query. `max_count: None` requests an unbounded page;
/// `count_only` asks for the total without document bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub expression: QueryExpression,
    pub start: u64,
    pub max_count: Option<u64>,
    pub count_only: bool,
}

/// Wire form of a transfer. Exactly one field source applies: explicit
/// `fields`, `use_source_fields` (server copies the source's index values),
/// or `auto_index_hints` (server content recognition fills them in).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source_container_id: String,
    pub destination_container_id: String,
    pub document_id: String,
    pub fields: Option<Vec<IndexField>>,
    pub use_source_fields: bool,
    pub auto_index_hints: bool,
    pub keep_source: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeKind {
    Staple,
    Clip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    pub container_id: String,
    pub document_ids: Vec<String>,
    pub kind: MergeKind,
}

/// Wire form of a split. The protocol accepts any number of boundaries and
/// names; the client-side engine restricts both to at most one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRequest {
    pub container_id: String,
    pub document_id: String,
    pub page_boundaries: Vec<u32>,
    pub result_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUpdateRequest {
    pub container_id: String,
    pub store_dialog_id: String,
    pub document_ids: Vec<String>,
    pub fields: Vec<IndexField>,
    /// Process every document regardless of earlier failures in the batch.
    pub continue_on_error: bool,
}

/// Session-scoped raw operations against the remote repository.
///
/// One call, one blocking round trip. Implementations map remote rejections
/// onto the crate error taxonomy and surface transport failures unchanged.
pub trait RepositoryConnector {
    /// List every container the session can access.
    fn list_containers(&self, session: &Session) -> Result<Vec<Container>>;

    /// List the dialogs scoped to one container.
    fn container_dialogs(&self, session: &Session, container_id: &str) -> Result<Vec<Dialog>>;

    /// Fetch a single document with its self reference resolved.
    fn fetch_document(
        &self,
        session: &Session,
        container_id: &str,
        document_id: &str,
    ) -> Result<Document>;

    /// Execute a query through one dialog.
    fn run_query(
        &self,
        session: &Session,
        dialog_id: &str,
        request: &QueryRequest,
    ) -> Result<QueryResultPage>;

    /// Submit a transfer; the returned page is the destination's view of the
    /// transferred document.
    fn submit_transfer(&self, session: &Session, request: &TransferRequest)
        -> Result<QueryResultPage>;

    /// Combine documents' content into one (staple or clip).
    fn submit_merge(&self, session: &Session, request: &MergeRequest) -> Result<Document>;

    /// Divide a document's content.
    fn submit_split(&self, session: &Session, request: &SplitRequest) -> Result<QueryResultPage>;

    /// Apply index values across a document set with per-document outcomes.
    fn submit_batch_update(
        &self,
        session: &Session,
        request: &BatchUpdateRequest,
    ) -> Result<Vec<BatchUpdateResultItem>>;

    /// Request a reusable credential valid until `lifetime` elapses, scoped
    /// to this product only.
    fn request_multi_use_token(&self, session: &Session, lifetime: Duration) -> Result<String>;

    /// Release the session's server-side capacity reservation. Idempotent and
    /// best-effort; the release is not guaranteed to be immediate.
    fn close(&self, session: &Session) -> Result<()>;
}

/// Optional cookie persistence extension point for connectors that keep an
/// HTTP cookie jar. Both operations default to no-ops.
pub trait CookiePersistence {
    /// Load previously saved cookies, serialized as one header-style string.
    fn load_cookies(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Persist the current cookies.
    fn save_cookies(&self, _cookies: &str) -> Result<()> {
        Ok(())
    }
}

/// The default persistence: remembers nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCookiePersistence;

impl CookiePersistence for NoCookiePersistence {}
