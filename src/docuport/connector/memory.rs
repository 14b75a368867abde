//! In-memory connector for testing.
//!
//! Faithful to the remote service's observable semantics: real offset/limit
//! paging (with an optional server-side page cap to exercise short pages),
//! transfers that move or copy documents between containers, merge/split
//! content simulation, and batch updates with configurable per-value
//! rejection. Single-threaded by construction (interior `RefCell` state),
//! which matches the one-session-per-thread rule of the real service.

use super::{
    BatchUpdateRequest, MergeRequest, QueryRequest, RepositoryConnector, SplitRequest,
    TransferRequest,
};
use crate::error::{DocuportError, Result};
use crate::model::{
    BatchUpdateResultItem, Container, Dialog, Document, IndexField, QueryExpression,
    QueryResultPage, Session,
};
use crate::ops::transfer::DOC_NAME_FIELD;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::time::Duration;

struct Entry {
    container: Container,
    dialogs: Vec<Dialog>,
    documents: Vec<Document>,
}

struct State {
    entries: Vec<Entry>,
    next_id: u64,
}

pub struct InMemoryConnector {
    state: RefCell<State>,
    page_cap: Option<u64>,
    reject_values: HashSet<String>,
    auto_hint_fields: Vec<IndexField>,
    remote_calls: Cell<usize>,
    close_calls: Cell<usize>,
}

impl Default for InMemoryConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                entries: Vec::new(),
                next_id: 1,
            }),
            page_cap: None,
            reject_values: HashSet::new(),
            auto_hint_fields: Vec::new(),
            remote_calls: Cell::new(0),
            close_calls: Cell::new(0),
        }
    }

    /// Cap every non-count query page at `cap` items, regardless of what the
    /// caller requested. Emulates a server that returns short pages.
    pub fn with_page_cap(mut self, cap: u64) -> Self {
        self.page_cap = Some(cap);
        self
    }

    /// Mark an index value as invalid: a batch update fails for a document
    /// when either the submitted values or the document's own fields carry
    /// it, and only for that document.
    pub fn with_rejected_value(mut self, value: impl Into<String>) -> Self {
        self.reject_values.insert(value.into());
        self
    }

    /// Index values the server's content recognition "suggests" for
    /// auto-hint stores.
    pub fn with_auto_hints(mut self, fields: Vec<IndexField>) -> Self {
        self.auto_hint_fields = fields;
        self
    }

    pub fn insert_container(&self, container: Container, dialogs: Vec<Dialog>) {
        self.state.borrow_mut().entries.push(Entry {
            container,
            dialogs,
            documents: Vec::new(),
        });
    }

    /// Insert a document into a container, resolving its self reference the
    /// way the server would.
    pub fn insert_document(&self, container_id: &str, mut document: Document) {
        let mut state = self.state.borrow_mut();
        if document.id.is_empty() {
            document.id = format!("doc-{}", state.next_id);
            state.next_id += 1;
        }
        document.self_ref = Some(self_ref(container_id, &document.id));
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.container.id == container_id)
            .unwrap_or_else(|| panic!("no container '{}' in fixture", container_id));
        entry.documents.push(document);
    }

    /// Number of round trips issued so far. Lets tests assert that fail-fast
    /// paths never reach the network.
    pub fn remote_calls(&self) -> usize {
        self.remote_calls.get()
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.get()
    }

    pub fn document_count(&self, container_id: &str) -> usize {
        self.state
            .borrow()
            .entries
            .iter()
            .find(|e| e.container.id == container_id)
            .map(|e| e.documents.len())
            .unwrap_or(0)
    }

    fn record_call(&self) {
        self.remote_calls.set(self.remote_calls.get() + 1);
    }

    fn fresh_id(state: &mut State) -> String {
        let id = format!("doc-{}", state.next_id);
        state.next_id += 1;
        id
    }
}

fn self_ref(container_id: &str, document_id: &str) -> String {
    format!("/containers/{}/documents/{}", container_id, document_id)
}

fn matches(document: &Document, expression: &QueryExpression) -> bool {
    expression.conditions.iter().all(|cond| {
        document
            .field(&cond.field)
            .map(|v| cond.values.iter().any(|want| want == v))
            .unwrap_or(false)
    })
}

fn entry_index(state: &State, container_id: &str) -> Result<usize> {
    state
        .entries
        .iter()
        .position(|e| e.container.id == container_id)
        .ok_or_else(|| DocuportError::NotFound(container_id.to_string()))
}

fn apply_fields(document: &mut Document, fields: &[IndexField]) {
    for field in fields {
        match document.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => existing.value = field.value.clone(),
            None => document.fields.push(field.clone()),
        }
    }
}

impl RepositoryConnector for InMemoryConnector {
    fn list_containers(&self, _session: &Session) -> Result<Vec<Container>> {
        self.record_call();
        let state = self.state.borrow();
        Ok(state.entries.iter().map(|e| e.container.clone()).collect())
    }

    fn container_dialogs(&self, _session: &Session, container_id: &str) -> Result<Vec<Dialog>> {
        self.record_call();
        let state = self.state.borrow();
        let idx = entry_index(&state, container_id)?;
        Ok(state.entries[idx].dialogs.clone())
    }

    fn fetch_document(
        &self,
        _session: &Session,
        container_id: &str,
        document_id: &str,
    ) -> Result<Document> {
        self.record_call();
        let state = self.state.borrow();
        let idx = entry_index(&state, container_id)?;
        state.entries[idx]
            .documents
            .iter()
            .find(|d| d.id == document_id)
            .cloned()
            .ok_or_else(|| DocuportError::NotFound(document_id.to_string()))
    }

    fn run_query(
        &self,
        _session: &Session,
        dialog_id: &str,
        request: &QueryRequest,
    ) -> Result<QueryResultPage> {
        self.record_call();
        let state = self.state.borrow();
        let entry = state
            .entries
            .iter()
            .find(|e| e.dialogs.iter().any(|d| d.id == dialog_id))
            .ok_or_else(|| DocuportError::NotFound(dialog_id.to_string()))?;

        let hits: Vec<&Document> = entry
            .documents
            .iter()
            .filter(|d| matches(d, &request.expression))
            .collect();
        let total_count = hits.len() as u64;

        if request.count_only {
            return Ok(QueryResultPage {
                items: Vec::new(),
                total_count,
                start_offset: request.start,
                page_size: 0,
            });
        }

        let mut limit = request.max_count.unwrap_or(u64::MAX);
        if let Some(cap) = self.page_cap {
            limit = limit.min(cap);
        }
        let items: Vec<Document> = hits
            .into_iter()
            .skip(request.start as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(QueryResultPage {
            page_size: items.len() as u64,
            items,
            total_count,
            start_offset: request.start,
        })
    }

    fn submit_transfer(
        &self,
        _session: &Session,
        request: &TransferRequest,
    ) -> Result<QueryResultPage> {
        self.record_call();
        let mut state = self.state.borrow_mut();
        let source_idx = entry_index(&state, &request.source_container_id)?;
        let dest_idx = entry_index(&state, &request.destination_container_id)?;

        let pos = state.entries[source_idx]
            .documents
            .iter()
            .position(|d| d.id == request.document_id)
            .ok_or_else(|| {
                DocuportError::Transfer(format!(
                    "document '{}' is not in container '{}'",
                    request.document_id, request.source_container_id
                ))
            })?;
        let source_doc = state.entries[source_idx].documents[pos].clone();

        let mut dest_doc = if request.use_source_fields {
            source_doc.clone()
        } else if let Some(fields) = &request.fields {
            let mut fields = fields.clone();
            let title = match fields.iter().position(|f| f.name == DOC_NAME_FIELD) {
                Some(i) => fields.remove(i).value,
                None => source_doc.title.clone(),
            };
            Document {
                id: source_doc.id.clone(),
                title,
                fields,
                self_ref: None,
            }
        } else if request.auto_index_hints {
            Document {
                id: source_doc.id.clone(),
                title: source_doc.title.clone(),
                fields: self.auto_hint_fields.clone(),
                self_ref: None,
            }
        } else {
            source_doc.clone()
        };

        if request.keep_source {
            dest_doc.id = Self::fresh_id(&mut state);
        } else {
            state.entries[source_idx].documents.remove(pos);
        }
        dest_doc.self_ref = Some(self_ref(&request.destination_container_id, &dest_doc.id));
        state.entries[dest_idx].documents.push(dest_doc.clone());

        Ok(QueryResultPage::single(dest_doc))
    }

    fn submit_merge(&self, _session: &Session, request: &MergeRequest) -> Result<Document> {
        self.record_call();
        let mut state = self.state.borrow_mut();
        let idx = entry_index(&state, &request.container_id)?;

        // All sources must exist before anything is removed.
        for id in &request.document_ids {
            if !state.entries[idx].documents.iter().any(|d| &d.id == id) {
                return Err(DocuportError::Transfer(format!(
                    "document '{}' is not in container '{}'",
                    id, request.container_id
                )));
            }
        }

        let first_id = &request.document_ids[0];
        let first = state.entries[idx]
            .documents
            .iter()
            .find(|d| &d.id == first_id)
            .cloned()
            .unwrap();
        state.entries[idx]
            .documents
            .retain(|d| !request.document_ids.contains(&d.id));

        let id = Self::fresh_id(&mut state);
        let merged = Document {
            self_ref: Some(self_ref(&request.container_id, &id)),
            id,
            title: first.title,
            fields: first.fields,
        };
        state.entries[idx].documents.push(merged.clone());
        Ok(merged)
    }

    fn submit_split(&self, _session: &Session, request: &SplitRequest) -> Result<QueryResultPage> {
        self.record_call();
        let mut state = self.state.borrow_mut();
        let idx = entry_index(&state, &request.container_id)?;
        let pos = state.entries[idx]
            .documents
            .iter()
            .position(|d| d.id == request.document_id)
            .ok_or_else(|| {
                DocuportError::Transfer(format!(
                    "document '{}' is not in container '{}'",
                    request.document_id, request.container_id
                ))
            })?;

        let original = state.entries[idx].documents.remove(pos);
        let second_id = Self::fresh_id(&mut state);
        let first = Document {
            self_ref: Some(self_ref(&request.container_id, &original.id)),
            ..original.clone()
        };
        let second = Document {
            id: second_id.clone(),
            title: request
                .result_names
                .first()
                .cloned()
                .unwrap_or_else(|| format!("{} (2)", original.title)),
            fields: original.fields.clone(),
            self_ref: Some(self_ref(&request.container_id, &second_id)),
        };
        state.entries[idx].documents.push(first.clone());
        state.entries[idx].documents.push(second.clone());

        Ok(QueryResultPage {
            items: vec![first, second],
            total_count: 2,
            start_offset: 0,
            page_size: 2,
        })
    }

    fn submit_batch_update(
        &self,
        _session: &Session,
        request: &BatchUpdateRequest,
    ) -> Result<Vec<BatchUpdateResultItem>> {
        self.record_call();
        let mut state = self.state.borrow_mut();
        let idx = entry_index(&state, &request.container_id)?;

        let mut results = Vec::with_capacity(request.document_ids.len());
        for id in &request.document_ids {
            let doc = match state.entries[idx].documents.iter_mut().find(|d| &d.id == id) {
                Some(doc) => doc,
                None => {
                    results.push(BatchUpdateResultItem {
                        document: Document::new(id.clone(), ""),
                        error_message: Some(format!("document '{}' no longer exists", id)),
                    });
                    continue;
                }
            };
            let rejected = request
                .fields
                .iter()
                .chain(doc.fields.iter())
                .find(|f| self.reject_values.contains(&f.value));
            match rejected {
                Some(field) => results.push(BatchUpdateResultItem {
                    document: doc.clone(),
                    error_message: Some(format!(
                        "invalid value '{}' for field '{}'",
                        field.value, field.name
                    )),
                }),
                None => {
                    apply_fields(doc, &request.fields);
                    results.push(BatchUpdateResultItem {
                        document: doc.clone(),
                        error_message: None,
                    });
                }
            }
        }
        Ok(results)
    }

    fn request_multi_use_token(&self, session: &Session, lifetime: Duration) -> Result<String> {
        self.record_call();
        Ok(format!(
            "mut-{}-{}s",
            session.organization,
            lifetime.as_secs()
        ))
    }

    fn close(&self, _session: &Session) -> Result<()> {
        self.record_call();
        self.close_calls.set(self.close_calls.get() + 1);
        Ok(())
    }
}

// --- Test Fixtures ---

pub mod fixtures {
    use super::*;
    use crate::model::{ContainerKind, DialogKind};

    /// Builder for a connector pre-populated with containers, dialogs and
    /// documents, plus a ready session.
    pub struct RepoFixture {
        pub connector: InMemoryConnector,
        pub session: Session,
    }

    impl Default for RepoFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RepoFixture {
        pub fn new() -> Self {
            Self {
                connector: InMemoryConnector::new(),
                session: Session::new("test-org", "http://repo.test"),
            }
        }

        pub fn map_connector(mut self, f: impl FnOnce(InMemoryConnector) -> InMemoryConnector) -> Self {
            self.connector = f(self.connector);
            self
        }

        /// A cabinet with the conventional dialog setup: the usable search
        /// and store dialogs carry `is_default = true`.
        pub fn with_cabinet(self, id: &str, name: &str) -> Self {
            let container = Container::new(id, name, ContainerKind::Cabinet);
            let dialogs = vec![
                Dialog::new(format!("{}-search", id), DialogKind::Search, true),
                Dialog::new(format!("{}-store", id), DialogKind::Store, true),
            ];
            self.connector.insert_container(container, dialogs);
            self
        }

        /// A tray with the conventional dialog setup: on trays the usable
        /// dialogs carry `is_default = false`.
        pub fn with_tray(self, id: &str, name: &str) -> Self {
            let container = Container::new(id, name, ContainerKind::Tray);
            let dialogs = vec![
                Dialog::new(format!("{}-search", id), DialogKind::Search, false),
                Dialog::new(format!("{}-store", id), DialogKind::Store, false),
            ];
            self.connector.insert_container(container, dialogs);
            self
        }

        pub fn with_container(self, container: Container, dialogs: Vec<Dialog>) -> Self {
            self.connector.insert_container(container, dialogs);
            self
        }

        pub fn with_document(self, container_id: &str, document: Document) -> Self {
            self.connector.insert_document(container_id, document);
            self
        }

        /// `count` documents titled "Test Document N" with a SEQ field.
        pub fn with_documents(self, container_id: &str, count: usize) -> Self {
            for i in 1..=count {
                let doc = Document::new(format!("{}-d{}", container_id, i), format!("Test Document {}", i))
                    .with_fields(vec![IndexField::new("SEQ", i.to_string())]);
                self.connector.insert_document(container_id, doc);
            }
            self
        }
    }
}
