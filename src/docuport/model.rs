use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle to an authenticated organization context.
///
/// Created once by a connector's `connect`, passed by reference into every
/// operation, and released (not destroyed) through `close`. A session carries
/// no internal synchronization; concurrent use must be serialized by the
/// caller, or each thread must own its own session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub organization: String,
    pub server_url: String,
    pub opened_at: DateTime<Utc>,
}

impl Session {
    pub fn new(organization: impl Into<String>, server_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization: organization.into(),
            server_url: server_url.into(),
            opened_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// Persistent document storage location.
    Cabinet,
    /// Transient holding area ("basket") for documents in transit.
    Tray,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Cabinet => "cabinet",
            ContainerKind::Tray => "tray",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub kind: ContainerKind,
}

impl Container {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ContainerKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// A named metadata attribute attached to a document. Values are validated
/// server-side; the client checks presence only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexField {
    pub name: String,
    pub value: String,
}

impl IndexField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A document as seen by the remote repository.
///
/// The id is stable across operations, but the object itself goes stale the
/// moment a mutating operation runs: callers must switch to the document
/// embedded in that operation's result. `self_ref` is the hypermedia self
/// relation; `None` means the object is not fully resolved and must be
/// re-fetched before operations that need the reference (see
/// `ops::helpers::ensure_fully_loaded`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub fields: Vec<IndexField>,
    pub self_ref: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
            self_ref: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<IndexField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogKind {
    Search,
    Store,
}

impl DialogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogKind::Search => "search",
            DialogKind::Store => "store",
        }
    }
}

/// A server-defined search or store configuration scoped to one container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dialog {
    pub id: String,
    pub kind: DialogKind,
    pub is_default: bool,
}

impl Dialog {
    pub fn new(id: impl Into<String>, kind: DialogKind, is_default: bool) -> Self {
        Self {
            id: id.into(),
            kind,
            is_default,
        }
    }
}

/// One criterion of a query expression: the named field must carry one of
/// the listed values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub values: Vec<String>,
}

/// Opaque search criteria. Engines pass it through to the connector without
/// interpreting it; an empty expression matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryExpression {
    pub conditions: Vec<Condition>,
}

impl QueryExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push(Condition {
            field: name.into(),
            values: vec![value.into()],
        });
        self
    }

    pub fn field_in(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.conditions.push(Condition {
            field: name.into(),
            values,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// One page of query results. `total_count` covers the whole result set;
/// a page may hold fewer than `page_size` items even when more remain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryResultPage {
    pub items: Vec<Document>,
    pub total_count: u64,
    pub start_offset: u64,
    pub page_size: u64,
}

impl QueryResultPage {
    pub fn single(document: Document) -> Self {
        Self {
            items: vec![document],
            total_count: 1,
            start_offset: 0,
            page_size: 1,
        }
    }
}

/// Per-document outcome of a batch field update. An absent `error_message`
/// means the update succeeded; a present one means this document was left
/// entirely unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchUpdateResultItem {
    pub document: Document,
    pub error_message: Option<String>,
}

impl BatchUpdateResultItem {
    pub fn succeeded(&self) -> bool {
        self.error_message.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_field_lookup() {
        let doc = Document::new("d1", "Invoice 42").with_fields(vec![
            IndexField::new("COMPANY", "Acme"),
            IndexField::new("AMOUNT", "12.50"),
        ]);
        assert_eq!(doc.field("COMPANY"), Some("Acme"));
        assert_eq!(doc.field("MISSING"), None);
    }

    #[test]
    fn expression_builder_accumulates_conditions() {
        let expr = QueryExpression::new()
            .field("COMPANY", "Acme")
            .field_in("STATUS", vec!["open".into(), "paid".into()]);
        assert_eq!(expr.conditions.len(), 2);
        assert_eq!(expr.conditions[1].values.len(), 2);
        assert!(!expr.is_empty());
        assert!(QueryExpression::new().is_empty());
    }
}
