//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `FakeRemote` - An in-memory `SearchRead` that records every request
//! - `TestListBuilder` - Builder for data sources over the order fixture
//! - Field and row fixtures for a small `sale.order` table

#![allow(dead_code)]

use serde_json::{json, Map, Value};
use sheetlist::data::{
    FetchRequest, InMemoryMetadata, ListDataSource, ListSession, RemoteError, SearchRead,
};
use sheetlist::types::{FieldDescriptor, FieldKind, ListDefinition, Record, SearchParams};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;

pub const MODEL: &str = "sale.order";

// ============================================================================
// FakeRemote
// ============================================================================

/// In-memory remote serving a fixed table.
///
/// Honors the requested projection and limit. Fields requested but absent
/// from a row come back as `false`, like the real service.
pub struct FakeRemote {
    rows: Vec<Map<String, Value>>,
    calls: RefCell<Vec<FetchRequest>>,
    fail: Cell<bool>,
}

impl FakeRemote {
    pub fn new(rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => map,
                other => panic!("fixture rows must be objects, got {other}"),
            })
            .collect();
        Self {
            rows,
            calls: RefCell::new(Vec::new()),
            fail: Cell::new(false),
        }
    }

    /// Make every following call fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_call(&self) -> Option<FetchRequest> {
        self.calls.borrow().last().cloned()
    }
}

impl SearchRead for FakeRemote {
    fn search_read(&self, request: &FetchRequest) -> Result<Vec<Record>, RemoteError> {
        self.calls.borrow_mut().push(request.clone());
        if self.fail.get() {
            return Err(RemoteError::new("connection refused"));
        }

        Ok(self
            .rows
            .iter()
            .take(request.limit)
            .map(|row| {
                let mut projected = Map::new();
                projected.insert("id".to_string(), row["id"].clone());
                for field in &request.fields {
                    let value = row.get(field).cloned().unwrap_or(Value::Bool(false));
                    projected.insert(field.clone(), value);
                }
                Record::from(projected)
            })
            .collect())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Field metadata of the `sale.order` fixture
pub fn order_fields() -> HashMap<String, FieldDescriptor> {
    let fields = [
        FieldDescriptor::new("name", "Order Reference", FieldKind::Other("char".into())),
        FieldDescriptor::new("amount", "Quantity", FieldKind::Other("integer".into())),
        FieldDescriptor::new(
            "partner_id",
            "Customer",
            FieldKind::Many2one {
                relation: "res.partner".into(),
            },
        ),
        FieldDescriptor::new(
            "tag_ids",
            "Tags",
            FieldKind::Many2many {
                relation: "crm.tag".into(),
            },
        ),
        FieldDescriptor::new(
            "state",
            "Status",
            FieldKind::Selection {
                choices: vec![
                    (json!("draft"), "Quotation".to_string()),
                    (json!("sale"), "Sales Order".to_string()),
                ],
            },
        ),
        FieldDescriptor::new("locked", "Locked", FieldKind::Boolean),
        FieldDescriptor::new("date_order", "Order Date", FieldKind::Date),
        FieldDescriptor::new(
            "price",
            "Total",
            FieldKind::Monetary {
                currency_field: "currency_id".into(),
            },
        ),
        FieldDescriptor::new(
            "currency_id",
            "Currency",
            FieldKind::Many2one {
                relation: "res.currency".into(),
            },
        ),
    ];
    fields.into_iter().map(|f| (f.name.clone(), f)).collect()
}

/// Three orders, in server order
pub fn order_rows() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "S00001",
            "amount": 3,
            "partner_id": [7, "Alice"],
            "tag_ids": [1, 2],
            "state": "sale",
            "locked": true,
            "date_order": "2024-01-15",
            "price": 120.5,
            "currency_id": [1, "EUR"],
        }),
        json!({
            "id": 2,
            "name": "S00002",
            "amount": 0,
            "partner_id": false,
            "tag_ids": [],
            "state": "draft",
            "locked": false,
            "date_order": false,
            "price": 0,
            "currency_id": [1, "EUR"],
        }),
        json!({
            "id": 3,
            "name": "S00003",
            "amount": 8,
            "partner_id": [8, "Bob"],
            "tag_ids": [2, 99],
            "state": "cancel",
            "locked": false,
            "date_order": "2024-02-01",
            "price": 75,
            "currency_id": [2, "USD"],
        }),
    ]
}

/// Display names known for the fixture's relations (tag 99 is unknown)
pub fn order_names() -> Arc<InMemoryMetadata> {
    let names = InMemoryMetadata::new();
    names.insert_display_names("crm.tag", [(1, "A"), (2, "B")]);
    Arc::new(names)
}

// ============================================================================
// TestListBuilder
// ============================================================================

/// Builder for data sources over the order fixture.
///
/// # Example
/// ```ignore
/// let session = TestListBuilder::new()
///     .with_columns(&["name", "partner_id"])
///     .with_limit(2)
///     .session();
/// ```
pub struct TestListBuilder {
    columns: Vec<String>,
    limit: usize,
    rows: Vec<Value>,
    names: Arc<InMemoryMetadata>,
}

impl Default for TestListBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestListBuilder {
    pub fn new() -> Self {
        Self {
            columns: vec!["name".to_string()],
            limit: 3,
            rows: order_rows(),
            names: order_names(),
        }
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_rows(mut self, rows: Vec<Value>) -> Self {
        self.rows = rows;
        self
    }

    pub fn names(&self) -> Arc<InMemoryMetadata> {
        self.names.clone()
    }

    pub fn definition(&self) -> ListDefinition {
        ListDefinition::new(MODEL)
            .with_columns(self.columns.clone())
            .with_fields(order_fields())
            .with_search(SearchParams::default())
            .with_limit(self.limit)
    }

    /// A bare data source (no remote)
    pub fn source(&self) -> ListDataSource {
        ListDataSource::new(self.definition(), self.names.clone())
    }

    /// A session over a `FakeRemote` serving the builder's rows
    pub fn session(self) -> ListSession<FakeRemote> {
        let remote = FakeRemote::new(self.rows.clone());
        ListSession::new(self.source(), remote)
    }

    /// Like `session`, already loaded once
    pub fn loaded_session(self) -> ListSession<FakeRemote> {
        let mut session = self.session();
        session.load().expect("initial load");
        session
    }
}

/// Records as the remote would return them, for driving the sans-IO core
pub fn records(rows: &[Value]) -> Vec<Record> {
    rows.iter()
        .map(|row| serde_json::from_value(row.clone()).expect("record"))
        .collect()
}
