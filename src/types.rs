//! Core types for spreadsheet list data sources.
//!
//! This module defines the fundamental data structures shared by the data
//! source, the formatters and the remote collaborators: records, field
//! descriptors, search parameters and cell values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use crate::constants::DEFAULT_LIST_LIMIT;

/// Unique identifier of a remote record.
pub type RecordId = i64;

// ============================================================================
// Records
// ============================================================================

/// One row as returned by the remote search/read service.
///
/// Values keep the remote's raw JSON shape; formatting happens per field kind
/// when a cell is read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    /// The record's identifier, if the remote included one
    pub fn id(&self) -> Option<RecordId> {
        self.0.get("id").and_then(Value::as_i64)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Whether `field` was part of the projection that produced this record
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(values: Map<String, Value>) -> Self {
        Self(values)
    }
}

// ============================================================================
// Field Metadata
// ============================================================================

/// The kind of a field, carrying the details its formatter needs.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    /// Singular relation, stored as `[id, display_name]`
    Many2one { relation: String },
    /// Plural relation, stored as a list of ids
    One2many { relation: String },
    /// Plural relation, stored as a list of ids
    Many2many { relation: String },
    /// Stored as a raw key; labels come from `choices`
    Selection { choices: Vec<(Value, String)> },
    Boolean,
    /// `YYYY-MM-DD`
    Date,
    /// `YYYY-MM-DD HH:MM:SS`
    Datetime,
    /// Amount whose currency lives in a sibling field
    Monetary { currency_field: String },
    /// Any other type (char, integer, float, text, ...)
    Other(String),
}

impl FieldKind {
    /// The remote type name of this kind
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Many2one { .. } => "many2one",
            FieldKind::One2many { .. } => "one2many",
            FieldKind::Many2many { .. } => "many2many",
            FieldKind::Selection { .. } => "selection",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Datetime => "datetime",
            FieldKind::Monetary { .. } => "monetary",
            FieldKind::Other(name) => name,
        }
    }

    /// Related model for relational kinds
    pub fn relation(&self) -> Option<&str> {
        match self {
            FieldKind::Many2one { relation }
            | FieldKind::One2many { relation }
            | FieldKind::Many2many { relation } => Some(relation),
            _ => None,
        }
    }
}

/// Metadata describing one field of the listed model.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    /// Technical field name
    pub name: String,
    /// Human-readable label, used for list headers
    pub label: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
        }
    }

    /// Currency field to fetch alongside a monetary field
    pub fn currency_field(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Monetary { currency_field } => Some(currency_field),
            _ => None,
        }
    }
}

// ============================================================================
// Search Parameters
// ============================================================================

/// One sort criterion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub name: String,
    #[serde(default = "default_asc")]
    pub asc: bool,
}

fn default_asc() -> bool {
    true
}

impl OrderBy {
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asc: true,
        }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asc: false,
        }
    }
}

/// Render sort criteria the way the remote expects them: `"name ASC, date DESC"`.
pub fn order_by_to_string(order_by: &[OrderBy]) -> String {
    order_by
        .iter()
        .map(|o| format!("{} {}", o.name, if o.asc { "ASC" } else { "DESC" }))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Server-side filtering, ordering and context for a list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Filter expression in the remote's domain syntax
    #[serde(default = "empty_domain")]
    pub domain: Value,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    #[serde(default)]
    pub context: Map<String, Value>,
}

fn empty_domain() -> Value {
    Value::Array(Vec::new())
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            domain: empty_domain(),
            order_by: Vec::new(),
            context: Map::new(),
        }
    }
}

impl SearchParams {
    pub fn with_domain(mut self, domain: Value) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_order(mut self, order_by: Vec<OrderBy>) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = context;
        self
    }
}

// ============================================================================
// List Definition
// ============================================================================

/// Everything needed to construct a list data source.
#[derive(Clone, Debug)]
pub struct ListDefinition {
    /// Target model on the remote
    pub model: String,
    /// Initially requested columns
    pub columns: Vec<String>,
    /// Field metadata keyed by field name
    pub fields: HashMap<String, FieldDescriptor>,
    pub search: SearchParams,
    /// Initial number of rows to fetch
    pub limit: usize,
}

impl ListDefinition {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            columns: Vec::new(),
            fields: HashMap::new(),
            search: SearchParams::default(),
            limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn with_fields(mut self, fields: HashMap<String, FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn with_search(mut self, search: SearchParams) -> Self {
        self.search = search;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

// ============================================================================
// Cell Values
// ============================================================================

/// A value ready to be placed in a spreadsheet cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    /// The empty-string cell
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            // No trailing zeros for whole numbers
            CellValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}
