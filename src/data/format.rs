//! Raw field value to cell value conversion.
//!
//! One conversion function per field kind, selected by an exhaustive match on
//! [`FieldKind`]. The remote uses `false` as its "no value" marker for every
//! type, so most formatters test truthiness rather than presence.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value;

use crate::constants::{
    DATE_FORMAT, DATETIME_FORMAT, FALSE_LITERAL, RELATION_SEPARATOR, SECONDS_PER_DAY,
    TRUE_LITERAL,
};
use crate::data::error::{DataError, DataResult};
use crate::data::metadata::MetadataRepository;
use crate::types::{CellValue, FieldDescriptor, FieldKind};

/// Format the raw value of `field` for display in a cell
pub fn format_cell(
    field: &FieldDescriptor,
    raw: &Value,
    names: &dyn MetadataRepository,
) -> DataResult<CellValue> {
    match &field.kind {
        FieldKind::Many2one { .. } => Ok(format_many2one(raw)),
        FieldKind::One2many { relation } | FieldKind::Many2many { relation } => {
            Ok(format_relation_list(relation, raw, names))
        }
        FieldKind::Selection { choices } => Ok(format_selection(choices, raw)),
        FieldKind::Boolean => Ok(format_boolean(raw)),
        FieldKind::Date | FieldKind::Datetime => format_date(&field.name, raw),
        FieldKind::Monetary { .. } | FieldKind::Other(_) => Ok(format_raw(raw)),
    }
}

/// `[id, label]` → label; anything else, or a falsy label → empty
pub fn format_many2one(raw: &Value) -> CellValue {
    match raw.as_array().map(Vec::as_slice) {
        Some([_, label]) => format_raw(label),
        _ => CellValue::empty(),
    }
}

/// Ids → display names joined with `", "`; unresolved ids are dropped
pub fn format_relation_list(
    relation: &str,
    raw: &Value,
    names: &dyn MetadataRepository,
) -> CellValue {
    let Some(ids) = raw.as_array() else {
        return CellValue::empty();
    };

    let labels: Vec<String> = ids
        .iter()
        .filter_map(Value::as_i64)
        .filter_map(|id| names.record_display_name(relation, id))
        .collect();

    CellValue::Text(labels.join(RELATION_SEPARATOR))
}

/// Raw key → label of the first choice whose key matches exactly
pub fn format_selection(choices: &[(Value, String)], raw: &Value) -> CellValue {
    choices
        .iter()
        .find(|(key, _)| key == raw)
        .map(|(_, label)| CellValue::Text(label.clone()))
        .unwrap_or_else(CellValue::empty)
}

pub fn format_boolean(raw: &Value) -> CellValue {
    let literal = if is_truthy(raw) {
        TRUE_LITERAL
    } else {
        FALSE_LITERAL
    };
    CellValue::Text(literal.to_string())
}

/// Date or datetime → spreadsheet serial number; falsy → empty
pub fn format_date(field: &str, raw: &Value) -> DataResult<CellValue> {
    if !is_truthy(raw) {
        return Ok(CellValue::empty());
    }

    let invalid = || DataError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
    };

    match raw {
        Value::String(s) => date_to_serial(s).map(CellValue::Number).ok_or_else(invalid),
        Value::Number(n) => n.as_f64().map(CellValue::Number).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// The raw value itself; falsy → empty
pub fn format_raw(raw: &Value) -> CellValue {
    if !is_truthy(raw) {
        return CellValue::empty();
    }
    match raw {
        Value::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(n.to_string())),
        Value::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

/// Truthiness as the remote's JSON clients understand it
pub fn is_truthy(raw: &Value) -> bool {
    match raw {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Days since 1899-12-30, with the time of day as a fraction
pub fn date_to_serial(value: &str) -> Option<f64> {
    let value = value.trim();
    let datetime = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = (datetime.date() - epoch).num_days() as f64;
    let seconds = datetime.time().num_seconds_from_midnight() as f64;
    Some(days + seconds / SECONDS_PER_DAY)
}
