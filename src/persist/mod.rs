//! Lossless serialization of a calculation to the Summa file format.
//!
//! Saved records carry only user-authored fields (id, kind tag, title,
//! literals, quantity, child lists); every derived field is recomputed from
//! scratch on load, so a file is never a blind trust of stored numbers.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{FormatError, SummaError};
use crate::ledger::engine::Calculation;
use crate::ledger::item::{ExtendedItem, LedgerItem, LineItem, LsdStrings, SubtotalItem};

/// Application tag in the file envelope; files with any other tag are refused.
pub const APP_NAME: &str = "summa";

pub const FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");

const LINE_ITEM_TAG: &str = "LINE_ITEM";
const EXTENDED_ITEM_TAG: &str = "EXTENDED_ITEM";
const SUBTOTAL_ITEM_TAG: &str = "SUBTOTAL_ITEM";

/// A ledger item stripped to its user-authored fields.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "itemType")]
pub enum SavedItem {
    #[serde(rename = "LINE_ITEM")]
    Line {
        id: Uuid,
        title: String,
        literals: LsdStrings,
    },
    #[serde(rename = "EXTENDED_ITEM")]
    Extended {
        id: Uuid,
        title: String,
        literals: LsdStrings,
        quantity: String,
    },
    #[serde(rename = "SUBTOTAL_ITEM")]
    Subtotal {
        id: Uuid,
        title: String,
        lines: Vec<SavedItem>,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Metadata {
    #[serde(rename = "appName")]
    pub app_name: String,
    pub version: String,
    #[serde(rename = "savedAt")]
    pub saved_at: String,
}

/// The on-disk envelope: metadata plus the serialized top-level lines.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SummaFile {
    pub metadata: Metadata,
    pub lines: Vec<SavedItem>,
}

/// Strips an item to its saved record. Subtotal totals are never persisted,
/// only their child lists.
pub fn save_item(item: &LedgerItem) -> SavedItem {
    match item {
        LedgerItem::Line(line) => SavedItem::Line {
            id: line.id,
            title: line.title.clone(),
            literals: line.literals.clone(),
        },
        LedgerItem::Extended(ext) => SavedItem::Extended {
            id: ext.id,
            title: ext.title.clone(),
            literals: ext.literals.clone(),
            quantity: ext.quantity.clone(),
        },
        LedgerItem::Subtotal(sub) => SavedItem::Subtotal {
            id: sub.id,
            title: sub.title.clone(),
            lines: save_lines(&sub.lines),
        },
    }
}

pub fn save_lines(lines: &[LedgerItem]) -> Vec<SavedItem> {
    lines.iter().map(save_item).collect()
}

/// Wraps a calculation in the file envelope with a fresh save timestamp.
pub fn to_document(calculation: &Calculation) -> SummaFile {
    SummaFile {
        metadata: Metadata {
            app_name: APP_NAME.into(),
            version: FORMAT_VERSION.into(),
            saved_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        },
        lines: save_lines(&calculation.lines),
    }
}

pub fn to_json(calculation: &Calculation) -> Result<String, SummaError> {
    Ok(serde_json::to_string_pretty(&to_document(calculation))?)
}

/// Parses and validates a Summa file, recomputing every derived field.
pub fn parse(text: &str) -> Result<Calculation, FormatError> {
    let value: Value = serde_json::from_str(text).map_err(|_| FormatError::NotJson)?;
    let app_name = value
        .get("metadata")
        .and_then(|meta| meta.get("appName"))
        .and_then(Value::as_str);
    if app_name != Some(APP_NAME) {
        return Err(FormatError::NotSummaFile);
    }
    let lines = value
        .get("lines")
        .and_then(Value::as_array)
        .ok_or(FormatError::MissingLines)?;
    let items = parse_items(lines)?;
    Ok(Calculation::from_lines(items))
}

fn parse_items(records: &[Value]) -> Result<Vec<LedgerItem>, FormatError> {
    records.iter().map(parse_item).collect()
}

fn parse_item(record: &Value) -> Result<LedgerItem, FormatError> {
    let tag = record
        .get("itemType")
        .and_then(Value::as_str)
        .unwrap_or("undefined");
    match tag {
        LINE_ITEM_TAG => {
            let id = require_id(record, "line")?;
            let literals = require_literals(record, "line")?;
            Ok(LedgerItem::Line(LineItem::from_parts(
                id,
                title_of(record),
                literals,
            )))
        }
        EXTENDED_ITEM_TAG => {
            let id = require_id(record, "extended")?;
            let literals = require_literals(record, "extended")?;
            let quantity = record
                .get("quantity")
                .and_then(Value::as_str)
                .ok_or(FormatError::MissingField {
                    kind: "extended",
                    field: "quantity",
                })?;
            Ok(LedgerItem::Extended(ExtendedItem::from_parts(
                id,
                title_of(record),
                literals,
                quantity,
            )))
        }
        SUBTOTAL_ITEM_TAG => {
            let id = require_id(record, "subtotal")?;
            let children = record
                .get("lines")
                .and_then(Value::as_array)
                .ok_or(FormatError::MissingField {
                    kind: "subtotal",
                    field: "lines",
                })?;
            Ok(LedgerItem::Subtotal(SubtotalItem::from_parts(
                id,
                title_of(record),
                parse_items(children)?,
            )))
        }
        other => Err(FormatError::UnknownItemType(other.to_string())),
    }
}

fn title_of(record: &Value) -> String {
    record
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn require_id(record: &Value, kind: &'static str) -> Result<Uuid, FormatError> {
    let raw = record
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(FormatError::MissingField { kind, field: "id" })?;
    Uuid::parse_str(raw).map_err(|_| FormatError::MalformedId {
        kind,
        id: raw.to_string(),
    })
}

fn require_literals(record: &Value, kind: &'static str) -> Result<LsdStrings, FormatError> {
    let literals = record
        .get("literals")
        .filter(|value| value.is_object())
        .ok_or(FormatError::MissingField {
            kind,
            field: "literals",
        })?;
    let field = |key: &str| {
        literals
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Ok(LsdStrings {
        l: field("l"),
        s: field("s"),
        d: field("d"),
    })
}
