//! Raw record normalization.
//!
//! Producer-facing records arrive as string-keyed JSON maps: field names
//! vary slightly between producers (`part_name` vs `name`, `qty` vs
//! `quantity`, hole `diam` vs `diameter`) and numeric values may be real
//! numbers or locale-formatted strings with a decimal comma. [`normalize`]
//! folds all of that into one canonical [`PartDescriptor`].
//!
//! Both export paths consume the output of this module and nothing else;
//! any divergence in record interpretation between the PDF and DXF paths
//! is a defect here, not in the exporters.

use crate::error::NormalizeError;
use crate::format::parse_mm;
use crate::part::{Hole, PartDescriptor, Shape};
use serde_json::Value;

/// A raw part record: a field-name to value mapping as supplied by the
/// part-parameter collection surface.
pub type RawRecord = serde_json::Map<String, Value>;

fn first_value<'a>(record: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| record.get(*key))
        .filter(|value| !value.is_null())
}

fn string_field(record: &RawRecord, keys: &[&str]) -> Option<String> {
    match first_value(record, keys)? {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_mm(text),
        _ => None,
    }
}

/// Numeric field with the documented 0.0 default for missing or
/// unparseable input.
fn number_field(record: &RawRecord, keys: &[&str]) -> f64 {
    first_value(record, keys)
        .and_then(coerce_number)
        .unwrap_or(0.0)
}

/// Numeric field that distinguishes "absent" from "present but zero".
/// Used for thickness, where absence selects the sentinel group.
fn optional_number_field(record: &RawRecord, keys: &[&str]) -> Option<f64> {
    let value = first_value(record, keys)?;
    if matches!(value, Value::String(text) if text.trim().is_empty()) {
        return None;
    }
    Some(coerce_number(value).unwrap_or(0.0))
}

fn holes_field(record: &RawRecord) -> Vec<Hole> {
    let Some(Value::Array(entries)) = first_value(record, &["holes"]) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let map = entry.as_object()?;
            Some(Hole {
                diameter: number_field(map, &["diameter", "diam"]),
                x: number_field(map, &["x"]),
                y: number_field(map, &["y"]),
            })
        })
        .collect()
}

/// Thickness as the grouping key, readable even when full normalization
/// fails (a record without a name still lands in the right PDF document).
pub fn raw_thickness(record: &RawRecord) -> Option<f64> {
    optional_number_field(record, &["thickness"])
}

/// Normalize one raw record into the canonical part descriptor.
///
/// Pure transform: no side effects, no defaulted shape. A missing or blank
/// name or shape tag fails with [`NormalizeError::InsufficientData`]; a tag
/// outside the known set normalizes into [`Shape::Unknown`] so downstream
/// consumers report it per part without aborting the batch.
pub fn normalize(record: &RawRecord) -> Result<PartDescriptor, NormalizeError> {
    let name =
        string_field(record, &["name", "part_name"]).ok_or(NormalizeError::InsufficientData("name"))?;
    let tag =
        string_field(record, &["shape", "shape_type"]).ok_or(NormalizeError::InsufficientData("shape"))?;

    let shape = match tag.to_lowercase().as_str() {
        "rectangle" => Shape::Rectangle {
            width: number_field(record, &["width"]),
            height: number_field(record, &["height"]),
        },
        "circle" => Shape::Circle {
            diameter: number_field(record, &["diameter"]),
        },
        "right_triangle" => Shape::RightTriangle {
            base: number_field(record, &["base", "rt_base"]),
            height: number_field(record, &["height", "rt_height"]),
        },
        "trapezoid" => Shape::Trapezoid {
            large_base: number_field(record, &["large_base", "trapezoid_large_base"]),
            small_base: number_field(record, &["small_base", "trapezoid_small_base"]),
            height: number_field(record, &["height", "trapezoid_height"]),
        },
        other => Shape::Unknown(other.to_string()),
    };

    Ok(PartDescriptor {
        name,
        shape,
        thickness: raw_thickness(record),
        quantity: number_field(record, &["quantity", "qty"]).max(0.0) as u32,
        holes: holes_field(record),
    })
}
