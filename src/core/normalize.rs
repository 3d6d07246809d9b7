//! Normalizer boundary - raw OCR lines in, validated items out.
//!
//! The LLM normalizer itself is an external collaborator; this module owns
//! the two deterministic edges around it: splitting raw OCR text into line
//! items, and validating the normalizer's untrusted JSON before anything
//! downstream sees it. Null or non-array output is a hard failure: no
//! guessing, no partially-shaped items.

use crate::{
    errors::{Error, Result},
    models::{NormalizedItem, RawItem},
};
use serde_json::Value;

/// Splits raw OCR text into line items, one per line whose trimmed length
/// exceeds three characters. Quantities default to one count; smarter
/// grouping via bounding boxes belongs to the OCR collaborator, not here.
#[must_use]
pub fn split_raw_lines(raw_text: &str) -> Vec<RawItem> {
    raw_text
        .split('\n')
        .filter(|line| line.trim().chars().count() > 3)
        .map(|line| RawItem {
            name_raw: line.to_string(),
            quantity: 1.0,
            unit_price: None,
            line_total: None,
            confidence: None,
        })
        .collect()
}

/// Parses and validates the normalizer's JSON output.
///
/// Fails fast with [`Error::Normalization`] when the output is null or not an
/// array, and when any element does not deserialize into the
/// [`NormalizedItem`] shape. Every parsed item additionally passes
/// [`NormalizedItem::validate`].
pub fn parse_normalizer_output(output: &Value) -> Result<Vec<NormalizedItem>> {
    let Some(entries) = output.as_array() else {
        return Err(Error::Normalization {
            message: format!(
                "expected a JSON array of items, got {}",
                json_type_name(output)
            ),
        });
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let item: NormalizedItem =
            serde_json::from_value(entry.clone()).map_err(|e| Error::Normalization {
                message: format!("item {index} does not match the expected shape: {e}"),
            })?;
        item.validate()?;
        items.push(item);
    }

    Ok(items)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
