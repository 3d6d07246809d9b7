//! Consolidation engine - merges duplicate items within a single scan.
//!
//! The LLM normalizer frequently emits the same logical item several times
//! when a receipt prints it across multiple lines. This module folds those
//! duplicates into one entry per `(normalized name, unit)` key, summing
//! quantities, averaging prices, and keeping the best confidence. The fold is
//! pure and deterministic: the same input ordering always produces the same
//! output, in insertion order of each key's first occurrence.

use crate::models::NormalizedItem;
use std::collections::HashMap;

/// Normalizes an item name for duplicate grouping: lowercase, trim, and strip
/// one trailing `s`.
///
/// The singularization is a deliberate heuristic, not a morphological rule:
/// the suffix is only stripped when the name is longer than two characters
/// and does not end in `ss` (so "grass" stays "grass"). Irregular plurals
/// ("tomatoes") are intentionally left alone; downstream key matching
/// depends on this rule being deterministic, not linguistically correct.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    if lower.len() > 2 && lower.ends_with('s') && !lower.ends_with("ss") {
        lower[..lower.len() - 1].to_string()
    } else {
        lower
    }
}

/// Grouping key for one item within a scan batch.
fn group_key(item: &NormalizedItem) -> String {
    format!("{}-{}", normalize_name(&item.name_norm), item.unit)
}

/// Internal fold state for one output entry. The price-observation counter is
/// bookkeeping only and never leaves this module.
struct Folded {
    item: NormalizedItem,
    price_observations: u32,
}

/// Consolidates duplicate items in a single scan batch.
///
/// Items are folded left-to-right in input order. Per duplicate:
/// - `quantity` is a running sum
/// - `unit_price` is a weighted running average when both sides carry a
///   price; otherwise whichever side carries one wins
/// - `line_total` is summed when both sides carry one; otherwise whichever
///   side carries one wins
/// - `confidence` keeps the maximum
/// - `category` and `unit` are retained from the first occurrence
///
/// The output contains no two entries sharing a `(normalized name, unit)`
/// key; this function is solely responsible for that invariant before
/// anything is persisted.
#[must_use]
pub fn consolidate(items: Vec<NormalizedItem>) -> Vec<NormalizedItem> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut folded: Vec<Folded> = Vec::new();

    for item in items {
        let key = group_key(&item);
        if let Some(&at) = index.get(&key) {
            merge_duplicate(&mut folded[at], item);
        } else {
            index.insert(key, folded.len());
            folded.push(Folded {
                item,
                price_observations: 1,
            });
        }
    }

    folded.into_iter().map(|entry| entry.item).collect()
}

fn merge_duplicate(existing: &mut Folded, incoming: NormalizedItem) {
    existing.item.quantity += incoming.quantity;

    match (existing.item.unit_price, incoming.unit_price) {
        (Some(current), Some(observed)) => {
            let count = f64::from(existing.price_observations);
            existing.item.unit_price = Some((current * count + observed) / (count + 1.0));
            existing.price_observations += 1;
        }
        (None, Some(observed)) => existing.item.unit_price = Some(observed),
        _ => {}
    }

    match (existing.item.line_total, incoming.line_total) {
        (Some(current), Some(observed)) => existing.item.line_total = Some(current + observed),
        (None, Some(observed)) => existing.item.line_total = Some(observed),
        _ => {}
    }

    existing.item.confidence = existing.item.confidence.max(incoming.confidence);
}
