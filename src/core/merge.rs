//! Pantry merge transaction - folds a consolidated batch into the pantry.
//!
//! This is the one component with a real concurrency contract: the whole
//! merge executes inside a single database transaction with every read issued
//! before any write, so two simultaneous uploads for the same user both
//! accumulate quantity instead of one overwriting the other. Any failure
//! aborts the transaction with no partial effect.

use crate::{
    core::pantry::item_key,
    entities::{PantryItem, PriceHistory, Receipt, pantry_item, receipt},
    errors::{Error, Result},
    models::{NormalizedItem, PricePoint},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait, prelude::*};

/// Summary of one merge: how many pantry rows were created vs updated, and
/// the receipt total that was recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOutcome {
    /// Pantry rows created by this merge
    pub created: usize,
    /// Pantry rows whose quantity was incremented
    pub updated: usize,
    /// Receipt total, the sum of line totals (missing counted as zero)
    pub total: f64,
}

/// Merges a consolidated batch into the user's pantry and records the receipt.
///
/// Preconditions: `user_id` is a verified principal and `items` has already
/// been consolidated, meaning no two entries may share an identity key (the second
/// insert would violate the primary key and abort the transaction).
///
/// An empty batch is accepted and still records an empty receipt. Re-running
/// the same batch is **not** idempotent: the receipt row dedupes on
/// `receipt_id`, but pantry quantities accumulate again; callers retry the
/// whole upload pipeline from normalization, not this call alone.
pub async fn merge_receipt(
    db: &DatabaseConnection,
    user_id: &str,
    receipt_id: &str,
    items: &[NormalizedItem],
) -> Result<MergeOutcome> {
    if user_id.trim().is_empty() {
        return Err(Error::Auth {
            message: "merge requires a verified user id".to_string(),
        });
    }

    if receipt_id.trim().is_empty() {
        return Err(Error::Validation {
            message: "receipt id must not be blank".to_string(),
        });
    }

    for item in items {
        item.validate()?;
    }

    let txn = db.begin().await?;
    let outcome = apply_merge(&txn, user_id, receipt_id, items).await?;
    txn.commit().await?;

    Ok(outcome)
}

/// The merge body, generic over the connection so it runs against a real
/// transaction in production and can be exercised (and rolled back) directly
/// in tests.
async fn apply_merge<C>(
    conn: &C,
    user_id: &str,
    receipt_id: &str,
    items: &[NormalizedItem],
) -> Result<MergeOutcome>
where
    C: ConnectionTrait,
{
    // Read phase: every pantry point-read plus the existing receipt, all
    // before the first write.
    let keyed: Vec<(String, &NormalizedItem)> = items
        .iter()
        .map(|item| (item_key(&item.name_norm, item.unit), item))
        .collect();

    let mut snapshots = Vec::with_capacity(keyed.len());
    for (key, _) in &keyed {
        let snapshot = PantryItem::find_by_id((user_id.to_string(), key.clone()))
            .one(conn)
            .await?;
        snapshots.push(snapshot);
    }

    let existing_receipt = Receipt::find_by_id(receipt_id.to_string()).one(conn).await?;

    let now = chrono::Utc::now();
    let total: f64 = items.iter().map(|item| item.line_total.unwrap_or(0.0)).sum();
    let items_json = serde_json::to_value(items)?;

    // Receipt upsert with merge semantics: an existing row keeps columns the
    // merge does not write (detected_at).
    match existing_receipt {
        Some(row) => {
            let mut active: receipt::ActiveModel = row.into();
            active.user_id = Set(user_id.to_string());
            active.items = Set(items_json);
            active.updated_at = Set(now);
            active.total = Set(total);
            active.update(conn).await?;
        }
        None => {
            receipt::ActiveModel {
                id: Set(receipt_id.to_string()),
                user_id: Set(user_id.to_string()),
                items: Set(items_json),
                detected_at: Set(None),
                updated_at: Set(now),
                total: Set(total),
            }
            .insert(conn)
            .await?;
        }
    }

    let mut created = 0;
    let mut updated = 0;

    for ((key, item), snapshot) in keyed.into_iter().zip(snapshots) {
        let price_entry = item.unit_price.map(|price| PricePoint { price, date: now });

        match snapshot {
            Some(row) => {
                let new_quantity = row.quantity + item.quantity;
                let mut history = row.price_history.clone();
                if let Some(entry) = price_entry {
                    history.0.push(entry);
                }

                let mut active: pantry_item::ActiveModel = row.into();
                active.quantity = Set(new_quantity);
                active.updated_at = Set(now);
                active.price_history = Set(history);
                active.update(conn).await?;
                updated += 1;
            }
            None => {
                pantry_item::ActiveModel {
                    user_id: Set(user_id.to_string()),
                    item_key: Set(key),
                    name: Set(item.name_norm.clone()),
                    category: Set(item.category.clone()),
                    quantity: Set(item.quantity),
                    unit: Set(item.unit),
                    updated_at: Set(now),
                    price_history: Set(PriceHistory(price_entry.into_iter().collect())),
                }
                .insert(conn)
                .await?;
                created += 1;
            }
        }
    }

    Ok(MergeOutcome {
        created,
        updated,
        total,
    })
}
