//! Pantry business logic - item identity and manual pantry edits.
//!
//! Receipt merges go through [`crate::core::merge`]; the operations here back
//! direct edits (assistant "add 3 apples" / "remove 2 eggs" style actions and
//! explicit deletion). Edits never touch price history; only receipt merges
//! record prices.

use crate::{
    entities::{PantryItem, PantryItemColumn, PriceHistory, pantry_item},
    errors::{Error, Result},
    models::Unit,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Computes the identity key addressing one pantry row: the `name-unit` pair
/// lowercased with every non-alphanumeric character mapped to `-`.
///
/// The name is used as the normalizer produced it; singular-normalization is
/// a consolidation-time grouping concern and is never written back into keys.
#[must_use]
pub fn item_key(name: &str, unit: Unit) -> String {
    format!("{name}-{unit}")
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() { c } else { '-' }
        })
        .collect()
}

/// Retrieves all pantry items for a user, ordered alphabetically by name.
pub async fn get_pantry_items(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<pantry_item::Model>> {
    PantryItem::find()
        .filter(PantryItemColumn::UserId.eq(user_id))
        .order_by_asc(PantryItemColumn::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds one pantry item by its identity key, returning None if absent.
pub async fn get_pantry_item(
    db: &DatabaseConnection,
    user_id: &str,
    key: &str,
) -> Result<Option<pantry_item::Model>> {
    PantryItem::find_by_id((user_id.to_string(), key.to_string()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adjusts a pantry item's quantity by a signed delta, creating the item when
/// a positive delta targets a missing key.
///
/// Runs as a read-modify-write transaction so concurrent edits accumulate
/// instead of overwriting each other. A delta that would take the stored
/// quantity below zero fails with [`Error::InsufficientQuantity`] and leaves
/// the row untouched; a negative delta on a missing key fails with
/// [`Error::ItemNotFound`]. Newly created items get `category_if_new`.
pub async fn adjust_quantity(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
    unit: Unit,
    delta: f64,
    category_if_new: &str,
) -> Result<pantry_item::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "item name must not be blank".to_string(),
        });
    }

    if !delta.is_finite() || delta == 0.0 {
        return Err(Error::InvalidQuantity { quantity: delta });
    }

    let key = item_key(name, unit);
    let now = chrono::Utc::now();

    let txn = db.begin().await?;

    let existing = PantryItem::find_by_id((user_id.to_string(), key.clone()))
        .one(&txn)
        .await?;

    let model = match existing {
        Some(row) => {
            let new_quantity = row.quantity + delta;
            if new_quantity < 0.0 {
                return Err(Error::InsufficientQuantity {
                    current: row.quantity,
                    requested: -delta,
                });
            }

            let mut active: pantry_item::ActiveModel = row.into();
            active.quantity = Set(new_quantity);
            active.updated_at = Set(now);
            active.update(&txn).await?
        }
        None => {
            if delta < 0.0 {
                return Err(Error::ItemNotFound { key });
            }

            pantry_item::ActiveModel {
                user_id: Set(user_id.to_string()),
                item_key: Set(key),
                name: Set(name.trim().to_string()),
                category: Set(category_if_new.to_string()),
                quantity: Set(delta),
                unit: Set(unit),
                updated_at: Set(now),
                price_history: Set(PriceHistory::default()),
            }
            .insert(&txn)
            .await?
        }
    };

    txn.commit().await?;
    Ok(model)
}

/// Deletes one pantry item. Deletion is always an explicit user action;
/// quantities reaching zero never remove rows on their own.
pub async fn delete_item(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
    unit: Unit,
) -> Result<()> {
    let key = item_key(name, unit);

    let existing = PantryItem::find_by_id((user_id.to_string(), key.clone()))
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { key })?;

    existing.delete(db).await?;
    Ok(())
}
