//! Shared test utilities for `PantryLedger`.
//!
//! Common helpers for setting up in-memory test databases and building test
//! items with sensible defaults.

use crate::{
    entities::receipt,
    errors::Result,
    models::{NormalizedItem, Unit},
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a normalized item with sensible defaults.
///
/// # Defaults
/// * `category`: "Pantry"
/// * `unit`: count
/// * no prices
/// * `confidence`: 0.9
#[must_use]
pub fn test_item(name: &str, quantity: f64) -> NormalizedItem {
    NormalizedItem {
        name_norm: name.to_string(),
        category: "Pantry".to_string(),
        quantity,
        unit: Unit::Count,
        unit_price: None,
        line_total: None,
        confidence: 0.9,
    }
}

/// Builds a normalized item carrying a unit price and line total.
#[must_use]
pub fn priced_item(name: &str, quantity: f64, unit_price: f64, line_total: f64) -> NormalizedItem {
    NormalizedItem {
        unit_price: Some(unit_price),
        line_total: Some(line_total),
        ..test_item(name, quantity)
    }
}

/// Inserts a receipt row directly, bypassing the merge. Used to stage
/// receipts with specific dates or item payloads for read-side tests.
pub async fn seed_receipt(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
    total: f64,
    detected_at: Option<DateTime<Utc>>,
    items: serde_json::Value,
) -> Result<receipt::Model> {
    receipt::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        items: Set(items),
        detected_at: Set(detected_at),
        updated_at: Set(Utc::now()),
        total: Set(total),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
