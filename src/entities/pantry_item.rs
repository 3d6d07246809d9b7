//! Pantry item entity - one row per user per logical grocery item.
//!
//! The row identity mirrors the per-user document path of the original store:
//! the composite primary key is `(user_id, item_key)` where `item_key` is the
//! slugged `name-unit` pair computed by [`crate::core::pantry::item_key`].
//! Price observations accumulate in an append-only JSON column.

use crate::models::{PricePoint, Unit};
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pantry item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pantry_items")]
pub struct Model {
    /// Owning user; pantry rows are never shared across users
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Item identity key, `slug(name)-slug(unit)`
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_key: String,
    /// Display name as the normalizer produced it
    pub name: String,
    /// Grocery category (e.g. "Produce", "Dairy")
    pub category: String,
    /// Quantity on hand, never negative
    pub quantity: f64,
    /// Measurement unit for `quantity`
    pub unit: Unit,
    /// Last time a merge or edit touched this row
    pub updated_at: DateTimeUtc,
    /// Append-only list of observed prices
    pub price_history: PriceHistory,
}

/// Append-only price observations, stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PriceHistory(pub Vec<PricePoint>);

/// Pantry items reference no other tables
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
