//! Receipt entity - one row per receipt scan.
//!
//! Receipts are append-only in practice: the merge upserts onto an existing
//! `id` with merge semantics (columns it does not write, such as
//! `detected_at`, are preserved) and nothing in the core ever deletes one.
//! Items are stored as raw JSON; later edit passes from other writers may
//! leave shapes the typed model does not know, so the read side treats the
//! column as untrusted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Receipt database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    /// Receipt id generated at scan time
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// User who scanned the receipt
    pub user_id: String,
    /// Normalized items as a JSON array
    pub items: Json,
    /// When the receipt was scanned, if the OCR pass recorded it
    pub detected_at: Option<DateTimeUtc>,
    /// Last time a merge touched this row
    pub updated_at: DateTimeUtc,
    /// Sum of line totals across `items` (missing totals counted as zero)
    pub total: f64,
}

/// Receipts reference no other tables
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
