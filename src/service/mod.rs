//! Service facade - the gate the (out-of-scope) request handlers call into.
//!
//! Every mutating operation passes through here: the verified principal is
//! checked before any store access, payloads are validated, and only then is
//! the core invoked. The DTOs mirror the JSON contract the upstream clients
//! speak (camelCase).

use crate::{
    config::categories::CategoryConfig,
    core::{analytics, consolidate, merge, normalize, pantry},
    entities::pantry_item,
    errors::{Error, Result},
    models::{NormalizedItem, Unit},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// A caller identity already verified by the identity provider. The service
/// trusts the uid and never re-derives it; it only refuses blank ones.
#[derive(Debug, Clone)]
pub struct Principal {
    uid: String,
}

impl Principal {
    /// Wraps a verified uid.
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }

    /// The verified user id.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }
}

/// Request body for a pantry merge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePantryRequest {
    /// Receipt the batch came from
    pub receipt_id: String,
    /// Consolidated items to merge
    pub items: Vec<NormalizedItem>,
}

/// Response body for a pantry merge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePantryResponse {
    /// Pantry rows created by this merge
    pub upserted_count: usize,
    /// Pantry rows whose quantity was incremented
    pub updated_count: usize,
    /// Receipt total that was recorded
    pub total: f64,
}

/// Application service fronting the pantry core.
pub struct PantryService {
    db: DatabaseConnection,
    categories: CategoryConfig,
}

impl PantryService {
    /// Creates a service over an established database connection.
    #[must_use]
    pub fn new(db: DatabaseConnection, categories: CategoryConfig) -> Self {
        Self { db, categories }
    }

    fn authorize<'a>(&self, principal: &'a Principal) -> Result<&'a str> {
        let uid = principal.uid();
        if uid.trim().is_empty() {
            warn!("rejected request with blank principal");
            return Err(Error::Auth {
                message: "request requires a verified user".to_string(),
            });
        }
        Ok(uid)
    }

    /// Runs the full normalize-side pipeline on raw LLM output: shape
    /// validation, category canonicalization, then consolidation.
    pub fn consolidate_scan(&self, llm_output: &Value) -> Result<Vec<NormalizedItem>> {
        let mut items = normalize::parse_normalizer_output(llm_output)?;
        for item in &mut items {
            item.category = self.categories.canonicalize(&item.category);
        }
        Ok(consolidate::consolidate(items))
    }

    /// Merges a consolidated batch into the caller's pantry.
    pub async fn update_pantry(
        &self,
        principal: &Principal,
        request: UpdatePantryRequest,
    ) -> Result<UpdatePantryResponse> {
        let uid = self.authorize(principal)?;

        if request.receipt_id.trim().is_empty() {
            return Err(Error::Validation {
                message: "receiptId must not be blank".to_string(),
            });
        }

        info!(
            user_id = uid,
            receipt_id = %request.receipt_id,
            items = request.items.len(),
            "merging receipt into pantry"
        );

        let outcome = merge::merge_receipt(&self.db, uid, &request.receipt_id, &request.items)
            .await
            .inspect_err(|e| warn!(user_id = uid, error = %e, "pantry merge failed"))?;

        Ok(UpdatePantryResponse {
            upserted_count: outcome.created,
            updated_count: outcome.updated,
            total: outcome.total,
        })
    }

    /// Computes the caller's savings report.
    pub async fn savings(&self, principal: &Principal) -> Result<analytics::SavingsReport> {
        let uid = self.authorize(principal)?;
        analytics::compute_savings(&self.db, uid).await
    }

    /// Lists the caller's pantry, ordered by name.
    pub async fn list_pantry(&self, principal: &Principal) -> Result<Vec<pantry_item::Model>> {
        let uid = self.authorize(principal)?;
        pantry::get_pantry_items(&self.db, uid).await
    }

    /// Adjusts one pantry item by a signed delta (assistant "add 3 apples" /
    /// "remove 2 eggs" actions). Creates missing items on positive deltas.
    pub async fn adjust_item(
        &self,
        principal: &Principal,
        name: &str,
        unit: Unit,
        delta: f64,
    ) -> Result<pantry_item::Model> {
        let uid = self.authorize(principal)?;
        info!(user_id = uid, name, delta, "adjusting pantry item");
        pantry::adjust_quantity(&self.db, uid, name, unit, delta, &self.categories.fallback).await
    }

    /// Deletes one pantry item on explicit user request.
    pub async fn delete_item(
        &self,
        principal: &Principal,
        name: &str,
        unit: Unit,
    ) -> Result<()> {
        let uid = self.authorize(principal)?;
        info!(user_id = uid, name, "deleting pantry item");
        pantry::delete_item(&self.db, uid, name, unit).await
    }
}
