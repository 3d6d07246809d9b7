//! Savings analytics - read-side aggregation over receipts and the pantry.
//!
//! Pure reducer: scans the user's receipts for monthly spend and category
//! split, and surfaces pantry price histories as sparkline series. Receipt
//! `items` are raw JSON written by potentially older or foreign writers, so
//! item-level aggregation is best-effort: a malformed array skips the item
//! breakdown but the receipt's total still counts.

use crate::{
    core::pantry::get_pantry_items,
    entities::{Receipt, ReceiptColumn},
    errors::Result,
    models::PricePoint,
};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Total spend for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySpend {
    /// Month in `YYYY-MM` form
    pub month: String,
    /// Sum of receipt totals recorded in that month
    pub total: f64,
}

/// Total spend for one grocery category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    /// Category name; items without one fall under "Other"
    pub category: String,
    /// Sum of line totals across all receipts
    pub total: f64,
}

/// The full savings view for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsReport {
    /// Spend grouped by month, ascending by month
    pub monthly_spend: Vec<MonthlySpend>,
    /// Spend grouped by category, ascending by category name
    pub category_split: Vec<CategorySpend>,
    /// Price history per pantry item name, for items with at least one entry
    pub price_sparklines: BTreeMap<String, Vec<PricePoint>>,
}

/// Computes the savings report for one user.
///
/// Months come from the best-effort receipt date: `detected_at` when the OCR
/// pass recorded one, else `updated_at`.
pub async fn compute_savings(db: &DatabaseConnection, user_id: &str) -> Result<SavingsReport> {
    let receipts = Receipt::find()
        .filter(ReceiptColumn::UserId.eq(user_id))
        .order_by_desc(ReceiptColumn::UpdatedAt)
        .all(db)
        .await?;

    let mut monthly: BTreeMap<String, f64> = BTreeMap::new();
    let mut categories: BTreeMap<String, f64> = BTreeMap::new();

    for receipt in receipts {
        let date = receipt.detected_at.unwrap_or(receipt.updated_at);
        let month = date.format("%Y-%m").to_string();
        *monthly.entry(month).or_insert(0.0) += receipt.total;

        let Some(items) = receipt.items.as_array() else {
            continue;
        };
        for item in items {
            let category = item
                .get("category")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
                .unwrap_or("Other");
            let cost = item.get("lineTotal").and_then(Value::as_f64).unwrap_or(0.0);
            *categories.entry(category.to_string()).or_insert(0.0) += cost;
        }
    }

    let mut price_sparklines = BTreeMap::new();
    for item in get_pantry_items(db, user_id).await? {
        if !item.price_history.0.is_empty() {
            price_sparklines.insert(item.name, item.price_history.0);
        }
    }

    Ok(SavingsReport {
        monthly_spend: monthly
            .into_iter()
            .map(|(month, total)| MonthlySpend { month, total })
            .collect(),
        category_split: categories
            .into_iter()
            .map(|(category, total)| CategorySpend { category, total })
            .collect(),
        price_sparklines,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::merge::merge_receipt;
    use crate::test_utils::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[tokio::test]
    async fn test_compute_savings_empty_user() -> Result<()> {
        let db = setup_test_db().await?;

        let report = compute_savings(&db, "user1").await?;
        assert!(report.monthly_spend.is_empty());
        assert!(report.category_split.is_empty());
        assert!(report.price_sparklines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_spend_groups_by_detected_month() -> Result<()> {
        let db = setup_test_db().await?;

        let march = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let april = Utc.with_ymd_and_hms(2024, 4, 1, 9, 30, 0).unwrap();
        seed_receipt(&db, "r1", "user1", 10.0, Some(march), json!([])).await?;
        seed_receipt(&db, "r2", "user1", 5.0, Some(march), json!([])).await?;
        seed_receipt(&db, "r3", "user1", 7.5, Some(april), json!([])).await?;

        let report = compute_savings(&db, "user1").await?;
        assert_eq!(report.monthly_spend.len(), 2);
        assert_eq!(report.monthly_spend[0].month, "2024-03");
        assert_eq!(report.monthly_spend[0].total, 15.0);
        assert_eq!(report.monthly_spend[1].month, "2024-04");
        assert_eq!(report.monthly_spend[1].total, 7.5);

        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_spend_falls_back_to_updated_at() -> Result<()> {
        let db = setup_test_db().await?;

        seed_receipt(&db, "r1", "user1", 3.0, None, json!([])).await?;

        let report = compute_savings(&db, "user1").await?;
        assert_eq!(report.monthly_spend.len(), 1);
        assert_eq!(
            report.monthly_spend[0].month,
            Utc::now().format("%Y-%m").to_string()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_category_split_with_fallback() -> Result<()> {
        let db = setup_test_db().await?;

        let items = json!([
            { "nameNorm": "apple", "category": "Produce", "lineTotal": 2.0 },
            { "nameNorm": "milk", "category": "Dairy", "lineTotal": 3.5 },
            { "nameNorm": "mystery", "lineTotal": 1.0 },
            { "nameNorm": "free-sample", "category": "Produce" },
        ]);
        seed_receipt(&db, "r1", "user1", 6.5, None, items).await?;

        let report = compute_savings(&db, "user1").await?;
        let by_name: BTreeMap<&str, f64> = report
            .category_split
            .iter()
            .map(|c| (c.category.as_str(), c.total))
            .collect();
        assert_eq!(by_name["Produce"], 2.0);
        assert_eq!(by_name["Dairy"], 3.5);
        assert_eq!(by_name["Other"], 1.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_items_still_counts_total() -> Result<()> {
        let db = setup_test_db().await?;

        seed_receipt(&db, "r1", "user1", 9.99, None, json!("not an array")).await?;

        let report = compute_savings(&db, "user1").await?;
        assert_eq!(report.monthly_spend.len(), 1);
        assert_eq!(report.monthly_spend[0].total, 9.99);
        assert!(report.category_split.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_sparklines_only_for_nonempty_histories() -> Result<()> {
        let db = setup_test_db().await?;

        merge_receipt(
            &db,
            "user1",
            "r1",
            &[
                priced_item("milk", 1.0, 3.99, 3.99),
                test_item("napkins", 1.0), // no price, no sparkline
            ],
        )
        .await?;

        let report = compute_savings(&db, "user1").await?;
        assert_eq!(report.price_sparklines.len(), 1);
        assert_eq!(report.price_sparklines["milk"].len(), 1);
        assert_eq!(report.price_sparklines["milk"][0].price, 3.99);

        Ok(())
    }

    #[tokio::test]
    async fn test_savings_scoped_to_user() -> Result<()> {
        let db = setup_test_db().await?;

        seed_receipt(&db, "r1", "user1", 10.0, None, json!([])).await?;
        seed_receipt(&db, "r2", "user2", 99.0, None, json!([])).await?;

        let report = compute_savings(&db, "user1").await?;
        assert_eq!(report.monthly_spend.len(), 1);
        assert_eq!(report.monthly_spend[0].total, 10.0);

        Ok(())
    }
}
