//! Core business logic - framework-agnostic receipt and pantry operations.
//!
//! Everything in here is independent of any transport layer: consolidation is
//! a pure function, the merge and pantry edits speak to the store through
//! SeaORM connections, and analytics is a pure read-side reducer.

/// Read-side spend and price-history aggregation
pub mod analytics;
/// Duplicate-item consolidation within a single scan
pub mod consolidate;
/// Transactional merge of a consolidated batch into the pantry
pub mod merge;
/// OCR line splitting and normalizer output validation
pub mod normalize;
/// Item identity keys and manual pantry edits
pub mod pantry;
