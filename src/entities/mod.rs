//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod pantry_item;
pub mod receipt;

// Re-export specific types to avoid conflicts
pub use pantry_item::{
    Column as PantryItemColumn, Entity as PantryItem, Model as PantryItemModel, PriceHistory,
};
pub use receipt::{Column as ReceiptColumn, Entity as Receipt, Model as ReceiptModel};
