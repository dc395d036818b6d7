//! Database Models
//!
//! Every entity carries an internal record id plus a public string
//! identifier (`food_id`, `order_id`, ...) which is what the API exposes
//! and what cross-entity references use.

pub mod serde_helpers;

pub mod food;
pub mod invoice;
pub mod menu;
pub mod order;
pub mod order_item;
pub mod table;
pub mod user;

// Re-exports
pub use food::{Food, FoodCreate, FoodUpdate};
pub use invoice::{Invoice, InvoiceCreate, InvoiceUpdate, PaymentMethod, PaymentStatus};
pub use menu::{Menu, MenuCreate, MenuUpdate};
pub use order::{Order, OrderCreate, OrderUpdate};
pub use order_item::{OrderItem, OrderItemCreate, OrderItemPack, OrderItemUpdate};
pub use table::{DiningTable, DiningTableCreate, DiningTableUpdate};
pub use user::{User, UserCreate, UserView};

/// Generate a new public entity identifier
pub fn new_public_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
