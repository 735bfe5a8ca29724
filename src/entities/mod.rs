//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cart_item;
pub mod category;
pub mod points_audit;
pub mod profile;
pub mod redemption;
pub mod voucher;
pub mod wishlist_item;

// Re-export specific types to avoid conflicts
pub use cart_item::{Column as CartItemColumn, Entity as CartItem, Model as CartItemModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use points_audit::{
    Column as PointsAuditColumn, Entity as PointsAudit, Model as PointsAuditModel,
};
pub use profile::{Column as ProfileColumn, Entity as Profile, Model as ProfileModel};
pub use redemption::{
    Column as RedemptionColumn, Entity as Redemption, Model as RedemptionModel,
};
pub use voucher::{Column as VoucherColumn, Entity as Voucher, Model as VoucherModel};
pub use wishlist_item::{
    Column as WishlistItemColumn, Entity as WishlistItem, Model as WishlistItemModel,
};
