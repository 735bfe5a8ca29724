//! Core business logic - framework-agnostic storefront operations.
//!
//! Every workflow takes a database connection and, where the caller's identity
//! matters, a [`session::Session`]. Nothing here knows about Discord.

/// Admin-only operations: point adjustments, catalog management, audit queries
pub mod admin;
/// Cart workflow
pub mod cart;
/// Voucher categories
pub mod category;
/// Scripted FAQ decision tree
pub mod faq;
/// User profiles and balances
pub mod profile;
/// Plain-text redemption receipts
pub mod receipt;
/// Voucher redemption and cart checkout
pub mod redemption;
/// Session and authorization checks
pub mod session;
/// Voucher catalog
pub mod voucher;
/// Wishlist workflow
pub mod wishlist;
