//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Administrator console commands
pub mod admin;

/// Cart commands
pub mod cart;

/// Catalog browsing and balance commands
pub mod catalog;

/// General utility commands
pub mod general;

/// Redemption, history and receipt commands
pub mod redeem;

/// Wishlist commands
pub mod wishlist;

use crate::{bot::BotData, errors::Error};

// Export commands
pub use admin::*;
pub use cart::*;
pub use catalog::*;
pub use general::*;
pub use redeem::*;
pub use wishlist::*;

/// Every command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        ping(),
        help(),
        faq(),
        vouchers(),
        voucher(),
        balance(),
        redeem(),
        history(),
        receipt(),
        cart(),
        wishlist(),
        admin(),
    ]
}
