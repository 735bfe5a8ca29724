//! Unified error type for the storefront.
//!
//! Workflow failures (insufficient points, validation, missing rows) and
//! infrastructure faults (database, configuration, Discord) share one enum so
//! every layer can propagate with `?`. The bot layer turns an error into a
//! user-facing message with [`Error::user_message`].

use thiserror::Error;

/// All failures surfaced by core workflows and the bot layer.
#[derive(Debug, Error)]
pub enum Error {
    /// No active session for a user-scoped workflow.
    #[error("No active session")]
    Unauthenticated,

    /// Admin operation attempted without a session.
    #[error("Sign-in required for administrator operations")]
    Unauthorized,

    /// Caller is signed in but is not an administrator.
    #[error("Administrator access required")]
    Forbidden,

    #[error("No profile found for user {user_id}")]
    ProfileNotFound { user_id: String },

    #[error("Insufficient points: short by {shortfall}")]
    InsufficientPoints { shortfall: i64 },

    /// The balance store rejected the deduction; nothing was applied.
    #[error("Balance update failed: {reason}")]
    BalanceUpdateFailed { reason: String },

    /// The ledger insert failed after the deduction; the deduction was rolled back.
    #[error("Redemption record failed: {reason}")]
    RedemptionRecordFailed { reason: String },

    #[error("Invalid input: {message}")]
    Validation { message: String },

    #[error("Voucher not found: {id}")]
    VoucherNotFound { id: String },

    #[error("Voucher {id} is not available for redemption")]
    VoucherUnavailable { id: i64 },

    #[error("Voucher price changed from {quoted} to {current} points")]
    PriceChanged { quoted: i64, current: i64 },

    #[error("Voucher {id} is out of stock ({available} left)")]
    OutOfStock { id: i64, available: i64 },

    #[error("Category not found: {name}")]
    CategoryNotFound { name: String },

    #[error("Cart item not found: {id}")]
    CartItemNotFound { id: i64 },

    #[error("Cart is empty")]
    CartEmpty,

    #[error("Wishlist item not found: {id}")]
    WishlistItemNotFound { id: i64 },

    #[error("Redemption not found: {id}")]
    RedemptionNotFound { id: i64 },

    /// The receipt document could not be produced.
    #[error("Receipt rendering failed: {reason}")]
    ReceiptRender { reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Serenity/Poise framework error: {0}")]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

impl Error {
    /// Whether the error is an expected, actionable outcome rather than an
    /// infrastructure fault that operators should see in the logs.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::ProfileNotFound { .. }
                | Self::BalanceUpdateFailed { .. }
                | Self::RedemptionRecordFailed { .. }
                | Self::ReceiptRender { .. }
                | Self::Config { .. }
                | Self::Database(_)
                | Self::Io(_)
                | Self::EnvVar(_)
                | Self::FrameworkError(_)
        )
    }

    /// Message shown to the person who triggered the failure.
    ///
    /// Actionable failures get specific text; infrastructure faults collapse to
    /// a generic retry message so store details never reach users.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated | Self::Unauthorized => {
                "🔒 Please sign in first.".to_string()
            }
            Self::Forbidden => "⛔ This command is for administrators only.".to_string(),
            Self::InsufficientPoints { shortfall } => {
                format!("❌ Not enough points. You need **{shortfall}** more.")
            }
            Self::Validation { message } => format!("❌ {message}"),
            Self::VoucherNotFound { id } => format!("❌ Voucher '{id}' was not found."),
            Self::VoucherUnavailable { .. } => {
                "❌ That voucher is not available right now.".to_string()
            }
            Self::PriceChanged { quoted, current } => format!(
                "⚠️ The price changed from {quoted} to **{current}** points. Please confirm again."
            ),
            Self::OutOfStock { available, .. } => {
                format!("❌ Out of stock. Only {available} left.")
            }
            Self::CategoryNotFound { name } => format!("❌ Category '{name}' was not found."),
            Self::CartItemNotFound { id } => format!("❌ Cart item #{id} was not found."),
            Self::CartEmpty => "🛒 Your cart is empty.".to_string(),
            Self::WishlistItemNotFound { id } => {
                format!("❌ Wishlist item #{id} was not found.")
            }
            Self::RedemptionNotFound { id } => format!("❌ Redemption #{id} was not found."),
            Self::ProfileNotFound { .. }
            | Self::BalanceUpdateFailed { .. }
            | Self::RedemptionRecordFailed { .. }
            | Self::ReceiptRender { .. }
            | Self::Config { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::EnvVar(_)
            | Self::FrameworkError(_) => {
                "❌ Something went wrong. Please try again later.".to_string()
            }
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
