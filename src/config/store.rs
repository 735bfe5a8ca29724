//! Store configuration loading from config.toml
//!
//! The file seeds the voucher catalog on start-up, sets the redemption policy,
//! lists bootstrap administrators and carries the FAQ content. Every section
//! is optional; an absent file yields the defaults.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct StoreConfig {
    /// Redemption rules
    #[serde(default)]
    pub redemption: RedemptionPolicy,
    /// Admin bootstrap settings
    #[serde(default)]
    pub admin: AdminConfig,
    /// Categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Vouchers to seed
    #[serde(default)]
    pub vouchers: Vec<VoucherConfig>,
    /// FAQ decision-tree nodes
    #[serde(default)]
    pub faq: Vec<FaqNodeConfig>,
}

/// Rules applied by the redemption workflow.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RedemptionPolicy {
    /// Refuse and decrement against voucher stock when true
    pub enforce_stock: bool,
    /// Largest quantity accepted by a single redemption
    pub max_quantity: i32,
}

impl Default for RedemptionPolicy {
    fn default() -> Self {
        Self {
            enforce_stock: false,
            max_quantity: 10,
        }
    }
}

/// Users promoted to administrator when their profile is first created.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    /// Auth provider user IDs
    #[serde(default)]
    pub user_ids: Vec<String>,
}

impl AdminConfig {
    /// Whether `user_id` is a bootstrap administrator.
    #[must_use]
    pub fn is_bootstrap_admin(&self, user_id: &str) -> bool {
        self.user_ids.iter().any(|id| id == user_id)
    }
}

/// Configuration for a single seeded category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Category name
    pub name: String,
}

/// Configuration for a single seeded voucher
#[derive(Debug, Deserialize, Clone)]
pub struct VoucherConfig {
    /// Unique voucher title
    pub title: String,
    /// Description shown in the catalog
    #[serde(default)]
    pub description: String,
    /// Cost per unit in points
    pub points: i64,
    /// Name of a seeded or existing category
    #[serde(default)]
    pub category: Option<String>,
    /// Inventory shown to users
    #[serde(default)]
    pub stock: i64,
    /// Seed as hidden
    #[serde(default)]
    pub is_hidden: bool,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
}

/// One FAQ entry and the entries offered after it
#[derive(Debug, Deserialize, Clone)]
pub struct FaqNodeConfig {
    /// Stable identifier used for navigation
    pub id: String,
    /// Question as shown to users
    pub question: String,
    /// Answer text
    pub answer: String,
    /// Identifiers of follow-up entries
    #[serde(default)]
    pub follow_ups: Vec<String>,
}

/// Loads store configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid
/// or required fields are missing.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StoreConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Loads the configuration at `path`, falling back to defaults when the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be parsed.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<StoreConfig> {
    if path.as_ref().exists() {
        load_config(path)
    } else {
        tracing::warn!(
            "No store configuration at {:?}; using defaults",
            path.as_ref()
        );
        Ok(StoreConfig::default())
    }
}

fn parse_config(contents: &str) -> Result<StoreConfig> {
    let config: StoreConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.redemption.max_quantity < 1 {
        return Err(Error::Config {
            message: "redemption.max_quantity must be at least 1".to_string(),
        });
    }

    Ok(config)
}
