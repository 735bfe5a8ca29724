//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete,
//! plus the glue that turns a Discord author into a storefront session.

/// Autocomplete handlers for voucher titles and category names
pub mod autocomplete;
/// Session resolution and name lookups shared by commands
pub mod session;
