/// Database connection and table creation
pub mod database;

/// Required connection settings read from the environment
pub mod settings;

/// Store configuration (catalog seed, redemption policy, admins, FAQ) from config.toml
pub mod store;
