//! Configuration module for triplestack
//!
//! Provides types and loading for the optional `triplestack.toml` file.

pub mod loader;
pub mod schema;

pub use loader::{
    find_config, find_config_from, load_config, merge_cli_overrides, CliOverrides, ConfigError,
    CONFIG_FILE,
};
pub use schema::*;
