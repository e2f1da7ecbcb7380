//! Catalog configuration
//!
//! The built-in catalog can be replaced by a TOML file of `[[frame]]`
//! tables. Each table becomes one frame; its keys become the frame's
//! fields in file order.

pub mod loader;
pub mod toml;

pub use loader::load_catalog;
pub use self::toml::ConfigError;
