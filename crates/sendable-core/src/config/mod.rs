//! Configuration system for auto-sendable
//!
//! - TOML and JSON configuration files
//! - Auto-discovery by traversing up directories
//! - Strong typing with serde and JSON Schema generation via schemars
//!
//! ## Configuration Files
//!
//! Searched in every directory, in this order:
//! - `.autosendable.toml`
//! - `autosendable.toml`
//! - `.autosendable.json`
//!
//! ## Example Configuration
//!
//! ```toml
//! [files]
//! include = ["Sources/**"]
//! exclude = ["**/Generated/**"]
//!
//! [rewrite]
//! marker = "Sendable"
//! visibility = ["public", "open"]
//! protocols = false
//! passes = ["unchecked", "marker", "final"]
//! ```

mod loader;
mod sendable_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use sendable_config::{
    FilesConfiguration, PassKind, RewriteConfiguration, SendableConfiguration,
};
