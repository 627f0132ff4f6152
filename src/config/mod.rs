//! Site configuration subsystem (the settings store).
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors at once)
//!     → SiteConfig (validated, immutable snapshot)
//!     → SettingsStore (arc-swap handle, shared via Arc)
//!
//! On admin-triggered reload:
//!     new SiteConfig validated
//!     → atomic swap of the snapshot
//!     → in-flight requests keep the snapshot they started with
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable; changes swap the whole config
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::SiteConfig;
pub use store::SettingsStore;
