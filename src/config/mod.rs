//! Settings persistence
//!
//! - **document**: line-oriented `[Section]` / `key=value` text format
//! - **store**: typed, clamped reads and single-key or batched writes
//! - **schema**: the registry declaring every setting
//! - **live**: authoritative in-memory values
//! - **writer**: canonical full-document generation

pub mod document;
pub mod error;
pub mod live;
pub mod schema;
pub mod store;
pub mod value;
pub mod writer;

// Re-export commonly used types
pub use document::SettingsDocument;
pub use error::ConfigError;
pub use live::LiveState;
pub use schema::{
    CommitStrategy, DesktopBounds, Environment, Feature, Section, SettingId, SettingSpec, SideEffect,
};
pub use store::ConfigStore;
pub use value::{Bounds, SettingValue, ValueKind};
