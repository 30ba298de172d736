//! # Strategist Templates
//!
//! Static game-design data and display text, loaded by logical name and
//! memoized for the life of the process.
//!
//! - [`DataSource`]: where raw text comes from ([`FsSource`] on disk,
//!   [`MemorySource`] in memory)
//! - [`TemplateStore`]: single-flight cache of parsed JSON5 sets and
//!   `key=value` localization files
//! - [`TemplateCatalog`]: typed records keyed by `dataName`

mod catalog;
mod error;
mod localization;
mod source;
mod store;
pub mod types;

pub use catalog::{
    TemplateCatalog, COUNCILOR_TYPE_TEMPLATE, HAB_MODULE_TEMPLATE, MISSION_TEMPLATE,
    ORG_TEMPLATE, PROJECT_TEMPLATE, TECH_TEMPLATE, TRAIT_TEMPLATE,
};
pub use error::{Result, TemplateError};
pub use localization::Localization;
pub use source::{
    DataKind, DataSource, FsSource, MemorySource, DATA_DIR_VAR, DEFAULT_LANGUAGE, LANGUAGE_VAR,
};
pub use store::TemplateStore;
