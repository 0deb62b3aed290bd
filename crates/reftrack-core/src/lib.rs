//! Referrer classification for the reftrack web analytics collector.
//!
//! A [`SourceTable`] (medium → source → domains/parameters) is compiled once
//! into a [`ReferrerIndex`]; each page view's referrer is then classified
//! against it, yielding the source, medium and (for search engines) the
//! search term.

pub mod config;
pub mod logging;

pub mod attribution;
pub mod beacon;
pub mod classify;
pub mod error;
pub mod index;
pub mod sources;
pub mod term;

pub use attribution::{Attribution, Attributor, Campaign};
pub use classify::{parse, Classification};
pub use error::ConfigError;
pub use index::{build_index, DuplicatePolicy, ReferrerIndex, SourceDescriptor};
pub use sources::{SourceEntry, SourceTable};
