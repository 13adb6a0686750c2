//! Command-palette search over CRM records.
//!
//! A [`palette::CommandPalette`] debounces keystrokes into lookups against a
//! [`gateway::RecordSource`], flattens the per-category results into one
//! navigable list and remembers confirmed selections in a
//! [`recency::RecencyStore`].

pub mod config;
pub mod dispatch;
pub mod flatten;
pub mod gateway;
pub mod navigation;
pub mod palette;
pub mod recency;

mod error;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};

pub use rolodex_types::*;
