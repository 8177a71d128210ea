//! Core reconciliation functionality
//!
//! This module contains the types and logic that turn a ruleset snapshot plus
//! declared inputs into an ordered list of nftables commands:
//!
//! - [`model`]: Chain identities, rules, chains, hooks and the snapshot state
//! - [`index`]: Lookup maps over a snapshot
//! - [`hooks`]: Adds missing hook jump rules
//! - [`prune`]: Removes chains after the rules that jump to them
//! - [`command`]: Emitted commands and their text/JSON rendering
//! - [`documents`]: Loading of snapshot, hooks and chains files
//! - [`operation`]: Verb validation and dispatch
//! - [`error`]: Error types for loading and rendering

pub mod command;
pub mod documents;
pub mod error;
pub mod hooks;
pub mod index;
pub mod model;
pub mod operation;
pub mod prune;

#[cfg(test)]
pub mod test_helpers;

#[cfg(test)]
mod tests;
