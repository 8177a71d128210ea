//! nftsync - nftables ruleset reconciliation
//!
//! Compares a live ruleset snapshot (`nft -j list ruleset`) with declared
//! hooks and chains and prints the `nft` commands that bring the live state
//! into line. Nothing is applied; the output is meant for a separate
//! execution step.
//!
//! # Architecture
//!
//! - [`core`] - Entity model, indexing, hook reconciliation and chain pruning
//! - [`config`] - Configuration persistence
//! - [`audit`] - Opt-in audit log of reconciliation runs
//! - [`utils`] - Utility functions (XDG directories)

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]

pub mod audit;
pub mod config;
pub mod core;
pub mod utils;

// Re-export commonly used types
pub use crate::core::command::{Command, Plan};
pub use crate::core::error::{Error, Result};
pub use crate::core::model::{Chain, ChainIdentity, Expr, Hook, Rule, State};
pub use crate::core::operation::{Invocation, Operation, Verb};
