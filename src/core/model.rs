//! Entity model for nftables snapshots and declared inputs
//!
//! This module defines the typed records the reconciler works on:
//!
//! - [`ChainIdentity`] - `(family, table, name)` value key for a chain
//! - [`Chain`] / [`Rule`] - live entities read from a snapshot (carry handles)
//! - [`Hook`] - declared "chain X must jump to Y" requirement (no handle)
//! - [`Expr`] - one term of a rule's expression list
//! - [`State`] - the chains and rules of one snapshot, partitioned once
//!
//! # Example
//!
//! ```
//! use nftsync::core::model::State;
//! use serde_json::json;
//!
//! let snapshot = json!({
//!     "nftables": [
//!         { "metainfo": { "json_schema_version": 1 } },
//!         { "chain": { "family": "ip", "table": "filter", "name": "fwd", "handle": 1 } },
//!         { "rule": { "family": "ip", "table": "filter", "chain": "fwd", "handle": 2,
//!                     "expr": [{ "counter": null }, { "jump": { "target": "drop_bad" } }] } }
//!     ]
//! });
//!
//! let state = State::from_value(&snapshot).unwrap();
//! assert_eq!(state.chains.len(), 1);
//! assert_eq!(state.rules[0].jump_target(), Some("drop_bad"));
//! ```

use crate::core::error::SnapshotError;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identity of a chain within a ruleset.
///
/// Equality, hashing and ordering are structural over all three fields, so the
/// same triple built from a chain record, a rule's owner fields or a chains
/// file entry always indexes the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainIdentity {
    pub family: String,
    pub table: String,
    /// Rule-shaped chains files spell this key `chain`
    #[serde(alias = "chain")]
    pub name: String,
}

impl ChainIdentity {
    pub fn new(
        family: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            family: family.into(),
            table: table.into(),
            name: name.into(),
        }
    }

    /// Returns the identity of `name` in the same family and table as `self`.
    ///
    /// nftables jump targets are bare chain names scoped to the jumping rule's
    /// own table, so this is how a relative target becomes absolute.
    pub fn sibling(&self, name: &str) -> Self {
        Self::new(self.family.as_str(), self.table.as_str(), name)
    }
}

impl fmt::Display for ChainIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.family, self.table, self.name)
    }
}

/// A single term of a rule's `expr` list.
///
/// Only the terms the reconciler inspects get their own variant. Everything
/// else is carried verbatim in [`Expr::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `{"counter": ...}` with any counter configuration
    Counter(Value),
    /// `{"jump": {"target": "<chain>"}}`
    Jump { target: String },
    Other(Value),
}

impl Expr {
    pub fn counter() -> Self {
        Expr::Counter(Value::Null)
    }

    pub fn jump(target: impl Into<String>) -> Self {
        Expr::Jump {
            target: target.into(),
        }
    }

    fn from_value(value: Value) -> Self {
        Self::classify(&value).unwrap_or(Expr::Other(value))
    }

    fn classify(value: &Value) -> Option<Self> {
        let map = value.as_object()?;

        if let Some(counter) = map.get("counter") {
            return Some(Expr::Counter(counter.clone()));
        }

        // Only the exact unconditional form is a jump; anything richer stays opaque
        if map.len() != 1 {
            return None;
        }
        let jump = map.get("jump")?.as_object()?;
        if jump.len() != 1 {
            return None;
        }
        let target = jump.get("target")?.as_str()?;
        Some(Expr::jump(target))
    }

    /// Chain named by a jump term, including opaque terms that still carry a
    /// `jump.target` string.
    pub fn jump_target(&self) -> Option<&str> {
        match self {
            Expr::Jump { target } => Some(target),
            Expr::Other(value) => value.get("jump")?.get("target")?.as_str(),
            Expr::Counter(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Expr::from_value)
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expr::Counter(config) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("counter", config)?;
                map.end()
            }
            Expr::Jump { target } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("jump", &serde_json::json!({ "target": target }))?;
                map.end()
            }
            Expr::Other(value) => value.serialize(serializer),
        }
    }
}

/// A live chain from a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub family: String,
    pub table: String,
    pub name: String,
    pub handle: u64,
}

impl Chain {
    pub fn identity(&self) -> ChainIdentity {
        ChainIdentity::new(self.family.as_str(), self.table.as_str(), self.name.as_str())
    }
}

/// A rule from a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub family: String,
    pub table: String,
    /// Name of the owning chain
    pub chain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<u64>,
    pub expr: Vec<Expr>,
}

impl Rule {
    /// Identity of the chain this rule lives in (not the chain it jumps to).
    pub fn owner(&self) -> ChainIdentity {
        ChainIdentity::new(self.family.as_str(), self.table.as_str(), self.chain.as_str())
    }

    /// Target of the first jump term anywhere in `expr`.
    pub fn jump_target(&self) -> Option<&str> {
        self.expr.iter().find_map(Expr::jump_target)
    }

    /// Absolute identity of the jump target, scoped to this rule's table.
    pub fn resolved_jump_target(&self) -> Option<ChainIdentity> {
        self.jump_target().map(|target| self.owner().sibling(target))
    }

    /// True when the rule is exactly `counter` followed by `jump <target>`.
    ///
    /// Rules with any extra condition never match, even if they jump to the
    /// same chain.
    pub fn is_trivial_jump_to(&self, target: &str) -> bool {
        match self.expr.as_slice() {
            [Expr::Counter(_), Expr::Jump { target: jump }] => jump == target,
            _ => false,
        }
    }
}

/// A declared hook: `chain` must contain an unconditional jump to `hook`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hook {
    pub family: String,
    pub table: String,
    pub chain: String,
    pub hook: String,
}

impl Hook {
    pub fn chain_identity(&self) -> ChainIdentity {
        ChainIdentity::new(self.family.as_str(), self.table.as_str(), self.chain.as_str())
    }
}

/// Chains and rules extracted from one snapshot document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub chains: Vec<Chain>,
    pub rules: Vec<Rule>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partitions the `nftables` array of a snapshot into chains and rules.
    ///
    /// Entries that are neither chains nor rules (`metainfo`, `table`, `set`,
    /// ...) are skipped. Snapshot order is preserved in both collections.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the `nftables` array is missing, or a chain or rule
    /// entry lacks one of its required fields.
    pub fn from_value(snapshot: &Value) -> Result<Self, SnapshotError> {
        let entries = snapshot
            .get("nftables")
            .and_then(Value::as_array)
            .ok_or(SnapshotError::MissingNftables)?;

        let mut state = State::new();

        for (index, entry) in entries.iter().enumerate() {
            if let Some(chain) = entry.get("chain") {
                let chain = Chain::deserialize(chain).map_err(|source| {
                    SnapshotError::InvalidEntry {
                        index,
                        kind: "chain",
                        source,
                    }
                })?;
                state.chains.push(chain);
            }

            if let Some(rule) = entry.get("rule") {
                let rule = Rule::deserialize(rule).map_err(|source| {
                    SnapshotError::InvalidEntry {
                        index,
                        kind: "rule",
                        source,
                    }
                })?;
                state.rules.push(rule);
            }
        }

        Ok(state)
    }
}
