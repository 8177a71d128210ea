//! Loading of input documents
//!
//! Three JSON documents feed a reconciliation:
//!
//! - the ruleset snapshot (`nft -j list ruleset` output), see [`Snapshot`]
//! - a hooks file: `[{"family", "table", "chain", "hook"}, ...]`
//! - a chains file: `[{"family", "table", "name"}, ...]`
//!
//! Everything is read fully into memory and validated before any
//! reconciliation starts.

use crate::core::error::{Error, Result, SnapshotError};
use crate::core::model::{ChainIdentity, Hook, State};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::debug;

/// A parsed snapshot together with the raw document it came from
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub raw: Value,
    pub state: State,
}

impl Snapshot {
    /// Builds a snapshot from an already parsed document.
    pub fn from_value(raw: Value) -> std::result::Result<Self, SnapshotError> {
        let state = State::from_value(&raw)?;
        Ok(Self { raw, state })
    }

    /// SHA-256 of the canonical JSON encoding of the raw document.
    pub fn checksum(&self) -> String {
        compute_checksum(&self.raw)
    }
}

/// Computes SHA-256 checksum of a JSON value.
///
/// The checksum is computed on the canonical JSON string representation.
pub fn compute_checksum(value: &Value) -> String {
    let json_str = serde_json::to_string(value).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(json_str.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a ruleset snapshot.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read, is not JSON, lacks the
/// `nftables` array, or has a chain/rule entry missing a required field.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw: Value = read_json(path)?;
    let snapshot = Snapshot::from_value(raw).map_err(|source| Error::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "Loaded snapshot {}: {} chain(s), {} rule(s)",
        path.display(),
        snapshot.state.chains.len(),
        snapshot.state.rules.len()
    );
    Ok(snapshot)
}

/// Loads a hooks file.
pub fn load_hooks(path: &Path) -> Result<Vec<Hook>> {
    let hooks: Vec<Hook> = read_json(path)?;
    debug!("Loaded {} hook(s) from {}", hooks.len(), path.display());
    Ok(hooks)
}

/// Loads a chains file.
pub fn load_chains(path: &Path) -> Result<Vec<ChainIdentity>> {
    let chains: Vec<ChainIdentity> = read_json(path)?;
    debug!("Loaded {} chain name(s) from {}", chains.len(), path.display());
    Ok(chains)
}
