//! Chain removal
//!
//! Removing a chain takes two phases: first every rule that jumps to it is
//! deleted, then the chain itself. The kernel refuses to delete a chain that
//! is still referenced, so all rule deletions precede all chain deletions.
//!
//! Rules are selected by where they jump, not by which chain owns them. A
//! jump target is a bare chain name resolved against the jumping rule's own
//! family and table.

use crate::core::command::Command;
use crate::core::index::StateIndex;
use crate::core::model::{Chain, ChainIdentity, State};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Identities in `base` that are not in `exclude`, keeping `base` order.
pub fn difference(base: &[ChainIdentity], exclude: &[ChainIdentity]) -> Vec<ChainIdentity> {
    let exclude: HashSet<&ChainIdentity> = exclude.iter().collect();
    base.iter()
        .filter(|id| !exclude.contains(id))
        .cloned()
        .collect()
}

/// Computes the commands that remove every live chain in `targets`.
///
/// Requested chains missing from the snapshot are skipped. Duplicate requests
/// are kept, so a chain listed twice is deleted twice.
pub fn prune(state: &State, targets: &[ChainIdentity]) -> Vec<Command> {
    let index = StateIndex::build(state);

    let (target_chains, target_names): (Vec<&Chain>, Vec<&ChainIdentity>) = targets
        .iter()
        .filter_map(|id| match index.chain(id) {
            Some(chain) => Some((chain, id)),
            None => {
                debug!("Chain {id} not in snapshot, skipping");
                None
            }
        })
        .unzip();

    let target_names: HashSet<&ChainIdentity> = target_names.into_iter().collect();

    let mut commands = Vec::new();

    for rule in &state.rules {
        let Some(target) = rule.resolved_jump_target() else {
            continue;
        };
        if !target_names.contains(&target) {
            continue;
        }
        match rule.handle {
            Some(handle) => commands.push(Command::DeleteRule {
                family: rule.family.clone(),
                table: rule.table.clone(),
                chain: rule.chain.clone(),
                handle,
            }),
            None => warn!(
                "Rule in {} jumps to {target} but has no handle, cannot delete it",
                rule.owner()
            ),
        }
    }

    let rule_deletions = commands.len();

    commands.extend(target_chains.into_iter().map(|chain| Command::DeleteChain {
        family: chain.family.clone(),
        table: chain.table.clone(),
        handle: chain.handle,
    }));

    info!(
        "Removing {} chain(s) and {} referencing rule(s)",
        commands.len() - rule_deletions,
        rule_deletions
    );

    commands
}

/// Removes the chains in `targets` that are not also listed in `old`.
pub fn prune_stale(state: &State, targets: &[ChainIdentity], old: &[ChainIdentity]) -> Vec<Command> {
    let remaining = difference(targets, old);
    debug!(
        "{} of {} chain(s) remain after excluding {} old chain(s)",
        remaining.len(),
        targets.len(),
        old.len()
    );
    prune(state, &remaining)
}
