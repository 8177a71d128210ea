//! Lookup structures built from a [`State`]
//!
//! Both maps are keyed by [`ChainIdentity`]. Identities that do not occur in
//! the snapshot have no entry at all; callers treat a missing entry the same
//! as "no matching rule".

use crate::core::model::{Chain, ChainIdentity, Rule, State};
use std::collections::HashMap;
use tracing::debug;

/// Borrowed index over one snapshot
#[derive(Debug, Default)]
pub struct StateIndex<'a> {
    rules_by_chain: HashMap<ChainIdentity, Vec<&'a Rule>>,
    chains: HashMap<ChainIdentity, &'a Chain>,
}

impl<'a> StateIndex<'a> {
    pub fn build(state: &'a State) -> Self {
        let mut rules_by_chain: HashMap<ChainIdentity, Vec<&'a Rule>> = HashMap::new();
        for rule in &state.rules {
            rules_by_chain.entry(rule.owner()).or_default().push(rule);
        }

        // Later duplicates of the same identity win
        let chains = state
            .chains
            .iter()
            .map(|chain| (chain.identity(), chain))
            .collect::<HashMap<_, _>>();

        debug!(
            "Indexed {} chain(s) and {} rule(s) across {} owning chain(s)",
            chains.len(),
            state.rules.len(),
            rules_by_chain.len()
        );

        Self {
            rules_by_chain,
            chains,
        }
    }

    /// Rules owned by `chain`, in snapshot order.
    pub fn rules_in(&self, chain: &ChainIdentity) -> Option<&[&'a Rule]> {
        self.rules_by_chain.get(chain).map(Vec::as_slice)
    }

    pub fn chain(&self, identity: &ChainIdentity) -> Option<&'a Chain> {
        self.chains.get(identity).copied()
    }

    pub fn contains_chain(&self, identity: &ChainIdentity) -> bool {
        self.chains.contains_key(identity)
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }
}
