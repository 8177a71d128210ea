//! Hook reconciliation
//!
//! A hook is satisfied when its chain already holds a rule that is exactly
//! `counter` followed by `jump <hook>`. Every unsatisfied hook turns into an
//! "add rule" command, in declaration order.

use crate::core::command::Command;
use crate::core::index::StateIndex;
use crate::core::model::{Hook, State};
use tracing::{debug, info};

/// Returns true if `hook` is already present in the indexed state.
pub fn is_satisfied(index: &StateIndex<'_>, hook: &Hook) -> bool {
    index
        .rules_in(&hook.chain_identity())
        .is_some_and(|rules| rules.iter().any(|rule| rule.is_trivial_jump_to(&hook.hook)))
}

/// Computes the commands needed to install every missing hook.
///
/// Only the given state is consulted, so a hook declared twice and missing
/// yields two identical commands.
pub fn reconcile(state: &State, hooks: &[Hook]) -> Vec<Command> {
    let index = StateIndex::build(state);

    let commands: Vec<Command> = hooks
        .iter()
        .filter(|hook| {
            let satisfied = is_satisfied(&index, hook);
            debug!(
                "Hook {} -> {}: {}",
                hook.chain_identity(),
                hook.hook,
                if satisfied { "present" } else { "missing" }
            );
            !satisfied
        })
        .map(Command::add_hook)
        .collect();

    info!(
        "{} of {} hook(s) missing",
        commands.len(),
        hooks.len()
    );

    commands
}
