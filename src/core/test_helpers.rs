//! Shared test utilities for core module tests
//!
//! Provides common builders to avoid duplication across test suites.
//! This module is only compiled in test mode.

use crate::core::model::{Chain, ChainIdentity, Expr, Hook, Rule, State};
use serde_json::{Value, json};

pub fn id(family: &str, table: &str, name: &str) -> ChainIdentity {
    ChainIdentity::new(family, table, name)
}

pub fn chain(family: &str, table: &str, name: &str, handle: u64) -> Chain {
    Chain {
        family: family.to_string(),
        table: table.to_string(),
        name: name.to_string(),
        handle,
    }
}

pub fn rule_with_expr(family: &str, table: &str, owner: &str, handle: u64, expr: Vec<Expr>) -> Rule {
    Rule {
        family: family.to_string(),
        table: table.to_string(),
        chain: owner.to_string(),
        handle: Some(handle),
        expr,
    }
}

/// Rule of the shape a satisfied hook looks for: `counter jump <target>`.
pub fn counter_jump_rule(family: &str, table: &str, owner: &str, target: &str, handle: u64) -> Rule {
    rule_with_expr(
        family,
        table,
        owner,
        handle,
        vec![Expr::counter(), Expr::jump(target)],
    )
}

pub fn hook(family: &str, table: &str, chain: &str, target: &str) -> Hook {
    Hook {
        family: family.to_string(),
        table: table.to_string(),
        chain: chain.to_string(),
        hook: target.to_string(),
    }
}

pub fn state(chains: Vec<Chain>, rules: Vec<Rule>) -> State {
    State { chains, rules }
}

/// Renders a state as an `nft -j list ruleset` document.
pub fn snapshot_json(state: &State) -> Value {
    let mut entries = vec![json!({ "metainfo": { "json_schema_version": 1 } })];
    entries.extend(state.chains.iter().map(|c| json!({ "chain": c })));
    entries.extend(state.rules.iter().map(|r| json!({ "rule": r })));
    json!({ "nftables": entries })
}
