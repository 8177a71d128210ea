//! Mutation commands emitted by the reconciler
//!
//! A [`Command`] renders either as one line of `nft` syntax (its `Display`
//! impl) or as one object of an nftables JSON batch. A [`Plan`] is the ordered
//! list produced by one invocation.

use crate::core::model::{Expr, Hook};
use serde_json::{Value, json};
use std::fmt;

/// One mutation of the live ruleset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append `counter jump <target>` to the end of a chain
    AddJumpRule {
        family: String,
        table: String,
        chain: String,
        target: String,
    },
    DeleteRule {
        family: String,
        table: String,
        chain: String,
        handle: u64,
    },
    DeleteChain {
        family: String,
        table: String,
        handle: u64,
    },
}

impl Command {
    pub fn add_hook(hook: &Hook) -> Self {
        Command::AddJumpRule {
            family: hook.family.clone(),
            table: hook.table.clone(),
            chain: hook.chain.clone(),
            target: hook.hook.clone(),
        }
    }

    pub const fn is_deletion(&self) -> bool {
        matches!(
            self,
            Command::DeleteRule { .. } | Command::DeleteChain { .. }
        )
    }

    /// Renders the command as one entry of an `nft -j` batch.
    pub fn to_nftables_json(&self) -> Value {
        match self {
            Command::AddJumpRule {
                family,
                table,
                chain,
                target,
            } => json!({
                "add": {
                    "rule": {
                        "family": family,
                        "table": table,
                        "chain": chain,
                        "expr": [Expr::counter(), Expr::jump(target.as_str())],
                    }
                }
            }),
            Command::DeleteRule {
                family,
                table,
                chain,
                handle,
            } => json!({
                "delete": {
                    "rule": { "family": family, "table": table, "chain": chain, "handle": handle }
                }
            }),
            Command::DeleteChain {
                family,
                table,
                handle,
            } => json!({
                "delete": {
                    "chain": { "family": family, "table": table, "handle": handle }
                }
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::AddJumpRule {
                family,
                table,
                chain,
                target,
            } => write!(f, "add rule {family} {table} {chain} counter jump {target}"),
            Command::DeleteRule {
                family,
                table,
                chain,
                handle,
            } => write!(f, "delete rule {family} {table} {chain} handle {handle}"),
            Command::DeleteChain {
                family,
                table,
                handle,
            } => write!(f, "delete chain {family} {table} handle {handle}"),
        }
    }
}

/// Ordered command list produced by one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub commands: Vec<Command>,
}

impl Plan {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn additions(&self) -> usize {
        self.commands.iter().filter(|c| !c.is_deletion()).count()
    }

    pub fn deletions(&self) -> usize {
        self.commands.iter().filter(|c| c.is_deletion()).count()
    }

    /// One command per line, each terminated by a newline.
    pub fn to_nft_text(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            out.push_str(&command.to_string());
            out.push('\n');
        }
        out
    }

    pub fn to_nftables_json(&self) -> Value {
        let batch: Vec<Value> = self
            .commands
            .iter()
            .map(Command::to_nftables_json)
            .collect();
        json!({ "nftables": batch })
    }
}
