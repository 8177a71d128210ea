//! Verb selection and dispatch
//!
//! An [`Invocation`] is what the command line supplies: one verb plus the
//! input paths. It is checked for usage errors before anything is read, then
//! loaded into an [`Operation`] that runs the matching reconciler.

use crate::core::command::Plan;
use crate::core::documents::{self, Snapshot};
use crate::core::error::{Error, Result};
use crate::core::hooks;
use crate::core::model::{ChainIdentity, Hook, State};
use crate::core::prune;
use std::path::PathBuf;
use tracing::{info, warn};

/// The three supported reconciliations
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Verb {
    /// Add missing `counter jump` hook rules
    EnsureHooks,
    /// Delete chains and every rule jumping to them
    RemoveChains,
    /// Like remove-chains, but keep chains also listed in --old-chains
    RemoveStaleChains,
}

/// Input slots a verb can consume
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
enum Input {
    #[strum(serialize = "--state")]
    State,
    #[strum(serialize = "--hooks")]
    Hooks,
    #[strum(serialize = "--chains")]
    Chains,
    #[strum(serialize = "--old-chains")]
    OldChains,
}

impl Verb {
    const fn required_inputs(self) -> &'static [Input] {
        match self {
            Verb::EnsureHooks => &[Input::State, Input::Hooks],
            Verb::RemoveChains => &[Input::State, Input::Chains],
            Verb::RemoveStaleChains => &[Input::State, Input::Chains, Input::OldChains],
        }
    }
}

/// Verb plus the input paths supplied on the command line
#[derive(Debug, Clone)]
pub struct Invocation {
    pub verb: Verb,
    pub state: Option<PathBuf>,
    pub hooks: Option<PathBuf>,
    pub chains: Option<PathBuf>,
    pub old_chains: Option<PathBuf>,
}

impl Invocation {
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            state: None,
            hooks: None,
            chains: None,
            old_chains: None,
        }
    }

    fn input(&self, input: Input) -> Option<&PathBuf> {
        match input {
            Input::State => self.state.as_ref(),
            Input::Hooks => self.hooks.as_ref(),
            Input::Chains => self.chains.as_ref(),
            Input::OldChains => self.old_chains.as_ref(),
        }
    }

    fn require(&self, input: Input) -> Result<&PathBuf> {
        self.input(input).ok_or_else(|| {
            Error::Usage(format!("{} requires {input}", self.verb))
        })
    }

    /// Checks that every input the verb needs was supplied.
    ///
    /// Inputs the verb does not use are ignored with a warning.
    ///
    /// # Errors
    ///
    /// Returns `Error::Usage` naming the first missing input.
    pub fn validate(&self) -> Result<()> {
        let required = self.verb.required_inputs();
        for input in required {
            self.require(*input)?;
        }

        for input in [Input::State, Input::Hooks, Input::Chains, Input::OldChains] {
            if !required.contains(&input) && self.input(input).is_some() {
                warn!("{input} is not used by {}, ignoring", self.verb);
            }
        }
        Ok(())
    }

    /// Validates, then reads every document the verb needs.
    ///
    /// Nothing is loaded unless validation passes, and no reconciliation
    /// happens here.
    ///
    /// # Errors
    ///
    /// Returns `Err` on usage errors, unreadable files, or malformed documents.
    pub fn load(&self) -> Result<(Snapshot, Operation)> {
        self.validate()?;

        let snapshot = documents::load_snapshot(self.require(Input::State)?)?;

        let operation = match self.verb {
            Verb::EnsureHooks => Operation::EnsureHooks {
                hooks: documents::load_hooks(self.require(Input::Hooks)?)?,
            },
            Verb::RemoveChains => Operation::RemoveChains {
                chains: documents::load_chains(self.require(Input::Chains)?)?,
            },
            Verb::RemoveStaleChains => Operation::RemoveStaleChains {
                chains: documents::load_chains(self.require(Input::Chains)?)?,
                old_chains: documents::load_chains(self.require(Input::OldChains)?)?,
            },
        };

        Ok((snapshot, operation))
    }
}

/// A fully loaded reconciliation request
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    EnsureHooks {
        hooks: Vec<Hook>,
    },
    RemoveChains {
        chains: Vec<ChainIdentity>,
    },
    RemoveStaleChains {
        chains: Vec<ChainIdentity>,
        old_chains: Vec<ChainIdentity>,
    },
}

impl Operation {
    pub const fn verb(&self) -> Verb {
        match self {
            Operation::EnsureHooks { .. } => Verb::EnsureHooks,
            Operation::RemoveChains { .. } => Verb::RemoveChains,
            Operation::RemoveStaleChains { .. } => Verb::RemoveStaleChains,
        }
    }

    /// Runs the reconciler for this operation against `state`.
    pub fn plan(&self, state: &State) -> Plan {
        let commands = match self {
            Operation::EnsureHooks { hooks: declared } => hooks::reconcile(state, declared),
            Operation::RemoveChains { chains } => prune::prune(state, chains),
            Operation::RemoveStaleChains { chains, old_chains } => {
                prune::prune_stale(state, chains, old_chains)
            }
        };
        let plan = Plan::new(commands);
        info!(
            "{}: {} command(s) ({} add, {} delete)",
            self.verb(),
            plan.len(),
            plan.additions(),
            plan.deletions()
        );
        plan
    }
}
