use crate::SetId;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One string in a chain, tagged with the set instance it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    pub value: String,
    pub set_id: SetId,
}

/// Ordered sequence of strings where each string starts with the character
/// the previous one ends with.
///
/// Serializes as the plain list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    links: Vec<ChainLink>,
}

impl Chain {
    pub fn new(links: Vec<ChainLink>) -> Self {
        Self { links }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn values(&self) -> Vec<&str> {
        self.links.iter().map(|l| l.value.as_str()).collect()
    }

    pub fn into_values(self) -> Vec<String> {
        self.links.into_iter().map(|l| l.value).collect()
    }

    /// Index of the first link drawn from the second set, if the chain switched.
    pub fn switch_index(&self) -> Option<usize> {
        let first = self.links.first()?.set_id;
        self.links.iter().position(|l| l.set_id != first)
    }

    /// Distinct set ids in order of first appearance (at most two).
    pub fn set_ids(&self) -> Vec<SetId> {
        let mut ids: Vec<SetId> = Vec::with_capacity(2);
        for link in &self.links {
            if ids.last() != Some(&link.set_id) {
                ids.push(link.set_id);
            }
        }
        ids
    }
}

impl Serialize for Chain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.links.len()))?;
        for link in &self.links {
            seq.serialize_element(&link.value)?;
        }
        seq.end()
    }
}

/// Result of a solve, including whether the search ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub chain: Chain,
    /// False when the expansion budget ran out or the solve was cancelled;
    /// `chain` is then the best found so far, not necessarily the longest.
    pub complete: bool,
    /// Number of search nodes entered.
    pub expansions: u64,
}

/// Solver configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Stop entering new search nodes after this many.
    #[serde(default)]
    pub max_expansions: Option<u64>,
    /// Let a value appear once per set instance instead of once per chain.
    #[serde(default)]
    pub allow_cross_set_repeats: bool,
}

impl SolverConfig {
    pub fn bounded(max_expansions: u64) -> Self {
        Self {
            max_expansions: Some(max_expansions),
            ..Self::default()
        }
    }
}

/// Shared flag for cancelling a running solve from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
