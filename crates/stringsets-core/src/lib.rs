//! String set engine
//!
//! A keyed store of ordered string sets with aggregate queries, and a solver
//! for the longest character-linked chain across at most two sets.

pub mod chain;
mod error;
mod set;
mod store;

pub use chain::{solve, CancelToken, Chain, ChainLink, SolveOutcome, Solver, SolverConfig};
pub use error::{StoreError, StoreResult};
pub use set::{ContentKey, SetError, SetId, SetStatistics, StringSet};
pub use store::{InMemoryStore, SetStore};
