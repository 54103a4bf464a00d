//! Longest-chain solver.
//!
//! Finds the longest sequence of strings where each string starts with the
//! character the previous one ends with, drawing from one set with at most
//! one switch into a second set.
//!
//! Enumeration is deterministic: set pairs follow first-seen content order
//! over the snapshot (ascending id), start nodes follow ascending leading
//! character then set order, and a candidate only replaces the current best
//! when strictly longer. The first maximal chain found wins.

mod graph;
mod search;
mod types;

use crate::SetId;
use crate::StringSet;
use search::{Budget, PairSearch, Trail};
use tracing::{debug, info, warn};

pub use graph::{CatalogEntry, ChainGraph, ChainNode, GraphCatalog};
pub use types::{CancelToken, Chain, ChainLink, SolveOutcome, SolverConfig};

/// Longest chain over `sets` with the default configuration.
pub fn solve(sets: &[(SetId, StringSet)]) -> Chain {
    Solver::new().solve(sets)
}

/// Stateless between calls; every solve builds fresh graphs from the
/// snapshot it is given.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
    cancel: Option<CancelToken>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Attach a token another thread can use to stop the search early.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solve(&self, sets: &[(SetId, StringSet)]) -> Chain {
        self.solve_outcome(sets).chain
    }

    pub fn solve_outcome(&self, sets: &[(SetId, StringSet)]) -> SolveOutcome {
        if sets.is_empty() {
            return SolveOutcome {
                chain: Chain::default(),
                complete: true,
                expansions: 0,
            };
        }

        let catalog = GraphCatalog::build(sets);
        let mut budget = Budget::new(self.config.max_expansions, self.cancel.as_ref());
        let mut best = Chain::default();

        if sets.len() == 1 {
            let entry = &catalog.entries()[0];
            let id = entry.instances[0];
            let empty = ChainGraph::empty();
            let trail = self.search_pair(&entry.graph, &empty, &mut budget);
            best = to_chain(&trail, (&entry.graph, id), (&empty, id));
        } else {
            'outer: for (ai, a) in catalog.entries().iter().enumerate() {
                for (bi, b) in catalog.entries().iter().enumerate() {
                    if budget.is_exhausted() {
                        break 'outer;
                    }
                    // Pairing a content with itself only helps when two
                    // uploaded instances share it.
                    let second_id = if ai == bi {
                        match a.instances.get(1) {
                            Some(id) => *id,
                            None => continue,
                        }
                    } else {
                        b.instances[0]
                    };
                    let first_id = a.instances[0];

                    let trail = self.search_pair(&a.graph, &b.graph, &mut budget);
                    debug!(first = %first_id, second = %second_id, length = trail.len(), "searched pair");
                    if trail.len() > best.len() {
                        best = to_chain(&trail, (&a.graph, first_id), (&b.graph, second_id));
                    }
                }
            }
        }

        let complete = !budget.is_exhausted();
        if complete {
            info!(sets = sets.len(), graphs = catalog.len(), length = best.len(), expansions = budget.used(), "solved longest chain");
        } else {
            warn!(length = best.len(), expansions = budget.used(), "longest chain search stopped early");
        }

        SolveOutcome {
            chain: best,
            complete,
            expansions: budget.used(),
        }
    }

    fn search_pair(&self, first: &ChainGraph, second: &ChainGraph, budget: &mut Budget<'_>) -> Trail {
        PairSearch::new(first, second, budget, self.config.allow_cross_set_repeats).run()
    }
}

fn to_chain(trail: &Trail, first: (&ChainGraph, SetId), second: (&ChainGraph, SetId)) -> Chain {
    let (first_graph, first_id) = first;
    let (second_graph, second_id) = second;
    let links = trail
        .first
        .iter()
        .map(|&i| ChainLink {
            value: first_graph.node(i).value().to_string(),
            set_id: first_id,
        })
        .chain(trail.second.iter().map(|&i| ChainLink {
            value: second_graph.node(i).value().to_string(),
            set_id: second_id,
        }))
        .collect();
    Chain::new(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sets(groups: &[&[&str]]) -> Vec<(SetId, StringSet)> {
        groups
            .iter()
            .enumerate()
            .map(|(i, items)| {
                let set = StringSet::new(items.iter().map(|s| s.to_string()).collect()).unwrap();
                (SetId(i as u32 + 1), set)
            })
            .collect()
    }

    /// Checks every structural property a returned chain must satisfy.
    fn assert_valid(chain: &Chain, input: &[(SetId, StringSet)], repeats: bool) {
        let values = chain.values();

        for pair in values.windows(2) {
            let last = pair[0].chars().next_back().unwrap();
            let first = pair[1].chars().next().unwrap();
            assert_eq!(last, first, "{} does not link to {}", pair[0], pair[1]);
        }

        for link in chain.links() {
            let (_, set) = input.iter().find(|(id, _)| *id == link.set_id).unwrap();
            assert!(set.contains(&link.value), "{} not in set {}", link.value, link.set_id);
        }

        let ids = chain.set_ids();
        assert!(ids.len() <= 2, "chain uses sets {:?}", ids);

        let mut seen = HashSet::new();
        for link in chain.links() {
            let key = if repeats {
                format!("{}:{}", link.set_id, link.value)
            } else {
                link.value.clone()
            };
            assert!(seen.insert(key), "{} repeated", link.value);
        }
    }

    fn example_sets() -> Vec<(SetId, StringSet)> {
        sets(&[
            &["foo", "oomph", "hgf"],
            &["hij", "jkl", "jkm", "lmn"],
            &["abc", "cde", "cdf", "fuf", "fgh"],
        ])
    }

    #[test]
    fn test_empty_input() {
        let outcome = Solver::new().solve_outcome(&[]);
        assert!(outcome.chain.is_empty());
        assert!(outcome.complete);
        assert_eq!(outcome.expansions, 0);
    }

    #[test]
    fn test_single_set() {
        let input = sets(&[&["foo", "oomph", "hgf"]]);
        let chain = solve(&input);
        assert_eq!(chain.values(), vec!["foo", "oomph", "hgf"]);
        assert_eq!(chain.set_ids(), vec![SetId(1)]);
        assert_valid(&chain, &input, false);
    }

    #[test]
    fn test_single_set_of_one_string() {
        let input = sets(&[&["a"]]);
        assert_eq!(solve(&input).values(), vec!["a"]);
    }

    #[test]
    fn test_worked_example() {
        let input = example_sets();
        let chain = solve(&input);
        assert_eq!(
            chain.values(),
            vec!["abc", "cdf", "fuf", "fgh", "hij", "jkl", "lmn"]
        );
        assert_eq!(chain.set_ids(), vec![SetId(3), SetId(2)]);
        assert_eq!(chain.switch_index(), Some(4));
        assert_valid(&chain, &input, false);
    }

    #[test]
    fn test_idempotent() {
        let input = example_sets();
        let solver = Solver::new();
        assert_eq!(solver.solve(&input), solver.solve(&input));
    }

    #[test]
    fn test_non_duplicated_set_is_not_paired_with_itself() {
        let input = sets(&[&["a", "b", "c"], &["x"]]);
        let chain = Solver::with_config(SolverConfig {
            allow_cross_set_repeats: true,
            ..SolverConfig::default()
        })
        .solve(&input);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_duplicated_set_pairs_with_itself() {
        let input = sets(&[&["a", "b", "c"], &["a", "b", "c"]]);

        let chain = solve(&input);
        assert_eq!(chain.len(), 1);
        assert_valid(&chain, &input, false);

        let outcome = Solver::with_config(SolverConfig {
            allow_cross_set_repeats: true,
            ..SolverConfig::default()
        })
        .solve_outcome(&input);
        assert_eq!(outcome.chain.values(), vec!["a", "a"]);
        assert_eq!(outcome.chain.set_ids(), vec![SetId(1), SetId(2)]);
        assert_valid(&outcome.chain, &input, true);
    }

    #[test]
    fn test_duplicate_detection_ignores_order() {
        let input = sets(&[&["ab", "ba"], &["ba", "ab"]]);
        let chain = Solver::with_config(SolverConfig {
            allow_cross_set_repeats: true,
            ..SolverConfig::default()
        })
        .solve(&input);
        // ab, ba in set 1, then ab, ba again from set 2
        assert_eq!(chain.len(), 4);
        assert_valid(&chain, &input, true);
    }

    #[test]
    fn test_shared_values_not_repeated_across_switch() {
        let input = sets(&[&["ab", "bc"], &["bc", "cd"]]);
        let chain = solve(&input);
        assert_eq!(chain.values(), vec!["ab", "bc", "cd"]);
        assert_valid(&chain, &input, false);
    }

    #[test]
    fn test_no_switch_back() {
        // ab -> bc (set 2) -> cd would need to return to set 1.
        let input = sets(&[&["ab", "cd"], &["bc"]]);
        let chain = solve(&input);
        assert_eq!(chain.len(), 2);
        assert_valid(&chain, &input, false);
    }

    #[test]
    fn test_first_found_wins_ties() {
        let input = sets(&[&["ab"], &["cd"]]);
        let chain = solve(&input);
        assert_eq!(chain.values(), vec!["ab"]);
        assert_eq!(chain.set_ids(), vec![SetId(1)]);
    }

    #[test]
    fn test_expansion_budget() {
        let input = example_sets();
        let outcome = Solver::with_config(SolverConfig::bounded(3)).solve_outcome(&input);
        assert!(!outcome.complete);
        assert_eq!(outcome.expansions, 3);
        assert!(!outcome.chain.is_empty());
        assert_valid(&outcome.chain, &input, false);

        let full = Solver::new().solve_outcome(&input);
        assert!(full.complete);
        assert_eq!(full.chain.len(), 7);
    }

    #[test]
    fn test_cancelled_solve() {
        let token = CancelToken::new();
        token.cancel();
        let outcome = Solver::new()
            .with_cancel_token(token)
            .solve_outcome(&example_sets());
        assert!(!outcome.complete);
        assert!(outcome.chain.is_empty());
    }

    #[test]
    fn test_cycle_in_one_set() {
        let input = sets(&[&["ab", "bc", "ca", "ax"]]);
        let chain = solve(&input);
        assert_eq!(chain.values(), vec!["ab", "bc", "ca", "ax"]);
        assert_valid(&chain, &input, false);
    }
}
