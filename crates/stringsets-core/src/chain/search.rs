//! Two-phase backtracking search over a pair of chain graphs.
//!
//! Phase 1 walks the first graph. At every node it may also switch into the
//! second graph, which starts Phase 2: a walk of the second graph with the
//! Phase-1 path frozen as a prefix. Phase 2 never switches again.

use super::graph::ChainGraph;
use super::types::CancelToken;
use std::collections::HashMap;

/// Expansion counter shared by every pair searched in one solve.
pub(crate) struct Budget<'a> {
    max: Option<u64>,
    used: u64,
    cancel: Option<&'a CancelToken>,
    exhausted: bool,
}

impl<'a> Budget<'a> {
    pub(crate) fn new(max: Option<u64>, cancel: Option<&'a CancelToken>) -> Self {
        Self {
            max,
            used: 0,
            cancel,
            exhausted: false,
        }
    }

    /// Account for entering one node. Returns false once the budget is spent
    /// or the solve was cancelled; the node must then not be entered.
    fn enter(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let over_limit = self.max.is_some_and(|max| self.used >= max);
        let cancelled = self.cancel.is_some_and(CancelToken::is_cancelled);
        if over_limit || cancelled {
            self.exhausted = true;
            return false;
        }
        self.used += 1;
        true
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub(crate) fn used(&self) -> u64 {
        self.used
    }
}

/// Node indices of a chain: a prefix in the first graph followed by an
/// optional continuation in the second.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Trail {
    pub(crate) first: Vec<usize>,
    pub(crate) second: Vec<usize>,
}

impl Trail {
    pub(crate) fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }
}

/// Backtracking state for one (first, second) pair.
pub(crate) struct PairSearch<'g, 'b, 'c> {
    first: &'g ChainGraph,
    second: &'g ChainGraph,
    budget: &'b mut Budget<'c>,
    /// For each second-graph node, the first-graph node with the same value.
    /// Empty when values may repeat across the switch.
    mirror: Vec<Option<usize>>,
    first_path: Vec<usize>,
    first_visited: Vec<bool>,
    second_path: Vec<usize>,
    second_visited: Vec<bool>,
}

impl<'g, 'b, 'c> PairSearch<'g, 'b, 'c> {
    pub(crate) fn new(
        first: &'g ChainGraph,
        second: &'g ChainGraph,
        budget: &'b mut Budget<'c>,
        allow_cross_set_repeats: bool,
    ) -> Self {
        let mirror = if allow_cross_set_repeats {
            Vec::new()
        } else {
            let by_value: HashMap<&str, usize> = (0..first.len())
                .map(|i| (first.node(i).value(), i))
                .collect();
            (0..second.len())
                .map(|i| by_value.get(second.node(i).value()).copied())
                .collect()
        };

        Self {
            first,
            second,
            budget,
            mirror,
            first_path: Vec::new(),
            first_visited: vec![false; first.len()],
            second_path: Vec::new(),
            second_visited: vec![false; second.len()],
        }
    }

    /// Longest trail over every start node of the first graph.
    pub(crate) fn run(mut self) -> Trail {
        let ceiling = self.ceiling();
        let mut best = Trail::default();

        for start in self.first.start_nodes() {
            if self.budget.is_exhausted() {
                break;
            }
            let found = self.visit_first(start);
            if found.len() > best.len() {
                best = found;
                // Nothing later can be strictly longer.
                if best.len() == ceiling {
                    break;
                }
            }
        }

        best
    }

    /// Upper bound on any trail this pair can produce.
    fn ceiling(&self) -> usize {
        let reachable_second = if self.mirror.is_empty() {
            self.second.len()
        } else {
            self.mirror.iter().filter(|m| m.is_none()).count()
        };
        self.first.len() + reachable_second
    }

    fn visit_first(&mut self, current: usize) -> Trail {
        if !self.budget.enter() {
            return Trail::default();
        }
        self.first_path.push(current);
        self.first_visited[current] = true;

        let first = self.first;
        let second = self.second;
        let node = first.node(current);
        let mut best = Trail::default();

        for &child in node.children() {
            if child == current || self.first_visited[child] {
                continue;
            }
            let found = self.visit_first(child);
            if found.len() > best.len() {
                best = found;
            }
        }

        for &entry in second.bucket(node.last_char()) {
            if self.blocked_by_prefix(entry) {
                continue;
            }
            let found = self.visit_second(entry);
            if found.len() > best.len() {
                best = found;
            }
        }

        if best.is_empty() {
            best = Trail {
                first: self.first_path.clone(),
                second: Vec::new(),
            };
        }

        self.first_visited[current] = false;
        self.first_path.pop();
        best
    }

    fn visit_second(&mut self, current: usize) -> Trail {
        if !self.budget.enter() {
            return Trail::default();
        }
        self.second_path.push(current);
        self.second_visited[current] = true;

        let second = self.second;
        let mut best = Trail::default();

        for &child in second.node(current).children() {
            if child == current || self.second_visited[child] || self.blocked_by_prefix(child) {
                continue;
            }
            let found = self.visit_second(child);
            if found.len() > best.len() {
                best = found;
            }
        }

        if best.is_empty() {
            best = Trail {
                first: self.first_path.clone(),
                second: self.second_path.clone(),
            };
        }

        self.second_visited[current] = false;
        self.second_path.pop();
        best
    }

    /// Whether a second-graph node repeats a value already in the prefix.
    fn blocked_by_prefix(&self, second_node: usize) -> bool {
        match self.mirror.get(second_node) {
            Some(Some(first_node)) => self.first_visited[*first_node],
            _ => false,
        }
    }
}
