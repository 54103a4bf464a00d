//! Per-set directed graph keyed by leading character.
//!
//! An edge runs from A to B when A's last character equals B's first
//! character. Graphs are built once per distinct set content and never
//! mutated afterwards.

use crate::set::{ContentKey, SetId, StringSet};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// A string in a [`ChainGraph`] and its resolved out-edges.
#[derive(Debug, Clone)]
pub struct ChainNode {
    value: String,
    first: char,
    last: char,
    /// Indices into the owning graph. Contains the node itself when
    /// `first == last`; the search skips that self-edge.
    children: Vec<usize>,
}

impl ChainNode {
    fn new(value: &str) -> Option<Self> {
        let first = value.chars().next()?;
        let last = value.chars().next_back()?;
        Some(Self {
            value: value.to_string(),
            first,
            last,
            children: Vec::new(),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn first_char(&self) -> char {
        self.first
    }

    pub fn last_char(&self) -> char {
        self.last
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChainGraph {
    nodes: Vec<ChainNode>,
    buckets: BTreeMap<char, Vec<usize>>,
}

impl ChainGraph {
    /// Graph with no nodes; pairing with it disables switching.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(set: &StringSet) -> Self {
        let mut nodes = Vec::with_capacity(set.len());
        let mut buckets: BTreeMap<char, Vec<usize>> = BTreeMap::new();

        for value in set {
            // Validated sets have no empty strings, so this never skips.
            let Some(node) = ChainNode::new(value) else {
                continue;
            };
            buckets.entry(node.first).or_default().push(nodes.len());
            nodes.push(node);
        }

        for node in &mut nodes {
            node.children = buckets.get(&node.last).cloned().unwrap_or_default();
        }

        Self { nodes, buckets }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &ChainNode {
        &self.nodes[index]
    }

    /// Nodes whose value begins with `c`, in set order.
    pub fn bucket(&self, c: char) -> &[usize] {
        self.buckets.get(&c).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every node, by ascending leading character then set order.
    pub fn start_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.values().flat_map(|bucket| bucket.iter().copied())
    }
}

/// A graph together with every uploaded set instance sharing its content.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub graph: ChainGraph,
    pub instances: Vec<SetId>,
}

impl CatalogEntry {
    /// True when two or more uploaded sets share this content.
    pub fn is_duplicated(&self) -> bool {
        self.instances.len() > 1
    }
}

/// Graphs deduplicated by set content, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct GraphCatalog {
    entries: Vec<CatalogEntry>,
}

impl GraphCatalog {
    pub fn build(sets: &[(SetId, StringSet)]) -> Self {
        let mut index: HashMap<ContentKey, usize> = HashMap::new();
        let mut entries: Vec<CatalogEntry> = Vec::new();

        for (id, set) in sets {
            let key = set.content_key();
            if let Some(&existing) = index.get(&key) {
                debug!(set = %id, "duplicate content, reusing graph");
                entries[existing].instances.push(*id);
                continue;
            }
            let graph = ChainGraph::build(set);
            debug!(set = %id, nodes = graph.len(), "built chain graph");
            index.insert(key, entries.len());
            entries.push(CatalogEntry {
                graph,
                instances: vec![*id],
            });
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> StringSet {
        StringSet::new(items.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn values<'a>(graph: &'a ChainGraph, indices: &[usize]) -> Vec<&'a str> {
        indices.iter().map(|&i| graph.node(i).value()).collect()
    }

    #[test]
    fn test_buckets_and_children() {
        let graph = ChainGraph::build(&set(&["abc", "cde", "cdf", "fuf", "fgh"]));
        assert_eq!(graph.len(), 5);
        assert_eq!(values(&graph, graph.bucket('c')), vec!["cde", "cdf"]);
        assert_eq!(values(&graph, graph.bucket('f')), vec!["fuf", "fgh"]);
        assert!(graph.bucket('z').is_empty());

        let abc = graph.bucket('a')[0];
        assert_eq!(values(&graph, graph.node(abc).children()), vec!["cde", "cdf"]);

        // fuf links to itself and to fgh
        let fuf = graph.bucket('f')[0];
        assert_eq!(values(&graph, graph.node(fuf).children()), vec!["fuf", "fgh"]);

        // dead end
        let cde = graph.bucket('c')[0];
        assert!(graph.node(cde).children().is_empty());
    }

    #[test]
    fn test_start_nodes_ordered_by_char() {
        let graph = ChainGraph::build(&set(&["zz", "ab", "mx", "aq"]));
        let order: Vec<&str> = graph.start_nodes().map(|i| graph.node(i).value()).collect();
        assert_eq!(order, vec!["ab", "aq", "mx", "zz"]);
    }

    #[test]
    fn test_multibyte_chars() {
        let graph = ChainGraph::build(&set(&["äbö", "öx"]));
        let first = graph.bucket('ä')[0];
        assert_eq!(graph.node(first).last_char(), 'ö');
        assert_eq!(values(&graph, graph.node(first).children()), vec!["öx"]);
    }

    #[test]
    fn test_catalog_dedups_by_content() {
        let sets = vec![
            (SetId(1), set(&["a", "b", "c"])),
            (SetId(2), set(&["x", "y"])),
            (SetId(3), set(&["c", "b", "a"])),
        ];
        let catalog = GraphCatalog::build(&sets);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].instances, vec![SetId(1), SetId(3)]);
        assert!(catalog.entries()[0].is_duplicated());
        assert!(!catalog.entries()[1].is_duplicated());
    }

    #[test]
    fn test_empty_graph() {
        let graph = ChainGraph::empty();
        assert!(graph.is_empty());
        assert!(graph.bucket('a').is_empty());
        assert_eq!(graph.start_nodes().count(), 0);
    }
}
