//! Keyed string set store
//!
//! The store owns uploaded sets and answers the aggregate queries. The chain
//! solver only ever sees a snapshot taken under the store's lock.

use crate::chain::{SolveOutcome, Solver};
use crate::error::{StoreError, StoreResult};
use crate::set::{SetId, SetStatistics, StringSet};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Trait for string set stores
pub trait SetStore: Send + Sync {
    /// Validate and store a new set, returning its id
    fn upload(&self, strings: Vec<String>) -> StoreResult<SetId>;

    fn get(&self, id: SetId) -> StoreResult<StringSet>;

    /// Remove a set, returning what was stored
    fn delete(&self, id: SetId) -> StoreResult<StringSet>;

    /// Every stored set in ascending id order, taken atomically
    fn snapshot(&self) -> StoreResult<Vec<(SetId, StringSet)>>;

    /// Ids of sets containing `query`
    fn search(&self, query: &str) -> StoreResult<Vec<SetId>>;

    /// Strings present in the most sets, alphabetical
    fn most_common(&self) -> StoreResult<Vec<String>>;

    /// Strings of maximal length, alphabetical, one entry per occurrence
    fn longest(&self) -> StoreResult<Vec<String>>;

    /// Strings present in exactly `count` sets, alphabetical
    fn exactly_in(&self, count: usize) -> StoreResult<Vec<String>>;

    fn statistics(&self, id: SetId) -> StoreResult<SetStatistics>;

    /// Store `a ∩ b` (in `a`'s order) as a new set
    fn create_intersection(&self, a: SetId, b: SetId) -> StoreResult<SetId>;

    fn clear(&self) -> StoreResult<()>;

    /// Solve the longest chain over a snapshot of the current sets
    fn longest_chain(&self, solver: &Solver) -> StoreResult<SolveOutcome> {
        let sets = self.snapshot()?;
        Ok(solver.solve_outcome(&sets))
    }
}

#[derive(Debug)]
struct StoreData {
    next_id: u32,
    sets: BTreeMap<SetId, StringSet>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            next_id: 1,
            sets: BTreeMap::new(),
        }
    }
}

impl StoreData {
    fn insert(&mut self, set: StringSet) -> SetId {
        let id = SetId(self.next_id);
        self.next_id += 1;
        self.sets.insert(id, set);
        id
    }

    fn occurrences(&self) -> HashMap<&str, usize> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for s in self.sets.values().flat_map(|set| set.iter()) {
            *counts.entry(s.as_str()).or_default() += 1;
        }
        counts
    }
}

/// In-memory store; ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Mutex<StoreData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreData>> {
        self.data
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|d| d.sets.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SetStore for InMemoryStore {
    fn upload(&self, strings: Vec<String>) -> StoreResult<SetId> {
        let set = StringSet::new(strings)?;
        let id = self.lock()?.insert(set);
        debug!(set = %id, "uploaded set");
        Ok(id)
    }

    fn get(&self, id: SetId) -> StoreResult<StringSet> {
        self.lock()?
            .sets
            .get(&id)
            .cloned()
            .ok_or(StoreError::UnknownSet(id))
    }

    fn delete(&self, id: SetId) -> StoreResult<StringSet> {
        let removed = self.lock()?.sets.remove(&id).ok_or(StoreError::UnknownSet(id))?;
        debug!(set = %id, "deleted set");
        Ok(removed)
    }

    fn snapshot(&self) -> StoreResult<Vec<(SetId, StringSet)>> {
        let data = self.lock()?;
        Ok(data.sets.iter().map(|(id, set)| (*id, set.clone())).collect())
    }

    fn search(&self, query: &str) -> StoreResult<Vec<SetId>> {
        let data = self.lock()?;
        Ok(data
            .sets
            .iter()
            .filter(|(_, set)| set.contains(query))
            .map(|(id, _)| *id)
            .collect())
    }

    fn most_common(&self) -> StoreResult<Vec<String>> {
        let data = self.lock()?;
        let counts = data.occurrences();
        let Some(&max) = counts.values().max() else {
            return Ok(Vec::new());
        };
        let mut result: Vec<String> = counts
            .into_iter()
            .filter(|(_, n)| *n == max)
            .map(|(s, _)| s.to_string())
            .collect();
        result.sort();
        Ok(result)
    }

    fn longest(&self) -> StoreResult<Vec<String>> {
        let data = self.lock()?;
        let all: Vec<&String> = data.sets.values().flat_map(|set| set.iter()).collect();
        let Some(max) = all.iter().map(|s| s.chars().count()).max() else {
            return Ok(Vec::new());
        };
        let mut result: Vec<String> = all
            .into_iter()
            .filter(|s| s.chars().count() == max)
            .cloned()
            .collect();
        result.sort();
        Ok(result)
    }

    fn exactly_in(&self, count: usize) -> StoreResult<Vec<String>> {
        let data = self.lock()?;
        let mut result: Vec<String> = data
            .occurrences()
            .into_iter()
            .filter(|(_, n)| *n == count)
            .map(|(s, _)| s.to_string())
            .collect();
        result.sort();
        Ok(result)
    }

    fn statistics(&self, id: SetId) -> StoreResult<SetStatistics> {
        let data = self.lock()?;
        let set = data.sets.get(&id).ok_or(StoreError::UnknownSet(id))?;
        Ok(SetStatistics::of(set))
    }

    fn create_intersection(&self, a: SetId, b: SetId) -> StoreResult<SetId> {
        let mut data = self.lock()?;
        let left = data.sets.get(&a).ok_or(StoreError::UnknownSet(a))?;
        let right = data.sets.get(&b).ok_or(StoreError::UnknownSet(b))?;
        let common = left.intersection(right);
        if common.is_empty() {
            return Err(StoreError::EmptyIntersection(a, b));
        }
        let id = data.insert(StringSet::new(common)?);
        debug!(set = %id, left = %a, right = %b, "created intersection");
        Ok(id)
    }

    fn clear(&self) -> StoreResult<()> {
        self.lock()?.sets.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SetError;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Vec<String> {
        strings(&["a", "b", "c", "d"])
    }

    #[test]
    fn test_upload_and_get() {
        let store = InMemoryStore::new();
        assert!(store.snapshot().unwrap().is_empty());

        let id = store.upload(sample()).unwrap();
        let id2 = store.upload(sample()).unwrap();
        assert_ne!(id, id2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(id).unwrap().as_slice(), sample().as_slice());

        assert_eq!(store.upload(vec![]), Err(StoreError::Invalid(SetError::EmptySet)));
        assert_eq!(
            store.upload(strings(&[""])),
            Err(StoreError::Invalid(SetError::EmptyString))
        );
        assert_eq!(
            store.upload(strings(&["a", "a"])),
            Err(StoreError::Invalid(SetError::DuplicateString("a".into())))
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_not_reused() {
        let store = InMemoryStore::new();
        let id = store.upload(sample()).unwrap();
        store.delete(id).unwrap();
        let next = store.upload(sample()).unwrap();
        assert!(next > id);
    }

    #[test]
    fn test_search() {
        let store = InMemoryStore::new();
        let a = store.upload(strings(&["a"])).unwrap();
        let b = store.upload(strings(&["b"])).unwrap();
        let c = store.upload(strings(&["c"])).unwrap();
        let c2 = store.upload(strings(&["c"])).unwrap();

        assert_eq!(store.search("a").unwrap(), vec![a]);
        assert_eq!(store.search("b").unwrap(), vec![b]);
        assert_eq!(store.search("c").unwrap(), vec![c, c2]);
        assert!(store.search("d").unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let store = InMemoryStore::new();
        let id = store.upload(sample()).unwrap();
        assert_eq!(store.delete(SetId(id.get() + 1)), Err(StoreError::UnknownSet(SetId(2))));
        assert_eq!(store.delete(id).unwrap().into_vec(), sample());
        assert!(store.is_empty());
    }

    #[test]
    fn test_most_common() {
        let store = InMemoryStore::new();
        assert!(store.most_common().unwrap().is_empty());
        store.upload(strings(&["a", "b", "c", "d", "e"])).unwrap();
        store.upload(strings(&["a", "b", "c", "d"])).unwrap();
        store.upload(strings(&["a", "b", "c"])).unwrap();
        let d = store.upload(strings(&["a", "b"])).unwrap();
        let e = store.upload(strings(&["a"])).unwrap();

        assert_eq!(store.most_common().unwrap(), strings(&["a"]));
        store.delete(e).unwrap();
        assert_eq!(store.most_common().unwrap(), strings(&["a", "b"]));
        store.delete(d).unwrap();
        assert_eq!(store.most_common().unwrap(), strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_longest() {
        let store = InMemoryStore::new();
        assert!(store.longest().unwrap().is_empty());
        store.upload(strings(&["a", "aa", "aaa", "aaaa"])).unwrap();
        let b = store.upload(strings(&["b", "bb", "bbb", "bbbb"])).unwrap();
        store.upload(strings(&["cccc", "c", "cc", "ccc"])).unwrap();
        store.upload(strings(&["d", "dd", "ddd"])).unwrap();

        assert_eq!(store.longest().unwrap(), strings(&["aaaa", "bbbb", "cccc"]));
        store.delete(b).unwrap();
        assert_eq!(store.longest().unwrap(), strings(&["aaaa", "cccc"]));

        store.upload(strings(&["aaaa"])).unwrap();
        assert_eq!(store.longest().unwrap(), strings(&["aaaa", "aaaa", "cccc"]));
    }

    #[test]
    fn test_exactly_in() {
        let store = InMemoryStore::new();
        store.upload(strings(&["a", "b", "c", "d", "e"])).unwrap();
        store.upload(strings(&["a", "b", "c", "d"])).unwrap();
        store.upload(strings(&["a", "b", "c"])).unwrap();
        store.upload(strings(&["a", "b"])).unwrap();
        store.upload(strings(&["a"])).unwrap();

        assert!(store.exactly_in(6).unwrap().is_empty());
        assert_eq!(store.exactly_in(5).unwrap(), strings(&["a"]));
        assert_eq!(store.exactly_in(4).unwrap(), strings(&["b"]));
        assert_eq!(store.exactly_in(3).unwrap(), strings(&["c"]));
        assert_eq!(store.exactly_in(2).unwrap(), strings(&["d"]));
        assert_eq!(store.exactly_in(1).unwrap(), strings(&["e"]));
        assert!(store.exactly_in(0).unwrap().is_empty());
    }

    #[test]
    fn test_statistics() {
        let store = InMemoryStore::new();
        let id = store.upload(strings(&["a", "aa", "aaa", "aaaa"])).unwrap();
        let stats = store.statistics(id).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.median_length, 2.5);
        assert_eq!(store.statistics(SetId(99)), Err(StoreError::UnknownSet(SetId(99))));
    }

    #[test]
    fn test_create_intersection() {
        let store = InMemoryStore::new();
        let a = store.upload(sample()).unwrap();
        let b = store.upload(sample()).unwrap();
        let c = store.create_intersection(a, b).unwrap();
        assert_eq!(store.get(c).unwrap().into_vec(), sample());

        assert_eq!(
            store.create_intersection(SetId(99), a),
            Err(StoreError::UnknownSet(SetId(99)))
        );
        assert_eq!(
            store.create_intersection(a, SetId(99)),
            Err(StoreError::UnknownSet(SetId(99)))
        );

        let d = store.upload(strings(&["e", "f", "g", "h"])).unwrap();
        assert_eq!(store.create_intersection(a, d), Err(StoreError::EmptyIntersection(a, d)));

        let e = store.upload(strings(&["d", "c", "b", "a"])).unwrap();
        let f = store.create_intersection(a, e).unwrap();
        let g = store.create_intersection(e, a).unwrap();
        assert_eq!(store.get(f).unwrap().into_vec(), sample());
        assert_eq!(store.get(g).unwrap().into_vec(), strings(&["d", "c", "b", "a"]));
    }

    #[test]
    fn test_longest_chain_uses_snapshot() {
        let store = InMemoryStore::new();
        let solver = Solver::new();
        assert!(store.longest_chain(&solver).unwrap().chain.is_empty());

        store.upload(strings(&["foo", "oomph", "hgf"])).unwrap();
        store.upload(strings(&["hij", "jkl", "jkm", "lmn"])).unwrap();
        store.upload(strings(&["abc", "cde", "cdf", "fuf", "fgh"])).unwrap();
        let outcome = store.longest_chain(&solver).unwrap();
        assert_eq!(outcome.chain.len(), 7);
        assert!(outcome.complete);
    }

    #[test]
    fn test_clear() {
        let store = InMemoryStore::new();
        store.upload(sample()).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        // ids keep counting after a clear
        assert_eq!(store.upload(sample()).unwrap(), SetId(2));
    }
}
