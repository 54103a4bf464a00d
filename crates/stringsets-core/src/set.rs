use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Store key of an uploaded string set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(pub u32);

impl SetId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SetId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(SetId)
    }
}

/// Reasons a list of strings cannot become a [`StringSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    #[error("Empty sets not allowed")]
    EmptySet,

    #[error("Empty strings not allowed")]
    EmptyString,

    #[error("Duplicated string: {0}")]
    DuplicateString(String),
}

/// An ordered collection of unique, non-empty strings.
///
/// Order is the upload order and is preserved by every operation that
/// derives a new set (intersection keeps the left operand's order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StringSet {
    items: Vec<String>,
}

impl StringSet {
    /// Validate and wrap `items`.
    pub fn new(items: Vec<String>) -> Result<Self, SetError> {
        if items.is_empty() {
            return Err(SetError::EmptySet);
        }
        let mut seen = HashSet::with_capacity(items.len());
        for s in &items {
            if s.is_empty() {
                return Err(SetError::EmptyString);
            }
            if !seen.insert(s.as_str()) {
                return Err(SetError::DuplicateString(s.clone()));
            }
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a validated set; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn contains(&self, s: &str) -> bool {
        self.items.iter().any(|item| item == s)
    }

    /// Order-independent identity of the set's content.
    pub fn content_key(&self) -> ContentKey {
        let mut sorted = self.items.clone();
        sorted.sort_unstable();
        ContentKey(sorted)
    }

    /// Elements of `self` that also occur in `other`, in `self`'s order.
    pub fn intersection(&self, other: &StringSet) -> Vec<String> {
        let theirs: HashSet<&str> = other.items.iter().map(String::as_str).collect();
        self.items
            .iter()
            .filter(|s| theirs.contains(s.as_str()))
            .cloned()
            .collect()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl<'a> IntoIterator for &'a StringSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'de> Deserialize<'de> for StringSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<String>::deserialize(deserializer)?;
        StringSet::new(items).map_err(serde::de::Error::custom)
    }
}

/// Sorted element list; equal keys mean equal content regardless of order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(Vec<String>);

/// Length statistics for one set, lengths counted in characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatistics {
    pub count: usize,
    pub shortest_length: usize,
    pub longest_length: usize,
    pub average_length: f64,
    pub median_length: f64,
}

impl SetStatistics {
    pub fn of(set: &StringSet) -> Self {
        let mut lengths: Vec<usize> = set.iter().map(|s| s.chars().count()).collect();
        lengths.sort_unstable();

        let count = lengths.len();
        let total: usize = lengths.iter().sum();
        let median_length = if count % 2 == 1 {
            lengths[count / 2] as f64
        } else {
            (lengths[count / 2 - 1] + lengths[count / 2]) as f64 / 2.0
        };

        Self {
            count,
            shortest_length: lengths[0],
            longest_length: lengths[count - 1],
            average_length: total as f64 / count as f64,
            median_length,
        }
    }
}
