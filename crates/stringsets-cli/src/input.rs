//! Loading sets from JSON documents.
//!
//! Accepts either a list of string lists, or the listing format: an object
//! mapping ids to string lists. Object entries load in ascending id order;
//! the store assigns fresh ids.

use crate::error::{CliError, CliResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use stringsets_core::{InMemoryStore, SetStore};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SetsDocument {
    List(Vec<Vec<String>>),
    Map(BTreeMap<String, Vec<String>>),
}

/// Parse `json` into `(label, strings)` pairs in load order.
fn entries(json: &str, path: &Path) -> CliResult<Vec<(String, Vec<String>)>> {
    let doc: SetsDocument = serde_json::from_str(json).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    match doc {
        SetsDocument::List(sets) => Ok(sets
            .into_iter()
            .enumerate()
            .map(|(i, set)| (format!("#{}", i + 1), set))
            .collect()),
        SetsDocument::Map(map) => {
            let mut keyed = Vec::with_capacity(map.len());
            for (key, set) in map {
                let id: u32 = key.trim().parse().map_err(|_| CliError::BadKey {
                    path: path.to_path_buf(),
                    key: key.clone(),
                })?;
                keyed.push((id, key, set));
            }
            keyed.sort_by_key(|(id, _, _)| *id);
            Ok(keyed.into_iter().map(|(_, key, set)| (key, set)).collect())
        }
    }
}

/// Upload every set in `json` into `store`.
pub fn load_into(store: &impl SetStore, json: &str, path: &Path) -> CliResult<usize> {
    let entries = entries(json, path)?;
    let count = entries.len();
    for (key, set) in entries {
        store.upload(set).map_err(|source| CliError::InvalidSet {
            path: path.to_path_buf(),
            key,
            source,
        })?;
    }
    debug!(path = %path.display(), sets = count, "loaded sets");
    Ok(count)
}

/// Read `path` into a fresh in-memory store.
pub fn load_file(path: &Path) -> CliResult<InMemoryStore> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let store = InMemoryStore::new();
    load_into(&store, &json, path)?;
    Ok(store)
}
