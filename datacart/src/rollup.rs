use std::collections::{BTreeMap, BTreeSet};

use crate::entry::CartEntry;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CollectionCounts {
    pub file_count: usize,
    pub downloaded_count: usize,
}

// rolled-up counts beneath a collection path; a path matches itself and
// everything prefixed by it plus "/"
pub fn count_under<'a>(
    entries: impl Iterator<Item = &'a CartEntry>,
    path: &str,
) -> CollectionCounts {
    let prefix = if path.is_empty() {
        String::new()
    } else {
        format!("{}/", path)
    };

    let mut counts = CollectionCounts::default();
    for entry in entries {
        let key = entry.key();
        if key != path && !key.starts_with(&prefix) {
            continue;
        }

        counts.file_count += 1;
        if entry.is_downloaded() {
            counts.downloaded_count += 1;
        }
    }

    counts
}

// Explicit hierarchy derived from the flat identity keys: every "/"-delimited
// prefix of a key is a collection path holding its direct members. Built from
// a cart snapshot, never persisted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CollectionIndex {
    members: BTreeMap<String, BTreeSet<String>>,
}

impl CollectionIndex {
    pub fn build<'a>(entries: impl Iterator<Item = &'a CartEntry>) -> Self {
        let mut members: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for entry in entries {
            let key = entry.key();

            // walk the key segments; the empty path roots the resource ids
            let mut path = String::new();
            for segment in key.split('/') {
                let child = if path.is_empty() {
                    segment.to_string()
                } else {
                    format!("{}/{}", path, segment)
                };

                members.entry(path).or_default().insert(child.clone());
                path = child;
            }
        }

        Self { members }
    }

    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.members
            .keys()
            .filter(|path| !path.is_empty())
            .map(String::as_str)
    }

    pub fn is_collection(&self, path: &str) -> bool {
        self.members.contains_key(path)
    }

    pub fn children_of(&self, path: &str) -> Vec<&str> {
        match self.members.get(path) {
            Some(children) => children.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }
}
