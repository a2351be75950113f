use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::MoveLabel;

/// Nested index of allowed moves: each allowed move maps to the moves allowed after it.
/// An empty index at the end of a path means the turn is complete there.
///
/// Entries are kept sorted by label, so iteration and `Display` are canonical.
#[derive(Clone, PartialEq, Eq, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MoveIndex {
    next: BTreeMap<MoveLabel, MoveIndex>,
}

impl MoveIndex {
    pub const fn new() -> Self {
        MoveIndex {
            next: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Number of moves allowed at this level
    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn contains(&self, label: &MoveLabel) -> bool {
        self.next.contains_key(label)
    }

    pub fn get(&self, label: &MoveLabel) -> Option<&MoveIndex> {
        self.next.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &MoveLabel> {
        self.next.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, MoveLabel, MoveIndex> {
        self.next.iter()
    }

    /// The sub-index reached by playing `path` from here
    pub fn descend(&self, path: &[MoveLabel]) -> Option<&MoveIndex> {
        path.iter().try_fold(self, |index, label| index.get(label))
    }

    /// Adds `sub` under `label`, merging with whatever is already there
    pub fn insert(&mut self, label: MoveLabel, sub: MoveIndex) {
        match self.next.entry(label) {
            Entry::Vacant(entry) => {
                entry.insert(sub);
            }
            Entry::Occupied(mut entry) => entry.get_mut().merge(sub),
        }
    }

    /// Adds every move along `path`, creating levels as needed
    pub fn insert_path(&mut self, path: &[MoveLabel]) {
        let mut index = self;
        for label in path {
            index = index.next.entry(*label).or_default();
        }
    }

    /// Union of two indexes
    pub fn merge(&mut self, other: MoveIndex) {
        for (label, sub) in other.next {
            self.insert(label, sub);
        }
    }

    /// Every complete path through the index, in sorted order
    pub fn paths(&self) -> Vec<Vec<MoveLabel>> {
        let mut paths = vec![];
        self.collect_paths(&mut vec![], &mut paths);
        paths
    }

    fn collect_paths(&self, path: &mut Vec<MoveLabel>, paths: &mut Vec<Vec<MoveLabel>>) {
        if self.is_empty() {
            paths.push(path.clone());
            return;
        }
        for (label, sub) in self.iter() {
            path.push(*label);
            sub.collect_paths(path, paths);
            path.pop();
        }
    }

    /// Length of the longest path
    pub fn depth(&self) -> usize {
        self.next
            .values()
            .map(|sub| sub.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for MoveIndex {
    /// Canonical form, e.g. `{13:5{8:3},24:1{23:3}}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (label, sub)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", label)?;
            if !sub.is_empty() {
                write!(f, "{}", sub)?;
            }
        }
        write!(f, "}}")
    }
}

impl<'a> IntoIterator for &'a MoveIndex {
    type Item = (&'a MoveLabel, &'a MoveIndex);
    type IntoIter = btree_map::Iter<'a, MoveLabel, MoveIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
