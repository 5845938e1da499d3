//! The set domain `(2^Vars, ⊆)` used by the initialized-variable and taint
//! analyses (spec.md §4.1). Join is set union; bottom is the empty set.

use crate::common::fx_hash::FxHashSet;
use std::fmt;

use super::AbstractDomain;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarSet(FxHashSet<String>);

impl VarSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.0.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AbstractDomain for VarSet {
    fn bottom() -> Self {
        Self::empty()
    }

    fn join(&mut self, other: &Self) -> bool {
        let before = self.0.len();
        self.0.extend(other.0.iter().cloned());
        // Union only ever grows the set, but `extend` can re-insert existing
        // keys without changing the length, so compare sizes rather than
        // trusting `HashSet::insert`'s per-element result.
        self.0.len() != before
    }
}

impl fmt::Display for VarSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.iter().collect();
        names.sort_unstable();
        write!(f, "{{{}}}", names.join(", "))
    }
}

impl FromIterator<String> for VarSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
