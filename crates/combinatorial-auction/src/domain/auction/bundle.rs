use {
    itertools::Itertools,
    serde::{Deserialize, Serialize},
    std::{collections::BTreeSet, fmt},
};

/// An indivisible good. The identifier is only meaningful within the auction
/// that declares it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Good(pub u64);

/// A set of goods that is bid on as a single unit.
///
/// Backed by an ordered set so that equal bundles compare, hash and print
/// identically regardless of the order the goods were supplied in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle(BTreeSet<Good>);

impl Bundle {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, good: &Good) -> bool {
        self.0.contains(good)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Good> {
        self.0.iter()
    }

    pub fn is_disjoint(&self, other: &Bundle) -> bool {
        self.0.is_disjoint(&other.0)
    }

    /// Returns the first good of this bundle that is not part of `goods`.
    pub fn first_outside(&self, goods: &BTreeSet<Good>) -> Option<Good> {
        self.0.difference(goods).next().copied()
    }

    /// Adds all goods of `other` to this bundle.
    pub fn merge(&mut self, other: &Bundle) {
        self.0.extend(other.0.iter().copied());
    }
}

impl FromIterator<Good> for Bundle {
    fn from_iter<T: IntoIterator<Item = Good>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Good; N]> for Bundle {
    fn from(goods: [Good; N]) -> Self {
        goods.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Bundle {
    type IntoIter = std::collections::btree_set::Iter<'a, Good>;
    type Item = &'a Good;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}
