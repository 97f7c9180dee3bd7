//! Ordered vertex pairs, the key type of all-pairs results.

use std::fmt;

use serde::Serialize;

/// An ordered `(first, second)` pair. `(a, b)` and `(b, a)` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VertexPair<V> {
    pub first: V,
    pub second: V,
}

impl<V> VertexPair<V> {
    #[must_use]
    pub const fn new(first: V, second: V) -> Self {
        Self { first, second }
    }

    /// The same pair with its components swapped.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }
}

impl<V> From<(V, V)> for VertexPair<V> {
    fn from((first, second): (V, V)) -> Self {
        Self { first, second }
    }
}

impl<V: fmt::Display> fmt::Display for VertexPair<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn order_matters_for_equality_and_hashing() {
        let ab = VertexPair::new("a", "b");
        let ba = VertexPair::new("b", "a");
        assert_ne!(ab, ba);
        assert_eq!(ab.clone().reversed(), ba);

        let set: HashSet<VertexPair<&str>> = [ab.clone(), ba, ab].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn displays_as_tuple() {
        assert_eq!(VertexPair::from((1, 2)).to_string(), "(1, 2)");
    }
}
