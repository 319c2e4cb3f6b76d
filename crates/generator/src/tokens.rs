//! Type-token registry
//!
//! The set of reified generic types the emitter must materialize as static
//! helpers. Insertion is idempotent and iteration is sorted by token
//! identity, so the emitted order never depends on insertion order.

use clientgen_common::TypeToken;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTokenRegistry {
    tokens: BTreeSet<TypeToken>,
}

impl TypeTokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the token was already registered
    pub fn insert(&mut self, token: TypeToken) -> bool {
        self.tokens.insert(token)
    }

    pub fn merge(&mut self, other: TypeTokenRegistry) {
        self.tokens.extend(other.tokens);
    }

    pub fn contains(&self, token: &TypeToken) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeToken> {
        self.tokens.iter()
    }

    /// Tokens in emission order
    pub fn into_sorted(self) -> Vec<TypeToken> {
        self.tokens.into_iter().collect()
    }
}

impl Extend<TypeToken> for TypeTokenRegistry {
    fn extend<I: IntoIterator<Item = TypeToken>>(&mut self, iter: I) {
        self.tokens.extend(iter);
    }
}

impl FromIterator<TypeToken> for TypeTokenRegistry {
    fn from_iter<I: IntoIterator<Item = TypeToken>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}
