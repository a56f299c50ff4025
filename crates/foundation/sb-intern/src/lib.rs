//! String interning for source identifiers

use lasso::ThreadedRodeo;
use std::fmt;
use std::sync::Arc;

/// Interned identifier as written in source
pub use lasso::Spur as Name;

/// Shared string interner
///
/// Cloning is cheap; all clones intern into the same table. Parsing of
/// independent units may intern concurrently.
#[derive(Clone, Default)]
pub struct Interner {
    inner: Arc<ThreadedRodeo>,
}

impl Interner {
    /// Create an empty interner
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its stable handle
    pub fn intern(&self, text: &str) -> Name {
        self.inner.get_or_intern(text)
    }

    /// Look up a string without interning it
    pub fn get(&self, text: &str) -> Option<Name> {
        self.inner.get(text)
    }

    /// Resolve a handle back to its text
    pub fn resolve(&self, name: Name) -> &str {
        self.inner.resolve(&name)
    }

    /// Number of distinct strings interned so far
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing has been interned yet
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Interner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable_across_clones() {
        let interner = Interner::new();
        let shared = interner.clone();

        let first = interner.intern("Widget");
        let second = shared.intern("Widget");

        assert_eq!(first, second);
        assert_eq!(interner.resolve(first), "Widget");
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_get_does_not_intern() {
        let interner = Interner::new();
        assert!(interner.get("missing").is_none());
        assert!(interner.is_empty());
    }
}
