//! Scope stack used while lowering one member body

use sb_intern::{Interner, Name};
use sb_model::{LocalId, LocalSymbol, ScopeEntry, ScopeId, ScopeKind, ScopeTree, SymbolId};
use sb_span::FileSpan;

/// Stack of lexical scopes for the body being lowered
///
/// The table starts at the root scope of a fresh [`ScopeTree`]. Entering a
/// block pushes a child of the current scope; leaving it pops back to the
/// parent. The root itself can never be popped.
#[derive(Debug)]
pub struct LocalSymbolTable {
    tree: ScopeTree,
    current: ScopeId,
    synthetic_count: u32,
}

impl Default for LocalSymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSymbolTable {
    /// Table positioned at the root scope of an empty tree
    pub fn new() -> Self {
        let tree = ScopeTree::new();
        let current = tree.root();
        Self {
            tree,
            current,
            synthetic_count: 0,
        }
    }

    /// Scope new bindings are added to
    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    /// Tree built so far
    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    /// Enter a child of the current scope
    pub fn push_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let child = self.tree.create_child(self.current, kind);
        tracing::trace!(parent = ?self.current, ?child, ?kind, "scope entered");
        self.current = child;
        child
    }

    /// Return to the parent of the current scope
    ///
    /// # Panics
    ///
    /// Panics when called at the root scope; scopes are always popped in
    /// the order they were pushed.
    pub fn pop_scope(&mut self) {
        match self.tree.scope(self.current).parent {
            Some(parent) => self.current = parent,
            None => panic!("attempted to pop the root scope"),
        }
    }

    /// Declare a local in the current scope
    pub fn add_local(&mut self, name: Name, ty: Option<SymbolId>, span: FileSpan) -> LocalId {
        self.tree.add_local(LocalSymbol {
            name,
            ty,
            scope: self.current,
            is_synthetic: false,
            generated_name: None,
            span,
        })
    }

    /// Declare a compiler-introduced local with a fresh name
    pub fn add_synthetic_local(
        &mut self,
        interner: &Interner,
        hint: &str,
        ty: Option<SymbolId>,
    ) -> LocalId {
        let text = self.create_synthetic_name(hint);
        tracing::trace!(name = %text, "synthetic local");
        let name = interner.intern(&text);
        self.tree.add_local(LocalSymbol {
            name,
            ty,
            scope: self.current,
            is_synthetic: true,
            generated_name: None,
            span: FileSpan::default(),
        })
    }

    /// Bind a parameter in the current scope
    pub fn add_parameter(&mut self, name: Name, parameter: SymbolId) {
        self.tree.add_parameter(self.current, name, parameter);
    }

    /// Resolve a name against the active scope chain
    pub fn find_local(&self, name: Name) -> Option<ScopeEntry> {
        self.tree.resolve(self.current, name)
    }

    /// Mint a name unique within this body
    ///
    /// Names start with `$`, which source identifiers cannot contain.
    pub fn create_synthetic_name(&mut self, hint: &str) -> String {
        self.synthetic_count += 1;
        format!("${hint}{}", self.synthetic_count)
    }

    /// Finish lowering and hand over the tree
    ///
    /// # Panics
    ///
    /// Panics if a pushed scope was never popped.
    pub fn finish(self) -> ScopeTree {
        assert!(
            self.current == self.tree.root(),
            "scope stack not unwound before finishing the body"
        );
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_restores_parent() {
        let interner = Interner::new();
        let mut table = LocalSymbolTable::new();
        let root = table.current_scope();
        let x = interner.intern("x");
        let outer = table.add_local(x, None, FileSpan::default());

        let block = table.push_scope(ScopeKind::Block);
        assert_eq!(table.current_scope(), block);
        let inner = table.add_local(x, None, FileSpan::default());
        assert_eq!(table.find_local(x), Some(ScopeEntry::Local(inner)));

        table.pop_scope();
        assert_eq!(table.current_scope(), root);
        assert_eq!(table.find_local(x), Some(ScopeEntry::Local(outer)));

        let tree = table.finish();
        assert_eq!(tree.scope(root).children, vec![block]);
    }

    #[test]
    #[should_panic(expected = "pop the root scope")]
    fn test_pop_at_root_panics() {
        let mut table = LocalSymbolTable::new();
        table.pop_scope();
    }

    #[test]
    fn test_synthetic_names_are_unique_per_body() {
        let interner = Interner::new();
        let mut table = LocalSymbolTable::new();
        assert_eq!(table.create_synthetic_name("enum"), "$enum1");
        assert_eq!(table.create_synthetic_name("enum"), "$enum2");

        let local = table.add_synthetic_local(&interner, "tmp", None);
        let symbol = table.tree().local(local);
        assert!(symbol.is_synthetic);
        assert_eq!(interner.resolve(symbol.name), "$tmp3");

        let other = LocalSymbolTable::new().create_synthetic_name("enum");
        assert_eq!(other, "$enum1");
    }
}
