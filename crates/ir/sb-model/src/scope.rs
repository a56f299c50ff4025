//! Lexical scopes of one member implementation

use crate::SymbolId;
use rustc_hash::FxHashMap;
use sb_arena::{Arena, Idx};
use sb_intern::Name;
use sb_span::FileSpan;

/// Unique identifier for a scope
pub type ScopeId = Idx<SymbolScope>;

/// Unique identifier for a local variable
pub type LocalId = Idx<LocalSymbol>;

/// What introduced a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Member body, holding the parameters
    Root,
    /// Nested block or loop
    Block,
    /// Anonymous method body, holding its parameters
    AnonymousMethod,
}

/// A name bound in a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeEntry {
    /// Local variable owned by the tree
    Local(LocalId),
    /// Parameter owned by the symbol graph
    Parameter(SymbolId),
}

/// A local variable, synthetic or declared
#[derive(Debug, Clone)]
pub struct LocalSymbol {
    /// Name as declared, or the synthesized name
    pub name: Name,
    /// Declared or inferred type
    pub ty: Option<SymbolId>,
    /// Declaring scope
    pub scope: ScopeId,
    /// Introduced by lowering rather than the user
    pub is_synthetic: bool,
    /// Output name assigned by the implementation transformer
    pub generated_name: Option<String>,
    /// Declaration site
    pub span: FileSpan,
}

/// One lexical scope
#[derive(Debug, Clone)]
pub struct SymbolScope {
    /// Parent scope (None for the root)
    pub parent: Option<ScopeId>,
    /// Kind of scope
    pub kind: ScopeKind,
    /// Bindings, for lookup by name
    pub symbols: FxHashMap<Name, ScopeEntry>,
    /// Bindings in declaration order
    pub entries: Vec<ScopeEntry>,
    /// Nested scopes in creation order
    pub children: Vec<ScopeId>,
}

impl SymbolScope {
    fn new(parent: Option<ScopeId>, kind: ScopeKind) -> Self {
        Self {
            parent,
            kind,
            symbols: FxHashMap::default(),
            entries: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Tree of all scopes in one implementation
///
/// Nested anonymous methods get a child scope in the tree of the member
/// that contains them, so their locals are named together with the
/// enclosing member's locals.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Arena<SymbolScope>,
    locals: Arena<LocalSymbol>,
    root: ScopeId,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Create a tree holding only the root scope
    pub fn new() -> Self {
        let mut scopes = Arena::new();
        let root = scopes.alloc(SymbolScope::new(None, ScopeKind::Root));
        Self {
            scopes,
            locals: Arena::new(),
            root,
        }
    }

    /// The root scope
    pub fn root(&self) -> ScopeId {
        self.root
    }

    /// Create a new child scope
    pub fn create_child(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let child = self.scopes.alloc(SymbolScope::new(Some(parent), kind));
        self.scopes[parent].children.push(child);
        child
    }

    /// Scope data
    pub fn scope(&self, id: ScopeId) -> &SymbolScope {
        &self.scopes[id]
    }

    /// Local data
    pub fn local(&self, id: LocalId) -> &LocalSymbol {
        &self.locals[id]
    }

    /// Mutable local data
    pub fn local_mut(&mut self, id: LocalId) -> &mut LocalSymbol {
        &mut self.locals[id]
    }

    /// All locals, in declaration order
    pub fn locals(&self) -> impl Iterator<Item = (LocalId, &LocalSymbol)> {
        self.locals.iter()
    }

    /// Declare a local in a scope
    pub fn add_local(&mut self, local: LocalSymbol) -> LocalId {
        let scope = local.scope;
        let name = local.name;
        let id = self.locals.alloc(local);
        self.bind(scope, name, ScopeEntry::Local(id));
        id
    }

    /// Bind a parameter in a scope
    pub fn add_parameter(&mut self, scope: ScopeId, name: Name, parameter: SymbolId) {
        self.bind(scope, name, ScopeEntry::Parameter(parameter));
    }

    fn bind(&mut self, scope: ScopeId, name: Name, entry: ScopeEntry) {
        let data = &mut self.scopes[scope];
        data.symbols.insert(name, entry);
        data.entries.push(entry);
    }

    /// Resolve a name in a scope, walking up parent scopes
    pub fn resolve(&self, scope: ScopeId, name: Name) -> Option<ScopeEntry> {
        let mut current = Some(scope);
        while let Some(scope_id) = current {
            let data = &self.scopes[scope_id];
            if let Some(entry) = data.symbols.get(&name) {
                return Some(*entry);
            }
            current = data.parent;
        }
        None
    }

    /// Scopes from `scope` up to the root, innermost first
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), |id| self.scopes[*id].parent)
    }
}
