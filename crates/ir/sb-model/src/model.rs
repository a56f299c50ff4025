//! The whole-program aggregate

use crate::ir::{ImplementationKey, SymbolImplementation};
use crate::metadata::{ScriptDependency, ScriptMetadata};
use crate::symbols::{
    IntrinsicType, MemberData, NamespaceData, Symbol, SymbolFilter, SymbolId, SymbolKind,
    TypeData, TypeKind,
};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use sb_arena::Arena;
use sb_intern::{Interner, Name};

/// Named string tables, keyed by resource set name
pub type ResourceTable = IndexMap<String, IndexMap<String, String>>;

/// Symbol graph, lowered bodies and metadata of one compilation
#[derive(Debug)]
pub struct ScriptModel {
    interner: Interner,
    symbols: Arena<Symbol>,
    global: SymbolId,
    namespaces: IndexMap<String, SymbolId>,
    intrinsics: FxHashMap<IntrinsicType, SymbolId>,
    implementations: IndexMap<ImplementationKey, SymbolImplementation>,
    /// Script metadata
    pub metadata: ScriptMetadata,
    /// Referenced scripts
    pub dependencies: Vec<ScriptDependency>,
    /// Resource strings
    pub resources: ResourceTable,
}

impl Default for ScriptModel {
    fn default() -> Self {
        Self::new(Interner::new())
    }
}

impl ScriptModel {
    /// Create a model holding only the global namespace
    pub fn new(interner: Interner) -> Self {
        let mut symbols = Arena::new();
        let empty = interner.intern("");
        let global = symbols.alloc(Symbol::new(
            empty,
            SymbolKind::Namespace(NamespaceData::default()),
        ));
        let mut namespaces = IndexMap::new();
        namespaces.insert(String::new(), global);

        Self {
            interner,
            symbols,
            global,
            namespaces,
            intrinsics: FxHashMap::default(),
            implementations: IndexMap::new(),
            metadata: ScriptMetadata::default(),
            dependencies: Vec::new(),
            resources: IndexMap::new(),
        }
    }

    /// Interner shared with the parse tree and scope trees
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Intern a name
    pub fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    /// Text of an interned name
    pub fn text(&self, name: Name) -> &str {
        self.interner.resolve(name)
    }

    /// The global namespace
    pub fn global_namespace(&self) -> SymbolId {
        self.global
    }

    /// Namespace by dotted name
    pub fn namespace(&self, name: &str) -> Option<SymbolId> {
        self.namespaces.get(name).copied()
    }

    /// Namespace by dotted name, creating it when missing
    pub fn get_or_add_namespace(&mut self, name: &str) -> SymbolId {
        if let Some(id) = self.namespaces.get(name) {
            return *id;
        }
        let mut symbol = Symbol::new(
            self.interner.intern(name),
            SymbolKind::Namespace(NamespaceData::default()),
        );
        symbol.parent = Some(self.global);
        let id = self.symbols.alloc(symbol);
        self.namespaces.insert(name.to_string(), id);
        id
    }

    /// All namespaces in creation order, global first
    pub fn namespaces(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.namespaces.values().copied()
    }

    /// Add a symbol under `parent`, linking it into the parent's child list
    ///
    /// Types are owned by namespaces, members by types and parameters by
    /// members. Anonymous methods record their enclosing member as parent
    /// without being listed.
    pub fn add_symbol(&mut self, parent: SymbolId, mut symbol: Symbol) -> SymbolId {
        symbol.parent = Some(parent);
        let is_type = matches!(symbol.kind, SymbolKind::Type(_));
        let is_member = matches!(symbol.kind, SymbolKind::Member(_));
        let is_parameter = matches!(symbol.kind, SymbolKind::Parameter(_));
        let id = self.symbols.alloc(symbol);

        match &mut self.symbols[parent].kind {
            SymbolKind::Namespace(data) if is_type => data.types.push(id),
            SymbolKind::Type(data) if is_member => data.members.push(id),
            SymbolKind::Member(data) if is_parameter => data.parameters.push(id),
            SymbolKind::Member(_) if is_member => {}
            _ => panic!("symbol {id:?} cannot be owned by {parent:?}"),
        }
        id
    }

    /// Symbol data
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    /// Mutable symbol data
    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id]
    }

    /// Every symbol in allocation order
    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter()
    }

    /// Source name of a symbol
    pub fn name(&self, id: SymbolId) -> &str {
        self.interner.resolve(self.symbols[id].name)
    }

    /// Type data of a type symbol
    pub fn type_data(&self, id: SymbolId) -> Option<&TypeData> {
        self.symbols[id].as_type()
    }

    /// Mutable type data of a type symbol
    pub fn type_data_mut(&mut self, id: SymbolId) -> Option<&mut TypeData> {
        self.symbols[id].as_type_mut()
    }

    /// Member data of a member symbol
    pub fn member_data(&self, id: SymbolId) -> Option<&MemberData> {
        self.symbols[id].as_member()
    }

    /// Mutable member data of a member symbol
    pub fn member_data_mut(&mut self, id: SymbolId) -> Option<&mut MemberData> {
        self.symbols[id].as_member_mut()
    }

    /// Types of a namespace
    pub fn namespace_types(&self, namespace: SymbolId) -> &[SymbolId] {
        match &self.symbols[namespace].kind {
            SymbolKind::Namespace(data) => &data.types,
            _ => &[],
        }
    }

    /// Every type in namespace order, partial fragments included
    pub fn types(&self) -> Vec<SymbolId> {
        self.namespaces()
            .flat_map(|namespace| self.namespace_types(namespace).iter().copied())
            .collect()
    }

    /// Members owned by a type
    pub fn members(&self, ty: SymbolId) -> &[SymbolId] {
        self.type_data(ty).map_or(&[], |data| data.members.as_slice())
    }

    /// Parameters of a member
    pub fn parameters(&self, member: SymbolId) -> &[SymbolId] {
        self.member_data(member)
            .map_or(&[], |data| data.parameters.as_slice())
    }

    /// Type that declares a member, walking out of anonymous methods
    pub fn containing_type(&self, id: SymbolId) -> Option<SymbolId> {
        let mut current = self.symbols[id].parent;
        while let Some(parent) = current {
            if self.symbols[parent].as_type().is_some() {
                return Some(parent);
            }
            current = self.symbols[parent].parent;
        }
        None
    }

    /// Namespace a type is declared in
    pub fn namespace_of(&self, ty: SymbolId) -> Option<SymbolId> {
        self.symbols[ty].parent
    }

    /// Dotted name including the namespace and, for members, the type
    pub fn full_name(&self, id: SymbolId) -> String {
        let symbol = &self.symbols[id];
        let name = self.interner.resolve(symbol.name);
        match symbol.parent {
            Some(parent) if parent != self.global => {
                let prefix = self.full_name(parent);
                if prefix.is_empty() {
                    name.to_string()
                } else {
                    format!("{prefix}.{name}")
                }
            }
            _ => name.to_string(),
        }
    }

    /// Name the symbol is emitted under before renaming: the hint or the source name
    pub fn script_name(&self, id: SymbolId) -> &str {
        let symbol = &self.symbols[id];
        symbol
            .hints
            .script_name
            .as_deref()
            .unwrap_or_else(|| self.interner.resolve(symbol.name))
    }

    /// Final output name: the generated name once assigned, else the script name
    pub fn output_name(&self, id: SymbolId) -> &str {
        match &self.symbols[id].generated_name {
            Some(name) => name,
            None => self.script_name(id),
        }
    }

    /// Assign a symbol's generated name
    ///
    /// # Panics
    ///
    /// Panics if the symbol already has a generated name.
    pub fn set_generated_name(&mut self, id: SymbolId, name: String) {
        let symbol = &mut self.symbols[id];
        if let Some(existing) = &symbol.generated_name {
            panic!("generated name of {id:?} already assigned as '{existing}'");
        }
        symbol.generated_name = Some(name);
    }

    /// Primary fragment of a possibly partial type
    pub fn primary_of(&self, ty: SymbolId) -> SymbolId {
        self.type_data(ty)
            .and_then(|data| data.primary_partial)
            .unwrap_or(ty)
    }

    /// Whether a type is a secondary partial fragment
    pub fn is_secondary_partial(&self, ty: SymbolId) -> bool {
        self.primary_of(ty) != ty
    }

    /// The type followed by its base classes, nearest first
    pub fn base_chain(&self, ty: SymbolId) -> Vec<SymbolId> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(self.primary_of(ty));
        while let Some(id) = current {
            if !seen.insert(id) {
                break;
            }
            chain.push(id);
            current = self.type_data(id).and_then(|data| data.base_class);
        }
        chain
    }

    /// Whether a value of type `from` may be used where `to` is expected
    pub fn is_assignable(&self, from: SymbolId, to: SymbolId) -> bool {
        if from == to || self.resolve_intrinsic_type(IntrinsicType::Object) == Some(to) {
            return true;
        }
        let mut pending = vec![from];
        let mut seen = FxHashSet::default();
        while let Some(current) = pending.pop() {
            if current == to {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(data) = self.type_data(current) {
                pending.extend(data.base_class);
                pending.extend(data.interfaces.iter().copied());
            }
        }
        false
    }

    /// Whether instances of the type are references (may hold `null`)
    pub fn is_reference_type(&self, ty: SymbolId) -> bool {
        match self.type_data(ty) {
            Some(data) => match data.intrinsic {
                Some(kind) => !kind.is_numeric() && kind != IntrinsicType::Boolean,
                None => !matches!(data.kind, TypeKind::Enumeration | TypeKind::Struct),
            },
            None => false,
        }
    }

    /// Members named `name` declared on the type or its bases, nearest first
    ///
    /// Interface types also search the interfaces they extend.
    pub fn members_named(&self, ty: SymbolId, name: Name) -> Vec<SymbolId> {
        let mut found = Vec::new();
        let mut pending = vec![self.primary_of(ty)];
        let mut seen = FxHashSet::default();
        while let Some(current) = pending.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(data) = self.type_data(current) else {
                continue;
            };
            found.extend(
                data.members
                    .iter()
                    .copied()
                    .filter(|member| self.symbols[*member].name == name),
            );
            if data.kind == TypeKind::Interface {
                pending.extend(data.interfaces.iter().rev().copied());
            }
            pending.extend(data.base_class);
        }
        found
    }

    /// First member named `name` on the type or its bases that passes the filter
    pub fn find_member(&self, ty: SymbolId, name: Name, filter: SymbolFilter) -> Option<SymbolId> {
        self.members_named(ty, name)
            .into_iter()
            .find(|member| filter.accepts(&self.symbols[*member]))
    }

    /// Type declared in a namespace; partial fragments resolve to the primary
    pub fn find_type_in_namespace(&self, namespace: SymbolId, name: Name) -> Option<SymbolId> {
        self.namespace_types(namespace)
            .iter()
            .copied()
            .find(|ty| self.symbols[*ty].name == name)
            .map(|ty| self.primary_of(ty))
    }

    /// Register a core library type for an intrinsic kind
    pub fn register_intrinsic(&mut self, kind: IntrinsicType, ty: SymbolId) {
        if let Some(data) = self.type_data_mut(ty) {
            data.intrinsic = Some(kind);
        }
        self.intrinsics.insert(kind, ty);
    }

    /// Type symbol of an intrinsic kind
    pub fn resolve_intrinsic_type(&self, kind: IntrinsicType) -> Option<SymbolId> {
        self.intrinsics.get(&kind).copied()
    }

    /// Intrinsic kind of a type, if it is a core library type
    pub fn intrinsic_kind(&self, ty: SymbolId) -> Option<IntrinsicType> {
        self.type_data(ty).and_then(|data| data.intrinsic)
    }

    /// Store the lowered body of a member
    ///
    /// # Panics
    ///
    /// Panics if the slot is already filled; each body is lowered once.
    pub fn set_implementation(&mut self, key: ImplementationKey, implementation: SymbolImplementation) {
        if self.implementations.contains_key(&key) {
            panic!("implementation {key:?} lowered twice");
        }
        self.implementations.insert(key, implementation);
    }

    /// Lowered body stored under a key
    pub fn implementation(&self, key: ImplementationKey) -> Option<&SymbolImplementation> {
        self.implementations.get(&key)
    }

    /// Whether any body of the member has been lowered
    pub fn has_implementation(&self, member: SymbolId) -> bool {
        self.implementations.keys().any(|key| key.member == member)
    }

    /// All lowered bodies in lowering order
    pub fn implementations(&self) -> impl Iterator<Item = (&ImplementationKey, &SymbolImplementation)> {
        self.implementations.iter()
    }

    /// Remove a lowered body for rewriting; pair with [`Self::restore_implementation`]
    pub fn take_implementation(&mut self, key: ImplementationKey) -> Option<SymbolImplementation> {
        self.implementations.get_mut(&key).map(|slot| SymbolImplementation {
            statements: std::mem::take(&mut slot.statements),
            scope: slot.scope.take(),
            this_identifier: std::mem::take(&mut slot.this_identifier),
        })
    }

    /// Put back a body taken with [`Self::take_implementation`]
    pub fn restore_implementation(&mut self, key: ImplementationKey, implementation: SymbolImplementation) {
        if let Some(slot) = self.implementations.get_mut(&key) {
            *slot = implementation;
        }
    }

    /// Keys of every lowered body
    pub fn implementation_keys(&self) -> Vec<ImplementationKey> {
        self.implementations.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{MemberKind, SymbolFlags};

    fn class(model: &mut ScriptModel, namespace: &str, name: &str) -> SymbolId {
        let namespace = model.get_or_add_namespace(namespace);
        let name = model.intern(name);
        model.add_symbol(
            namespace,
            Symbol::new(name, SymbolKind::Type(TypeData::new(TypeKind::Class, true))),
        )
    }

    fn method(model: &mut ScriptModel, ty: SymbolId, name: &str) -> SymbolId {
        let name = model.intern(name);
        model.add_symbol(
            ty,
            Symbol::new(name, SymbolKind::Member(MemberData::new(MemberKind::Method, None)))
                .with_flags(SymbolFlags::public()),
        )
    }

    #[test]
    fn test_full_name_includes_namespace_and_type() {
        let mut model = ScriptModel::default();
        let widget = class(&mut model, "App.Ui", "Widget");
        let render = method(&mut model, widget, "Render");
        let global = class(&mut model, "", "Loose");

        assert_eq!(model.full_name(widget), "App.Ui.Widget");
        assert_eq!(model.full_name(render), "App.Ui.Widget.Render");
        assert_eq!(model.full_name(global), "Loose");
        assert_eq!(model.containing_type(render), Some(widget));
    }

    #[test]
    fn test_members_named_walks_base_chain_nearest_first() {
        let mut model = ScriptModel::default();
        let shape = class(&mut model, "App", "Shape");
        let circle = class(&mut model, "App", "Circle");
        model.type_data_mut(circle).unwrap().base_class = Some(shape);
        let base_draw = method(&mut model, shape, "Draw");
        let derived_draw = method(&mut model, circle, "Draw");

        let draw = model.intern("Draw");
        assert_eq!(model.members_named(circle, draw), vec![derived_draw, base_draw]);
        assert_eq!(
            model.find_member(circle, draw, SymbolFilter::INSTANCE_MEMBERS),
            Some(derived_draw)
        );
        assert!(model.is_assignable(circle, shape));
        assert!(!model.is_assignable(shape, circle));
    }

    #[test]
    fn test_output_name_prefers_generated_then_hint() {
        let mut model = ScriptModel::default();
        let widget = class(&mut model, "App", "Widget");
        assert_eq!(model.output_name(widget), "Widget");

        model.symbol_mut(widget).hints.script_name = Some("widget".to_string());
        assert_eq!(model.output_name(widget), "widget");

        model.set_generated_name(widget, "$a".to_string());
        assert_eq!(model.output_name(widget), "$a");
        assert_eq!(model.script_name(widget), "widget");
    }

    #[test]
    #[should_panic(expected = "already assigned")]
    fn test_generated_name_is_assigned_once() {
        let mut model = ScriptModel::default();
        let widget = class(&mut model, "App", "Widget");
        model.set_generated_name(widget, "a".to_string());
        model.set_generated_name(widget, "b".to_string());
    }
}
