//! Symbol lookup through scopes, types and namespaces

use crate::table::LocalSymbolTable;
use sb_model::{IntrinsicType, LocalId, ScopeEntry, ScriptModel, SymbolFilter, SymbolId};

/// Namespace holding the core library types
pub const CORE_NAMESPACE: &str = "System";

/// What a simple name resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// Local variable of the body being lowered
    Local(LocalId),
    /// Parameter of the member or an enclosing anonymous method
    Parameter(SymbolId),
    /// Member of the enclosing type or one of its bases
    Member(SymbolId),
    /// Type
    Type(SymbolId),
}

/// Find the symbol a simple name refers to
///
/// Searches the scope chain of `locals` outward to the root, then the
/// members of `context` and its base classes, then the types visible from
/// `context`'s namespace. The first match accepted by `filter` wins.
///
/// Lookups only happen while a body is being lowered, so a local table
/// with an active scope is always supplied.
pub fn find_symbol(
    model: &ScriptModel,
    locals: &LocalSymbolTable,
    name: &str,
    context: Option<SymbolId>,
    filter: SymbolFilter,
) -> Option<Resolved> {
    let interned = model.interner().get(name)?;

    if filter.locals {
        if let Some(entry) = locals.find_local(interned) {
            return Some(match entry {
                ScopeEntry::Local(local) => Resolved::Local(local),
                ScopeEntry::Parameter(parameter) => Resolved::Parameter(parameter),
            });
        }
    }

    if filter.instance_members || filter.static_members {
        if let Some(member) =
            context.and_then(|ty| model.find_member(ty, interned, filter))
        {
            return Some(Resolved::Member(member));
        }
    }

    if filter.types {
        if let Some(ty) = resolve_type_name(model, name, context) {
            return Some(Resolved::Type(ty));
        }
    }

    None
}

/// Resolve a type name as written in source
///
/// Accepts keywords (`int`), array types (`T[]`), dotted names and simple
/// names. Simple names search the enclosing namespaces of `context` from
/// the innermost out, then the namespaces imported where `context` was
/// declared, then the core library namespace.
pub fn resolve_type_name(
    model: &ScriptModel,
    name: &str,
    context: Option<SymbolId>,
) -> Option<SymbolId> {
    let name = name.trim();
    if name.ends_with("[]") {
        return model.resolve_intrinsic_type(IntrinsicType::Array);
    }
    if let Some(kind) = IntrinsicType::from_keyword(name) {
        return model.resolve_intrinsic_type(kind);
    }

    if let Some((namespace, simple)) = name.rsplit_once('.') {
        let namespace = model.namespace(namespace)?;
        let simple = model.interner().get(simple)?;
        return model.find_type_in_namespace(namespace, simple);
    }

    let simple = model.interner().get(name)?;
    candidate_namespaces(model, context)
        .into_iter()
        .find_map(|namespace| model.find_type_in_namespace(namespace, simple))
}

/// Namespaces searched for simple type names, in search order
fn candidate_namespaces(model: &ScriptModel, context: Option<SymbolId>) -> Vec<SymbolId> {
    let mut namespaces = Vec::new();
    let context_type = context.map(|id| model.primary_of(id));

    if let Some(namespace) = context_type.and_then(|ty| model.namespace_of(ty)) {
        let mut path = model.name(namespace).to_string();
        loop {
            if let Some(id) = model.namespace(&path) {
                namespaces.push(id);
            }
            match path.rfind('.') {
                Some(dot) => path.truncate(dot),
                None if !path.is_empty() => path.clear(),
                None => break,
            }
        }
    }

    if let Some(data) = context_type.and_then(|ty| model.type_data(ty)) {
        namespaces.extend(data.imports.iter().copied());
    }

    let global = model.global_namespace();
    if !namespaces.contains(&global) {
        namespaces.push(global);
    }
    if let Some(core) = model.namespace(CORE_NAMESPACE) {
        namespaces.push(core);
    }
    namespaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_model::{
        MemberData, MemberKind, ScopeKind, Symbol, SymbolFlags, SymbolKind, TypeData, TypeKind,
    };
    use sb_span::FileSpan;

    fn add_type(model: &mut ScriptModel, namespace: &str, name: &str) -> SymbolId {
        let namespace = model.get_or_add_namespace(namespace);
        let name = model.intern(name);
        model.add_symbol(
            namespace,
            Symbol::new(name, SymbolKind::Type(TypeData::new(TypeKind::Class, true))),
        )
    }

    #[test]
    fn test_simple_names_search_enclosing_namespaces_first() {
        let mut model = ScriptModel::default();
        let outer = add_type(&mut model, "App", "Widget");
        let inner = add_type(&mut model, "App.Controls", "Widget");
        let host = add_type(&mut model, "App.Controls", "Host");
        let lonely = add_type(&mut model, "App.Other", "Lonely");

        assert_eq!(resolve_type_name(&model, "Widget", Some(host)), Some(inner));
        assert_eq!(resolve_type_name(&model, "Widget", Some(lonely)), Some(outer));
        assert_eq!(resolve_type_name(&model, "App.Widget", None), Some(outer));
        assert_eq!(resolve_type_name(&model, "Missing", Some(host)), None);
    }

    #[test]
    fn test_imports_are_searched_after_enclosing_namespaces() {
        let mut model = ScriptModel::default();
        let element = add_type(&mut model, "Web.Html", "Element");
        let page = add_type(&mut model, "App", "Page");
        assert_eq!(resolve_type_name(&model, "Element", Some(page)), None);

        let html = model.get_or_add_namespace("Web.Html");
        model.type_data_mut(page).unwrap().imports.push(html);
        assert_eq!(resolve_type_name(&model, "Element", Some(page)), Some(element));
    }

    #[test]
    fn test_locals_shadow_members_and_members_shadow_types() {
        let mut model = ScriptModel::default();
        let shape = add_type(&mut model, "App", "Shape");
        let _other = add_type(&mut model, "App", "count");
        let name = model.intern("count");
        let field = model.add_symbol(
            shape,
            Symbol::new(name, SymbolKind::Member(MemberData::new(MemberKind::Field, None)))
                .with_flags(SymbolFlags::public()),
        );

        let mut table = LocalSymbolTable::new();
        assert_eq!(
            find_symbol(&model, &table, "count", Some(shape), SymbolFilter::ALL),
            Some(Resolved::Member(field))
        );
        assert_eq!(
            find_symbol(&model, &table, "count", Some(shape), SymbolFilter::STATIC_MEMBERS),
            None
        );

        let local = table.add_local(name, None, FileSpan::default());
        assert_eq!(
            find_symbol(&model, &table, "count", Some(shape), SymbolFilter::ALL),
            Some(Resolved::Local(local))
        );
        assert!(matches!(
            find_symbol(&model, &table, "count", Some(shape), SymbolFilter::TYPES),
            Some(Resolved::Type(_))
        ));
    }

    #[test]
    fn test_popped_scopes_are_no_longer_searched() {
        let mut model = ScriptModel::default();
        let shape = add_type(&mut model, "App", "Shape");
        let name = model.intern("total");

        let mut table = LocalSymbolTable::new();
        table.push_scope(ScopeKind::Block);
        let local = table.add_local(name, None, FileSpan::default());
        assert_eq!(
            find_symbol(&model, &table, "total", Some(shape), SymbolFilter::ALL),
            Some(Resolved::Local(local))
        );

        table.pop_scope();
        assert_eq!(
            find_symbol(&model, &table, "total", Some(shape), SymbolFilter::ALL),
            None
        );
    }
}
