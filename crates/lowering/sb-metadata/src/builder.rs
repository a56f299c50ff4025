//! Declares application symbols from compilation units

use crate::validate::field_declarator;
use sb_diagnostics::{CompileError, Diagnostic, ErrorReporter};
use sb_model::{
    MemberData, MemberKind, NamingHints, ParameterData, ScriptModel, Symbol, SymbolFlags,
    SymbolId, SymbolKind, TypeData, TypeKind,
};
use sb_resolve::resolve_type_name;
use sb_span::FileSpan;
use sb_syntax::{
    CompilationUnit, EnumValueDecl, Hints, MemberDecl, ParameterDecl, TypeDecl, TypeDeclKind,
    TypeRef, Visibility,
};
use std::sync::Arc;

/// Name given to constructor symbols
pub const CONSTRUCTOR_NAME: &str = ".ctor";

/// Name given to indexer symbols
pub const INDEXER_NAME: &str = "Item";

/// Implicit last parameter of property, indexer and event members
pub const VALUE_PARAMETER_NAME: &str = "value";

/// A type declaration together with where it was declared
struct DeclaredType<'unit> {
    id: SymbolId,
    decl: &'unit TypeDecl,
    usings: &'unit [String],
}

/// Builds the application part of the symbol graph
///
/// Building runs in phases so that every declaration can refer to every
/// other one regardless of source order: types are declared first, then
/// imports and base types are resolved, then members are created and
/// finally overrides and interface implementations are linked.
pub struct MetadataBuilder<'a, R: ErrorReporter> {
    model: &'a mut ScriptModel,
    reporter: &'a mut R,
}

impl<'a, R: ErrorReporter> MetadataBuilder<'a, R> {
    /// Create a builder writing into `model`
    pub fn new(model: &'a mut ScriptModel, reporter: &'a mut R) -> Self {
        Self { model, reporter }
    }

    /// Declare every symbol of the units, returning the application types
    ///
    /// Secondary partial fragments are not part of the result; their
    /// members are owned by the primary fragment.
    pub fn build(mut self, units: &[CompilationUnit]) -> Vec<SymbolId> {
        let _span = tracing::info_span!("build_metadata", units = units.len()).entered();

        let declared = self.declare_types(units);
        for declared_type in &declared {
            self.resolve_imports(declared_type);
        }
        for declared_type in &declared {
            self.resolve_base_types(declared_type);
        }
        for declared_type in &declared {
            self.build_members(declared_type);
        }

        let types: Vec<SymbolId> = declared
            .iter()
            .map(|declared_type| declared_type.id)
            .filter(|ty| !self.model.is_secondary_partial(*ty))
            .collect();
        self.link_members(&types);

        tracing::debug!(types = types.len(), "application types declared");
        types
    }

    fn declare_types<'unit>(&mut self, units: &'unit [CompilationUnit]) -> Vec<DeclaredType<'unit>> {
        let mut declared = Vec::new();
        for unit in units {
            for namespace in &unit.namespaces {
                let namespace_id = self.model.get_or_add_namespace(&namespace.name);
                for decl in &namespace.types {
                    let id = self.declare_type(namespace_id, decl);
                    declared.push(DeclaredType {
                        id,
                        decl,
                        usings: &unit.usings,
                    });
                }
            }
        }
        declared
    }

    fn declare_type(&mut self, namespace: SymbolId, decl: &TypeDecl) -> SymbolId {
        let name = self.model.intern(&decl.name);
        let primary = if decl.modifiers.is_partial {
            self.model
                .find_type_in_namespace(namespace, name)
                .filter(|ty| {
                    self.model
                        .type_data(*ty)
                        .is_some_and(|data| data.primary_partial.is_some())
                })
        } else {
            None
        };

        let kind = match decl.kind {
            TypeDeclKind::Class => TypeKind::Class,
            TypeDeclKind::Interface => TypeKind::Interface,
            TypeDeclKind::Enum => TypeKind::Enumeration,
            TypeDeclKind::Delegate => TypeKind::Delegate,
            TypeDeclKind::Struct => TypeKind::Struct,
        };
        let mut data = TypeData::new(kind, !decl.hints.imported);
        data.named_values = decl.hints.named_values;

        let symbol = Symbol::new(name, SymbolKind::Type(data))
            .with_flags(SymbolFlags::from(&decl.modifiers))
            .with_hints(NamingHints::from(&decl.hints))
            .with_span(decl.span);
        let id = self.model.add_symbol(namespace, symbol);

        if decl.modifiers.is_partial {
            if let Some(data) = self.model.type_data_mut(id) {
                data.primary_partial = Some(primary.unwrap_or(id));
            }
        }
        tracing::debug!(ty = %self.model.full_name(id), partial = primary.is_some(), "declared type");
        id
    }

    fn resolve_imports(&mut self, declared: &DeclaredType<'_>) {
        let primary = self.model.primary_of(declared.id);
        for using in declared.usings {
            let Some(namespace) = self.model.namespace(using) else {
                tracing::warn!(namespace = %using, "imported namespace declares no types");
                continue;
            };
            if let Some(data) = self.model.type_data_mut(primary) {
                if !data.imports.contains(&namespace) {
                    data.imports.push(namespace);
                }
            }
        }
    }

    fn resolve_base_types(&mut self, declared: &DeclaredType<'_>) {
        let primary = self.model.primary_of(declared.id);
        let Some(kind) = self.model.type_data(primary).map(|data| data.kind) else {
            return;
        };
        if matches!(kind, TypeKind::Enumeration | TypeKind::Delegate) {
            return;
        }

        for (position, base) in declared.decl.base_types.iter().enumerate() {
            let Some(base_type) = self.resolve_type(base, primary) else {
                continue;
            };
            let base_is_class = self
                .model
                .type_data(base_type)
                .is_some_and(|data| data.kind == TypeKind::Class);
            let Some(data) = self.model.type_data_mut(primary) else {
                continue;
            };
            if position == 0 && base_is_class && kind == TypeKind::Class {
                data.base_class = Some(base_type);
            } else if !data.interfaces.contains(&base_type) {
                data.interfaces.push(base_type);
            }
        }
    }

    fn build_members(&mut self, declared: &DeclaredType<'_>) {
        let owner = self.model.primary_of(declared.id);
        let decl = declared.decl;
        let is_interface = decl.kind == TypeDeclKind::Interface;

        if decl.kind == TypeDeclKind::Enum {
            self.build_enum_fields(owner, &decl.enum_values);
            return;
        }

        for member in &decl.members {
            let mut flags = SymbolFlags::from(member.modifiers());
            if is_interface {
                flags.visibility = Visibility::Public;
                flags.is_abstract = true;
            }
            self.build_member(owner, member, flags);
        }
    }

    fn build_member(&mut self, owner: SymbolId, member: &MemberDecl, flags: SymbolFlags) {
        let context = Arc::new(member.clone());
        match member {
            MemberDecl::Field(field) => {
                let declarator = match field_declarator(field) {
                    Ok(declarator) => declarator,
                    Err(diagnostic) => {
                        self.reporter.report(diagnostic);
                        match field.declarators.first() {
                            Some(declarator) => declarator,
                            None => return,
                        }
                    }
                };
                let ty = self.resolve_type(&field.ty, owner);
                self.add_member(
                    owner,
                    &declarator.name,
                    MemberData::new(MemberKind::Field, ty).with_parse_context(context),
                    flags,
                    &field.hints,
                    field.span,
                    &[],
                );
            }
            MemberDecl::Method(method) => {
                let ty = self.resolve_return_type(&method.return_type, owner);
                self.add_member(
                    owner,
                    &method.name,
                    MemberData::new(MemberKind::Method, ty).with_parse_context(context),
                    flags,
                    &method.hints,
                    method.span,
                    &method.parameters,
                );
            }
            MemberDecl::Constructor(constructor) => {
                self.add_member(
                    owner,
                    CONSTRUCTOR_NAME,
                    MemberData::new(MemberKind::Constructor, None).with_parse_context(context),
                    flags,
                    &Hints::default(),
                    constructor.span,
                    &constructor.parameters,
                );
            }
            MemberDecl::Property(property) => {
                let ty = self.resolve_type(&property.ty, owner);
                let member = self.add_member(
                    owner,
                    &property.name,
                    MemberData::new(MemberKind::Property, ty).with_parse_context(context),
                    flags,
                    &property.hints,
                    property.span,
                    &[],
                );
                self.add_value_parameter(member, ty);
            }
            MemberDecl::Indexer(indexer) => {
                let ty = self.resolve_type(&indexer.ty, owner);
                let member = self.add_member(
                    owner,
                    INDEXER_NAME,
                    MemberData::new(MemberKind::Indexer, ty).with_parse_context(context),
                    flags,
                    &indexer.hints,
                    indexer.span,
                    &indexer.parameters,
                );
                self.add_value_parameter(member, ty);
            }
            MemberDecl::Event(event) => {
                let ty = self.resolve_type(&event.ty, owner);
                let member = self.add_member(
                    owner,
                    &event.name,
                    MemberData::new(MemberKind::Event, ty).with_parse_context(context),
                    flags,
                    &event.hints,
                    event.span,
                    &[],
                );
                self.add_value_parameter(member, ty);
            }
        }
    }

    #[allow(clippy::too_many_arguments, reason = "mirrors the fields of a member symbol")]
    fn add_member(
        &mut self,
        owner: SymbolId,
        name: &str,
        data: MemberData,
        flags: SymbolFlags,
        hints: &Hints,
        span: FileSpan,
        parameters: &[ParameterDecl],
    ) -> SymbolId {
        let name = self.model.intern(name);
        let member = self.model.add_symbol(
            owner,
            Symbol::new(name, SymbolKind::Member(data))
                .with_flags(flags)
                .with_hints(NamingHints::from(hints))
                .with_span(span),
        );

        for (position, parameter) in parameters.iter().enumerate() {
            let ty = self.resolve_type(&parameter.ty, owner);
            let name = self.model.intern(&parameter.name);
            self.model.add_symbol(
                member,
                Symbol::new(name, SymbolKind::Parameter(ParameterData { ty, position }))
                    .with_span(parameter.span),
            );
        }
        member
    }

    /// Append the implicit `value` parameter of setters and event accessors
    fn add_value_parameter(&mut self, member: SymbolId, ty: Option<SymbolId>) {
        let position = self.model.parameters(member).len();
        let name = self.model.intern(VALUE_PARAMETER_NAME);
        self.model.add_symbol(
            member,
            Symbol::new(name, SymbolKind::Parameter(ParameterData { ty, position })),
        );
    }

    fn build_enum_fields(&mut self, owner: SymbolId, values: &[EnumValueDecl]) {
        let flags = SymbolFlags {
            is_static: true,
            ..SymbolFlags::public()
        };
        let mut next = 0_i64;
        for value in values {
            let number = value.value.unwrap_or(next);
            next = number.wrapping_add(1);
            let name = self.model.intern(&value.name);
            self.model.add_symbol(
                owner,
                Symbol::new(
                    name,
                    SymbolKind::Member(MemberData::new(
                        MemberKind::EnumField { value: number },
                        Some(owner),
                    )),
                )
                .with_flags(flags)
                .with_span(value.span),
            );
        }
    }

    /// Link overriding members to their base members and class members to
    /// the interface members they implement
    fn link_members(&mut self, types: &[SymbolId]) {
        for &ty in types {
            let Some(data) = self.model.type_data(ty) else {
                continue;
            };
            if data.kind == TypeKind::Interface {
                continue;
            }
            let base_class = data.base_class;
            let interfaces = self.all_interfaces(ty);

            for member in self.model.members(ty).to_vec() {
                let symbol = self.model.symbol(member);
                let is_override = symbol.flags.is_override;
                let name = symbol.name;
                let arity = self.model.parameters(member).len();

                let overridden = if is_override {
                    let found = base_class.and_then(|base| self.find_matching(base, name, arity));
                    if found.is_none() {
                        self.reporter.report(Diagnostic::at(
                            CompileError::General {
                                message: format!(
                                    "'{}' is marked override but no suitable base member was found",
                                    self.model.full_name(member)
                                ),
                            },
                            symbol.span,
                        ));
                    }
                    found
                } else {
                    None
                };

                let interface_member = interfaces
                    .iter()
                    .find_map(|interface| self.find_declared(*interface, name, arity));

                if let Some(data) = self.model.member_data_mut(member) {
                    data.overridden = overridden;
                    data.interface_member = interface_member;
                }
            }
        }
    }

    /// Interfaces implemented by a type, its bases and their base interfaces
    fn all_interfaces(&self, ty: SymbolId) -> Vec<SymbolId> {
        let mut pending: Vec<SymbolId> = self
            .model
            .base_chain(ty)
            .into_iter()
            .filter_map(|class| self.model.type_data(class))
            .flat_map(|data| data.interfaces.iter().copied())
            .collect();
        let mut found = Vec::new();
        while let Some(interface) = pending.pop() {
            if found.contains(&interface) {
                continue;
            }
            found.push(interface);
            if let Some(data) = self.model.type_data(interface) {
                pending.extend(data.interfaces.iter().copied());
            }
        }
        found
    }

    /// Member with the given name and arity on `ty` or its bases
    fn find_matching(&self, ty: SymbolId, name: sb_intern::Name, arity: usize) -> Option<SymbolId> {
        self.model
            .base_chain(ty)
            .into_iter()
            .find_map(|class| self.find_declared(class, name, arity))
    }

    /// Member with the given name and arity declared directly on `ty`
    fn find_declared(&self, ty: SymbolId, name: sb_intern::Name, arity: usize) -> Option<SymbolId> {
        self.model.members(ty).iter().copied().find(|member| {
            self.model.symbol(*member).name == name
                && self.model.parameters(*member).len() == arity
        })
    }

    fn resolve_return_type(&mut self, ty: &TypeRef, context: SymbolId) -> Option<SymbolId> {
        if ty.name == "void" {
            return None;
        }
        self.resolve_type(ty, context)
    }

    fn resolve_type(&mut self, ty: &TypeRef, context: SymbolId) -> Option<SymbolId> {
        let resolved = resolve_type_name(self.model, &ty.name, Some(context));
        if resolved.is_none() {
            self.reporter.report(Diagnostic::at(
                CompileError::UnresolvedType {
                    name: ty.name.clone(),
                },
                ty.span,
            ));
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_library::{CoreLibrary, MetadataImporter};
    use sb_diagnostics::DiagnosticBag;
    use sb_syntax::{
        ConstructorDecl, Expr, FieldDecl, MethodDecl, Modifiers, NamespaceDecl, PropertyDecl,
        VariableDeclarator,
    };

    fn build(units: &[CompilationUnit]) -> (ScriptModel, DiagnosticBag, Vec<SymbolId>) {
        let mut model = ScriptModel::default();
        CoreLibrary.import(&mut model);
        let mut bag = DiagnosticBag::new();
        let types = MetadataBuilder::new(&mut model, &mut bag).build(units);
        (model, bag, types)
    }

    fn find(model: &ScriptModel, ty: SymbolId, name: &str) -> SymbolId {
        let name = model.intern(name);
        model
            .members(ty)
            .iter()
            .copied()
            .find(|member| model.symbol(*member).name == name)
            .unwrap()
    }

    #[test]
    fn test_types_members_and_base_classes_are_declared() {
        let unit = CompilationUnit::with_namespace(NamespaceDecl::new(
            "App",
            vec![
                TypeDecl::class("Circle")
                    .extends("Shape")
                    .with_member(ConstructorDecl::new()),
                TypeDecl::class("Shape")
                    .with_member(FieldDecl::new("count", "int"))
                    .with_member(MethodDecl::new("Area", "double").with_parameter("scale", "int")),
            ],
        ));
        let (model, bag, types) = build(&[unit]);

        assert!(!bag.has_errors(), "{:?}", bag.diagnostics());
        let [circle, shape] = types.as_slice() else {
            panic!("expected two types, got {types:?}");
        };
        assert_eq!(model.type_data(*circle).unwrap().base_class, Some(*shape));

        let count = find(&model, *shape, "count");
        let int = model.resolve_intrinsic_type(sb_model::IntrinsicType::Integer);
        assert_eq!(model.member_data(count).unwrap().ty, int);

        let area = find(&model, *shape, "Area");
        assert_eq!(model.parameters(area).len(), 1);
        assert!(model.member_data(area).unwrap().parse_context.is_some());
    }

    #[test]
    fn test_partial_fragments_merge_into_primary() {
        let first = CompilationUnit::with_namespace(NamespaceDecl::new(
            "App",
            vec![TypeDecl::class("Page")
                .with_modifiers(Modifiers::default().public().with_partial())
                .with_member(FieldDecl::new("title", "string"))],
        ));
        let second = CompilationUnit::with_namespace(NamespaceDecl::new(
            "App",
            vec![TypeDecl::class("Page")
                .with_modifiers(Modifiers::default().public().with_partial())
                .with_member(MethodDecl::new("Render", "void"))],
        ))
        .using("System");

        let (model, bag, types) = build(&[first, second]);
        assert!(!bag.has_errors());
        assert_eq!(types.len(), 1);

        let page = types[0];
        assert_eq!(model.type_data(page).unwrap().primary_partial, Some(page));
        assert_eq!(model.members(page).len(), 2);
        assert_eq!(model.type_data(page).unwrap().imports.len(), 1);

        let fragments: Vec<_> = model
            .types()
            .into_iter()
            .filter(|ty| model.name(*ty) == "Page")
            .collect();
        assert_eq!(fragments.len(), 2);
        assert!(model.is_secondary_partial(fragments[1]));
        assert!(model.members(fragments[1]).is_empty());
    }

    #[test]
    fn test_enum_values_continue_from_explicit_values() {
        let mut color = TypeDecl::enumeration("Color", &["Red", "Green", "Blue"]);
        color.enum_values[1].value = Some(10);
        let unit = CompilationUnit::with_namespace(NamespaceDecl::new("App", vec![color]));
        let (model, _, types) = build(&[unit]);

        let values: Vec<_> = model
            .members(types[0])
            .iter()
            .map(|member| model.member_data(*member).unwrap().kind)
            .collect();
        assert_eq!(
            values,
            vec![
                MemberKind::EnumField { value: 0 },
                MemberKind::EnumField { value: 10 },
                MemberKind::EnumField { value: 11 },
            ]
        );
    }

    #[test]
    fn test_multiple_field_declarators_are_reported() {
        let mut field = FieldDecl::new("x", "int").with_value(Expr::int(1));
        field.declarators.push(VariableDeclarator {
            name: "y".to_string(),
            value: None,
            span: FileSpan::default(),
        });
        let unit = CompilationUnit::with_namespace(NamespaceDecl::new(
            "App",
            vec![TypeDecl::class("Point").with_member(field)],
        ));
        let (model, bag, types) = build(&[unit]);

        assert_eq!(bag.len(), 1);
        assert!(matches!(
            bag.diagnostics()[0].error,
            CompileError::MultipleFieldDeclarators { .. }
        ));
        assert_eq!(model.members(types[0]).len(), 1);
    }

    #[test]
    fn test_unresolved_member_type_is_reported() {
        let unit = CompilationUnit::with_namespace(NamespaceDecl::new(
            "App",
            vec![TypeDecl::class("Holder").with_member(FieldDecl::new("gadget", "Gadget"))],
        ));
        let (_, bag, _) = build(&[unit]);
        assert_eq!(
            bag.diagnostics()[0].error,
            CompileError::UnresolvedType {
                name: "Gadget".to_string()
            }
        );
    }

    #[test]
    fn test_overrides_and_interface_members_are_linked() {
        let unit = CompilationUnit::with_namespace(NamespaceDecl::new(
            "App",
            vec![
                TypeDecl::interface("IDrawable")
                    .with_member(MethodDecl::new("Draw", "void").without_body()),
                TypeDecl::class("Shape").extends("IDrawable").with_member(
                    MethodDecl::new("Draw", "void")
                        .with_modifiers(Modifiers::default().public().with_virtual()),
                ),
                TypeDecl::class("Circle").extends("Shape").with_member(
                    MethodDecl::new("Draw", "void")
                        .with_modifiers(Modifiers::default().public().with_override()),
                ),
                TypeDecl::class("Label")
                    .with_member(PropertyDecl::new("Text", "string").with_getter(vec![])),
            ],
        ));
        let (model, bag, types) = build(&[unit]);
        assert!(!bag.has_errors(), "{:?}", bag.diagnostics());

        let interface_draw = find(&model, types[0], "Draw");
        let shape_draw = find(&model, types[1], "Draw");
        let circle_draw = find(&model, types[2], "Draw");

        assert_eq!(model.member_data(circle_draw).unwrap().overridden, Some(shape_draw));
        assert_eq!(
            model.member_data(shape_draw).unwrap().interface_member,
            Some(interface_draw)
        );
        assert_eq!(
            model.member_data(circle_draw).unwrap().interface_member,
            Some(interface_draw)
        );
        assert!(model.symbol(interface_draw).is_public());

        let text = find(&model, types[3], "Text");
        let parameters = model.parameters(text);
        assert_eq!(parameters.len(), 1);
        assert_eq!(model.name(parameters[0]), VALUE_PARAMETER_NAME);
    }
}
