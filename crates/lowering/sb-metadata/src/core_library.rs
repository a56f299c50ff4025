//! Built-in metadata for the core library

use sb_model::{
    IntrinsicType, MemberData, MemberKind, NamingHints, ParameterData, ScriptModel, Symbol,
    SymbolFlags, SymbolId, SymbolKind, TypeData, TypeKind,
};
use sb_resolve::lookup::CORE_NAMESPACE;

/// Source of reference-only type information
///
/// Importers add imported (non-application) types to the model before the
/// application's own declarations are built.
pub trait MetadataImporter {
    /// Install the importer's symbols into the model
    fn import(&self, model: &mut ScriptModel);
}

/// The core library: intrinsic types and the `Script` helper class
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreLibrary;

impl MetadataImporter for CoreLibrary {
    fn import(&self, model: &mut ScriptModel) {
        let namespace = model.get_or_add_namespace(CORE_NAMESPACE);

        let mut object = None;
        for kind in IntrinsicType::ALL {
            let ty = add_type(model, namespace, kind.type_name(), TypeKind::Class);
            model.register_intrinsic(kind, ty);
            if kind == IntrinsicType::Object {
                object = Some(ty);
            }
        }

        if let Some(object) = object {
            for kind in IntrinsicType::ALL {
                if matches!(kind, IntrinsicType::Object | IntrinsicType::Void) {
                    continue;
                }
                let Some(ty) = model.resolve_intrinsic_type(kind) else {
                    continue;
                };
                if let Some(data) = model.type_data_mut(ty) {
                    data.base_class = Some(object);
                }
            }
        }

        let string = model.resolve_intrinsic_type(IntrinsicType::String);
        let int = model.resolve_intrinsic_type(IntrinsicType::Integer);
        let boolean = model.resolve_intrinsic_type(IntrinsicType::Boolean);
        let function = model.resolve_intrinsic_type(IntrinsicType::Function);

        if let Some(object) = object {
            add_method(model, object, "ToString", &[], string, SymbolFlags::public());
        }
        if let Some(string_type) = string {
            add_property(model, string_type, "Length", int);
        }
        if let Some(array) = model.resolve_intrinsic_type(IntrinsicType::Array) {
            add_property(model, array, "Length", int);
        }

        let script = add_type(model, namespace, "Script", TypeKind::Class);
        let statics = SymbolFlags {
            is_static: true,
            ..SymbolFlags::public()
        };
        add_method(model, script, "IsNull", &[("o", object)], boolean, statics);
        add_method(model, script, "IsValue", &[("o", object)], boolean, statics);
        add_method(model, script, "Eval", &[("s", string)], object, statics);
        add_method(
            model,
            script,
            "SetTimeout",
            &[("callback", function), ("milliseconds", int)],
            int,
            statics,
        );
        tracing::debug!(types = model.namespace_types(namespace).len(), "core library installed");
    }
}

fn add_type(model: &mut ScriptModel, namespace: SymbolId, name: &str, kind: TypeKind) -> SymbolId {
    let name = model.intern(name);
    model.add_symbol(
        namespace,
        Symbol::new(name, SymbolKind::Type(TypeData::new(kind, false)))
            .with_flags(SymbolFlags::public())
            .with_hints(NamingHints {
                script_name: None,
                preserve_name: true,
            }),
    )
}

fn add_method(
    model: &mut ScriptModel,
    owner: SymbolId,
    name: &str,
    parameters: &[(&str, Option<SymbolId>)],
    returns: Option<SymbolId>,
    flags: SymbolFlags,
) -> SymbolId {
    let name = model.intern(name);
    let method = model.add_symbol(
        owner,
        Symbol::new(
            name,
            SymbolKind::Member(MemberData::new(MemberKind::Method, returns)),
        )
        .with_flags(flags),
    );
    for (position, (parameter, ty)) in parameters.iter().enumerate() {
        let parameter = model.intern(parameter);
        model.add_symbol(
            method,
            Symbol::new(
                parameter,
                SymbolKind::Parameter(ParameterData { ty: *ty, position }),
            ),
        );
    }
    method
}

fn add_property(model: &mut ScriptModel, owner: SymbolId, name: &str, ty: Option<SymbolId>) {
    let name = model.intern(name);
    model.add_symbol(
        owner,
        Symbol::new(name, SymbolKind::Member(MemberData::new(MemberKind::Property, ty)))
            .with_flags(SymbolFlags::public()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_model::SymbolFilter;

    #[test]
    fn test_intrinsics_resolve_after_import() {
        let mut model = ScriptModel::default();
        CoreLibrary.import(&mut model);

        let int = model.resolve_intrinsic_type(IntrinsicType::Integer).unwrap();
        assert_eq!(model.full_name(int), "System.Int32");
        assert!(!model.type_data(int).unwrap().is_application);
        assert_eq!(model.intrinsic_kind(int), Some(IntrinsicType::Integer));

        let object = model.resolve_intrinsic_type(IntrinsicType::Object).unwrap();
        assert_eq!(model.type_data(int).unwrap().base_class, Some(object));
        assert_eq!(model.type_data(object).unwrap().base_class, None);
    }

    #[test]
    fn test_core_members_are_inherited_from_object() {
        let mut model = ScriptModel::default();
        CoreLibrary.import(&mut model);

        let string = model.resolve_intrinsic_type(IntrinsicType::String).unwrap();
        let to_string = model.intern("ToString");
        let length = model.intern("Length");
        assert!(model.find_member(string, to_string, SymbolFilter::INSTANCE_MEMBERS).is_some());
        assert!(model.find_member(string, length, SymbolFilter::INSTANCE_MEMBERS).is_some());
    }
}
