//! Short names for minimized output

use crate::names::NameGenerator;
use crate::transformer::SymbolTransformer;
use rustc_hash::FxHashSet;
use sb_diagnostics::Diagnostic;
use sb_model::{MemberKind, ScriptModel, SymbolId, SymbolKind, TypeKind};

/// Naming strategy for minimized output
///
/// Names visible outside the program are kept: public members of public
/// types, interface members, members of imported types and anything
/// carrying a naming hint. Everything else is packed into the shortest
/// identifiers that cannot collide with a kept name or with a name visible
/// along the base chain. Overloads of a method share one name. Members of
/// unrelated types may end up with the same short name.
#[derive(Debug, Default)]
pub struct SymbolObfuscator {
    names: NameGenerator,
    types: NameGenerator,
    type_count: usize,
}

impl SymbolObfuscator {
    /// Strategy with only the reserved words taken
    pub fn new() -> Self {
        Self::default()
    }

    /// Output names in use by other members along the inheritance graph of `owner`
    fn names_in_use(model: &ScriptModel, owner: SymbolId, member: SymbolId) -> FxHashSet<String> {
        let mut related = model.base_chain(owner);
        let mut index = 0;
        while index < related.len() {
            if let Some(data) = model.type_data(related[index]) {
                for interface in &data.interfaces {
                    if !related.contains(interface) {
                        related.push(*interface);
                    }
                }
            }
            index += 1;
        }

        related
            .iter()
            .flat_map(|ty| model.members(*ty).iter().copied())
            .filter(|other| *other != member)
            .filter_map(|other| model.symbol(other).generated_name.clone())
            .collect()
    }

    /// Name already given to an earlier overload of `member` in the same type
    fn overload_name(
        model: &ScriptModel,
        owner: SymbolId,
        member: SymbolId,
        kind: MemberKind,
    ) -> Option<String> {
        if !matches!(kind, MemberKind::Method | MemberKind::Constructor) {
            return None;
        }
        let name = model.symbol(member).name;
        model
            .members(owner)
            .iter()
            .copied()
            .filter(|other| *other != member && model.symbol(*other).name == name)
            .filter(|other| model.member_data(*other).map(|data| data.kind) == Some(kind))
            .find_map(|other| model.symbol(other).generated_name.clone())
    }
}

impl SymbolTransformer for SymbolObfuscator {
    fn prepare(&mut self, model: &ScriptModel) {
        let mut kept = 0;
        for (id, symbol) in model.symbols() {
            match &symbol.kind {
                SymbolKind::Type(_) => self.names.reserve(model.script_name(id)),
                SymbolKind::Member(_) if keeps_name(model, id) => {
                    self.names.reserve(model.script_name(id));
                    kept += 1;
                }
                _ => {}
            }
        }
        tracing::debug!(kept, "reserved preserved names");
    }

    fn transform_type(&mut self, model: &ScriptModel, ty: SymbolId) -> Option<String> {
        if keeps_type_name(model, ty) {
            return None;
        }
        let name = format!("${}", self.types.name_at(self.type_count));
        self.type_count += 1;
        Some(name)
    }

    fn transform_member(
        &mut self,
        model: &ScriptModel,
        member: SymbolId,
    ) -> Result<Option<String>, Diagnostic> {
        let Some(data) = model.member_data(member) else {
            return Ok(None);
        };
        if let Some(linked) = data.overridden.or(data.interface_member) {
            return Ok(Some(model.output_name(linked).to_string()));
        }
        if keeps_name(model, member) {
            return Ok(None);
        }
        let Some(owner) = model.containing_type(member) else {
            return Ok(None);
        };
        if let Some(name) = Self::overload_name(model, owner, member, data.kind) {
            return Ok(Some(name));
        }
        let used = Self::names_in_use(model, owner, member);
        Ok(Some(self.names.first_unused(&used)))
    }

    fn transform_parameter(&mut self, model: &ScriptModel, parameter: SymbolId) -> Option<String> {
        match &model.symbol(parameter).kind {
            SymbolKind::Parameter(data) => Some(self.names.name_at(data.position)),
            _ => None,
        }
    }

    fn transform_local(&mut self, position: usize) -> Option<String> {
        Some(self.names.name_at(position))
    }
}

/// Whether a type is emitted under its script name even when minimizing
pub fn keeps_type_name(model: &ScriptModel, ty: SymbolId) -> bool {
    let symbol = model.symbol(ty);
    symbol.is_public() || symbol.hints.script_name.is_some() || symbol.hints.preserve_name
}

/// Whether a member is emitted under its script name even when minimizing
pub fn keeps_name(model: &ScriptModel, member: SymbolId) -> bool {
    let symbol = model.symbol(member);
    if symbol.hints.script_name.is_some() || symbol.hints.preserve_name {
        return true;
    }
    if matches!(
        model.member_data(member).map(|data| data.kind),
        Some(MemberKind::Constructor)
    ) {
        return true;
    }
    let Some(owner) = model.containing_type(member) else {
        return true;
    };
    match model.type_data(owner) {
        Some(data) if data.kind == TypeKind::Interface => true,
        Some(data) if data.is_application => model.symbol(owner).is_public() && symbol.is_public(),
        _ => true,
    }
}
