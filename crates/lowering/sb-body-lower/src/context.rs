//! State shared by the statement and expression builders of one body

use sb_diagnostics::{CompileError, Diagnostic};
use sb_model::{IntrinsicType, ScriptModel, SymbolId, SymbolImplementation};
use sb_resolve::LocalSymbolTable;
use sb_span::FileSpan;

/// Lowering state for the member body currently being built
pub struct BodyContext<'m> {
    /// Model being lowered into
    pub model: &'m mut ScriptModel,
    /// Scope stack of the body
    pub locals: LocalSymbolTable,
    /// Member whose body is lowered; an anonymous method while lowering one
    pub member: SymbolId,
    /// Type declaring the member
    pub owner: SymbolId,
    /// Lowering a static member, where `this` is unavailable
    pub is_static: bool,
    /// Anonymous method nesting depth
    pub depth: u32,
    /// Lowered anonymous method bodies, stored once the whole member succeeds
    pub anonymous: Vec<(SymbolId, SymbolImplementation)>,
}

impl<'m> BodyContext<'m> {
    /// Context for a member of `owner`
    pub fn new(model: &'m mut ScriptModel, member: SymbolId) -> Result<Self, Diagnostic> {
        let owner = model.containing_type(member).ok_or_else(|| {
            Diagnostic::general(CompileError::General {
                message: format!("'{}' is not declared in a type", model.full_name(member)),
            })
        })?;
        let is_static = model.symbol(member).is_static();
        Ok(Self {
            model,
            locals: LocalSymbolTable::new(),
            member,
            owner,
            is_static,
            depth: 0,
            anonymous: Vec::new(),
        })
    }

    /// Type symbol of an intrinsic kind
    pub fn intrinsic(&self, kind: IntrinsicType) -> Option<SymbolId> {
        self.model.resolve_intrinsic_type(kind)
    }

    /// Error for a construct lowering cannot express
    pub fn general_error(message: impl Into<String>, location: FileSpan) -> Diagnostic {
        Diagnostic::at(
            CompileError::General {
                message: message.into(),
            },
            location,
        )
    }
}
