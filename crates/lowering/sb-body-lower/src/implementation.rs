//! Lowering of whole member bodies

use crate::context::BodyContext;
use crate::expression::ExpressionBuilder;
use crate::statement::StatementBuilder;
use sb_diagnostics::{CompileError, Diagnostic};
use sb_model::{
    BodyPart, Expression, ExpressionKind, IntrinsicType, LiteralValue, ScriptModel, Statement,
    SymbolId, SymbolImplementation, TypeKind,
};
use sb_syntax::{Accessor, Argument, Block, MemberDecl};
use std::sync::Arc;

/// Identifier standing for the current object in member bodies
pub const THIS_IDENTIFIER: &str = "this";

/// Identifier anonymous methods use for the object captured from the enclosing member
pub const CAPTURED_THIS_IDENTIFIER: &str = "$this";

/// Lowers the bodies of one member at a time
///
/// Every `build_*` method returns `Ok(None)` when the member has nothing to
/// emit for that body: abstract and extern methods, automatic accessors and
/// fields without a default value.
///
/// Anonymous methods met along the way are held back until [`finish`] so a
/// member that fails halfway leaves no bodies behind.
///
/// [`finish`]: ImplementationBuilder::finish
pub struct ImplementationBuilder<'m> {
    model: &'m mut ScriptModel,
    anonymous: Vec<(SymbolId, SymbolImplementation)>,
}

impl<'m> ImplementationBuilder<'m> {
    /// Builder lowering into `model`
    pub fn new(model: &'m mut ScriptModel) -> Self {
        Self {
            model,
            anonymous: Vec::new(),
        }
    }

    /// Anonymous method bodies lowered by the successful `build_*` calls
    pub fn finish(self) -> Vec<(SymbolId, SymbolImplementation)> {
        self.anonymous
    }

    /// Lower a method body
    pub fn build_method(&mut self, method: SymbolId) -> Result<Option<SymbolImplementation>, Diagnostic> {
        let Some(decl) = self.declaration(method) else {
            return Ok(None);
        };
        let MemberDecl::Method(decl) = decl.as_ref() else {
            return Ok(None);
        };
        match &decl.body {
            Some(body) => self.build_implementation(method, body, true, None).map(Some),
            None => Ok(None),
        }
    }

    /// Lower a constructor body, prefixed by the base class initializer
    pub fn build_constructor(
        &mut self,
        constructor: SymbolId,
    ) -> Result<Option<SymbolImplementation>, Diagnostic> {
        let Some(decl) = self.declaration(constructor) else {
            return Ok(None);
        };
        let MemberDecl::Constructor(decl) = decl.as_ref() else {
            return Ok(None);
        };
        let Some(body) = &decl.body else {
            return Ok(None);
        };
        let base_arguments = decl.base_arguments.as_deref().unwrap_or(&[]);
        let explicit = decl.base_arguments.is_some();
        self.build_implementation(constructor, body, true, Some((base_arguments, explicit)))
            .map(Some)
    }

    /// Lower a field initializer, synthesizing a default value when none is written
    pub fn build_field(&mut self, field: SymbolId) -> Result<Option<SymbolImplementation>, Diagnostic> {
        let Some(decl) = self.declaration(field) else {
            return Ok(None);
        };
        let MemberDecl::Field(decl) = decl.as_ref() else {
            return Ok(None);
        };
        let value = decl.declarators.first().and_then(|declarator| declarator.value.as_ref());

        let implementation = match value {
            Some(value) => {
                let mut context = BodyContext::new(&mut *self.model, field)?;
                let expression = ExpressionBuilder::new(&mut context).build_expression(value)?;
                self.anonymous.append(&mut context.anonymous);
                let tree = context.locals.finish();
                // Keep the tree only when an anonymous method added scopes to it
                let scope = if tree.scope(tree.root()).children.is_empty() {
                    None
                } else {
                    Some(tree)
                };
                SymbolImplementation::new(vec![fragment(expression)], scope, THIS_IDENTIFIER)
            }
            None => match self.default_value(field) {
                Some(expression) => {
                    SymbolImplementation::new(vec![fragment(expression)], None, THIS_IDENTIFIER)
                }
                None => return Ok(None),
            },
        };

        if let Some(data) = self.model.member_data_mut(field) {
            data.set_implementation_state(true);
        }
        Ok(Some(implementation))
    }

    /// Lower the `get` accessor of a property or indexer
    pub fn build_getter(&mut self, member: SymbolId) -> Result<Option<SymbolImplementation>, Diagnostic> {
        self.build_accessor(member, BodyPart::Getter)
    }

    /// Lower the `set` accessor of a property or indexer
    pub fn build_setter(&mut self, member: SymbolId) -> Result<Option<SymbolImplementation>, Diagnostic> {
        self.build_accessor(member, BodyPart::Setter)
    }

    /// Lower the `add` accessor of an event
    pub fn build_adder(&mut self, event: SymbolId) -> Result<Option<SymbolImplementation>, Diagnostic> {
        self.build_accessor(event, BodyPart::Adder)
    }

    /// Lower the `remove` accessor of an event
    pub fn build_remover(&mut self, event: SymbolId) -> Result<Option<SymbolImplementation>, Diagnostic> {
        self.build_accessor(event, BodyPart::Remover)
    }

    fn build_accessor(
        &mut self,
        member: SymbolId,
        part: BodyPart,
    ) -> Result<Option<SymbolImplementation>, Diagnostic> {
        let Some(decl) = self.declaration(member) else {
            return Ok(None);
        };
        let Some(body) = accessor(&decl, part).and_then(|accessor| accessor.body.as_ref()) else {
            return Ok(None);
        };
        // Getters never see the trailing `value` parameter
        let add_all_parameters = part != BodyPart::Getter;
        self.build_implementation(member, body, add_all_parameters, None)
            .map(Some)
    }

    /// Lower a block into a fresh scope tree
    ///
    /// `base_call` carries the `: base(...)` arguments of a constructor and
    /// whether they were written explicitly.
    fn build_implementation(
        &mut self,
        member: SymbolId,
        body: &Block,
        add_all_parameters: bool,
        base_call: Option<(&[Argument], bool)>,
    ) -> Result<SymbolImplementation, Diagnostic> {
        let mut context = BodyContext::new(&mut *self.model, member)?;

        let parameters = context.model.parameters(member).to_vec();
        let bound = if add_all_parameters {
            parameters.len()
        } else {
            parameters.len().saturating_sub(1)
        };
        for parameter in &parameters[..bound] {
            let name = context.model.symbol(*parameter).name;
            context.locals.add_parameter(name, *parameter);
        }

        let mut statements = Vec::new();
        if let Some((arguments, explicit)) = base_call {
            if !context.is_static {
                let base_class = context
                    .model
                    .type_data(context.owner)
                    .and_then(|data| data.base_class);
                if base_class.is_some() {
                    let arguments =
                        ExpressionBuilder::new(&mut context).build_expression_list(arguments)?;
                    statements.push(Statement::Expression {
                        expression: Expression::new(
                            ExpressionKind::BaseInitializer { arguments },
                            None,
                        ),
                        is_fragment: false,
                    });
                } else if explicit {
                    return Err(Diagnostic::at(CompileError::BaseNotAllowed, body.span));
                }
            }
        }

        statements.extend(StatementBuilder::new(&mut context).build_statements(&body.statements)?);
        self.anonymous.append(&mut context.anonymous);
        let tree = context.locals.finish();
        Ok(SymbolImplementation::new(statements, Some(tree), THIS_IDENTIFIER))
    }

    /// Zero-like value for fields of numeric, boolean and enumeration types
    fn default_value(&self, field: SymbolId) -> Option<Expression> {
        let ty = self.model.member_data(field)?.ty?;
        let data = self.model.type_data(ty)?;
        if data.kind == TypeKind::Enumeration {
            if data.named_values {
                return None;
            }
            return Some(Expression::literal(LiteralValue::Int(0), Some(ty)));
        }
        match data.intrinsic? {
            IntrinsicType::Boolean => Some(Expression::literal(LiteralValue::Bool(false), Some(ty))),
            kind if kind.is_numeric() => Some(Expression::literal(LiteralValue::Int(0), Some(ty))),
            _ => None,
        }
    }

    fn declaration(&self, member: SymbolId) -> Option<Arc<MemberDecl>> {
        self.model
            .member_data(member)
            .and_then(|data| data.parse_context.clone())
    }
}

fn accessor(decl: &MemberDecl, part: BodyPart) -> Option<&Accessor> {
    match (decl, part) {
        (MemberDecl::Property(property), BodyPart::Getter) => property.getter.as_ref(),
        (MemberDecl::Property(property), BodyPart::Setter) => property.setter.as_ref(),
        (MemberDecl::Indexer(indexer), BodyPart::Getter) => indexer.getter.as_ref(),
        (MemberDecl::Indexer(indexer), BodyPart::Setter) => indexer.setter.as_ref(),
        (MemberDecl::Event(event), BodyPart::Adder) => event.adder.as_ref(),
        (MemberDecl::Event(event), BodyPart::Remover) => event.remover.as_ref(),
        _ => None,
    }
}

fn fragment(expression: Expression) -> Statement {
    Statement::Expression {
        expression,
        is_fragment: true,
    }
}
