//! Expression lowering

use crate::context::BodyContext;
use crate::implementation::CAPTURED_THIS_IDENTIFIER;
use crate::overload::select_overload;
use crate::statement::StatementBuilder;
use sb_diagnostics::{CompileError, Diagnostic};
use sb_metadata::{CONSTRUCTOR_NAME, INDEXER_NAME};
use sb_model::{
    BinaryOp, Expression, ExpressionKind, IntrinsicType, LiteralValue,
    MemberData, MemberKind, ParameterData, ScopeKind, ScriptModel, Symbol, SymbolFilter,
    SymbolFlags, SymbolId, SymbolImplementation, SymbolKind, UnaryOp,
};
use sb_resolve::{Resolved, find_symbol, resolve_type_name};
use sb_span::FileSpan;
use sb_syntax::{Argument, Block, Expr, ExprKind, Literal, ParameterDecl, TypeRef};

/// Lowers parse-tree expressions into typed semantic expressions
///
/// Member references come out of [`Self::build_raw`] as
/// [`ExpressionKind::Member`] so that calls and assignments can inspect the
/// referenced symbol; [`Self::build_expression`] additionally normalizes
/// them into field reads, property getter calls and so on.
pub struct ExpressionBuilder<'b, 'm> {
    context: &'b mut BodyContext<'m>,
}

impl<'b, 'm> ExpressionBuilder<'b, 'm> {
    /// Builder for the body described by `context`
    pub fn new(context: &'b mut BodyContext<'m>) -> Self {
        Self { context }
    }

    fn model(&self) -> &ScriptModel {
        self.context.model
    }

    /// Lower an expression used as a value
    pub fn build_expression(&mut self, expr: &Expr) -> Result<Expression, Diagnostic> {
        let expression = self.build_raw(expr)?;
        Ok(self.transform_member_expression(expression))
    }

    /// Lower call arguments in order
    ///
    /// Named arguments have no counterpart in the target and are rejected.
    pub fn build_expression_list(
        &mut self,
        arguments: &[Argument],
    ) -> Result<Vec<Expression>, Diagnostic> {
        arguments
            .iter()
            .map(|argument| match &argument.name {
                Some(name) => Err(Diagnostic::at(
                    CompileError::MalformedArguments {
                        reason: format!("named argument '{name}' is not supported"),
                    },
                    argument.value.span,
                )),
                None => self.build_expression(&argument.value),
            })
            .collect()
    }

    /// Turn an unclassified member reference into the access it stands for
    ///
    /// Enumeration members become their constant value. Anything other than
    /// [`ExpressionKind::Member`] is returned unchanged.
    pub fn transform_member_expression(&self, expression: Expression) -> Expression {
        let Expression { kind, ty } = expression;
        match kind {
            ExpressionKind::Member { target, member } => {
                let model = self.model();
                let Some(data) = model.member_data(member) else {
                    return Expression::new(ExpressionKind::Member { target, member }, ty);
                };
                let kind = match data.kind {
                    MemberKind::Field => ExpressionKind::Field {
                        target,
                        field: member,
                    },
                    MemberKind::EnumField { value } => {
                        let named_values = model
                            .containing_type(member)
                            .and_then(|owner| model.type_data(owner))
                            .is_some_and(|owner| owner.named_values);
                        if named_values {
                            ExpressionKind::Literal(LiteralValue::String(
                                model.script_name(member).to_string(),
                            ))
                        } else {
                            ExpressionKind::Literal(LiteralValue::Int(value))
                        }
                    }
                    MemberKind::Property => ExpressionKind::PropertyGet {
                        target,
                        property: member,
                    },
                    MemberKind::Method => ExpressionKind::MethodReference {
                        target,
                        method: member,
                    },
                    MemberKind::Event => ExpressionKind::Event {
                        target,
                        event: member,
                    },
                    _ => ExpressionKind::Member { target, member },
                };
                Expression::new(kind, ty)
            }
            kind => Expression::new(kind, ty),
        }
    }

    /// Lower an expression, leaving member references unclassified
    pub fn build_raw(&mut self, expr: &Expr) -> Result<Expression, Diagnostic> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(self.build_literal(literal)),
            ExprKind::Name(name) => self.build_name(name, expr.span),
            ExprKind::This => {
                if self.context.is_static {
                    return Err(BodyContext::general_error(
                        "keyword 'this' is not valid in a static member",
                        expr.span,
                    ));
                }
                Ok(self.this_expression())
            }
            ExprKind::Base => self.build_base(expr.span),
            ExprKind::Member { target, name } => {
                if let Some(ty) = self.try_type_path(expr) {
                    return Ok(Expression::new(ExpressionKind::Type(ty), Some(ty)));
                }
                let receiver = match self.try_type_path(target) {
                    Some(ty) => Expression::new(ExpressionKind::Type(ty), Some(ty)),
                    None => self.build_expression(target)?,
                };
                self.build_member_access(receiver, name, expr.span)
            }
            ExprKind::Call { target, arguments } => self.build_call(target, arguments, expr.span),
            ExprKind::New { ty, arguments } => self.build_new(ty, arguments, expr.span),
            ExprKind::Index { target, arguments } => {
                let target = self.build_expression(target)?;
                let arguments = self.build_expression_list(arguments)?;
                let indexer = target
                    .ty
                    .and_then(|ty| self.find_indexer(ty, arguments.len()));
                let ty = indexer.and_then(|indexer| self.model().member_data(indexer)?.ty);
                Ok(Expression::new(
                    ExpressionKind::Index {
                        target: Box::new(target),
                        indexer,
                        arguments,
                    },
                    ty,
                ))
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.build_expression(operand)?;
                if op.is_mutating() && !is_assignable(&operand) {
                    return Err(Diagnostic::at(CompileError::InvalidAssignmentTarget, expr.span));
                }
                let ty = match op {
                    UnaryOp::Not => self.context.intrinsic(IntrinsicType::Boolean),
                    _ => operand.ty,
                };
                Ok(Expression::new(
                    ExpressionKind::Unary {
                        op: *op,
                        operand: Box::new(operand),
                    },
                    ty,
                ))
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.build_expression(left)?;
                let right = self.build_expression(right)?;
                let ty = self.binary_type(*op, &left, &right);
                Ok(Expression::new(
                    ExpressionKind::Binary {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    ty,
                ))
            }
            ExprKind::Assign { op, target, value } => {
                self.build_assignment(*op, target, value, expr.span)
            }
            ExprKind::Conditional {
                condition,
                then_value,
                else_value,
            } => {
                let condition = self.build_expression(condition)?;
                let then_value = self.build_expression(then_value)?;
                let else_value = self.build_expression(else_value)?;
                let ty = then_value.ty.or(else_value.ty);
                Ok(Expression::new(
                    ExpressionKind::Conditional {
                        condition: Box::new(condition),
                        then_value: Box::new(then_value),
                        else_value: Box::new(else_value),
                    },
                    ty,
                ))
            }
            ExprKind::Cast { ty, value } => {
                let target_type = self.resolve_type(ty)?;
                let value = self.build_expression(value)?;
                Ok(Expression::new(
                    ExpressionKind::Cast {
                        value: Box::new(value),
                        target_type,
                    },
                    Some(target_type),
                ))
            }
            ExprKind::AnonymousMethod { parameters, body } => {
                self.build_anonymous_method(parameters, body)
            }
        }
    }

    fn build_literal(&self, literal: &Literal) -> Expression {
        let (value, kind) = match literal {
            Literal::Null => (LiteralValue::Null, None),
            Literal::Bool(value) => (LiteralValue::Bool(*value), Some(IntrinsicType::Boolean)),
            Literal::Int(value) => (LiteralValue::Int(*value), Some(IntrinsicType::Integer)),
            Literal::Float(value) => (LiteralValue::Float(*value), Some(IntrinsicType::Double)),
            Literal::String(value) => (LiteralValue::String(value.clone()), Some(IntrinsicType::String)),
        };
        let ty = kind.and_then(|kind| self.context.intrinsic(kind));
        Expression::literal(value, ty)
    }

    fn build_name(&self, name: &str, location: FileSpan) -> Result<Expression, Diagnostic> {
        let model = self.model();
        let resolved = find_symbol(
            model,
            &self.context.locals,
            name,
            Some(self.context.owner),
            SymbolFilter::ALL,
        );
        match resolved {
            Some(Resolved::Local(local)) => {
                let ty = self.context.locals.tree().local(local).ty;
                Ok(Expression::new(ExpressionKind::Local(local), ty))
            }
            Some(Resolved::Parameter(parameter)) => Ok(Expression::new(
                ExpressionKind::Parameter(parameter),
                parameter_type(model, parameter),
            )),
            Some(Resolved::Member(member)) => {
                let target = if model.symbol(member).is_static() {
                    let declaring = model.containing_type(member).unwrap_or(self.context.owner);
                    Expression::new(ExpressionKind::Type(declaring), Some(declaring))
                } else if self.context.is_static {
                    return Err(BodyContext::general_error(
                        format!(
                            "an object reference is required for the non-static member '{}'",
                            model.full_name(member)
                        ),
                        location,
                    ));
                } else {
                    self.this_expression()
                };
                Ok(self.member_reference(target, member))
            }
            Some(Resolved::Type(ty)) => Ok(Expression::new(ExpressionKind::Type(ty), Some(ty))),
            None => Err(Diagnostic::at(
                CompileError::UnresolvedName {
                    name: name.to_string(),
                },
                location,
            )),
        }
    }

    fn build_base(&self, location: FileSpan) -> Result<Expression, Diagnostic> {
        let base_class = self
            .model()
            .type_data(self.context.owner)
            .and_then(|data| data.base_class);
        match base_class {
            Some(base) if !self.context.is_static => {
                Ok(Expression::new(ExpressionKind::Base, Some(base)))
            }
            _ => Err(Diagnostic::at(CompileError::BaseNotAllowed, location)),
        }
    }

    fn build_member_access(
        &self,
        receiver: Expression,
        name: &str,
        location: FileSpan,
    ) -> Result<Expression, Diagnostic> {
        let (search, filter) = match &receiver.kind {
            ExpressionKind::Type(ty) => (Some(*ty), SymbolFilter::STATIC_MEMBERS),
            _ => (receiver.ty, SymbolFilter::INSTANCE_MEMBERS),
        };
        let Some(search) = search else {
            return Err(BodyContext::general_error(
                format!("cannot access '{name}' on a value of unknown type"),
                location,
            ));
        };

        let model = self.model();
        let member = model
            .interner()
            .get(name)
            .and_then(|interned| model.find_member(search, interned, filter));
        match member {
            Some(member) => Ok(self.member_reference(receiver, member)),
            None => Err(Diagnostic::at(
                CompileError::UnresolvedMember {
                    type_name: model.full_name(search),
                    member: name.to_string(),
                },
                location,
            )),
        }
    }

    fn build_call(
        &mut self,
        target: &Expr,
        arguments: &[Argument],
        location: FileSpan,
    ) -> Result<Expression, Diagnostic> {
        let arguments = self.build_expression_list(arguments)?;
        let callee = self.build_raw(target)?;
        let callee_ty = callee.ty;

        let (receiver, found) = match callee.kind {
            ExpressionKind::Member { target, member } if self.is_method(member) => (target, member),
            kind => {
                let target = self.transform_member_expression(Expression::new(kind, callee_ty));
                return Ok(Expression::new(
                    ExpressionKind::DelegateInvoke {
                        target: Box::new(target),
                        arguments,
                    },
                    None,
                ));
            }
        };

        let model = self.model();
        let static_only = matches!(receiver.kind, ExpressionKind::Type(_));
        let search = match receiver.kind {
            ExpressionKind::Type(ty) => Some(ty),
            _ => receiver.ty,
        }
        .or_else(|| model.containing_type(found));
        let name = model.symbol(found).name;
        let candidates: Vec<SymbolId> = match search {
            Some(ty) => model
                .members_named(ty, name)
                .into_iter()
                .filter(|candidate| self.is_method(*candidate))
                .filter(|candidate| !static_only || model.symbol(*candidate).is_static())
                .collect(),
            None => vec![found],
        };
        let method = select_overload(model, &candidates, &arguments, model.name(found), location)?;
        let ty = model.member_data(method).and_then(|data| data.ty);

        Ok(Expression::new(
            ExpressionKind::MethodCall {
                target: receiver,
                method,
                arguments,
            },
            ty,
        ))
    }

    fn build_new(
        &mut self,
        ty: &TypeRef,
        arguments: &[Argument],
        location: FileSpan,
    ) -> Result<Expression, Diagnostic> {
        let constructed = self.resolve_type(ty)?;
        let arguments = self.build_expression_list(arguments)?;

        let model = self.model();
        let constructor_name = model.interner().get(CONSTRUCTOR_NAME);
        let constructors: Vec<SymbolId> = model
            .members(constructed)
            .iter()
            .copied()
            .filter(|member| {
                let symbol = model.symbol(*member);
                Some(symbol.name) == constructor_name && !symbol.is_static()
            })
            .collect();

        let constructor = if constructors.is_empty() {
            if !arguments.is_empty() {
                return Err(Diagnostic::at(
                    CompileError::NoMatchingOverload {
                        name: model.full_name(constructed),
                        arity: arguments.len(),
                    },
                    location,
                ));
            }
            None
        } else {
            let name = model.full_name(constructed);
            Some(select_overload(model, &constructors, &arguments, &name, location)?)
        };

        Ok(Expression::new(
            ExpressionKind::New {
                ty: constructed,
                constructor,
                arguments,
            },
            Some(constructed),
        ))
    }

    fn build_assignment(
        &mut self,
        op: Option<BinaryOp>,
        target: &Expr,
        value: &Expr,
        location: FileSpan,
    ) -> Result<Expression, Diagnostic> {
        let value = self.build_expression(value)?;
        let target = self.build_raw(target)?;
        let ty = target.ty;

        match target.kind {
            ExpressionKind::Member {
                target: receiver,
                member,
            } => match self.model().member_data(member).map(|data| data.kind) {
                Some(MemberKind::Property) => {
                    let value = match op {
                        None => value,
                        Some(op) => {
                            let current = Expression::new(
                                ExpressionKind::PropertyGet {
                                    target: receiver.clone(),
                                    property: member,
                                },
                                ty,
                            );
                            let combined_ty = self.binary_type(op, &current, &value);
                            Expression::new(
                                ExpressionKind::Binary {
                                    op,
                                    left: Box::new(current),
                                    right: Box::new(value),
                                },
                                combined_ty,
                            )
                        }
                    };
                    Ok(Expression::new(
                        ExpressionKind::PropertySet {
                            target: receiver,
                            property: member,
                            value: Box::new(value),
                        },
                        ty,
                    ))
                }
                Some(MemberKind::Field | MemberKind::Event) => {
                    let target = self.transform_member_expression(Expression::new(
                        ExpressionKind::Member {
                            target: receiver,
                            member,
                        },
                        ty,
                    ));
                    Ok(assign(op, target, value))
                }
                _ => Err(Diagnostic::at(CompileError::InvalidAssignmentTarget, location)),
            },
            kind @ (ExpressionKind::Local(_)
            | ExpressionKind::Parameter(_)
            | ExpressionKind::Index { .. }) => Ok(assign(op, Expression::new(kind, ty), value)),
            _ => Err(Diagnostic::at(CompileError::InvalidAssignmentTarget, location)),
        }
    }

    /// Lower an anonymous method into its own member and a pending implementation
    ///
    /// The body shares the enclosing scope tree: its scope is a child of the
    /// current scope, so captured locals resolve naturally and all locals of
    /// the member are renamed together.
    fn build_anonymous_method(
        &mut self,
        parameters: &[ParameterDecl],
        body: &Block,
    ) -> Result<Expression, Diagnostic> {
        let depth = self.context.depth + 1;
        let enclosing = self.context.member;
        let name = self.context.locals.create_synthetic_name("anonymous");
        let name = self.context.model.intern(&name);
        let flags = SymbolFlags {
            is_static: self.context.is_static,
            ..SymbolFlags::default()
        };
        let method = self.context.model.add_symbol(
            enclosing,
            Symbol::new(
                name,
                SymbolKind::Member(MemberData::new(MemberKind::AnonymousMethod { depth }, None)),
            )
            .with_flags(flags)
            .with_span(body.span),
        );

        let mut bound = Vec::with_capacity(parameters.len());
        for (position, parameter) in parameters.iter().enumerate() {
            let ty = self.resolve_type(&parameter.ty)?;
            let name = self.context.model.intern(&parameter.name);
            let id = self.context.model.add_symbol(
                method,
                Symbol::new(
                    name,
                    SymbolKind::Parameter(ParameterData {
                        ty: Some(ty),
                        position,
                    }),
                )
                .with_span(parameter.span),
            );
            bound.push((name, id));
        }

        self.context.locals.push_scope(ScopeKind::AnonymousMethod);
        for (name, id) in bound {
            self.context.locals.add_parameter(name, id);
        }
        let outer_member = std::mem::replace(&mut self.context.member, method);
        let outer_depth = std::mem::replace(&mut self.context.depth, depth);
        let statements = StatementBuilder::new(&mut *self.context).build_statements(&body.statements);
        self.context.member = outer_member;
        self.context.depth = outer_depth;
        self.context.locals.pop_scope();

        self.context.anonymous.push((
            method,
            SymbolImplementation::new(statements?, None, CAPTURED_THIS_IDENTIFIER),
        ));
        tracing::trace!(depth, "lowered anonymous method");
        Ok(Expression::new(
            ExpressionKind::AnonymousMethod { method },
            self.context.intrinsic(IntrinsicType::Function),
        ))
    }

    /// Resolve a dotted name such as `System.Script` that starts with a namespace
    fn try_type_path(&self, expr: &Expr) -> Option<SymbolId> {
        if !matches!(expr.kind, ExprKind::Member { .. }) {
            return None;
        }
        let path = dotted_path(expr)?;
        let root = path.split('.').next()?;
        let model = self.model();
        let root_resolves = find_symbol(
            model,
            &self.context.locals,
            root,
            Some(self.context.owner),
            SymbolFilter::ALL,
        )
        .is_some();
        if root_resolves {
            return None;
        }
        resolve_type_name(model, &path, Some(self.context.owner))
    }

    fn resolve_type(&self, ty: &TypeRef) -> Result<SymbolId, Diagnostic> {
        resolve_type_name(self.model(), &ty.name, Some(self.context.owner)).ok_or_else(|| {
            Diagnostic::at(
                CompileError::UnresolvedType {
                    name: ty.name.clone(),
                },
                ty.span,
            )
        })
    }

    fn find_indexer(&self, ty: SymbolId, arity: usize) -> Option<SymbolId> {
        let model = self.model();
        let name = model.interner().get(INDEXER_NAME)?;
        // Indexer symbols carry the trailing `value` parameter
        model.members_named(ty, name).into_iter().find(|member| {
            model
                .member_data(*member)
                .is_some_and(|data| data.kind == MemberKind::Indexer)
                && model.parameters(*member).len() == arity + 1
        })
    }

    fn member_reference(&self, target: Expression, member: SymbolId) -> Expression {
        let model = self.model();
        let ty = match model.member_data(member) {
            Some(data) if data.kind == MemberKind::Method => {
                self.context.intrinsic(IntrinsicType::Function)
            }
            Some(data) => data.ty,
            None => None,
        };
        Expression::new(
            ExpressionKind::Member {
                target: Box::new(target),
                member,
            },
            ty,
        )
    }

    fn this_expression(&self) -> Expression {
        Expression::new(ExpressionKind::This, Some(self.context.owner))
    }

    fn is_method(&self, member: SymbolId) -> bool {
        self.model()
            .member_data(member)
            .is_some_and(|data| data.kind == MemberKind::Method)
    }

    fn binary_type(&self, op: BinaryOp, left: &Expression, right: &Expression) -> Option<SymbolId> {
        if op.is_comparison() {
            return self.context.intrinsic(IntrinsicType::Boolean);
        }
        let model = self.model();
        let kind_of = |expression: &Expression| {
            expression
                .ty
                .and_then(|ty| model.intrinsic_kind(ty))
        };
        let (left_kind, right_kind) = (kind_of(left), kind_of(right));
        if op == BinaryOp::Add
            && (left_kind == Some(IntrinsicType::String) || right_kind == Some(IntrinsicType::String))
        {
            return self.context.intrinsic(IntrinsicType::String);
        }
        if right_kind.is_some_and(IntrinsicType::is_floating)
            && !left_kind.is_some_and(IntrinsicType::is_floating)
        {
            return right.ty;
        }
        left.ty.or(right.ty)
    }
}

fn assign(op: Option<BinaryOp>, target: Expression, value: Expression) -> Expression {
    let ty = target.ty;
    Expression::new(
        ExpressionKind::Assign {
            op,
            target: Box::new(target),
            value: Box::new(value),
        },
        ty,
    )
}

fn is_assignable(expression: &Expression) -> bool {
    matches!(
        expression.kind,
        ExpressionKind::Local(_)
            | ExpressionKind::Parameter(_)
            | ExpressionKind::Field { .. }
            | ExpressionKind::PropertyGet { .. }
            | ExpressionKind::Index { .. }
    )
}

fn parameter_type(model: &ScriptModel, parameter: SymbolId) -> Option<SymbolId> {
    match &model.symbol(parameter).kind {
        SymbolKind::Parameter(data) => data.ty,
        _ => None,
    }
}

/// `a.b.c` for a chain of simple names
fn dotted_path(expr: &Expr) -> Option<String> {
    match &expr.kind {
        ExprKind::Name(name) => Some(name.clone()),
        ExprKind::Member { target, name } => {
            dotted_path(target).map(|prefix| format!("{prefix}.{name}"))
        }
        _ => None,
    }
}
