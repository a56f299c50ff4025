//! Deterministic text rendering of lowered bodies

use crate::ir::{Expression, ExpressionKind, LiteralValue, Statement, SymbolImplementation, UnaryOp};
use crate::model::ScriptModel;
use crate::scope::{LocalId, ScopeTree};
use crate::{ImplementationKey, SymbolId};
use std::fmt::{self, Write};

/// Render an implementation using output names
///
/// Locals print under their generated names once the implementation
/// transformer has run, and under their source names before.
pub fn dump_implementation(model: &ScriptModel, implementation: &SymbolImplementation) -> String {
    ImplementationDisplay {
        model,
        implementation,
    }
    .to_string()
}

/// Write the rendering of `implementation` into `out`
///
/// # Errors
///
/// Returns the writer's error.
pub fn write_implementation<W: Write>(
    model: &ScriptModel,
    implementation: &SymbolImplementation,
    out: &mut W,
) -> fmt::Result {
    let mut writer = IrWriter {
        model,
        locals: implementation.scope.as_ref(),
        this_identifier: &implementation.this_identifier,
        out,
        indent: 0,
    };
    for statement in &implementation.statements {
        writer.statement(statement)?;
    }
    Ok(())
}

struct ImplementationDisplay<'a> {
    model: &'a ScriptModel,
    implementation: &'a SymbolImplementation,
}

impl fmt::Display for ImplementationDisplay<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_implementation(self.model, self.implementation, formatter)
    }
}

struct IrWriter<'a, W: Write> {
    model: &'a ScriptModel,
    locals: Option<&'a ScopeTree>,
    this_identifier: &'a str,
    out: &'a mut W,
    indent: usize,
}

impl<W: Write> IrWriter<'_, W> {
    fn line_start(&mut self) -> fmt::Result {
        for _ in 0..self.indent {
            self.out.write_str("    ")?;
        }
        Ok(())
    }

    fn statement(&mut self, statement: &Statement) -> fmt::Result {
        self.line_start()?;
        self.statement_inline(statement, true)?;
        self.out.write_char('\n')
    }

    /// `terminate` is false inside `for (...)` headers
    fn statement_inline(&mut self, statement: &Statement, terminate: bool) -> fmt::Result {
        let semicolon = if terminate { ";" } else { "" };
        match statement {
            Statement::Expression {
                expression,
                is_fragment,
            } => {
                self.expression(expression)?;
                if !is_fragment {
                    self.out.write_str(semicolon)?;
                }
            }
            Statement::VariableDeclaration(initializers) => {
                self.out.write_str("var ")?;
                for (index, initializer) in initializers.iter().enumerate() {
                    if index > 0 {
                        self.out.write_str(", ")?;
                    }
                    self.local(initializer.local)?;
                    if let Some(value) = &initializer.value {
                        self.out.write_str(" = ")?;
                        self.expression(value)?;
                    }
                }
                self.out.write_str(semicolon)?;
            }
            Statement::Block(statements) => self.block(statements)?,
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.out.write_str("if (")?;
                self.expression(condition)?;
                self.out.write_str(") ")?;
                self.embedded(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.out.write_str(" else ")?;
                    self.embedded(else_branch)?;
                }
            }
            Statement::While { condition, body } => {
                self.out.write_str("while (")?;
                self.expression(condition)?;
                self.out.write_str(") ")?;
                self.embedded(body)?;
            }
            Statement::For {
                initializers,
                condition,
                increments,
                body,
            } => {
                self.out.write_str("for (")?;
                for (index, initializer) in initializers.iter().enumerate() {
                    if index > 0 {
                        self.out.write_str(", ")?;
                    }
                    self.statement_inline(initializer, false)?;
                }
                self.out.write_str("; ")?;
                if let Some(condition) = condition {
                    self.expression(condition)?;
                }
                self.out.write_str("; ")?;
                self.list(increments)?;
                self.out.write_str(") ")?;
                self.embedded(body)?;
            }
            Statement::Foreach {
                variable,
                enumerator,
                collection,
                body,
            } => {
                self.out.write_str("foreach (")?;
                self.local(*variable)?;
                self.out.write_str(" in ")?;
                self.expression(collection)?;
                self.out.write_str(" via ")?;
                self.local(*enumerator)?;
                self.out.write_str(") ")?;
                self.embedded(body)?;
            }
            Statement::Return(value) => {
                self.out.write_str("return")?;
                if let Some(value) = value {
                    self.out.write_char(' ')?;
                    self.expression(value)?;
                }
                self.out.write_str(semicolon)?;
            }
            Statement::Break => write!(self.out, "break{semicolon}")?,
            Statement::Continue => write!(self.out, "continue{semicolon}")?,
            Statement::Throw(value) => {
                self.out.write_str("throw")?;
                if let Some(value) = value {
                    self.out.write_char(' ')?;
                    self.expression(value)?;
                }
                self.out.write_str(semicolon)?;
            }
            Statement::Try {
                body,
                catch,
                finally,
            } => {
                self.out.write_str("try ")?;
                self.block(body)?;
                if let Some(catch) = catch {
                    self.out.write_str(" catch ")?;
                    if let Some(variable) = catch.variable {
                        self.out.write_char('(')?;
                        self.local(variable)?;
                        self.out.write_str(") ")?;
                    }
                    self.block(&catch.body)?;
                }
                if let Some(finally) = finally {
                    self.out.write_str(" finally ")?;
                    self.block(finally)?;
                }
            }
        }
        Ok(())
    }

    fn embedded(&mut self, statement: &Statement) -> fmt::Result {
        match statement {
            Statement::Block(statements) => self.block(statements),
            other => self.block(std::slice::from_ref(other)),
        }
    }

    fn block(&mut self, statements: &[Statement]) -> fmt::Result {
        self.out.write_str("{\n")?;
        self.indent += 1;
        for statement in statements {
            self.statement(statement)?;
        }
        self.indent -= 1;
        self.line_start()?;
        self.out.write_char('}')
    }

    fn local(&mut self, local: LocalId) -> fmt::Result {
        let Some(tree) = self.locals else {
            return write!(self.out, "<local{}>", u32::from(local.into_raw()));
        };
        let symbol = tree.local(local);
        match &symbol.generated_name {
            Some(name) => self.out.write_str(name),
            None => self.out.write_str(self.model.text(symbol.name)),
        }
    }

    fn list(&mut self, expressions: &[Expression]) -> fmt::Result {
        for (index, expression) in expressions.iter().enumerate() {
            if index > 0 {
                self.out.write_str(", ")?;
            }
            self.expression(expression)?;
        }
        Ok(())
    }

    fn operand(&mut self, expression: &Expression) -> fmt::Result {
        let wrap = matches!(
            expression.kind,
            ExpressionKind::Binary { .. }
                | ExpressionKind::Assign { .. }
                | ExpressionKind::Conditional { .. }
        );
        if wrap {
            self.out.write_char('(')?;
        }
        self.expression(expression)?;
        if wrap {
            self.out.write_char(')')?;
        }
        Ok(())
    }

    fn access(&mut self, target: &Expression, member: SymbolId) -> fmt::Result {
        self.operand(target)?;
        write!(self.out, ".{}", self.model.output_name(member))
    }

    fn expression(&mut self, expression: &Expression) -> fmt::Result {
        match &expression.kind {
            ExpressionKind::Literal(value) => match value {
                LiteralValue::Null => self.out.write_str("null"),
                LiteralValue::Bool(value) => write!(self.out, "{value}"),
                LiteralValue::Int(value) => write!(self.out, "{value}"),
                LiteralValue::Float(value) => write!(self.out, "{value:?}"),
                LiteralValue::String(value) => write!(self.out, "{value:?}"),
            },
            ExpressionKind::Local(local) => self.local(*local),
            ExpressionKind::Parameter(parameter) => {
                self.out.write_str(self.model.output_name(*parameter))
            }
            ExpressionKind::This => self.out.write_str(self.this_identifier),
            ExpressionKind::Base => self.out.write_str("base"),
            ExpressionKind::Type(ty) => self.out.write_str(self.model.output_name(*ty)),
            ExpressionKind::Member { target, member }
            | ExpressionKind::Field {
                target,
                field: member,
            }
            | ExpressionKind::MethodReference {
                target,
                method: member,
            }
            | ExpressionKind::Event {
                target,
                event: member,
            } => self.access(target, *member),
            ExpressionKind::PropertyGet { target, property } => {
                self.operand(target)?;
                write!(self.out, ".get_{}()", self.model.output_name(*property))
            }
            ExpressionKind::PropertySet {
                target,
                property,
                value,
            } => {
                self.operand(target)?;
                write!(self.out, ".set_{}(", self.model.output_name(*property))?;
                self.expression(value)?;
                self.out.write_char(')')
            }
            ExpressionKind::MethodCall {
                target,
                method,
                arguments,
            } => {
                self.access(target, *method)?;
                self.call_arguments(arguments)
            }
            ExpressionKind::DelegateInvoke { target, arguments } => {
                self.operand(target)?;
                self.call_arguments(arguments)
            }
            ExpressionKind::BaseInitializer { arguments } => {
                self.out.write_str("base")?;
                self.call_arguments(arguments)
            }
            ExpressionKind::New { ty, arguments, .. } => {
                write!(self.out, "new {}", self.model.output_name(*ty))?;
                self.call_arguments(arguments)
            }
            ExpressionKind::Index {
                target, arguments, ..
            } => {
                self.operand(target)?;
                self.out.write_char('[')?;
                self.list(arguments)?;
                self.out.write_char(']')
            }
            ExpressionKind::Unary { op, operand } => {
                let (prefix, postfix) = match op {
                    UnaryOp::Neg => ("-", ""),
                    UnaryOp::Not => ("!", ""),
                    UnaryOp::BitNot => ("~", ""),
                    UnaryOp::PreIncrement => ("++", ""),
                    UnaryOp::PreDecrement => ("--", ""),
                    UnaryOp::PostIncrement => ("", "++"),
                    UnaryOp::PostDecrement => ("", "--"),
                };
                self.out.write_str(prefix)?;
                self.operand(operand)?;
                self.out.write_str(postfix)
            }
            ExpressionKind::Binary { op, left, right } => {
                self.operand(left)?;
                write!(self.out, " {} ", op.symbol())?;
                self.operand(right)
            }
            ExpressionKind::Assign { op, target, value } => {
                self.expression(target)?;
                match op {
                    Some(op) => write!(self.out, " {}= ", op.symbol())?,
                    None => self.out.write_str(" = ")?,
                }
                self.expression(value)
            }
            ExpressionKind::Conditional {
                condition,
                then_value,
                else_value,
            } => {
                self.operand(condition)?;
                self.out.write_str(" ? ")?;
                self.operand(then_value)?;
                self.out.write_str(" : ")?;
                self.operand(else_value)
            }
            ExpressionKind::Cast { value, .. } => self.expression(value),
            ExpressionKind::AnonymousMethod { method } => self.anonymous_method(*method),
        }
    }

    fn call_arguments(&mut self, arguments: &[Expression]) -> fmt::Result {
        self.out.write_char('(')?;
        self.list(arguments)?;
        self.out.write_char(')')
    }

    fn anonymous_method(&mut self, method: SymbolId) -> fmt::Result {
        let model = self.model;
        self.out.write_str("function(")?;
        for (index, parameter) in model.parameters(method).iter().enumerate() {
            if index > 0 {
                self.out.write_str(", ")?;
            }
            self.out.write_str(model.output_name(*parameter))?;
        }
        self.out.write_str(") ")?;
        let Some(implementation) = model.implementation(ImplementationKey::body(method)) else {
            return self.out.write_str("{}");
        };
        let outer_this = std::mem::replace(
            &mut self.this_identifier,
            implementation.this_identifier.as_str(),
        );
        let written = self.block(&implementation.statements);
        self.this_identifier = outer_this;
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::VariableInitializer;
    use crate::{BinaryOp, UnaryOp};
    use crate::scope::LocalSymbol;
    use crate::symbols::{MemberData, MemberKind, Symbol, SymbolKind, TypeData, TypeKind};
    use expect_test::expect;
    use sb_span::FileSpan;

    #[test]
    fn test_dump_renders_locals_and_members() {
        let mut model = ScriptModel::default();
        let namespace = model.get_or_add_namespace("App");
        let shape = model.intern("Shape");
        let shape = model.add_symbol(
            namespace,
            Symbol::new(shape, SymbolKind::Type(TypeData::new(TypeKind::Class, true))),
        );
        let count = model.intern("count");
        let count = model.add_symbol(
            shape,
            Symbol::new(count, SymbolKind::Member(MemberData::new(MemberKind::Field, None))),
        );

        let mut tree = ScopeTree::new();
        let total = tree.add_local(LocalSymbol {
            name: model.intern("total"),
            ty: None,
            scope: tree.root(),
            is_synthetic: false,
            generated_name: None,
            span: FileSpan::default(),
        });
        let read_count = Expression::new(
            ExpressionKind::Field {
                target: Box::new(Expression::new(ExpressionKind::This, None)),
                field: count,
            },
            None,
        );
        let statements = vec![
            Statement::VariableDeclaration(vec![VariableInitializer {
                local: total,
                value: Some(Expression::new(
                    ExpressionKind::Binary {
                        op: BinaryOp::Add,
                        left: Box::new(read_count),
                        right: Box::new(Expression::literal(LiteralValue::Int(1), None)),
                    },
                    None,
                )),
            }]),
            Statement::Return(Some(Expression::new(ExpressionKind::Local(total), None))),
        ];
        let mut implementation = SymbolImplementation::new(statements, Some(tree), "this");

        expect![[r#"
            var total = this.count + 1;
            return total;
        "#]]
        .assert_eq(&dump_implementation(&model, &implementation));

        if let Some(tree) = implementation.scope.as_mut() {
            tree.local_mut(total).generated_name = Some("a".to_string());
        }
        model.set_generated_name(count, "b".to_string());
        expect![[r#"
            var a = this.b + 1;
            return a;
        "#]]
        .assert_eq(&dump_implementation(&model, &implementation));
    }

    /// Accepts a fixed number of bytes, then fails
    struct Limited {
        remaining: usize,
    }

    impl Write for Limited {
        fn write_str(&mut self, text: &str) -> fmt::Result {
            if text.len() > self.remaining {
                return Err(fmt::Error);
            }
            self.remaining -= text.len();
            Ok(())
        }
    }

    #[test]
    fn test_writer_errors_are_propagated() {
        let model = ScriptModel::default();
        let negated = Expression::new(
            ExpressionKind::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(Expression::literal(LiteralValue::Int(42), None)),
            },
            None,
        );
        let implementation =
            SymbolImplementation::new(vec![Statement::Return(Some(negated))], None, "this");

        let mut out = String::new();
        write_implementation(&model, &implementation, &mut out).unwrap();
        assert_eq!(out, "return -42;\n");
        assert_eq!(dump_implementation(&model, &implementation), out);

        let mut limited = Limited { remaining: 8 };
        assert_eq!(
            write_implementation(&model, &implementation, &mut limited),
            Err(fmt::Error)
        );
    }
}
