//! Statement lowering

use crate::context::BodyContext;
use crate::expression::ExpressionBuilder;
use sb_diagnostics::{CompileError, Diagnostic};
use sb_model::{CatchBlock, Expression, ScopeKind, Statement, SymbolId, VariableInitializer};
use sb_resolve::resolve_type_name;
use sb_span::FileSpan;
use sb_syntax::{Block, CatchClause, Expr, Stmt, TypeRef, VariableDeclarator};

/// Type name that asks for the type of the initializer
const INFERRED_TYPE: &str = "var";

/// Lowers statements, opening a scope for every block and loop
pub struct StatementBuilder<'b, 'm> {
    context: &'b mut BodyContext<'m>,
}

impl<'b, 'm> StatementBuilder<'b, 'm> {
    /// Builder for the body described by `context`
    pub fn new(context: &'b mut BodyContext<'m>) -> Self {
        Self { context }
    }

    /// Lower statements into the current scope, dropping ones with no effect
    pub fn build_statements(&mut self, statements: &[Stmt]) -> Result<Vec<Statement>, Diagnostic> {
        let mut lowered = Vec::with_capacity(statements.len());
        for statement in statements {
            if let Some(statement) = self.build_statement(statement)? {
                lowered.push(statement);
            }
        }
        Ok(lowered)
    }

    /// Lower one statement; `None` for statements with no runtime effect
    pub fn build_statement(&mut self, statement: &Stmt) -> Result<Option<Statement>, Diagnostic> {
        let lowered = match statement {
            Stmt::Block(block) => Statement::Block(self.build_block(block)?),
            Stmt::Empty { .. } => return Ok(None),
            Stmt::Local {
                ty, declarators, ..
            } => Statement::VariableDeclaration(self.build_locals(ty, declarators)?),
            Stmt::Expression(expr) => Statement::Expression {
                expression: self.expression(expr)?,
                is_fragment: false,
            },
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let condition = self.expression(condition)?;
                let then_branch = self.build_embedded(then_branch)?;
                let else_branch = match else_branch {
                    Some(branch) => Some(self.build_embedded(branch)?),
                    None => None,
                };
                Statement::If {
                    condition,
                    then_branch,
                    else_branch,
                }
            }
            Stmt::While {
                condition, body, ..
            } => Statement::While {
                condition: self.expression(condition)?,
                body: self.build_embedded(body)?,
            },
            Stmt::For {
                initializers,
                condition,
                increments,
                body,
                ..
            } => {
                self.context.locals.push_scope(ScopeKind::Block);
                let lowered = self.build_for(initializers, condition.as_ref(), increments, body);
                self.context.locals.pop_scope();
                lowered?
            }
            Stmt::Foreach {
                ty,
                name,
                collection,
                body,
                span,
            } => {
                let collection = self.expression(collection)?;
                self.context.locals.push_scope(ScopeKind::Block);
                let lowered = self.build_foreach(ty, name, collection, body, *span);
                self.context.locals.pop_scope();
                lowered?
            }
            Stmt::Return { value, .. } => Statement::Return(self.optional_expression(value.as_ref())?),
            Stmt::Break { .. } => Statement::Break,
            Stmt::Continue { .. } => Statement::Continue,
            Stmt::Throw { value, .. } => Statement::Throw(self.optional_expression(value.as_ref())?),
            Stmt::Try {
                body,
                catch,
                finally,
                ..
            } => {
                let body = self.build_block(body)?;
                let catch = match catch {
                    Some(clause) => Some(self.build_catch(clause)?),
                    None => None,
                };
                let finally = match finally {
                    Some(block) => Some(self.build_block(block)?),
                    None => None,
                };
                Statement::Try {
                    body,
                    catch,
                    finally,
                }
            }
        };
        Ok(Some(lowered))
    }

    /// Lower a nested block in its own scope
    fn build_block(&mut self, block: &Block) -> Result<Vec<Statement>, Diagnostic> {
        self.context.locals.push_scope(ScopeKind::Block);
        let statements = self.build_statements(&block.statements);
        self.context.locals.pop_scope();
        statements
    }

    /// Lower the body of an `if` or loop; an effect-free body becomes an empty block
    fn build_embedded(&mut self, statement: &Stmt) -> Result<Box<Statement>, Diagnostic> {
        let lowered = self
            .build_statement(statement)?
            .unwrap_or(Statement::Block(Vec::new()));
        Ok(Box::new(lowered))
    }

    fn build_locals(
        &mut self,
        ty: &TypeRef,
        declarators: &[VariableDeclarator],
    ) -> Result<Vec<VariableInitializer>, Diagnostic> {
        let declared = if ty.name == INFERRED_TYPE {
            None
        } else {
            Some(self.resolve_type(ty)?)
        };

        let mut initializers = Vec::with_capacity(declarators.len());
        for declarator in declarators {
            // The initializer cannot see the local it initializes
            let value = self.optional_expression(declarator.value.as_ref())?;
            let ty = declared.or_else(|| value.as_ref().and_then(|value| value.ty));
            let name = self.context.model.intern(&declarator.name);
            let local = self.context.locals.add_local(name, ty, declarator.span);
            initializers.push(VariableInitializer { local, value });
        }
        Ok(initializers)
    }

    fn build_for(
        &mut self,
        initializers: &[Stmt],
        condition: Option<&Expr>,
        increments: &[Expr],
        body: &Stmt,
    ) -> Result<Statement, Diagnostic> {
        let initializers = self.build_statements(initializers)?;
        let condition = self.optional_expression(condition)?;
        let increments = increments
            .iter()
            .map(|increment| self.expression(increment))
            .collect::<Result<Vec<_>, _>>()?;
        let body = self.build_embedded(body)?;
        Ok(Statement::For {
            initializers,
            condition,
            increments,
            body,
        })
    }

    fn build_foreach(
        &mut self,
        ty: &TypeRef,
        name: &str,
        collection: Expression,
        body: &Stmt,
        span: FileSpan,
    ) -> Result<Statement, Diagnostic> {
        let context = &mut *self.context;
        let enumerator = context
            .locals
            .add_synthetic_local(context.model.interner(), "enum", None);

        let element = if ty.name == INFERRED_TYPE {
            None
        } else {
            Some(self.resolve_type(ty)?)
        };
        let name = self.context.model.intern(name);
        let variable = self.context.locals.add_local(name, element, span);
        let body = self.build_embedded(body)?;
        Ok(Statement::Foreach {
            variable,
            enumerator,
            collection,
            body,
        })
    }

    fn build_catch(&mut self, clause: &CatchClause) -> Result<CatchBlock, Diagnostic> {
        self.context.locals.push_scope(ScopeKind::Block);
        let variable = clause.name.as_ref().map(|name| {
            let name = self.context.model.intern(name);
            self.context.locals.add_local(name, None, clause.body.span)
        });
        let body = self.build_statements(&clause.body.statements);
        self.context.locals.pop_scope();
        Ok(CatchBlock {
            variable,
            body: body?,
        })
    }

    fn expression(&mut self, expr: &Expr) -> Result<Expression, Diagnostic> {
        ExpressionBuilder::new(&mut *self.context).build_expression(expr)
    }

    fn optional_expression(&mut self, expr: Option<&Expr>) -> Result<Option<Expression>, Diagnostic> {
        expr.map(|expr| self.expression(expr)).transpose()
    }

    fn resolve_type(&self, ty: &TypeRef) -> Result<SymbolId, Diagnostic> {
        resolve_type_name(self.context.model, &ty.name, Some(self.context.owner)).ok_or_else(|| {
            Diagnostic::at(
                CompileError::UnresolvedType {
                    name: ty.name.clone(),
                },
                ty.span,
            )
        })
    }
}
