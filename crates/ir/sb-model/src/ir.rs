//! Semantic statement and expression trees produced by body lowering

use crate::scope::{LocalId, ScopeTree};
use crate::SymbolId;
pub use sb_syntax::{BinaryOp, UnaryOp};

/// Which body of a member an implementation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    /// Method, constructor, anonymous method or field initializer
    Body,
    /// Property or indexer `get`
    Getter,
    /// Property or indexer `set`
    Setter,
    /// Event `add`
    Adder,
    /// Event `remove`
    Remover,
}

/// Key of an implementation slot in the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImplementationKey {
    /// Owning member
    pub member: SymbolId,
    /// Which body
    pub part: BodyPart,
}

impl ImplementationKey {
    /// Main body of a member
    pub fn body(member: SymbolId) -> Self {
        Self {
            member,
            part: BodyPart::Body,
        }
    }

    /// Specific accessor of a member
    pub fn part(member: SymbolId, part: BodyPart) -> Self {
        Self { member, part }
    }
}

/// The lowered body of one member
#[derive(Debug, Clone)]
pub struct SymbolImplementation {
    /// Statements in order
    pub statements: Vec<Statement>,
    /// Scope tree; `None` for field initializers and anonymous methods,
    /// whose names live in an enclosing tree
    pub scope: Option<ScopeTree>,
    /// Identifier standing for `this` in the body
    pub this_identifier: String,
}

impl SymbolImplementation {
    /// Implementation with its own scope tree
    pub fn new(statements: Vec<Statement>, scope: Option<ScopeTree>, this_identifier: &str) -> Self {
        Self {
            statements,
            scope,
            this_identifier: this_identifier.to_string(),
        }
    }
}

/// One local in a variable declaration
#[derive(Debug, Clone)]
pub struct VariableInitializer {
    /// Declared local
    pub local: LocalId,
    /// Initial value
    pub value: Option<Expression>,
}

/// `catch` handler
#[derive(Debug, Clone)]
pub struct CatchBlock {
    /// Bound exception variable
    pub variable: Option<LocalId>,
    /// Handler statements
    pub body: Vec<Statement>,
}

/// Statements
#[derive(Debug, Clone)]
pub enum Statement {
    /// Expression evaluated for effect
    Expression {
        /// Evaluated expression
        expression: Expression,
        /// Stands in for a declaration fragment rather than a full statement
        is_fragment: bool,
    },
    /// Local declaration
    VariableDeclaration(Vec<VariableInitializer>),
    /// Nested block
    Block(Vec<Statement>),
    /// `if`
    If {
        /// Condition
        condition: Expression,
        /// Taken branch
        then_branch: Box<Statement>,
        /// Else branch
        else_branch: Option<Box<Statement>>,
    },
    /// `while`
    While {
        /// Condition
        condition: Expression,
        /// Loop body
        body: Box<Statement>,
    },
    /// `for`
    For {
        /// Initializer statements
        initializers: Vec<Statement>,
        /// Condition
        condition: Option<Expression>,
        /// Increments
        increments: Vec<Expression>,
        /// Loop body
        body: Box<Statement>,
    },
    /// `foreach`, driven by a synthetic enumerator local
    Foreach {
        /// Loop variable
        variable: LocalId,
        /// Enumerator holding the iteration state
        enumerator: LocalId,
        /// Enumerated value
        collection: Expression,
        /// Loop body
        body: Box<Statement>,
    },
    /// `return`
    Return(Option<Expression>),
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `throw`
    Throw(Option<Expression>),
    /// `try`
    Try {
        /// Protected statements
        body: Vec<Statement>,
        /// Handler
        catch: Option<CatchBlock>,
        /// Finally statements
        finally: Option<Vec<Statement>>,
    },
}

/// Constant values
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `null`
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// String
    String(String),
}

/// Typed expression
#[derive(Debug, Clone)]
pub struct Expression {
    /// Expression shape
    pub kind: ExpressionKind,
    /// Static type, when known
    pub ty: Option<SymbolId>,
}

impl Expression {
    /// Create an expression
    pub fn new(kind: ExpressionKind, ty: Option<SymbolId>) -> Self {
        Self { kind, ty }
    }

    /// A literal
    pub fn literal(value: LiteralValue, ty: Option<SymbolId>) -> Self {
        Self::new(ExpressionKind::Literal(value), ty)
    }

    /// Whether the expression is the `base` reference
    pub fn is_base(&self) -> bool {
        matches!(self.kind, ExpressionKind::Base)
    }
}

/// Expression shapes
#[derive(Debug, Clone)]
pub enum ExpressionKind {
    /// Constant
    Literal(LiteralValue),
    /// Local variable
    Local(LocalId),
    /// Parameter of the member or an enclosing anonymous method
    Parameter(SymbolId),
    /// `this`
    This,
    /// `base`
    Base,
    /// Type used as a value (static access target)
    Type(SymbolId),
    /// Member access not yet classified
    Member {
        /// Accessed object
        target: Box<Expression>,
        /// Accessed member
        member: SymbolId,
    },
    /// Field read
    Field {
        /// Owning object
        target: Box<Expression>,
        /// Field
        field: SymbolId,
    },
    /// Property read through the getter
    PropertyGet {
        /// Owning object
        target: Box<Expression>,
        /// Property
        property: SymbolId,
    },
    /// Property write through the setter
    PropertySet {
        /// Owning object
        target: Box<Expression>,
        /// Property
        property: SymbolId,
        /// Assigned value
        value: Box<Expression>,
    },
    /// Method group used as a value
    MethodReference {
        /// Owning object
        target: Box<Expression>,
        /// Method
        method: SymbolId,
    },
    /// Event reference, used by `+=`/`-=`
    Event {
        /// Owning object
        target: Box<Expression>,
        /// Event
        event: SymbolId,
    },
    /// Method invocation
    MethodCall {
        /// Receiver
        target: Box<Expression>,
        /// Invoked method
        method: SymbolId,
        /// Arguments in parameter order
        arguments: Vec<Expression>,
    },
    /// Invocation of a delegate-typed value
    DelegateInvoke {
        /// Invoked value
        target: Box<Expression>,
        /// Arguments
        arguments: Vec<Expression>,
    },
    /// Call of the base class constructor
    BaseInitializer {
        /// Arguments in parameter order
        arguments: Vec<Expression>,
    },
    /// Object construction
    New {
        /// Constructed type
        ty: SymbolId,
        /// Selected constructor, if the type declares any
        constructor: Option<SymbolId>,
        /// Arguments
        arguments: Vec<Expression>,
    },
    /// Element access, through an indexer when one is declared
    Index {
        /// Indexed object
        target: Box<Expression>,
        /// Declared indexer
        indexer: Option<SymbolId>,
        /// Index values
        arguments: Vec<Expression>,
    },
    /// Prefix or postfix operator
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expression>,
    },
    /// Infix operator
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expression>,
        /// Right operand
        right: Box<Expression>,
    },
    /// Assignment to a local, parameter, field or element
    Assign {
        /// Operator of a compound assignment
        op: Option<BinaryOp>,
        /// Assigned location
        target: Box<Expression>,
        /// Assigned value
        value: Box<Expression>,
    },
    /// `condition ? a : b`
    Conditional {
        /// Condition
        condition: Box<Expression>,
        /// Value when true
        then_value: Box<Expression>,
        /// Value when false
        else_value: Box<Expression>,
    },
    /// Conversion
    Cast {
        /// Converted value
        value: Box<Expression>,
        /// Target type
        target_type: SymbolId,
    },
    /// Anonymous method value
    AnonymousMethod {
        /// Anonymous method member
        method: SymbolId,
    },
}
