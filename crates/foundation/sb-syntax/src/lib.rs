//! Parse-node tree consumed by the Sable compiler
//!
//! The tree is produced by an external parser and only ever read by the
//! compiler. Nodes are serde-serializable so a parser living in another
//! process can hand them over as JSON.

mod construct;

use sb_span::{FileId, FileSpan};
use serde::{Deserialize, Serialize};

/// One parsed source file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// File the unit was parsed from
    #[serde(default)]
    pub file: FileId,
    /// Imported namespaces (`using System.Html;`)
    #[serde(default)]
    pub usings: Vec<String>,
    /// Namespace blocks, in source order
    #[serde(default)]
    pub namespaces: Vec<NamespaceDecl>,
}

/// A namespace block; the empty name denotes the global namespace
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamespaceDecl {
    /// Dotted namespace name
    pub name: String,
    /// Type declarations
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Kind of a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDeclKind {
    /// `class`
    Class,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
    /// `delegate`
    Delegate,
    /// `struct`
    Struct,
}

/// Declared accessibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `internal`
    Internal,
    /// `private` (the default for members)
    #[default]
    Private,
}

/// Declaration modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Declared accessibility
    pub visibility: Visibility,
    /// `static`
    pub is_static: bool,
    /// `abstract`
    pub is_abstract: bool,
    /// `virtual`
    pub is_virtual: bool,
    /// `override`
    pub is_override: bool,
    /// `partial`
    pub is_partial: bool,
    /// `sealed`
    pub is_sealed: bool,
    /// `extern` (implemented by the runtime, no body)
    pub is_extern: bool,
}

/// Naming and emission hints attached to a declaration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Hints {
    /// Explicit output name
    pub script_name: Option<String>,
    /// Keep the source name even in minimized output
    pub preserve_name: bool,
    /// Declared for reference only, never emitted
    pub imported: bool,
    /// Enumeration backed by its member names instead of numbers
    pub named_values: bool,
}

/// A reference to a type as written (`int`, `Shape`, `System.Object`, `int[]`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeRef {
    /// Name as written
    pub name: String,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// A type declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Simple name
    pub name: String,
    /// Declaration kind
    pub kind: TypeDeclKind,
    /// Modifiers
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Naming hints
    #[serde(default)]
    pub hints: Hints,
    /// Base class followed by interfaces, as written
    #[serde(default)]
    pub base_types: Vec<TypeRef>,
    /// Members
    #[serde(default)]
    pub members: Vec<MemberDecl>,
    /// Enumeration values (enums only)
    #[serde(default)]
    pub enum_values: Vec<EnumValueDecl>,
    /// Delegate signature parameters (delegates only)
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// One enumeration member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDecl {
    /// Member name
    pub name: String,
    /// Explicit value, if any
    #[serde(default)]
    pub value: Option<i64>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// A formal parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDecl {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub ty: TypeRef,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// A member declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberDecl {
    /// Field
    Field(FieldDecl),
    /// Method
    Method(MethodDecl),
    /// Constructor
    Constructor(ConstructorDecl),
    /// Property
    Property(PropertyDecl),
    /// Indexer (`this[...]`)
    Indexer(IndexerDecl),
    /// Event
    Event(EventDecl),
}

impl MemberDecl {
    /// Modifiers of the member
    pub fn modifiers(&self) -> &Modifiers {
        match self {
            Self::Field(decl) => &decl.modifiers,
            Self::Method(decl) => &decl.modifiers,
            Self::Constructor(decl) => &decl.modifiers,
            Self::Property(decl) => &decl.modifiers,
            Self::Indexer(decl) => &decl.modifiers,
            Self::Event(decl) => &decl.modifiers,
        }
    }

    /// Source location of the member
    pub fn span(&self) -> FileSpan {
        match self {
            Self::Field(decl) => decl.span,
            Self::Method(decl) => decl.span,
            Self::Constructor(decl) => decl.span,
            Self::Property(decl) => decl.span,
            Self::Indexer(decl) => decl.span,
            Self::Event(decl) => decl.span,
        }
    }
}

/// Field declaration; may syntactically declare several fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Declared type
    pub ty: TypeRef,
    /// Declared names with their initializers
    pub declarators: Vec<VariableDeclarator>,
    /// Modifiers
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Naming hints
    #[serde(default)]
    pub hints: Hints,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// `name = value` in a field or local declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    /// Declared name
    pub name: String,
    /// Initializer expression
    #[serde(default)]
    pub value: Option<Expr>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Method declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Method name
    pub name: String,
    /// Return type (`void` for none)
    pub return_type: TypeRef,
    /// Parameters
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    /// Modifiers
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Naming hints
    #[serde(default)]
    pub hints: Hints,
    /// Body; absent for abstract, extern and interface methods
    #[serde(default)]
    pub body: Option<Block>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Constructor declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    /// Parameters
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    /// Modifiers
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Arguments of an explicit `: base(...)` initializer
    #[serde(default)]
    pub base_arguments: Option<Vec<Argument>>,
    /// Body
    #[serde(default)]
    pub body: Option<Block>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Property declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    /// Property name
    pub name: String,
    /// Property type
    pub ty: TypeRef,
    /// Modifiers
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Naming hints
    #[serde(default)]
    pub hints: Hints,
    /// `get` accessor
    #[serde(default)]
    pub getter: Option<Accessor>,
    /// `set` accessor
    #[serde(default)]
    pub setter: Option<Accessor>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Indexer declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexerDecl {
    /// Element type
    pub ty: TypeRef,
    /// Index parameters
    pub parameters: Vec<ParameterDecl>,
    /// Modifiers
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Naming hints
    #[serde(default)]
    pub hints: Hints,
    /// `get` accessor
    #[serde(default)]
    pub getter: Option<Accessor>,
    /// `set` accessor
    #[serde(default)]
    pub setter: Option<Accessor>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Event declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDecl {
    /// Event name
    pub name: String,
    /// Handler delegate type
    pub ty: TypeRef,
    /// Modifiers
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Naming hints
    #[serde(default)]
    pub hints: Hints,
    /// `add` accessor
    #[serde(default)]
    pub adder: Option<Accessor>,
    /// `remove` accessor
    #[serde(default)]
    pub remover: Option<Accessor>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// A property, indexer or event accessor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Accessor {
    /// User-written body; absent for automatic accessors
    #[serde(default)]
    pub body: Option<Block>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// `{ ... }`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    /// Statements in order
    #[serde(default)]
    pub statements: Vec<Stmt>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    /// Nested block
    Block(Block),
    /// `;`
    Empty {
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// Local variable declaration
    Local {
        /// Declared type (`var` infers from the initializer)
        ty: TypeRef,
        /// Declared names
        declarators: Vec<VariableDeclarator>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// Expression statement
    Expression(Expr),
    /// `if`
    If {
        /// Condition
        condition: Expr,
        /// Taken branch
        then_branch: Box<Stmt>,
        /// Else branch
        #[serde(default)]
        else_branch: Option<Box<Stmt>>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `while`
    While {
        /// Condition
        condition: Expr,
        /// Loop body
        body: Box<Stmt>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `for (init; condition; increment)`
    For {
        /// Initializer statements
        #[serde(default)]
        initializers: Vec<Stmt>,
        /// Condition
        #[serde(default)]
        condition: Option<Expr>,
        /// Increment expressions
        #[serde(default)]
        increments: Vec<Expr>,
        /// Loop body
        body: Box<Stmt>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `foreach (T name in collection)`
    Foreach {
        /// Declared element type
        ty: TypeRef,
        /// Loop variable
        name: String,
        /// Enumerated expression
        collection: Expr,
        /// Loop body
        body: Box<Stmt>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `return`
    Return {
        /// Returned value
        #[serde(default)]
        value: Option<Expr>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `break`
    Break {
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `continue`
    Continue {
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `throw`
    Throw {
        /// Thrown value; absent for a rethrow
        #[serde(default)]
        value: Option<Expr>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `try` / `catch` / `finally`
    Try {
        /// Protected block
        body: Block,
        /// Catch clause
        #[serde(default)]
        catch: Option<CatchClause>,
        /// Finally block
        #[serde(default)]
        finally: Option<Block>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
}

/// `catch (T name) { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    /// Bound exception variable
    #[serde(default)]
    pub name: Option<String>,
    /// Handler
    pub body: Block,
}

/// Literal constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Float(f64),
    /// String literal
    String(String),
}

/// Binary operators, including the ones usable in compound assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
}

impl BinaryOp {
    /// Operator produces a boolean
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::And | Self::Or
        )
    }

    /// Operator text
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
    /// `~x`
    BitNot,
    /// `++x`
    PreIncrement,
    /// `--x`
    PreDecrement,
    /// `x++`
    PostIncrement,
    /// `x--`
    PostDecrement,
}

impl UnaryOp {
    /// Operator writes to its operand
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            Self::PreIncrement | Self::PreDecrement | Self::PostIncrement | Self::PostDecrement
        )
    }
}

/// Call or construction argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// `name:` label of a named argument
    #[serde(default)]
    pub name: Option<String>,
    /// Argument value
    pub value: Expr,
}

/// An expression with its location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// Expression shape
    pub kind: ExprKind,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Expression shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    /// Constant
    Literal(Literal),
    /// Simple name
    Name(String),
    /// `this`
    This,
    /// `base`
    Base,
    /// `target.name`
    Member {
        /// Accessed expression
        target: Box<Expr>,
        /// Member name
        name: String,
    },
    /// `target(arguments)`
    Call {
        /// Invoked expression
        target: Box<Expr>,
        /// Arguments
        #[serde(default)]
        arguments: Vec<Argument>,
    },
    /// `new T(arguments)`
    New {
        /// Constructed type
        ty: TypeRef,
        /// Arguments
        #[serde(default)]
        arguments: Vec<Argument>,
    },
    /// `target[arguments]`
    Index {
        /// Indexed expression
        target: Box<Expr>,
        /// Index arguments
        arguments: Vec<Argument>,
    },
    /// Prefix or postfix operator
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// Infix operator
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// `target = value` or `target op= value`
    Assign {
        /// Operator of a compound assignment
        #[serde(default)]
        op: Option<BinaryOp>,
        /// Assigned location
        target: Box<Expr>,
        /// Assigned value
        value: Box<Expr>,
    },
    /// `condition ? then_value : else_value`
    Conditional {
        /// Condition
        condition: Box<Expr>,
        /// Value when true
        then_value: Box<Expr>,
        /// Value when false
        else_value: Box<Expr>,
    },
    /// `(T)value`
    Cast {
        /// Target type
        ty: TypeRef,
        /// Converted value
        value: Box<Expr>,
    },
    /// `delegate (parameters) { body }`
    AnonymousMethod {
        /// Parameters
        #[serde(default)]
        parameters: Vec<ParameterDecl>,
        /// Body
        body: Block,
    },
}
