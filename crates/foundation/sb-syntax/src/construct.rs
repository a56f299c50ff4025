//! Constructors for assembling parse trees by hand
//!
//! Parsers build nodes directly; these helpers exist for tests and tools
//! that synthesize small programs. All nodes get default spans.

use crate::*;

impl TypeRef {
    /// Reference a type by name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            span: FileSpan::default(),
        }
    }
}

impl Modifiers {
    /// `public`
    #[must_use]
    pub fn public(mut self) -> Self {
        self.visibility = Visibility::Public;
        self
    }

    /// `internal`
    #[must_use]
    pub fn internal(mut self) -> Self {
        self.visibility = Visibility::Internal;
        self
    }

    /// `protected`
    #[must_use]
    pub fn protected(mut self) -> Self {
        self.visibility = Visibility::Protected;
        self
    }

    /// `static`
    #[must_use]
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// `virtual`
    #[must_use]
    pub fn with_virtual(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    /// `override`
    #[must_use]
    pub fn with_override(mut self) -> Self {
        self.is_override = true;
        self
    }

    /// `abstract`
    #[must_use]
    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// `partial`
    #[must_use]
    pub fn with_partial(mut self) -> Self {
        self.is_partial = true;
        self
    }
}

impl CompilationUnit {
    /// Unit holding a single namespace
    pub fn with_namespace(namespace: NamespaceDecl) -> Self {
        Self {
            namespaces: vec![namespace],
            ..Self::default()
        }
    }

    /// Add a `using` import
    #[must_use]
    pub fn using(mut self, namespace: impl Into<String>) -> Self {
        self.usings.push(namespace.into());
        self
    }
}

impl NamespaceDecl {
    /// Namespace with the given types
    pub fn new(name: impl Into<String>, types: Vec<TypeDecl>) -> Self {
        Self {
            name: name.into(),
            types,
            span: FileSpan::default(),
        }
    }
}

impl TypeDecl {
    fn of_kind(name: impl Into<String>, kind: TypeDeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::default(),
            hints: Hints::default(),
            base_types: Vec::new(),
            members: Vec::new(),
            enum_values: Vec::new(),
            parameters: Vec::new(),
            span: FileSpan::default(),
        }
    }

    /// `class name`
    pub fn class(name: impl Into<String>) -> Self {
        Self::of_kind(name, TypeDeclKind::Class)
    }

    /// `interface name`
    pub fn interface(name: impl Into<String>) -> Self {
        Self::of_kind(name, TypeDeclKind::Interface)
    }

    /// `struct name`
    pub fn structure(name: impl Into<String>) -> Self {
        Self::of_kind(name, TypeDeclKind::Struct)
    }

    /// `delegate void name(...)`
    pub fn delegate(name: impl Into<String>) -> Self {
        Self::of_kind(name, TypeDeclKind::Delegate)
    }

    /// `enum name { values }` with implicit numbering
    pub fn enumeration(name: impl Into<String>, values: &[&str]) -> Self {
        let mut decl = Self::of_kind(name, TypeDeclKind::Enum);
        decl.enum_values = values
            .iter()
            .map(|value| EnumValueDecl {
                name: (*value).to_string(),
                value: None,
                span: FileSpan::default(),
            })
            .collect();
        decl
    }

    /// Replace the modifiers
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replace the naming hints
    #[must_use]
    pub fn with_hints(mut self, hints: Hints) -> Self {
        self.hints = hints;
        self
    }

    /// Append a base class or interface
    #[must_use]
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.base_types.push(TypeRef::named(base));
        self
    }

    /// Append a member
    #[must_use]
    pub fn with_member(mut self, member: impl Into<MemberDecl>) -> Self {
        self.members.push(member.into());
        self
    }
}

impl From<FieldDecl> for MemberDecl {
    fn from(decl: FieldDecl) -> Self {
        Self::Field(decl)
    }
}

impl From<MethodDecl> for MemberDecl {
    fn from(decl: MethodDecl) -> Self {
        Self::Method(decl)
    }
}

impl From<ConstructorDecl> for MemberDecl {
    fn from(decl: ConstructorDecl) -> Self {
        Self::Constructor(decl)
    }
}

impl From<PropertyDecl> for MemberDecl {
    fn from(decl: PropertyDecl) -> Self {
        Self::Property(decl)
    }
}

impl From<IndexerDecl> for MemberDecl {
    fn from(decl: IndexerDecl) -> Self {
        Self::Indexer(decl)
    }
}

impl From<EventDecl> for MemberDecl {
    fn from(decl: EventDecl) -> Self {
        Self::Event(decl)
    }
}

impl ParameterDecl {
    /// `ty name`
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeRef::named(ty),
            span: FileSpan::default(),
        }
    }
}

impl FieldDecl {
    /// Single-declarator field without initializer
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            ty: TypeRef::named(ty),
            declarators: vec![VariableDeclarator {
                name: name.into(),
                value: None,
                span: FileSpan::default(),
            }],
            modifiers: Modifiers::default(),
            hints: Hints::default(),
            span: FileSpan::default(),
        }
    }

    /// Set the initializer of the first declarator
    #[must_use]
    pub fn with_value(mut self, value: Expr) -> Self {
        if let Some(declarator) = self.declarators.first_mut() {
            declarator.value = Some(value);
        }
        self
    }

    /// Replace the modifiers
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl MethodDecl {
    /// Method with an empty body
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: TypeRef::named(return_type),
            parameters: Vec::new(),
            modifiers: Modifiers::default(),
            hints: Hints::default(),
            body: Some(Block::default()),
            span: FileSpan::default(),
        }
    }

    /// Append a parameter
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.parameters.push(ParameterDecl::new(name, ty));
        self
    }

    /// Replace the body
    #[must_use]
    pub fn with_body(mut self, statements: Vec<Stmt>) -> Self {
        self.body = Some(Block::new(statements));
        self
    }

    /// Remove the body (abstract, extern, interface)
    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    /// Replace the modifiers
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replace the naming hints
    #[must_use]
    pub fn with_hints(mut self, hints: Hints) -> Self {
        self.hints = hints;
        self
    }
}

impl ConstructorDecl {
    /// Public constructor with an empty body
    pub fn new() -> Self {
        Self {
            parameters: Vec::new(),
            modifiers: Modifiers::default().public(),
            base_arguments: None,
            body: Some(Block::default()),
            span: FileSpan::default(),
        }
    }

    /// Append a parameter
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.parameters.push(ParameterDecl::new(name, ty));
        self
    }

    /// Add an explicit `: base(...)` initializer
    #[must_use]
    pub fn with_base_arguments(mut self, arguments: Vec<Expr>) -> Self {
        self.base_arguments = Some(arguments.into_iter().map(Argument::positional).collect());
        self
    }

    /// Replace the body
    #[must_use]
    pub fn with_body(mut self, statements: Vec<Stmt>) -> Self {
        self.body = Some(Block::new(statements));
        self
    }

    /// Replace the modifiers
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl Default for ConstructorDecl {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyDecl {
    /// Property with no accessors yet
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeRef::named(ty),
            modifiers: Modifiers::default().public(),
            hints: Hints::default(),
            getter: None,
            setter: None,
            span: FileSpan::default(),
        }
    }

    /// Add a `get` accessor with a body
    #[must_use]
    pub fn with_getter(mut self, statements: Vec<Stmt>) -> Self {
        self.getter = Some(Accessor::with_body(statements));
        self
    }

    /// Add a `set` accessor with a body
    #[must_use]
    pub fn with_setter(mut self, statements: Vec<Stmt>) -> Self {
        self.setter = Some(Accessor::with_body(statements));
        self
    }

    /// Replace the modifiers
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl IndexerDecl {
    /// Indexer with one index parameter and no accessors yet
    pub fn new(ty: impl Into<String>, index: ParameterDecl) -> Self {
        Self {
            ty: TypeRef::named(ty),
            parameters: vec![index],
            modifiers: Modifiers::default().public(),
            hints: Hints::default(),
            getter: None,
            setter: None,
            span: FileSpan::default(),
        }
    }

    /// Add a `get` accessor with a body
    #[must_use]
    pub fn with_getter(mut self, statements: Vec<Stmt>) -> Self {
        self.getter = Some(Accessor::with_body(statements));
        self
    }

    /// Add a `set` accessor with a body
    #[must_use]
    pub fn with_setter(mut self, statements: Vec<Stmt>) -> Self {
        self.setter = Some(Accessor::with_body(statements));
        self
    }
}

impl EventDecl {
    /// Field-like event (no explicit accessors)
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeRef::named(ty),
            modifiers: Modifiers::default().public(),
            hints: Hints::default(),
            adder: None,
            remover: None,
            span: FileSpan::default(),
        }
    }

    /// Add explicit `add` and `remove` accessors
    #[must_use]
    pub fn with_accessors(mut self, add: Vec<Stmt>, remove: Vec<Stmt>) -> Self {
        self.adder = Some(Accessor::with_body(add));
        self.remover = Some(Accessor::with_body(remove));
        self
    }
}

impl Accessor {
    /// Accessor with a user-written body
    pub fn with_body(statements: Vec<Stmt>) -> Self {
        Self {
            body: Some(Block::new(statements)),
            span: FileSpan::default(),
        }
    }
}

impl Block {
    /// Block of statements
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self {
            statements,
            span: FileSpan::default(),
        }
    }
}

impl Argument {
    /// Unlabelled argument
    pub fn positional(value: Expr) -> Self {
        Self { name: None, value }
    }
}

impl Stmt {
    /// Expression statement
    pub fn expr(expr: Expr) -> Self {
        Self::Expression(expr)
    }

    /// `ty name = value;`
    pub fn local(ty: impl Into<String>, name: impl Into<String>, value: Option<Expr>) -> Self {
        Self::Local {
            ty: TypeRef::named(ty),
            declarators: vec![VariableDeclarator {
                name: name.into(),
                value,
                span: FileSpan::default(),
            }],
            span: FileSpan::default(),
        }
    }

    /// `return value;`
    pub fn ret(value: Option<Expr>) -> Self {
        Self::Return {
            value,
            span: FileSpan::default(),
        }
    }

    /// `{ statements }`
    pub fn block(statements: Vec<Self>) -> Self {
        Self::Block(Block::new(statements))
    }

    /// `;`
    pub fn empty() -> Self {
        Self::Empty {
            span: FileSpan::default(),
        }
    }
}

impl Expr {
    /// Wrap a shape with a default span
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            span: FileSpan::default(),
        }
    }

    /// Simple name
    pub fn name(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Name(name.into()))
    }

    /// Integer literal
    pub fn int(value: i64) -> Self {
        Self::new(ExprKind::Literal(Literal::Int(value)))
    }

    /// Boolean literal
    pub fn bool(value: bool) -> Self {
        Self::new(ExprKind::Literal(Literal::Bool(value)))
    }

    /// String literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal(Literal::String(value.into())))
    }

    /// `null`
    pub fn null() -> Self {
        Self::new(ExprKind::Literal(Literal::Null))
    }

    /// `this`
    pub fn this() -> Self {
        Self::new(ExprKind::This)
    }

    /// `base`
    pub fn base() -> Self {
        Self::new(ExprKind::Base)
    }

    /// `target.name`
    pub fn member(target: Self, name: impl Into<String>) -> Self {
        Self::new(ExprKind::Member {
            target: Box::new(target),
            name: name.into(),
        })
    }

    /// `target(arguments)`
    pub fn call(target: Self, arguments: Vec<Self>) -> Self {
        Self::new(ExprKind::Call {
            target: Box::new(target),
            arguments: arguments.into_iter().map(Argument::positional).collect(),
        })
    }

    /// `new ty(arguments)`
    pub fn new_object(ty: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self::new(ExprKind::New {
            ty: TypeRef::named(ty),
            arguments: arguments.into_iter().map(Argument::positional).collect(),
        })
    }

    /// `left op right`
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::new(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// `target = value`
    pub fn assign(target: Self, value: Self) -> Self {
        Self::new(ExprKind::Assign {
            op: None,
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    /// `target op= value`
    pub fn compound_assign(op: BinaryOp, target: Self, value: Self) -> Self {
        Self::new(ExprKind::Assign {
            op: Some(op),
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    /// `target[index]`
    pub fn index(target: Self, index: Self) -> Self {
        Self::new(ExprKind::Index {
            target: Box::new(target),
            arguments: vec![Argument::positional(index)],
        })
    }

    /// Prefix or postfix operator
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// `delegate (parameters) { statements }`
    pub fn anonymous_method(parameters: Vec<ParameterDecl>, statements: Vec<Stmt>) -> Self {
        Self::new(ExprKind::AnonymousMethod {
            parameters,
            body: Block::new(statements),
        })
    }
}
