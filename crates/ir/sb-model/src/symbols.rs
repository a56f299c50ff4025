//! Symbols making up the program graph

use sb_arena::Idx;
use sb_intern::Name;
use sb_span::FileSpan;
use sb_syntax::{Hints, MemberDecl, Modifiers, Visibility};
use std::sync::Arc;

/// Handle to a symbol in the graph
pub type SymbolId = Idx<Symbol>;

/// A declared entity: namespace, type, member or parameter
///
/// Ownership runs from parent to child through the `members`/`types`/
/// `parameters` lists; every other link between symbols is a plain id.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Source name
    pub name: Name,
    /// Owning symbol; `None` only for the global namespace
    pub parent: Option<SymbolId>,
    /// Category-specific data
    pub kind: SymbolKind,
    /// Visibility and modifier flags
    pub flags: SymbolFlags,
    /// Naming hints from the declaration
    pub hints: NamingHints,
    /// Output name assigned by the symbol transformer
    pub generated_name: Option<String>,
    /// Declaration site
    pub span: FileSpan,
}

impl Symbol {
    /// Create a symbol with default flags and no parent
    pub fn new(name: Name, kind: SymbolKind) -> Self {
        Self {
            name,
            parent: None,
            kind,
            flags: SymbolFlags::default(),
            hints: NamingHints::default(),
            generated_name: None,
            span: FileSpan::default(),
        }
    }

    /// Set the flags
    #[must_use]
    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the naming hints
    #[must_use]
    pub fn with_hints(mut self, hints: NamingHints) -> Self {
        self.hints = hints;
        self
    }

    /// Set the declaration site
    #[must_use]
    pub fn with_span(mut self, span: FileSpan) -> Self {
        self.span = span;
        self
    }

    /// Type data, if this is a type
    pub fn as_type(&self) -> Option<&TypeData> {
        match &self.kind {
            SymbolKind::Type(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable type data, if this is a type
    pub fn as_type_mut(&mut self) -> Option<&mut TypeData> {
        match &mut self.kind {
            SymbolKind::Type(data) => Some(data),
            _ => None,
        }
    }

    /// Member data, if this is a member
    pub fn as_member(&self) -> Option<&MemberData> {
        match &self.kind {
            SymbolKind::Member(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable member data, if this is a member
    pub fn as_member_mut(&mut self) -> Option<&mut MemberData> {
        match &mut self.kind {
            SymbolKind::Member(data) => Some(data),
            _ => None,
        }
    }

    /// Whether the symbol is declared `public`
    pub fn is_public(&self) -> bool {
        self.flags.visibility == Visibility::Public
    }

    /// Whether the symbol is `static`
    pub fn is_static(&self) -> bool {
        self.flags.is_static
    }
}

/// Symbol categories
#[derive(Debug, Clone)]
pub enum SymbolKind {
    /// Namespace
    Namespace(NamespaceData),
    /// Class, interface, enumeration, delegate or struct
    Type(TypeData),
    /// Field, method, constructor, property, indexer, event, anonymous method
    Member(MemberData),
    /// Formal parameter of a member
    Parameter(ParameterData),
}

/// Namespace contents
#[derive(Debug, Clone, Default)]
pub struct NamespaceData {
    /// Types declared directly in the namespace
    pub types: Vec<SymbolId>,
}

/// Kind of type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Class
    Class,
    /// Interface
    Interface,
    /// Enumeration
    Enumeration,
    /// Delegate, a compile-time contract only
    Delegate,
    /// Struct
    Struct,
}

/// Type data
#[derive(Debug, Clone)]
pub struct TypeData {
    /// Declaration kind
    pub kind: TypeKind,
    /// Base class; `None` for root types
    pub base_class: Option<SymbolId>,
    /// Implemented interfaces
    pub interfaces: Vec<SymbolId>,
    /// Owned members, in declaration order
    pub members: Vec<SymbolId>,
    /// Defined in the program under compilation
    pub is_application: bool,
    /// First fragment of a partial class; equals the type itself for the primary
    pub primary_partial: Option<SymbolId>,
    /// Enumeration backed by member names
    pub named_values: bool,
    /// Namespaces imported by the declaring compilation units
    pub imports: Vec<SymbolId>,
    /// Intrinsic kind for core library types
    pub intrinsic: Option<IntrinsicType>,
}

impl TypeData {
    /// Fresh type data with no links
    pub fn new(kind: TypeKind, is_application: bool) -> Self {
        Self {
            kind,
            base_class: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            is_application,
            primary_partial: None,
            named_values: false,
            imports: Vec::new(),
            intrinsic: None,
        }
    }
}

/// Member kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Field
    Field,
    /// Enumeration member with its constant value
    EnumField {
        /// Numeric value
        value: i64,
    },
    /// Method
    Method,
    /// Constructor
    Constructor,
    /// Property
    Property,
    /// Indexer
    Indexer,
    /// Event
    Event,
    /// Anonymous method created while lowering a body
    AnonymousMethod {
        /// Nesting depth; 1 for an anonymous method directly inside a member
        depth: u32,
    },
}

/// Member data
#[derive(Debug, Clone)]
pub struct MemberData {
    /// Member kind
    pub kind: MemberKind,
    /// Field, property or return type; `None` for `void` and constructors
    pub ty: Option<SymbolId>,
    /// Parameters in declaration order
    pub parameters: Vec<SymbolId>,
    /// Declaration the member was built from
    pub parse_context: Option<Arc<MemberDecl>>,
    /// A field initializer was recorded during lowering
    pub has_initializer: bool,
    /// Base member this member overrides
    pub overridden: Option<SymbolId>,
    /// Interface member this member implements
    pub interface_member: Option<SymbolId>,
}

impl MemberData {
    /// Fresh member data
    pub fn new(kind: MemberKind, ty: Option<SymbolId>) -> Self {
        Self {
            kind,
            ty,
            parameters: Vec::new(),
            parse_context: None,
            has_initializer: false,
            overridden: None,
            interface_member: None,
        }
    }

    /// Attach the originating declaration
    #[must_use]
    pub fn with_parse_context(mut self, decl: Arc<MemberDecl>) -> Self {
        self.parse_context = Some(decl);
        self
    }

    /// Mark the field as initialized
    pub fn set_implementation_state(&mut self, has_initializer: bool) {
        self.has_initializer = has_initializer;
    }
}

/// Parameter data
#[derive(Debug, Clone)]
pub struct ParameterData {
    /// Declared type
    pub ty: Option<SymbolId>,
    /// Zero-based position in the owning member
    pub position: usize,
}

/// Visibility and modifiers of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymbolFlags {
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
    /// `extern`
    pub is_extern: bool,
}

impl From<&Modifiers> for SymbolFlags {
    fn from(modifiers: &Modifiers) -> Self {
        Self {
            visibility: modifiers.visibility,
            is_static: modifiers.is_static,
            is_abstract: modifiers.is_abstract,
            is_virtual: modifiers.is_virtual,
            is_override: modifiers.is_override,
            is_extern: modifiers.is_extern,
        }
    }
}

impl SymbolFlags {
    /// Public, non-static
    pub fn public() -> Self {
        Self {
            visibility: Visibility::Public,
            ..Self::default()
        }
    }
}

/// Naming hints carried over from the declaration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamingHints {
    /// Explicit output name
    pub script_name: Option<String>,
    /// Never minimize this name
    pub preserve_name: bool,
}

impl From<&Hints> for NamingHints {
    fn from(hints: &Hints) -> Self {
        Self {
            script_name: hints.script_name.clone(),
            preserve_name: hints.preserve_name,
        }
    }
}

/// Intrinsic core library types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicType {
    /// `int`
    Integer,
    /// `uint`
    UnsignedInteger,
    /// `long`
    Long,
    /// `ulong`
    UnsignedLong,
    /// `short`
    Short,
    /// `ushort`
    UnsignedShort,
    /// `byte`
    Byte,
    /// `sbyte`
    SignedByte,
    /// `double`
    Double,
    /// `float`
    Single,
    /// `decimal`
    Decimal,
    /// `bool`
    Boolean,
    /// `object`
    Object,
    /// `string`
    String,
    /// `void`
    Void,
    /// Arrays of any element type
    Array,
    /// Untyped function values
    Function,
}

impl IntrinsicType {
    /// Every intrinsic type
    pub const ALL: [Self; 17] = [
        Self::Integer,
        Self::UnsignedInteger,
        Self::Long,
        Self::UnsignedLong,
        Self::Short,
        Self::UnsignedShort,
        Self::Byte,
        Self::SignedByte,
        Self::Double,
        Self::Single,
        Self::Decimal,
        Self::Boolean,
        Self::Object,
        Self::String,
        Self::Void,
        Self::Array,
        Self::Function,
    ];

    /// Name of the core library type
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Integer => "Int32",
            Self::UnsignedInteger => "UInt32",
            Self::Long => "Int64",
            Self::UnsignedLong => "UInt64",
            Self::Short => "Int16",
            Self::UnsignedShort => "UInt16",
            Self::Byte => "Byte",
            Self::SignedByte => "SByte",
            Self::Double => "Double",
            Self::Single => "Single",
            Self::Decimal => "Decimal",
            Self::Boolean => "Boolean",
            Self::Object => "Object",
            Self::String => "String",
            Self::Void => "Void",
            Self::Array => "Array",
            Self::Function => "Function",
        }
    }

    /// Source keyword aliasing the type
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "int" => Self::Integer,
            "uint" => Self::UnsignedInteger,
            "long" => Self::Long,
            "ulong" => Self::UnsignedLong,
            "short" => Self::Short,
            "ushort" => Self::UnsignedShort,
            "byte" => Self::Byte,
            "sbyte" => Self::SignedByte,
            "double" => Self::Double,
            "float" => Self::Single,
            "decimal" => Self::Decimal,
            "bool" => Self::Boolean,
            "object" => Self::Object,
            "string" => Self::String,
            "void" => Self::Void,
            _ => return None,
        };
        Some(kind)
    }

    /// Numeric kinds, including `decimal`
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::UnsignedInteger
                | Self::Long
                | Self::UnsignedLong
                | Self::Short
                | Self::UnsignedShort
                | Self::Byte
                | Self::SignedByte
                | Self::Double
                | Self::Single
                | Self::Decimal
        )
    }

    /// Floating point kinds
    pub fn is_floating(self) -> bool {
        matches!(self, Self::Double | Self::Single | Self::Decimal)
    }
}

/// Which symbols a lookup may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolFilter {
    /// Accept locals and parameters
    pub locals: bool,
    /// Accept types
    pub types: bool,
    /// Accept instance members
    pub instance_members: bool,
    /// Accept static members
    pub static_members: bool,
}

impl SymbolFilter {
    /// Anything
    pub const ALL: Self = Self {
        locals: true,
        types: true,
        instance_members: true,
        static_members: true,
    };

    /// Types only
    pub const TYPES: Self = Self {
        locals: false,
        types: true,
        instance_members: false,
        static_members: false,
    };

    /// Members of either kind
    pub const MEMBERS: Self = Self {
        locals: false,
        types: false,
        instance_members: true,
        static_members: true,
    };

    /// Instance members only
    pub const INSTANCE_MEMBERS: Self = Self {
        locals: false,
        types: false,
        instance_members: true,
        static_members: false,
    };

    /// Static members only
    pub const STATIC_MEMBERS: Self = Self {
        locals: false,
        types: false,
        instance_members: false,
        static_members: true,
    };

    /// Whether a graph symbol passes the filter
    pub fn accepts(self, symbol: &Symbol) -> bool {
        match &symbol.kind {
            SymbolKind::Namespace(_) => false,
            SymbolKind::Type(_) => self.types,
            SymbolKind::Member(_) => {
                if symbol.flags.is_static {
                    self.static_members
                } else {
                    self.instance_members
                }
            }
            SymbolKind::Parameter(_) => self.locals,
        }
    }
}
