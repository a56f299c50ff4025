//! Compiler diagnostics and the error-reporting collaborator
//!
//! Every stage of the pipeline reports user-facing problems through an
//! [`ErrorReporter`]. Reporting never stops a stage by itself; the driver
//! consults [`ErrorReporter::has_errors`] between stages and stops the
//! pipeline once anything was reported.

use miette::Diagnostic as MietteDiagnostic;
use sb_span::FileSpan;
use std::fmt;
use thiserror::Error;

/// Errors surfaced to the user of the compiler
#[derive(Error, Debug, Clone, PartialEq, Eq, MietteDiagnostic)]
pub enum CompileError {
    /// Two application types produce the same script name
    #[error(
        "the type '{name}' conflicts with another existing type '{other}' with the same script name"
    )]
    #[diagnostic(
        code(sable::conflicting_type_name),
        help("rename one of the types or give it a distinct script name")
    )]
    ConflictingTypeName {
        /// Full name of the type being checked
        name: String,
        /// Full name of the type that claimed the script name first
        other: String,
    },

    /// Two members of one type produce the same script name
    #[error("the member '{member}' is defined more than once in '{type_name}'")]
    #[diagnostic(code(sable::duplicate_member_name))]
    DuplicateMemberName {
        /// Full name of the declaring type
        type_name: String,
        /// Script name shared by the members
        member: String,
    },

    /// A simple name does not resolve to a local, member or type
    #[error("the name '{name}' does not exist in the current context")]
    #[diagnostic(code(sable::unresolved_name))]
    UnresolvedName {
        /// The name as written
        name: String,
    },

    /// A member access names nothing on the target type
    #[error("'{type_name}' does not contain a definition for '{member}'")]
    #[diagnostic(code(sable::unresolved_member))]
    UnresolvedMember {
        /// Full name of the type searched
        type_name: String,
        /// The member as written
        member: String,
    },

    /// A type reference does not resolve
    #[error("the type '{name}' could not be found")]
    #[diagnostic(code(sable::unresolved_type), help("check the namespace imports"))]
    UnresolvedType {
        /// The type name as written
        name: String,
    },

    /// No overload of a method or constructor accepts the arguments
    #[error("no overload for '{name}' takes {arity} arguments")]
    #[diagnostic(code(sable::no_matching_overload))]
    NoMatchingOverload {
        /// Method or type name
        name: String,
        /// Number of arguments supplied
        arity: usize,
    },

    /// An argument list has a shape lowering cannot express
    #[error("malformed argument list: {reason}")]
    #[diagnostic(code(sable::malformed_arguments))]
    MalformedArguments {
        /// What is wrong with the list
        reason: String,
    },

    /// A field declaration declares more than one field
    #[error("field declarations are limited to a single field per declaration ('{field}')")]
    #[diagnostic(code(sable::multiple_field_declarators))]
    MultipleFieldDeclarators {
        /// Name of the first declarator
        field: String,
    },

    /// `base` used where no base class exists
    #[error("'base' is not available in the current context")]
    #[diagnostic(code(sable::base_not_allowed))]
    BaseNotAllowed,

    /// The left side of an assignment cannot be assigned
    #[error("the left-hand side of an assignment must be a variable, field, property or indexer")]
    #[diagnostic(code(sable::invalid_assignment_target))]
    InvalidAssignmentTarget,

    /// Anything else
    #[error("{message}")]
    #[diagnostic(code(sable::general))]
    General {
        /// Free-form description
        message: String,
    },
}

/// A reported error with the location it was reported at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong
    pub error: CompileError,
    /// Where it went wrong, when known
    pub location: Option<FileSpan>,
}

impl Diagnostic {
    /// Diagnostic attached to a source location
    pub fn at(error: CompileError, location: FileSpan) -> Self {
        Self {
            error,
            location: Some(location),
        }
    }

    /// Diagnostic with no meaningful location
    pub fn general(error: CompileError) -> Self {
        Self {
            error,
            location: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(formatter, "{location}: {}", self.error),
            None => write!(formatter, "{}", self.error),
        }
    }
}

/// Error-reporting collaborator shared by all pipeline stages
pub trait ErrorReporter {
    /// Record a diagnostic
    fn report(&mut self, diagnostic: Diagnostic);

    /// Whether any diagnostic was recorded
    fn has_errors(&self) -> bool;
}

/// Reporter that keeps every diagnostic in report order
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics reported so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take ownership of the collected diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Number of diagnostics reported so far
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether nothing was reported
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl ErrorReporter for DiagnosticBag {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::error!(location = ?diagnostic.location, "{}", diagnostic.error);
        self.diagnostics.push(diagnostic);
    }

    fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_span::{FileId, Span};

    #[test]
    fn test_bag_collects_every_report() {
        let mut bag = DiagnosticBag::new();
        assert!(!bag.has_errors());

        bag.report(Diagnostic::general(CompileError::BaseNotAllowed));
        bag.report(Diagnostic::at(
            CompileError::UnresolvedName {
                name: "missing".to_string(),
            },
            FileSpan::new(FileId(0), Span::new(3, 10)),
        ));

        assert!(bag.has_errors());
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.diagnostics()[0].error, CompileError::BaseNotAllowed);
    }

    #[test]
    fn test_conflict_message_names_both_types() {
        let error = CompileError::ConflictingTypeName {
            name: "Other.Widget".to_string(),
            other: "App.Widget".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("Other.Widget"));
        assert!(message.contains("App.Widget"));
    }

    #[test]
    fn test_display_includes_location() {
        let diagnostic = Diagnostic::at(
            CompileError::InvalidAssignmentTarget,
            FileSpan::new(FileId(1), Span::new(0, 4)),
        );
        assert!(diagnostic.to_string().starts_with("file#1[0..4]: "));
    }
}
