//! Declaration checks run while building the graph

use sb_diagnostics::{CompileError, Diagnostic};
use sb_syntax::{FieldDecl, VariableDeclarator};

/// The single declarator of a field declaration
///
/// Each field declaration may declare exactly one field; `int a, b;` is
/// rejected.
pub fn field_declarator(field: &FieldDecl) -> Result<&VariableDeclarator, Diagnostic> {
    match field.declarators.as_slice() {
        [declarator] => Ok(declarator),
        [first, ..] => Err(Diagnostic::at(
            CompileError::MultipleFieldDeclarators {
                field: first.name.clone(),
            },
            field.span,
        )),
        [] => Err(Diagnostic::at(
            CompileError::General {
                message: "field declaration declares no field".to_string(),
            },
            field.span,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_declarator_is_accepted() {
        let field = FieldDecl::new("count", "int");
        assert_eq!(field_declarator(&field).unwrap().name, "count");
    }

    #[test]
    fn test_multiple_declarators_are_rejected() {
        let mut field = FieldDecl::new("x", "int");
        field.declarators.push(VariableDeclarator {
            name: "y".to_string(),
            value: None,
            span: field.span,
        });

        let error = field_declarator(&field).unwrap_err().error;
        assert_eq!(
            error,
            CompileError::MultipleFieldDeclarators {
                field: "x".to_string()
            }
        );
    }
}
