//! Output naming across whole programs

use integration_tests::{Fixture, dump, find_member, find_type};
use sb_diagnostics::CompileError;
use sb_driver::{Compilation, DriverError};
use sb_model::{ImplementationKey, TypeKind};
use sb_syntax::{Expr, FieldDecl, Hints, MethodDecl, PropertyDecl, Stmt, TypeDecl};
use std::collections::HashSet;

fn output_names(compilation: &Compilation) -> Vec<String> {
    let model = &compilation.model;
    compilation
        .types
        .iter()
        .flat_map(|ty| std::iter::once(*ty).chain(model.members(*ty).iter().copied()))
        .map(|symbol| model.output_name(symbol).to_string())
        .collect()
}

#[test]
fn test_minimized_shapes_keep_public_api() {
    let compilation = Fixture::load("shapes").unwrap().compile_minimized().expect_success();
    let model = &compilation.model;

    let shape = find_type(&compilation, "Geometry.Shape");
    let circle = find_type(&compilation, "Geometry.Circle");
    assert_eq!(model.output_name(shape), "Shape");
    assert_eq!(model.output_name(circle), "$a");
    assert_eq!(model.output_name(find_member(model, shape, "Area")), "Area");
    assert_eq!(model.output_name(find_member(model, circle, "Area")), "Area");
    assert_eq!(model.output_name(find_member(model, circle, ".ctor")), ".ctor");

    assert_eq!(model.output_name(find_member(model, shape, "label")), "a");
    assert_eq!(model.output_name(find_member(model, circle, "radius")), "b");
}

#[test]
fn test_minimized_shapes_rewrite_bodies() {
    let compilation = Fixture::load("shapes").unwrap().compile_minimized().expect_success();
    let model = &compilation.model;
    let shape = find_type(&compilation, "Geometry.Shape");
    let circle = find_type(&compilation, "Geometry.Circle");

    let shape_constructor = find_member(model, shape, ".ctor");
    assert_eq!(
        dump(model, ImplementationKey::body(shape_constructor)).as_deref(),
        Some("this.a = a;\n")
    );

    let constructor = find_member(model, circle, ".ctor");
    assert_eq!(
        dump(model, ImplementationKey::body(constructor)).as_deref(),
        Some("base(\"circle\");\nthis.b = a;\n")
    );

    let area = find_member(model, circle, "Area");
    assert_eq!(
        dump(model, ImplementationKey::body(area)).as_deref(),
        Some("var a = this.b * this.b;\nreturn a;\n")
    );
}

#[test]
fn test_members_of_one_hierarchy_never_share_names() {
    let compilation = Fixture::new()
        .namespace(
            "App",
            vec![
                TypeDecl::class("Base")
                    .with_member(FieldDecl::new("first", "int"))
                    .with_member(FieldDecl::new("second", "int"))
                    .with_member(MethodDecl::new("Reset", "void")),
                TypeDecl::interface("IClosable")
                    .with_member(MethodDecl::new("Close", "void").without_body()),
                TypeDecl::class("Derived")
                    .extends("Base")
                    .extends("IClosable")
                    .with_member(FieldDecl::new("third", "int"))
                    .with_member(MethodDecl::new("Apply", "void"))
                    .with_member(MethodDecl::new("Close", "void")),
            ],
        )
        .compile_minimized()
        .expect_success();
    let model = &compilation.model;

    let names: Vec<&str> = compilation
        .types
        .iter()
        .filter(|ty| model.type_data(**ty).map(|data| data.kind) != Some(TypeKind::Interface))
        .flat_map(|ty| model.members(*ty).iter())
        .filter(|member| model.name(**member) != ".ctor")
        .map(|member| model.output_name(*member))
        .collect();
    let distinct: HashSet<&str> = names.iter().copied().collect();
    assert_eq!(names.len(), 6);
    assert_eq!(distinct.len(), names.len(), "{names:?}");

    let closable = find_type(&compilation, "App.IClosable");
    let derived = find_type(&compilation, "App.Derived");
    assert_eq!(
        model.output_name(find_member(model, derived, "Close")),
        model.output_name(find_member(model, closable, "Close"))
    );
}

#[test]
fn test_naming_is_deterministic() {
    let fixture = Fixture::load("shapes").unwrap();
    let first = fixture.compile_minimized().expect_success();
    let second = fixture.compile_minimized().expect_success();
    assert_eq!(output_names(&first), output_names(&second));

    let first = fixture.compile().expect_success();
    let second = fixture.compile().expect_success();
    assert_eq!(output_names(&first), output_names(&second));
}

#[test]
fn test_script_name_hint_colliding_with_property() {
    let fixture = Fixture::new().namespace(
        "App",
        vec![
            TypeDecl::class("Box")
                .with_member(FieldDecl::new("size", "int"))
                .with_member(
                    PropertyDecl::new("Size", "int")
                        .with_getter(vec![Stmt::ret(Some(Expr::name("size")))]),
                )
                .with_member(
                    MethodDecl::new("GetSize", "int")
                        .with_hints(Hints {
                            script_name: Some("Size".to_string()),
                            ..Hints::default()
                        })
                        .with_body(vec![Stmt::ret(Some(Expr::name("size")))]),
                ),
        ],
    );

    let outcome = fixture.compile();
    assert!(matches!(outcome.result, Err(DriverError::Aborted { stage: "naming" })));
    assert_eq!(
        outcome.diagnostics.diagnostics()[0].error,
        CompileError::DuplicateMemberName {
            type_name: "App.Box".to_string(),
            member: "Size".to_string(),
        }
    );
}
