//! End-to-end pipeline tests over whole programs

use expect_test::expect;
use integration_tests::{Fixture, dump, find_member, find_type};
use sb_diagnostics::CompileError;
use sb_driver::DriverError;
use sb_model::{BodyPart, ImplementationKey};
use sb_syntax::{
    BinaryOp, ConstructorDecl, Expr, FieldDecl, MethodDecl, Modifiers, PropertyDecl, Stmt, TypeDecl,
};

#[test]
fn test_shapes_project_loads() {
    let fixture = Fixture::load("shapes").unwrap();
    assert_eq!(fixture.units.len(), 1);
    assert_eq!(fixture.units[0].namespaces[0].name, "Geometry");
    assert_eq!(fixture.units[0].namespaces[0].types.len(), 2);
}

#[test]
fn test_shapes_project_lowers_every_body() {
    let compilation = Fixture::load("shapes").unwrap().compile().expect_success();
    let model = &compilation.model;

    let shape = find_type(&compilation, "Geometry.Shape");
    let circle = find_type(&compilation, "Geometry.Circle");
    assert_eq!(model.output_name(shape), "Shape");
    assert_eq!(model.output_name(circle), "Circle");

    let constructor = find_member(model, circle, ".ctor");
    expect![[r#"
        base("circle");
        this.radius = radius;
    "#]]
    .assert_eq(&dump(model, ImplementationKey::body(constructor)).unwrap());

    let area = find_member(model, circle, "Area");
    expect![[r#"
        var squared = this.radius * this.radius;
        return squared;
    "#]]
    .assert_eq(&dump(model, ImplementationKey::body(area)).unwrap());

    // Uninitialized reference fields get no body, value-typed ones get a default
    let label = find_member(model, shape, "label");
    assert!(!model.has_implementation(label));
    let radius = find_member(model, circle, "radius");
    assert_eq!(dump(model, ImplementationKey::body(radius)).as_deref(), Some("0\n"));
}

#[test]
fn test_derived_constructor_without_arguments_calls_base() {
    let compilation = Fixture::new()
        .namespace(
            "App",
            vec![
                TypeDecl::class("Shape")
                    .with_member(FieldDecl::new("count", "int"))
                    .with_member(ConstructorDecl::new()),
                TypeDecl::class("Circle")
                    .extends("Shape")
                    .with_member(ConstructorDecl::new()),
            ],
        )
        .compile()
        .expect_success();
    let model = &compilation.model;
    let shape = find_type(&compilation, "App.Shape");
    let circle = find_type(&compilation, "App.Circle");

    let count = find_member(model, shape, "count");
    assert_eq!(dump(model, ImplementationKey::body(count)).as_deref(), Some("0\n"));
    assert!(model.member_data(count).unwrap().has_initializer);

    let circle_constructor = find_member(model, circle, ".ctor");
    assert_eq!(
        dump(model, ImplementationKey::body(circle_constructor)).as_deref(),
        Some("base();\n")
    );
    let shape_constructor = find_member(model, shape, ".ctor");
    assert_eq!(
        dump(model, ImplementationKey::body(shape_constructor)).as_deref(),
        Some("")
    );
}

#[test]
fn test_override_is_linked_to_base_member() {
    let compilation = Fixture::load("shapes").unwrap().compile().expect_success();
    let model = &compilation.model;

    let shape = find_type(&compilation, "Geometry.Shape");
    let circle = find_type(&compilation, "Geometry.Circle");
    let base_area = find_member(model, shape, "Area");
    let area = find_member(model, circle, "Area");
    assert_eq!(model.member_data(area).unwrap().overridden, Some(base_area));
    assert_eq!(model.base_chain(circle)[0], circle);
    assert!(model.base_chain(circle).contains(&shape));
}

#[test]
fn test_getter_only_property_has_no_setter_body() {
    let compilation = Fixture::new()
        .namespace(
            "App",
            vec![
                TypeDecl::class("Box")
                    .with_member(FieldDecl::new("size", "int"))
                    .with_member(
                        PropertyDecl::new("Size", "int")
                            .with_getter(vec![Stmt::ret(Some(Expr::name("size")))]),
                    ),
            ],
        )
        .compile()
        .expect_success();
    let model = &compilation.model;

    let size = find_member(model, compilation.types[0], "Size");
    assert_eq!(
        dump(model, ImplementationKey::part(size, BodyPart::Getter)).as_deref(),
        Some("return this.size;\n")
    );
    assert!(dump(model, ImplementationKey::part(size, BodyPart::Setter)).is_none());
}

#[test]
fn test_unknown_name_stops_at_lowering() {
    let outcome = Fixture::new()
        .namespace(
            "App",
            vec![TypeDecl::class("Broken").with_member(
                MethodDecl::new("Run", "void").with_body(vec![Stmt::expr(Expr::compound_assign(
                    BinaryOp::Add,
                    Expr::name("total"),
                    Expr::int(1),
                ))]),
            )],
        )
        .compile();

    assert!(matches!(outcome.result, Err(DriverError::Aborted { stage: "lowering" })));
    assert_eq!(
        outcome.diagnostics.diagnostics()[0].error,
        CompileError::UnresolvedName {
            name: "total".to_string()
        }
    );
}

#[test]
fn test_same_type_name_in_two_namespaces() {
    let fixture = Fixture::new()
        .namespace("App", vec![TypeDecl::class("Widget")])
        .namespace("Other", vec![TypeDecl::class("Widget")]);

    let outcome = fixture.compile();
    assert!(matches!(outcome.result, Err(DriverError::Aborted { stage: "type check" })));
    assert_eq!(
        outcome.diagnostics.diagnostics()[0].error,
        CompileError::ConflictingTypeName {
            name: "Other.Widget".to_string(),
            other: "App.Widget".to_string(),
        }
    );

    // Non-public types are renamed when minimizing and cannot collide
    let compilation = fixture.compile_minimized().expect_success();
    let model = &compilation.model;
    assert_ne!(
        model.output_name(compilation.types[0]),
        model.output_name(compilation.types[1])
    );

    let public = Fixture::new()
        .namespace(
            "App",
            vec![TypeDecl::class("Widget").with_modifiers(Modifiers::default().public())],
        )
        .namespace(
            "Other",
            vec![TypeDecl::class("Widget").with_modifiers(Modifiers::default().public())],
        );
    assert!(public.compile_minimized().result.is_err());
}
