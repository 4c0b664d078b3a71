mod common;

use common::{init_tracing, ints, point_type};
use fb_bridge::{Package, Reflect};
use fb_core::host::{HostTy, HostValue, Signature};
use fb_core::value::Value;
use fb_core::Result;
use pretty_assertions::assert_eq;

fn geometry() -> Result<Package> {
    let point = point_type();
    Package::new("geometry")
        .function(
            "Add",
            Signature::new(vec![HostTy::i64(), HostTy::i64()], vec![HostTy::i64()]),
            |args| {
                let sum = args.iter().filter_map(HostValue::as_i64).sum();
                vec![HostValue::Int(sum)]
            },
        )
        .constructor("Point", HostTy::Record(point))
        .variable("Origin", HostValue::string("(0, 0)"), &HostTy::Str)
}

#[test]
fn entries_are_qualified_with_the_package_name() -> Result<()> {
    init_tracing();
    let package = geometry()?;
    assert_eq!(package.name(), "geometry");
    assert_eq!(package.len(), 3);
    let names: Vec<String> = package.qualified().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec!["geometry.Add", "geometry.Origin", "geometry.Point"]
    );
    Ok(())
}

#[test]
fn functions_are_callable_values() -> Result<()> {
    let package = geometry()?;
    let add = package.get("Add").and_then(Value::as_function).expect("Add");
    assert_eq!(add.to_string(), "geometry.Add");
    assert_eq!(add.call(None, &ints(&[2, 40]))?, Value::int(42));
    assert_eq!(add.call(Some(&Value::int(1)), &Value::int(2))?, Value::int(3));
    Ok(())
}

#[test]
fn constructors_allocate_records() -> Result<()> {
    let package = geometry()?;
    let new_point = package.get("Point").and_then(Value::as_function).expect("Point");
    let point = new_point.call(None, &Value::empty())?;
    let boxed = point.as_boxed().expect("boxed point");
    boxed.set("x", &Value::int(3))?;
    assert_eq!(point.to_string(), "Point {X: 3, Y: 0}");
    Ok(())
}

#[test]
fn variables_are_imported_once() -> Result<()> {
    let package = geometry()?;
    assert_eq!(package.get("Origin"), Some(&Value::string("(0, 0)")));
    assert!(package.get("Missing").is_none());
    Ok(())
}

#[test]
fn variable_of_the_wrong_kind_is_rejected() {
    let result = Package::new("broken").variable("N", HostValue::Float(1.0), &HostTy::i64());
    assert!(result.is_err());
}

#[test]
fn redefining_an_entry_replaces_it() -> Result<()> {
    let package = Package::new("consts")
        .variable("Answer", HostValue::Int(41), &HostTy::i64())?
        .variable("Answer", HostValue::Int(42), &HostTy::i64())?;
    assert_eq!(package.len(), 1);
    assert_eq!(package.get("Answer"), Some(&Value::int(42)));
    assert!(!package.is_empty());
    assert!(Package::new("empty").is_empty());
    Ok(())
}
