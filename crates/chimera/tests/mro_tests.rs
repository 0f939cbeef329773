//! Linearization properties observable through the public surface.

use chimera::{ExcType, ResourceLimits, Runtime, RunResult, Value};
use pretty_assertions::assert_eq;

fn names(rt: &Runtime, classes: &[Value]) -> Vec<String> {
    classes.iter().map(|&c| rt.class_name(c).unwrap()).collect()
}

#[test]
fn linearization_starts_with_the_class_itself() -> RunResult<()> {
    let mut rt = Runtime::new();
    let a = rt.create_class("A", &[], &[])?;
    let b = rt.create_class("B", &[a], &[])?;
    let mro = rt.linearization(b)?;
    assert_eq!(mro[0], b);
    assert_eq!(names(&rt, &mro), ["B", "A"]);
    Ok(())
}

#[test]
fn baseless_class_has_no_ancestors() -> RunResult<()> {
    let mut rt = Runtime::new();
    let a = rt.create_class("A", &[], &[])?;
    assert_eq!(rt.linearization(a)?, vec![a]);
    assert!(rt.base_classes(a)?.is_empty());
    Ok(())
}

#[test]
fn diamond_lists_each_ancestor_exactly_once() -> RunResult<()> {
    let mut rt = Runtime::new();
    let root = rt.create_class("Root", &[], &[])?;
    let left = rt.create_class("Left", &[root], &[])?;
    let right = rt.create_class("Right", &[root], &[])?;
    let bottom = rt.create_class("Bottom", &[left, right], &[])?;
    let mro = rt.linearization(bottom)?;
    assert_eq!(names(&rt, &mro), ["Bottom", "Left", "Right", "Root"]);
    Ok(())
}

#[test]
fn declared_base_order_is_preserved() -> RunResult<()> {
    let mut rt = Runtime::new();
    let root = rt.create_class("Root", &[], &[])?;
    let left = rt.create_class("Left", &[root], &[])?;
    let right = rt.create_class("Right", &[root], &[])?;
    let bottom = rt.create_class("Bottom", &[right, left], &[])?;
    let mro = rt.linearization(bottom)?;
    assert_eq!(names(&rt, &mro), ["Bottom", "Right", "Left", "Root"]);
    Ok(())
}

#[test]
fn each_bases_internal_order_is_preserved() -> RunResult<()> {
    let mut rt = Runtime::new();
    let a = rt.create_class("A", &[], &[])?;
    let a11 = rt.create_class("A11", &[a], &[])?;
    let a12 = rt.create_class("A12", &[a], &[])?;
    let a13 = rt.create_class("A13", &[a], &[])?;
    let a21 = rt.create_class("A21", &[a11, a12], &[])?;
    let a22 = rt.create_class("A22", &[a11, a13], &[])?;
    let a3 = rt.create_class("A3", &[a21, a22], &[])?;
    let mro = rt.linearization(a3)?;
    assert_eq!(names(&rt, &mro), ["A3", "A21", "A22", "A11", "A12", "A13", "A"]);
    Ok(())
}

#[test]
fn contradictory_precedence_fails_and_creates_no_class() -> RunResult<()> {
    let mut rt = Runtime::new();
    let a = rt.create_class("A", &[], &[])?;
    let b = rt.create_class("B", &[], &[])?;
    let c = rt.create_class("C", &[a, b], &[])?;
    let d = rt.create_class("D", &[b, a], &[])?;
    let before = rt.heap_stats().live_objects;

    let err = rt.create_class("E", &[c, d], &[]).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::LinearizationConflict);
    assert!(err.message().contains("C, D"), "names the offending bases: {err}");
    assert_eq!(rt.heap_stats().live_objects, before);
    Ok(())
}

#[test]
fn non_class_base_is_rejected() {
    let mut rt = Runtime::new();
    let err = rt.create_class("A", &[Value::Int(3)], &[]).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::TypeError);
    assert_eq!(err.message(), "bases must be classes, not 'int'");
}

#[test]
fn inheritance_depth_limit_fails_class_creation() -> RunResult<()> {
    let mut rt = Runtime::new().with_limits(ResourceLimits {
        max_inheritance_depth: 4,
        ..ResourceLimits::default()
    });
    let mut class = rt.create_class("C0", &[], &[])?;
    for i in 1..=4 {
        class = rt.create_class(&format!("C{i}"), &[class], &[])?;
    }
    let err = rt.create_class("C5", &[class], &[]).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::TypeError);
    assert!(err.message().contains("inheritance chain too deep"));
    Ok(())
}
