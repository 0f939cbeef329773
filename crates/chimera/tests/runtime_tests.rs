//! The call layer and runtime plumbing: construction through class calls,
//! arity checking, depth limits, introspection, statistics, and tracing.

use chimera::{
    ArgValues, BinaryOp, ExcType, RecordingTracer, ResourceLimits, Runtime, RunResult, TraceEvent, Value,
};
use pretty_assertions::assert_eq;

#[test]
fn calling_a_class_runs_init() -> RunResult<()> {
    let mut rt = Runtime::new();
    let init = rt.register_function("__init__", &["self", "x"], |rt, args| {
        let (this, x) = args.get_two_args("__init__")?;
        rt.set_attribute(this, "x", x)?;
        Ok(Value::None)
    });
    let cls = rt.create_class("Holder", &[], &[("__init__", init)])?;

    let instance = rt.call(cls, ArgValues::One(Value::Int(12)))?;
    assert_eq!(rt.get_attribute(instance, "x")?, Value::Int(12));
    Ok(())
}

#[test]
fn init_is_inherited_through_the_linearization() -> RunResult<()> {
    let mut rt = Runtime::new();
    let init = rt.register_function("__init__", &["self", "x"], |rt, args| {
        let (this, x) = args.get_two_args("__init__")?;
        rt.set_attribute(this, "x", x)?;
        Ok(Value::None)
    });
    let base = rt.create_class("Base", &[], &[("__init__", init)])?;
    let derived = rt.create_class("Derived", &[base], &[])?;

    let instance = rt.call(derived, ArgValues::One(Value::Int(4)))?;
    assert_eq!(rt.get_attribute(instance, "x")?, Value::Int(4));
    assert!(rt.is_instance(instance, derived));
    assert!(rt.is_instance(instance, base));
    Ok(())
}

#[test]
fn class_without_init_rejects_arguments() -> RunResult<()> {
    let mut rt = Runtime::new();
    let cls = rt.create_class("Plain", &[], &[])?;
    let err = rt.call(cls, ArgValues::One(Value::Int(1))).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::TypeError);
    assert_eq!(err.message(), "Plain() takes no arguments (1 given)");
    Ok(())
}

#[test]
fn arity_is_checked_before_the_body_runs() -> RunResult<()> {
    let mut rt = Runtime::new();
    let f = rt.register_function("pair", &["self", "other"], |_, _| Ok(Value::None));
    let err = rt.call(f, ArgValues::One(Value::None)).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::TypeError);
    assert_eq!(err.message(), "pair() takes 2 positional arguments but 1 were given");
    Ok(())
}

#[test]
fn non_callables_are_rejected() -> RunResult<()> {
    let mut rt = Runtime::new();
    let cls = rt.create_class("Plain", &[], &[])?;
    let instance = rt.create_instance(cls)?;

    let err = rt.call(Value::Int(3), ArgValues::Empty).unwrap_err();
    assert_eq!(err.message(), "'int' object is not callable");
    let err = rt.call(instance, ArgValues::Empty).unwrap_err();
    assert_eq!(err.message(), "'Plain' object is not callable");
    Ok(())
}

#[test]
fn call_depth_ceiling_stops_runaway_recursion() -> RunResult<()> {
    let mut rt = Runtime::new().with_limits(ResourceLimits {
        max_call_depth: 24,
        ..ResourceLimits::default()
    });
    let spin = rt.register_function("spin", &["self"], |rt, args| {
        let this = args.get_one_arg("spin")?;
        let method = rt.get_attribute(this, "spin")?;
        rt.call(method, ArgValues::Empty)
    });
    let cls = rt.create_class("Spinner", &[], &[("spin", spin)])?;
    let instance = rt.create_instance(cls)?;

    let method = rt.get_attribute(instance, "spin")?;
    let err = rt.call(method, ArgValues::Empty).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::RecursionError);
    Ok(())
}

#[test]
fn instance_checks_walk_the_linearization() -> RunResult<()> {
    let mut rt = Runtime::new();
    let root = rt.create_class("Root", &[], &[])?;
    let left = rt.create_class("Left", &[root], &[])?;
    let right = rt.create_class("Right", &[root], &[])?;
    let bottom = rt.create_class("Bottom", &[left, right], &[])?;
    let other = rt.create_class("Other", &[], &[])?;

    let instance = rt.create_instance(bottom)?;
    for cls in [bottom, left, right, root] {
        assert!(rt.is_instance(instance, cls));
    }
    assert!(!rt.is_instance(instance, other));
    assert!(rt.is_subclass(bottom, root));
    assert!(!rt.is_subclass(root, bottom));
    Ok(())
}

#[test]
fn set_attribute_refuses_the_wrong_handle_kind() -> RunResult<()> {
    let mut rt = Runtime::new();
    let cls = rt.create_class("C", &[], &[])?;
    let instance = rt.create_instance(cls)?;

    let err = rt.set_attribute(cls, "x", Value::Int(1)).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::TypeError);
    let err = rt.set_class_attribute(instance, "x", Value::Int(1)).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::TypeError);
    let err = rt.set_attribute(Value::Int(1), "x", Value::Int(1)).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::TypeError);
    Ok(())
}

#[test]
fn type_queries_distinguish_handle_kinds() -> RunResult<()> {
    use chimera::Type;

    let mut rt = Runtime::new();
    let noop = rt.register_function("noop", &["self"], |_, args| {
        args.get_one_arg("noop")?;
        Ok(Value::None)
    });
    let cls = rt.create_class("Point", &[], &[("noop", noop)])?;
    let instance = rt.create_instance(cls)?;

    assert_eq!(rt.type_of(cls), Type::Type);
    assert_eq!(rt.type_of(instance), Type::Instance);
    assert_eq!(rt.type_of(noop), Type::Function);
    let bound = rt.get_attribute(instance, "noop")?;
    assert_eq!(rt.type_of(bound), Type::Method);
    assert_eq!(rt.type_of(Value::None), Type::NoneType);
    assert_eq!(rt.type_name(instance), "Point");
    Ok(())
}

#[test]
fn heap_stats_count_classes_and_instances() -> RunResult<()> {
    let mut rt = Runtime::new();
    let a = rt.create_class("A", &[], &[])?;
    let b = rt.create_class("B", &[a], &[])?;
    rt.create_instance(a)?;
    rt.create_instance(b)?;
    rt.create_instance(b)?;

    let stats = rt.heap_stats();
    assert_eq!(stats.live_objects, 5);
    assert_eq!(stats.objects_by_type.get("ClassObject"), Some(&2));
    assert_eq!(stats.objects_by_type.get("Instance"), Some(&3));
    Ok(())
}

#[test]
fn recording_tracer_sees_the_operation_stream() -> RunResult<()> {
    let recorder = RecordingTracer::new();
    let mut rt = Runtime::new().with_tracer(Box::new(recorder.clone()));

    let cls = rt.create_class("Point", &[], &[])?;
    let instance = rt.create_instance(cls)?;
    rt.set_attribute(instance, "x", Value::Int(1))?;
    rt.get_attribute(instance, "x")?;
    rt.evaluate_binary_operator(BinaryOp::Add, Value::Int(1), Value::Int(2))?;

    let events = recorder.take_events();
    assert_eq!(
        events,
        vec![
            TraceEvent::ClassCreated {
                name: "Point".to_string(),
                mro_len: 1,
            },
            TraceEvent::InstanceCreated {
                class: "Point".to_string(),
            },
            TraceEvent::AttributeStore { name: "x".to_string() },
            TraceEvent::AttributeLoad {
                name: "x".to_string(),
                bound: false,
            },
            TraceEvent::OperatorDispatch {
                op: BinaryOp::Add,
                native: true,
            },
        ]
    );
    assert!(recorder.events().is_empty());
    Ok(())
}

#[test]
fn method_calls_emit_paired_call_and_return_events() -> RunResult<()> {
    let recorder = RecordingTracer::new();
    let mut rt = Runtime::new().with_tracer(Box::new(recorder.clone()));

    let f = rt.register_function("noop", &["self"], |_, args| {
        args.get_one_arg("noop")?;
        Ok(Value::None)
    });
    let cls = rt.create_class("C", &[], &[("noop", f)])?;
    let instance = rt.create_instance(cls)?;
    let method = rt.get_attribute(instance, "noop")?;
    rt.call(method, ArgValues::Empty)?;

    let events = recorder.events();
    assert!(events.contains(&TraceEvent::Call {
        function: "noop".to_string(),
        depth: 1,
    }));
    assert!(events.contains(&TraceEvent::Return { depth: 0 }));
    Ok(())
}
