//! The engine's call surface.
//!
//! [`Runtime`] owns the heap, the intern table, the function table, limits,
//! and the tracer, and exposes the narrow operation set an embedding
//! evaluator drives: class/instance construction, attribute get/set, binary
//! operator dispatch, and calls.
//!
//! The contract is synchronous, single-threaded, and cooperative: every
//! operation runs to completion before the next begins, in program order of
//! the evaluator's calls. Class namespaces are runtime-wide mutable state;
//! a multi-threaded host must serialize access (the runtime is `!Send` by
//! construction, since host bodies are `Rc` callbacks).

use std::rc::Rc;

use crate::{
    args::ArgValues,
    binary::{self, BinaryOp},
    exception::{ExcType, RunResult},
    function::Function,
    heap::{Heap, HeapData, HeapId, HeapStats},
    intern::{FunctionId, Interns, StaticStrings},
    namespace::Namespace,
    resource::ResourceLimits,
    tracer::{NoopTracer, TraceEvent, Tracer},
    types::{ClassObject, Instance, Type, compute_c3_mro},
    value::Value,
};

/// The object-model engine.
///
/// All handles ([`Value`]s containing heap, function, or string ids) are
/// only meaningful for the runtime that produced them. The arena is
/// append-only: any object a handle reaches stays alive for the life of the
/// runtime, which is what makes handles freely copyable aliases.
pub struct Runtime {
    heap: Heap,
    interns: Interns,
    limits: ResourceLimits,
    tracer: Box<dyn Tracer>,
    call_depth: usize,
}

impl Runtime {
    /// Creates a runtime with default limits and no tracing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: Heap::new(),
            interns: Interns::new(),
            limits: ResourceLimits::default(),
            tracer: Box::new(NoopTracer),
            call_depth: 0,
        }
    }

    /// Replaces the resource limits.
    #[must_use]
    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Installs a tracer.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Box<dyn Tracer>) -> Self {
        self.tracer = tracer;
        self
    }

    /// Returns the configured limits.
    #[must_use]
    pub fn limits(&self) -> ResourceLimits {
        self.limits
    }

    /// Captures an object-count snapshot of the heap.
    #[must_use]
    pub fn heap_stats(&self) -> HeapStats {
        self.heap.stats()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates a class with the given direct bases and seeded attributes.
    ///
    /// The linearization is computed and cached immediately, so construction
    /// fails eagerly on unsatisfiable hierarchies (`LinearizationConflict`)
    /// and a failed creation stores nothing.
    pub fn create_class(&mut self, name: &str, bases: &[Value], attrs: &[(&str, Value)]) -> RunResult<Value> {
        let mut base_ids = Vec::with_capacity(bases.len());
        for &base in bases {
            let Some(base_id) = self.class_id_of(base) else {
                return Err(ExcType::type_error(format!(
                    "bases must be classes, not '{}'",
                    self.type_name(base)
                )));
            };
            base_ids.push(base_id);
        }

        // The class names itself in its own linearization, so reserve the id
        // before storing anything; a merge failure then leaves the heap
        // untouched.
        let class_id = self.heap.next_id();
        let mro = compute_c3_mro(class_id, &base_ids, &self.heap, &self.interns, &self.limits)?;
        let mro_len = mro.len();

        let mut namespace = Namespace::new();
        for &(attr_name, value) in attrs {
            let attr_id = self.interns.intern(attr_name);
            namespace.set(attr_id, value);
        }
        let name_id = self.interns.intern(name);
        let allocated = self
            .heap
            .allocate(HeapData::ClassObject(ClassObject::new(name_id, namespace, base_ids, mro)));
        debug_assert_eq!(allocated, class_id);

        if self.tracer.enabled() {
            let event = TraceEvent::ClassCreated {
                name: name.to_string(),
                mro_len,
            };
            self.tracer.on_event(&event);
        }
        Ok(Value::Ref(allocated))
    }

    /// Creates an instance of `class` with a fresh, empty attribute
    /// namespace (never shared with any other instance).
    pub fn create_instance(&mut self, class: Value) -> RunResult<Value> {
        let Some(class_id) = self.class_id_of(class) else {
            return Err(ExcType::type_error(format!(
                "create_instance expects a class, not '{}'",
                self.type_name(class)
            )));
        };
        let instance_id = self.heap.allocate(HeapData::Instance(Instance::new(class_id)));
        if self.tracer.enabled() {
            let event = TraceEvent::InstanceCreated {
                class: self.class_name_of(class_id),
            };
            self.tracer.on_event(&event);
        }
        Ok(Value::Ref(instance_id))
    }

    /// Registers a host function and returns a handle to it.
    ///
    /// `params` are the parameter names with the explicit receiver first;
    /// arity is checked against them at every call. The body re-enters the
    /// engine through the `&mut Runtime` it receives.
    pub fn register_function<F>(&mut self, name: &str, params: &[&str], body: F) -> Value
    where
        F: Fn(&mut Self, ArgValues) -> RunResult<Value> + 'static,
    {
        let name_id = self.interns.intern(name);
        let param_ids = params.iter().map(|param| self.interns.intern(param)).collect();
        let function_id = self.interns.add_function(Function::new(name_id, param_ids, Rc::new(body)));
        Value::Function(function_id)
    }

    // ========================================================================
    // Attribute resolution
    // ========================================================================

    /// Resolves an attribute on an instance or class.
    ///
    /// For an instance: the instance's own namespace is consulted first and
    /// its entries returned verbatim; otherwise the class's cached
    /// linearization is scanned in order, and the first definition wins —
    /// functions are bound to the instance, anything else is returned
    /// unchanged. For a class: the same scan without binding.
    ///
    /// Nothing is cached across calls; a class-namespace write performed
    /// after this instance was created is honored by the very next lookup.
    pub fn get_attribute(&mut self, target: Value, name: &str) -> RunResult<Value> {
        let resolved = self.resolve_attribute(target, name)?;
        if self.tracer.enabled() {
            let event = TraceEvent::AttributeLoad {
                name: name.to_string(),
                bound: matches!(resolved, Value::BoundMethod(..)),
            };
            self.tracer.on_event(&event);
        }
        Ok(resolved)
    }

    fn resolve_attribute(&self, target: Value, name: &str) -> RunResult<Value> {
        let Value::Ref(target_id) = target else {
            return Err(ExcType::attribute_error(
                format!("'{}' value", self.type_name(target)),
                name,
            ));
        };
        // A name that was never interned cannot exist in any namespace.
        let name_id = self.interns.lookup(name);

        match self.heap.get(target_id) {
            HeapData::Instance(instance) => {
                if let Some(name_id) = name_id
                    && let Some(value) = instance.attrs().get(name_id)
                {
                    return Ok(*value);
                }
                let class_id = instance.class_id();
                let HeapData::ClassObject(cls) = self.heap.get(class_id) else {
                    unreachable!("an instance's class id always references a class object")
                };
                if let Some(name_id) = name_id
                    && let Some(value) = cls.mro_lookup_attr(name_id, &self.heap)
                {
                    return Ok(match value {
                        Value::Function(function_id) => Value::BoundMethod(function_id, target_id),
                        other => other,
                    });
                }
                Err(ExcType::attribute_error(
                    format!("'{}' object", cls.name(&self.interns)),
                    name,
                ))
            }
            HeapData::ClassObject(cls) => {
                if let Some(name_id) = name_id
                    && let Some(value) = cls.mro_lookup_attr(name_id, &self.heap)
                {
                    return Ok(value);
                }
                Err(ExcType::attribute_error(
                    format!("type object '{}'", cls.name(&self.interns)),
                    name,
                ))
            }
        }
    }

    /// Writes an attribute into an instance's own namespace, creating or
    /// overwriting the entry regardless of what the class chain defines for
    /// the name (pure shadowing; the class namespace is untouched).
    pub fn set_attribute(&mut self, instance: Value, name: &str, value: Value) -> RunResult<()> {
        let Value::Ref(instance_id) = instance else {
            return Err(ExcType::type_error(format!(
                "cannot set attribute '{}' on '{}' value",
                name,
                self.type_name(instance)
            )));
        };
        let name_id = self.interns.intern(name);
        match self.heap.get_mut(instance_id) {
            HeapData::Instance(inst) => {
                inst.attrs_mut().set(name_id, value);
            }
            HeapData::ClassObject(_) => {
                return Err(ExcType::type_error(format!(
                    "use set_class_attribute to assign '{name}' on a class"
                )));
            }
        }
        if self.tracer.enabled() {
            let event = TraceEvent::AttributeStore { name: name.to_string() };
            self.tracer.on_event(&event);
        }
        Ok(())
    }

    /// Writes an attribute into a class's namespace.
    ///
    /// Effective immediately for every existing and future instance of that
    /// class and of any class whose linearization reaches it, because
    /// resolution is always performed fresh.
    pub fn set_class_attribute(&mut self, class: Value, name: &str, value: Value) -> RunResult<()> {
        let Some(class_id) = self.class_id_of(class) else {
            return Err(ExcType::type_error(format!(
                "set_class_attribute expects a class, not '{}'",
                self.type_name(class)
            )));
        };
        let name_id = self.interns.intern(name);
        let class_name = if self.tracer.enabled() {
            Some(self.class_name_of(class_id))
        } else {
            None
        };
        match self.heap.get_mut(class_id) {
            HeapData::ClassObject(cls) => {
                cls.namespace_mut().set(name_id, value);
            }
            HeapData::Instance(_) => unreachable!("class_id_of only returns class ids"),
        }
        if let Some(class) = class_name {
            let event = TraceEvent::ClassAttributeStore {
                class,
                name: name.to_string(),
            };
            self.tracer.on_event(&event);
        }
        Ok(())
    }

    // ========================================================================
    // Operator dispatch
    // ========================================================================

    /// Evaluates a binary operator.
    ///
    /// Primitive operands are handled by the native arm; otherwise the
    /// operator's special method is resolved on the left operand through the
    /// full attribute resolver (so a class-level mutation performed after
    /// the operand's creation is honored) and invoked with `right` as the
    /// sole explicit argument. A resolution miss is
    /// `UnsupportedOperationError` — never a silent default, and never a
    /// reflected lookup on `right`.
    pub fn evaluate_binary_operator(&mut self, op: BinaryOp, left: Value, right: Value) -> RunResult<Value> {
        if let Some(result) = binary::try_native(op, left, right, &mut self.interns)? {
            if self.tracer.enabled() {
                self.tracer.on_event(&TraceEvent::OperatorDispatch { op, native: true });
            }
            return Ok(result);
        }

        if let Value::Ref(id) = left
            && matches!(self.heap.get(id), HeapData::Instance(_))
        {
            let method_name: &'static str = op.special_method().into();
            match self.resolve_attribute(left, method_name) {
                Ok(method) => {
                    if self.tracer.enabled() {
                        self.tracer.on_event(&TraceEvent::OperatorDispatch { op, native: false });
                    }
                    return self.call(method, ArgValues::One(right));
                }
                Err(err) if err.exc_type() == ExcType::AttributeLookupError => {}
                Err(err) => return Err(err),
            }
        }

        Err(ExcType::unsupported_operand(
            op,
            &self.type_name(left),
            &self.type_name(right),
        ))
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// Calls a callable value.
    ///
    /// - a function is called with `args` verbatim
    /// - a bound method prepends its receiver to `args`
    /// - a class constructs a new instance, running `__init__` when the
    ///   class chain defines it
    pub fn call(&mut self, callee: Value, args: ArgValues) -> RunResult<Value> {
        match callee {
            Value::Function(function_id) => self.call_function(function_id, args),
            Value::BoundMethod(function_id, receiver) => {
                self.call_function(function_id, args.prepend(Value::Ref(receiver)))
            }
            Value::Ref(id) => {
                let is_class = matches!(self.heap.get(id), HeapData::ClassObject(_));
                if is_class {
                    self.call_class(id, args)
                } else {
                    Err(ExcType::type_error(format!(
                        "'{}' object is not callable",
                        self.type_name(callee)
                    )))
                }
            }
            other => Err(ExcType::type_error(format!(
                "'{}' object is not callable",
                self.type_name(other)
            ))),
        }
    }

    fn call_function(&mut self, function_id: FunctionId, args: ArgValues) -> RunResult<Value> {
        let function = self.interns.get_function(function_id).clone();
        let given = args.count();
        let expected = function.params().len();
        if given != expected {
            let name = self.interns.get_str(function.name()).to_string();
            return Err(if expected == 0 {
                ExcType::type_error_no_args(&name, given)
            } else {
                ExcType::type_error_arg_count(&name, expected, given)
            });
        }
        if self.call_depth >= self.limits.max_call_depth {
            return Err(ExcType::recursion_error(self.limits.max_call_depth));
        }

        self.call_depth += 1;
        if self.tracer.enabled() {
            let event = TraceEvent::Call {
                function: self.interns.get_str(function.name()).to_string(),
                depth: self.call_depth,
            };
            self.tracer.on_event(&event);
        }
        let body = Rc::clone(function.body());
        let result = body(self, args);
        self.call_depth -= 1;
        if self.tracer.enabled() {
            self.tracer.on_event(&TraceEvent::Return { depth: self.call_depth });
        }
        result
    }

    fn call_class(&mut self, class_id: HeapId, args: ArgValues) -> RunResult<Value> {
        let instance = self.create_instance(Value::Ref(class_id))?;
        let init = match self.heap.get(class_id) {
            HeapData::ClassObject(cls) => cls.mro_lookup_attr(StaticStrings::DunderInit.into(), &self.heap),
            HeapData::Instance(_) => unreachable!("call_class is only invoked with a class id"),
        };
        match init {
            Some(Value::Function(function_id)) => {
                // __init__'s return value is discarded
                self.call_function(function_id, args.prepend(instance))?;
            }
            Some(other) => {
                return Err(ExcType::type_error(format!(
                    "'{}' object is not callable",
                    self.type_name(other)
                )));
            }
            None => {
                if !args.is_empty() {
                    let name = self.class_name_of(class_id);
                    return Err(ExcType::type_error_no_args(&name, args.count()));
                }
            }
        }
        Ok(instance)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns whether `value` is an instance of `class` or of any class
    /// whose linearization reaches it.
    #[must_use]
    pub fn is_instance(&self, value: Value, class: Value) -> bool {
        let Some(class_id) = self.class_id_of(class) else {
            return false;
        };
        let Value::Ref(instance_id) = value else {
            return false;
        };
        let HeapData::Instance(instance) = self.heap.get(instance_id) else {
            return false;
        };
        match self.heap.get(instance.class_id()) {
            HeapData::ClassObject(cls) => cls.is_subclass_of(instance.class_id(), class_id),
            HeapData::Instance(_) => false,
        }
    }

    /// Returns whether `class` is `ancestor` or lists it in its
    /// linearization.
    #[must_use]
    pub fn is_subclass(&self, class: Value, ancestor: Value) -> bool {
        let (Some(class_id), Some(ancestor_id)) = (self.class_id_of(class), self.class_id_of(ancestor)) else {
            return false;
        };
        match self.heap.get(class_id) {
            HeapData::ClassObject(cls) => cls.is_subclass_of(class_id, ancestor_id),
            HeapData::Instance(_) => false,
        }
    }

    /// Returns a class's cached linearization as class handles, the class
    /// itself first.
    pub fn linearization(&self, class: Value) -> RunResult<Vec<Value>> {
        let class_id = self.expect_class(class, "linearization")?;
        match self.heap.get(class_id) {
            HeapData::ClassObject(cls) => Ok(cls.mro().iter().map(|&id| Value::Ref(id)).collect()),
            HeapData::Instance(_) => unreachable!("expect_class only returns class ids"),
        }
    }

    /// Returns a class's declared direct bases, in order.
    pub fn base_classes(&self, class: Value) -> RunResult<Vec<Value>> {
        let class_id = self.expect_class(class, "base_classes")?;
        match self.heap.get(class_id) {
            HeapData::ClassObject(cls) => Ok(cls.bases().iter().map(|&id| Value::Ref(id)).collect()),
            HeapData::Instance(_) => unreachable!("expect_class only returns class ids"),
        }
    }

    /// Returns a class's name.
    pub fn class_name(&self, class: Value) -> RunResult<String> {
        let class_id = self.expect_class(class, "class_name")?;
        Ok(self.class_name_of(class_id))
    }

    /// Lists the names bound directly in an instance's or class's own
    /// namespace, in insertion order.
    ///
    /// An instance's listing never reflects entries that exist only in its
    /// class chain; those are visible through resolution, not enumeration.
    pub fn own_attribute_names(&self, target: Value) -> RunResult<Vec<String>> {
        let Value::Ref(id) = target else {
            return Err(ExcType::type_error(format!(
                "'{}' value has no attribute namespace",
                self.type_name(target)
            )));
        };
        let namespace = match self.heap.get(id) {
            HeapData::Instance(instance) => instance.attrs(),
            HeapData::ClassObject(cls) => cls.namespace(),
        };
        Ok(namespace
            .iter()
            .map(|(name_id, _)| self.interns.get_str(name_id).to_string())
            .collect())
    }

    /// Returns the engine-level type of a value.
    #[must_use]
    pub fn type_of(&self, value: Value) -> Type {
        value.py_type(&self.heap)
    }

    /// Returns the type name of a value: the concrete class name for
    /// instances, the primitive type name otherwise.
    #[must_use]
    pub fn type_name(&self, value: Value) -> String {
        if let Value::Ref(id) = value
            && let HeapData::Instance(instance) = self.heap.get(id)
        {
            return self.class_name_of(instance.class_id());
        }
        let name: &'static str = value.py_type(&self.heap).into();
        name.to_string()
    }

    /// Interns a string and returns a handle to it.
    pub fn intern_str(&mut self, s: &str) -> Value {
        Value::InternString(self.interns.intern(s))
    }

    /// Returns the string content of an interned-string handle.
    #[must_use]
    pub fn str_value(&self, value: Value) -> Option<&str> {
        match value {
            Value::InternString(id) => Some(self.interns.get_str(id)),
            _ => None,
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn class_id_of(&self, value: Value) -> Option<HeapId> {
        match value {
            Value::Ref(id) => match self.heap.get(id) {
                HeapData::ClassObject(_) => Some(id),
                HeapData::Instance(_) => None,
            },
            _ => None,
        }
    }

    fn expect_class(&self, value: Value, operation: &str) -> RunResult<HeapId> {
        self.class_id_of(value).ok_or_else(|| {
            ExcType::type_error(format!(
                "{operation} expects a class, not '{}'",
                self.type_name(value)
            ))
        })
    }

    fn class_name_of(&self, class_id: HeapId) -> String {
        match self.heap.get(class_id) {
            HeapData::ClassObject(cls) => cls.name(&self.interns).to_string(),
            HeapData::Instance(_) => "<unknown>".to_string(),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
