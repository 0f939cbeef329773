use std::{fmt, rc::Rc};

use crate::{
    args::ArgValues,
    exception::RunResult,
    intern::StringId,
    run::Runtime,
    value::Value,
};

/// A function body supplied by the embedding evaluator.
///
/// The engine owns *what* a function is (name, parameters, identity); the
/// host owns *how* its body evaluates. Bodies re-enter the engine through
/// the `&mut Runtime` they receive, which is what makes attribute access
/// inside a method resolve freshly at call time.
pub type HostFn = Rc<dyn Fn(&mut Runtime, ArgValues) -> RunResult<Value>>;

/// A registered function: an explicit leading receiver parameter plus zero
/// or more additional parameters, and a host-evaluated body.
///
/// Functions are owned by the runtime and referenced via
/// [`FunctionId`](crate::FunctionId). Binding to a receiver happens at
/// lookup time and produces a [`Value::BoundMethod`]; the function itself
/// is never mutated by binding.
#[derive(Clone)]
pub(crate) struct Function {
    name: StringId,
    params: Vec<StringId>,
    body: HostFn,
}

impl Function {
    pub fn new(name: StringId, params: Vec<StringId>, body: HostFn) -> Self {
        Self { name, params, body }
    }

    /// Returns the interned function name.
    pub fn name(&self) -> StringId {
        self.name
    }

    /// Returns the parameter names, receiver first.
    pub fn params(&self) -> &[StringId] {
        &self.params
    }

    /// Returns the host body callback.
    pub fn body(&self) -> &HostFn {
        &self.body
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &"<host fn>")
            .finish()
    }
}
