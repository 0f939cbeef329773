#![doc = include_str!("../../../README.md")]

mod args;
mod binary;
mod exception;
mod function;
mod heap;
mod intern;
mod namespace;
mod resource;
mod run;
mod tracer;
mod types;
mod value;

pub use crate::{
    args::ArgValues,
    binary::BinaryOp,
    exception::{ExcType, RunError, RunResult},
    function::HostFn,
    heap::{HeapId, HeapStats},
    intern::{FunctionId, StringId},
    resource::{DEFAULT_MAX_CALL_DEPTH, MAX_INHERITANCE_DEPTH, MAX_MRO_LENGTH, ResourceLimits},
    run::Runtime,
    tracer::{NoopTracer, RecordingTracer, StderrTracer, TraceEvent, Tracer},
    types::Type,
    value::Value,
};
