//! Engine execution tracing infrastructure.
//!
//! Provides a trait-based tracing system with hook points at key engine
//! events (class creation, attribute load/store, operator dispatch, calls).
//! Concrete implementations collect different kinds of data:
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | No-op (production default) |
//! | [`StderrTracer`] | Human-readable event log to stderr |
//! | [`RecordingTracer`] | Full event recording for post-mortem inspection |
//!
//! The runtime holds the tracer as a boxed trait object and consults
//! [`Tracer::enabled`] before constructing an event, so the no-op case pays
//! neither allocation nor dispatch per operation.
//!
//! ```
//! use chimera::{RecordingTracer, Runtime, Value};
//!
//! let recorder = RecordingTracer::new();
//! let mut rt = Runtime::new().with_tracer(Box::new(recorder.clone()));
//! let point = rt.create_class("Point", &[], &[]).unwrap();
//! let p = rt.create_instance(point).unwrap();
//! rt.set_attribute(p, "x", Value::Int(1)).unwrap();
//! assert_eq!(recorder.events().len(), 3);
//! ```

use std::{cell::RefCell, rc::Rc};

use crate::binary::BinaryOp;

/// Trace event emitted during engine execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A class was created and its linearization cached.
    ClassCreated {
        /// The class name.
        name: String,
        /// Length of the computed linearization (including the class itself).
        mro_len: usize,
    },
    /// An instance was created.
    InstanceCreated {
        /// Name of the instance's class.
        class: String,
    },
    /// An attribute was resolved on an instance or class.
    AttributeLoad {
        /// The attribute name.
        name: String,
        /// Whether resolution produced a bound method.
        bound: bool,
    },
    /// An attribute was written on an instance.
    AttributeStore {
        /// The attribute name.
        name: String,
    },
    /// An attribute was written on a class (visible to all its instances).
    ClassAttributeStore {
        /// The class name.
        class: String,
        /// The attribute name.
        name: String,
    },
    /// A binary operator was evaluated.
    OperatorDispatch {
        /// The operator symbol.
        op: BinaryOp,
        /// Whether the native primitive arm handled it (as opposed to a
        /// special-method call).
        native: bool,
    },
    /// A function call entered a body.
    Call {
        /// The function name.
        function: String,
        /// Call depth after entry.
        depth: usize,
    },
    /// A function call left a body.
    Return {
        /// Call depth after exit.
        depth: usize,
    },
}

/// Hook points for engine events.
pub trait Tracer {
    /// Returns whether events should be constructed and delivered at all.
    ///
    /// The runtime checks this before building an event, so disabled tracers
    /// cost nothing per operation.
    fn enabled(&self) -> bool {
        true
    }

    /// Delivers one event.
    fn on_event(&mut self, event: &TraceEvent);
}

/// No-op tracer (the production default).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn enabled(&self) -> bool {
        false
    }

    fn on_event(&mut self, _event: &TraceEvent) {}
}

/// Tracer that records every event for post-mortem inspection.
///
/// Cloning shares the underlying event buffer, so a clone kept by the caller
/// observes everything recorded after the original moves into the runtime.
#[derive(Debug, Clone, Default)]
pub struct RecordingTracer {
    events: Rc<RefCell<Vec<TraceEvent>>>,
}

impl RecordingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }

    /// Drains and returns the recorded events.
    pub fn take_events(&self) -> Vec<TraceEvent> {
        self.events.borrow_mut().drain(..).collect()
    }
}

impl Tracer for RecordingTracer {
    fn on_event(&mut self, event: &TraceEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Tracer that logs each event to stderr in debug form.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrTracer;

impl Tracer for StderrTracer {
    fn on_event(&mut self, event: &TraceEvent) {
        eprintln!("[chimera] {event:?}");
    }
}
