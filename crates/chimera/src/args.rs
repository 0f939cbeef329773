use smallvec::{SmallVec, smallvec};

use crate::{
    exception::{ExcType, RunResult},
    value::Value,
};

/// Argument pack for `call` and host function bodies.
///
/// Uses specific variants for common cases (0-2 arguments). Most method
/// calls have at most 2 arguments (a receiver plus one operand), so this
/// eliminates the heap allocation for the vast majority of calls.
#[derive(Debug, Clone)]
pub enum ArgValues {
    Empty,
    One(Value),
    Two(Value, Value),
    Many(SmallVec<[Value; 4]>),
}

impl ArgValues {
    /// Returns the number of arguments.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Two(..) => 2,
            Self::Many(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns the argument at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        match (self, index) {
            (Self::One(a) | Self::Two(a, _), 0) => Some(*a),
            (Self::Two(_, b), 1) => Some(*b),
            (Self::Many(values), _) => values.get(index).copied(),
            _ => None,
        }
    }

    /// Returns a new pack with `first` prepended.
    ///
    /// Used to bind a receiver in front of explicit call arguments.
    #[must_use]
    pub fn prepend(self, first: Value) -> Self {
        match self {
            Self::Empty => Self::One(first),
            Self::One(a) => Self::Two(first, a),
            Self::Two(a, b) => Self::Many(smallvec![first, a, b]),
            Self::Many(values) => {
                let mut out = SmallVec::with_capacity(values.len() + 1);
                out.push(first);
                out.extend(values);
                Self::Many(out)
            }
        }
    }

    /// Consumes the pack into a flat vector.
    #[must_use]
    pub fn into_values(self) -> SmallVec<[Value; 4]> {
        match self {
            Self::Empty => SmallVec::new(),
            Self::One(a) => smallvec![a],
            Self::Two(a, b) => smallvec![a, b],
            Self::Many(values) => values,
        }
    }

    /// Checks that zero arguments were passed.
    pub fn check_zero_args(self, name: &str) -> RunResult<()> {
        match self {
            Self::Empty => Ok(()),
            other => Err(ExcType::type_error_no_args(name, other.count())),
        }
    }

    /// Checks that exactly one argument was passed, returning it.
    pub fn get_one_arg(self, name: &str) -> RunResult<Value> {
        match self {
            Self::One(a) => Ok(a),
            other => Err(ExcType::type_error_arg_count(name, 1, other.count())),
        }
    }

    /// Checks that exactly two arguments were passed, returning them.
    pub fn get_two_args(self, name: &str) -> RunResult<(Value, Value)> {
        match self {
            Self::Two(a, b) => Ok((a, b)),
            other => Err(ExcType::type_error_arg_count(name, 2, other.count())),
        }
    }
}

impl From<Vec<Value>> for ArgValues {
    fn from(mut values: Vec<Value>) -> Self {
        match values.len() {
            0 => Self::Empty,
            1 => Self::One(values.remove(0)),
            2 => {
                let b = values.pop().expect("length checked");
                let a = values.pop().expect("length checked");
                Self::Two(a, b)
            }
            _ => Self::Many(SmallVec::from_vec(values)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::ExcType;

    #[test]
    fn prepend_grows_through_variants() {
        let args = ArgValues::Empty.prepend(Value::Int(3)).prepend(Value::Int(2)).prepend(Value::Int(1));
        assert_eq!(args.count(), 3);
        assert_eq!(args.get(0), Some(Value::Int(1)));
        assert_eq!(args.get(2), Some(Value::Int(3)));
        assert_eq!(args.get(3), None);
    }

    #[test]
    fn get_two_args_rejects_wrong_arity() {
        let err = ArgValues::One(Value::None).get_two_args("__add__").unwrap_err();
        assert_eq!(err.exc_type(), ExcType::TypeError);
        assert_eq!(err.message(), "__add__() takes 2 positional arguments but 1 were given");
    }

    #[test]
    fn check_zero_args_reports_count() {
        let err = ArgValues::Two(Value::None, Value::None).check_zero_args("f").unwrap_err();
        assert_eq!(err.message(), "f() takes no arguments (2 given)");
    }

    #[test]
    fn construction_from_vec_picks_compact_variants() {
        let args = ArgValues::from(vec![Value::Int(1), Value::Int(2)]);
        assert!(matches!(args, ArgValues::Two(..)));
        assert_eq!(args.into_values().as_slice(), &[Value::Int(1), Value::Int(2)]);
        assert!(matches!(ArgValues::from(Vec::<Value>::new()), ArgValues::Empty));
    }
}
