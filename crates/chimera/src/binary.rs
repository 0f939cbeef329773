//! Binary operator symbols and the native fast path.
//!
//! Binary operations follow a two-step protocol:
//! 1. Try the native arm for primitive operands (ints, bools, strings)
//! 2. Otherwise dispatch to the left operand's special method through the
//!    full attribute resolver, so a class-level mutation performed after the
//!    operand's creation is honored
//!
//! There is no reflected-operand fallback: when the left operand supports
//! neither arm, the operation fails with `UnsupportedOperationError` rather
//! than consulting the right operand or producing a default.

use strum::{Display, EnumString, IntoStaticStr};

use crate::{
    exception::{ExcType, RunResult},
    intern::{Interns, StaticStrings},
    value::Value,
};

/// A binary operator symbol, displayed as written in source (`+`, `==`, `<`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "<")]
    Lt,
}

impl BinaryOp {
    /// Returns the special-method name this symbol dispatches to.
    pub(crate) fn special_method(self) -> StaticStrings {
        match self {
            Self::Add => StaticStrings::DunderAdd,
            Self::Eq => StaticStrings::DunderEq,
            Self::Lt => StaticStrings::DunderLt,
        }
    }
}

/// Tries the native arm for primitive operands.
///
/// Returns `Ok(None)` when neither operand combination is native, in which
/// case the caller falls through to special-method dispatch. Bools promote
/// to ints for arithmetic and comparison. Overflowing integer arithmetic is
/// an `OverflowError`, never a wrap.
pub(crate) fn try_native(
    op: BinaryOp,
    left: Value,
    right: Value,
    interns: &mut Interns,
) -> RunResult<Option<Value>> {
    if let (Some(l), Some(r)) = (left.as_int(), right.as_int()) {
        let result = match op {
            BinaryOp::Add => Value::Int(l.checked_add(r).ok_or_else(|| ExcType::overflow_error(op))?),
            BinaryOp::Eq => Value::Bool(l == r),
            BinaryOp::Lt => Value::Bool(l < r),
        };
        return Ok(Some(result));
    }

    if let (Value::InternString(l), Value::InternString(r)) = (left, right) {
        let result = match op {
            BinaryOp::Add => {
                let concatenated = format!("{}{}", interns.get_str(l), interns.get_str(r));
                Some(Value::InternString(interns.intern(&concatenated)))
            }
            // Interning canonicalizes: equal ids iff equal strings.
            BinaryOp::Eq => Some(Value::Bool(l == r)),
            BinaryOp::Lt => None,
        };
        return Ok(result);
    }

    Ok(None)
}
