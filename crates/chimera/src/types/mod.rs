mod class;

pub(crate) use class::{ClassObject, Instance, compute_c3_mro};
use strum::{Display, IntoStaticStr};

/// Value types, as reported in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Type {
    #[strum(serialize = "NoneType")]
    NoneType,
    #[strum(serialize = "bool")]
    Bool,
    #[strum(serialize = "int")]
    Int,
    #[strum(serialize = "str")]
    Str,
    #[strum(serialize = "function")]
    Function,
    #[strum(serialize = "method")]
    Method,
    /// A class object.
    #[strum(serialize = "type")]
    Type,
    /// An instance of a user-defined class. Error messages usually prefer
    /// the concrete class name over this generic label.
    #[strum(serialize = "object")]
    Instance,
}
