//! Error kinds for faultline operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Only errors created by faultline itself carry a kind; errors handed in by
/// callers travel through chains and faults untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Plain message errors converted from strings
    Unexpected,

    /// A checked condition evaluated to false
    AssertionFailed,

    /// Output of a failed operation, kept alongside its error
    CapturedOutput,

    /// An argument no fault can be built from, such as an empty chain
    InvalidArgument,

    /// A fault reached a boundary without an error
    InvariantViolation,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}
