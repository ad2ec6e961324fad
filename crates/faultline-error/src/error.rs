//! The structured Error type produced by faultline itself.

use crate::ErrorKind;
use std::fmt;

/// Error raised by faultline operations such as failed assertions.
///
/// `Display` renders only the message so that a recovered error reads exactly
/// like the text the caller supplied. Kind, operation and context show up in
/// `Debug` output and through the getters.
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The Checker operation that built this error, or `""`.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    pub fn with_operation(self, operation: &'static str) -> Self {
        Self { operation, ..self }
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// `[Kind] operation: message`, then one indented `key = value` line per
/// context entry.
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind.as_str())?;
        if !self.operation.is_empty() {
            write!(f, " {}", self.operation)?;
        }
        write!(f, ": {}", self.message)?;
        for (key, value) in &self.context {
            write!(f, "\n    {key} = {value}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::new(ErrorKind::Unexpected, msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::new(ErrorKind::Unexpected, msg)
    }
}

impl Error {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// A checked condition did not hold.
    pub fn assertion_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AssertionFailed, message)
    }

    /// Output of a failed operation.
    ///
    /// The message reads `output: <text>`; the raw text is also kept in
    /// context under `output`.
    pub fn captured_output(output: impl Into<String>) -> Self {
        let output = output.into();
        Self::new(ErrorKind::CapturedOutput, format!("output: {output}"))
            .with_context("output", output)
    }

    /// An argument a Checker operation cannot turn into a fault.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// The fault protocol itself was broken, e.g. a fault without a cause.
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvariantViolation, message)
    }
}
