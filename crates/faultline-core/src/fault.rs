//! Fault values and the panic payload that carries them.

use std::error::Error as StdError;
use std::fmt;
use std::panic;

use faultline_error::DynError;

/// An intentionally raised, recoverable failure.
///
/// A fault always has a cause and its rendered message always includes the
/// cause's message. Boundaries turn a fault back into an ordinary error with
/// [`Fault::into_error`].
pub trait Fault: fmt::Display + fmt::Debug + Send + Sync + 'static {
    /// The error that caused this fault.
    fn cause(&self) -> &(dyn StdError + Send + Sync + 'static);

    /// Convert the fault into the error a boundary hands back to its caller.
    fn into_error(self: Box<Self>) -> DynError;
}

/// A fault that wraps its cause and nothing else.
#[derive(Debug)]
pub struct PlainFault {
    cause: DynError,
}

impl PlainFault {
    pub fn new(cause: impl Into<DynError>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

impl fmt::Display for PlainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cause)
    }
}

impl Fault for PlainFault {
    fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    fn into_error(self: Box<Self>) -> DynError {
        self.cause
    }
}

/// Panic payload marking an unwind as a raised [`Fault`].
///
/// Boundaries absorb exactly this payload type; anything else keeps
/// unwinding.
#[derive(Debug)]
pub struct FaultSignal(Box<dyn Fault>);

impl FaultSignal {
    pub fn new(fault: Box<dyn Fault>) -> Self {
        Self(fault)
    }

    pub fn fault(&self) -> &dyn Fault {
        self.0.as_ref()
    }

    pub fn into_fault(self) -> Box<dyn Fault> {
        self.0
    }
}

/// Unwind the stack with `fault` until the nearest boundary recovers it.
pub fn raise(fault: Box<dyn Fault>) -> ! {
    tracing::trace!(fault = %fault, "raising fault");
    panic::panic_any(FaultSignal::new(fault))
}
