//! Strategies that turn an error into a fault.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

use faultline_error::DynError;

use crate::checker::Checker;
use crate::fault::{Fault, PlainFault};
use crate::trace::{DEFAULT_MAX_FRAMES, TracedFault, capture, get_trace, type_prefix_of};

/// Builds the fault a [`Checker`] raises for a failed operation.
///
/// `origin` is the source location of the Checker call that failed. Strategies
/// are fixed once a Checker is configured; swapping one while other threads
/// use the same Checker is the caller's problem.
pub trait Faulter: fmt::Debug + Send + Sync {
    fn fault(&self, err: DynError, origin: &'static Location<'static>) -> Box<dyn Fault>;
}

/// Wraps the error as is. No stack walk, suitable for hot paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFaulter;

impl Faulter for PlainFaulter {
    fn fault(&self, err: DynError, _origin: &'static Location<'static>) -> Box<dyn Fault> {
        Box::new(PlainFault::new(err))
    }
}

/// Records the call stack starting at the first frame outside the boundary.
#[derive(Debug, Clone)]
pub struct TracingFaulter {
    boundary: Cow<'static, str>,
    max_frames: usize,
}

impl TracingFaulter {
    /// A faulter whose boundary is the [`Checker`] type itself.
    pub fn new() -> Self {
        Self::with_boundary(type_prefix_of::<Checker>())
    }

    /// A faulter treating every function under `boundary` as plumbing.
    pub fn with_boundary(boundary: impl Into<Cow<'static, str>>) -> Self {
        Self {
            boundary: boundary.into(),
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    pub fn max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }
}

impl Default for TracingFaulter {
    fn default() -> Self {
        Self::new()
    }
}

impl Faulter for TracingFaulter {
    fn fault(&self, err: DynError, origin: &'static Location<'static>) -> Box<dyn Fault> {
        // Errors recovered by an inner traced boundary keep their first trace.
        if get_trace(&*err).is_some() {
            return Box::new(PlainFault::new(err));
        }
        let trace = capture(&self.boundary, self.max_frames, origin);
        Box::new(TracedFault::new(err, trace))
    }
}
