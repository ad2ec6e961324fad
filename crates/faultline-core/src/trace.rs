//! Call-stack capture and faults that remember where they were raised.

use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

use backtrace::Backtrace;
use faultline_error::{DynError, ErrorChain};

use crate::fault::Fault;
use crate::site::CallSite;

/// Default cap on the number of frames a trace records.
pub const DEFAULT_MAX_FRAMES: usize = 64;

const TRACED_BOUNDARY: &str = concat!(module_path!(), "::traced");

/// A fault, and an error, carrying the call sites it was raised from.
///
/// Renders as `"<origin>: <cause>"` where origin is the first recorded call
/// site, or `?:-1:?` when nothing was recorded.
#[derive(Debug)]
pub struct TracedFault {
    cause: DynError,
    trace: Vec<CallSite>,
}

impl TracedFault {
    pub fn new(cause: impl Into<DynError>, trace: Vec<CallSite>) -> Self {
        Self {
            cause: cause.into(),
            trace,
        }
    }

    /// Recorded call sites, innermost first.
    pub fn trace(&self) -> &[CallSite] {
        &self.trace
    }

    /// The call site the fault was raised from, if one was recorded.
    pub fn origin(&self) -> Option<&CallSite> {
        self.trace.first()
    }
}

impl fmt::Display for TracedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin() {
            Some(site) => write!(f, "{}: {}", site, self.cause),
            None => write!(f, "{}: {}", CallSite::unknown(), self.cause),
        }
    }
}

impl StdError for TracedFault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_ref() as &(dyn StdError + 'static))
    }
}

impl Fault for TracedFault {
    fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    fn into_error(self: Box<Self>) -> DynError {
        self
    }
}

/// Record the current call stack, starting just outside `boundary`.
///
/// Frames are skipped up to the first one whose function lies under
/// `boundary`, then past every directly following frame that does too. When
/// no frame past the boundary can be resolved, `origin` is the only site.
pub(crate) fn capture(
    boundary: &str,
    max_frames: usize,
    origin: &'static Location<'static>,
) -> Vec<CallSite> {
    let backtrace = Backtrace::new();
    let trace: Vec<CallSite> = backtrace
        .frames()
        .iter()
        .flat_map(|frame| frame.symbols())
        .map(CallSite::from_symbol)
        .skip_while(|site| !site.is_within(boundary))
        .skip_while(|site| site.is_within(boundary))
        .take(max_frames)
        .collect();

    if trace.is_empty() {
        tracing::trace!(boundary, "no frames resolved past boundary, using caller location");
        vec![CallSite::from_location(origin)]
    } else {
        trace
    }
}

/// Attach the caller's stack to `err`, unless it already carries a trace.
#[track_caller]
pub fn traced(err: impl Into<DynError>) -> DynError {
    let err: DynError = err.into();
    if get_trace(&*err).is_some() {
        return err;
    }
    let trace = capture(TRACED_BOUNDARY, DEFAULT_MAX_FRAMES, Location::caller());
    Box::new(TracedFault::new(err, trace))
}

/// The trace carried by `err`, or by the first traced item of a chain.
pub fn get_trace<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a [CallSite]> {
    if let Some(traced) = err.downcast_ref::<TracedFault>() {
        return Some(traced.trace());
    }
    err.downcast_ref::<ErrorChain>()?
        .errors()
        .iter()
        .find_map(|item| item.downcast_ref::<TracedFault>())
        .map(TracedFault::trace)
}

/// Multi-line rendering of `err` and its trace.
///
/// One line per frame; the first frame's line is replaced by the error's own
/// message, which already names the origin.
pub fn verbose_trace(err: &(dyn StdError + 'static)) -> String {
    let mut lines = vec![err.to_string()];
    if let Some(trace) = get_trace(err) {
        lines.extend(trace.iter().skip(1).map(ToString::to_string));
    }
    lines.join("\n")
}

/// Qualified type path of `value`, without reference sigils or generics.
pub fn type_prefix<T: ?Sized>(_value: &T) -> &'static str {
    type_prefix_of::<T>()
}

/// Qualified type path of `T`, without reference sigils or generics.
pub fn type_prefix_of<T: ?Sized>() -> &'static str {
    let mut name = std::any::type_name::<T>();
    loop {
        let stripped = name.trim_start_matches('&').trim_start_matches("mut ");
        if stripped.len() == name.len() {
            break;
        }
        name = stripped;
    }
    match name.find('<') {
        Some(end) => &name[..end],
        None => name,
    }
}
