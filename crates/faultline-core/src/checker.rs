//! The boundary protocol.
//!
//! Code below an exported entry point calls [`Checker`] operations, which
//! raise a [`Fault`] by unwinding instead of returning an error. The entry
//! point wraps its body in [`Checker::boundary`] (or [`Checker::recover`]),
//! which converts a raised fault back into an ordinary error. Panics that are
//! not faults keep unwinding untouched.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::Arc;

use faultline_error::{DynError, Error, ErrorChain, chain};

use crate::config::CheckerConfig;
use crate::fault::{Fault, FaultSignal, raise};
use crate::faulter::{Faulter, PlainFaulter, TracingFaulter};
use crate::hook::install_quiet_hook;
use crate::output::OutputText;

/// Raises faults for failed checks and recovers them at a boundary.
///
/// A Checker holds no per-call state and can be shared across threads; each
/// raise/recover pair stays on the stack that produced it.
#[derive(Debug, Clone)]
pub struct Checker {
    faulter: Arc<dyn Faulter>,
    quiet_panics: bool,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    /// A Checker raising untraced faults.
    pub fn new() -> Self {
        Self {
            faulter: Arc::new(PlainFaulter),
            quiet_panics: true,
        }
    }

    /// A Checker recording the call stack outside itself on every fault.
    pub fn with_tracing() -> Self {
        Self::new().with_faulter(TracingFaulter::new())
    }

    pub fn from_config(config: &CheckerConfig) -> Self {
        Self {
            faulter: config.faulter(),
            quiet_panics: config.quiet_panics,
        }
    }

    pub fn with_faulter(mut self, faulter: impl Faulter + 'static) -> Self {
        self.faulter = Arc::new(faulter);
        self
    }

    /// Replace the fault strategy in place. Clones made earlier keep theirs.
    pub fn set_faulter(&mut self, faulter: impl Faulter + 'static) -> &mut Self {
        self.faulter = Arc::new(faulter);
        self
    }

    pub fn faulter(&self) -> &dyn Faulter {
        self.faulter.as_ref()
    }

    /// Raise an assertion fault with `message` unless `condition` holds.
    #[track_caller]
    pub fn assert_true(&self, condition: bool, message: impl Into<String>) {
        if !condition {
            let err = Error::assertion_failed(message).with_operation("checker::assert_true");
            self.raise_at(Box::new(err), Location::caller())
        }
    }

    /// Like [`Checker::assert_true`], formatting the message only on failure.
    ///
    /// Usually reached through [`crate::ensure!`].
    #[track_caller]
    pub fn assert_truef(&self, condition: bool, args: fmt::Arguments<'_>) {
        if !condition {
            let err = Error::assertion_failed(args.to_string())
                .with_operation("checker::assert_truef");
            self.raise_at(Box::new(err), Location::caller())
        }
    }

    /// Return the success value, or raise a fault from the error.
    #[track_caller]
    pub fn unwrap<T, E>(&self, result: Result<T, E>) -> T
    where
        E: Into<DynError>,
    {
        match result {
            Ok(value) => value,
            Err(err) => self.raise_at(cause_of(err.into()), Location::caller()),
        }
    }

    /// Raise a fault if `err` is present. An empty [`ErrorChain`] counts as
    /// absent.
    #[track_caller]
    pub fn unwrap_error<E>(&self, err: Option<E>)
    where
        E: Into<DynError>,
    {
        if let Some(err) = err.and_then(|err| present(err.into())) {
            self.raise_at(err, Location::caller())
        }
    }

    /// Return `value` when `err` is absent; otherwise raise a fault whose
    /// cause chains `err` with `output: <value>`.
    #[track_caller]
    pub fn unwrap_with_output<T, E>(&self, value: T, err: Option<E>) -> T
    where
        T: OutputText,
        E: Into<DynError>,
    {
        let Some(err) = err.and_then(|err| present(err.into())) else {
            return value;
        };
        let output = Error::captured_output(value.output_text())
            .with_operation("checker::unwrap_with_output");
        let mut cause = ErrorChain::new();
        cause.append(err).append(output);
        self.raise_at(Box::new(cause), Location::caller())
    }

    /// Build, but do not raise, the fault this Checker would raise for `err`.
    ///
    /// Pass it to [`raise`] from helpers that are not Checker operations.
    #[track_caller]
    pub fn fault(&self, err: impl Into<DynError>) -> Box<dyn Fault> {
        self.faulter.fault(cause_of(err.into()), Location::caller())
    }

    /// See [`recover_into`].
    pub fn recover_into(&self, slot: &mut Option<DynError>, signal: Option<Box<dyn Any + Send>>) {
        recover_into(slot, signal)
    }

    /// Run `body`, recovering a raised fault into `slot`.
    ///
    /// Returns `None` when a fault was recovered. Any other panic resumes
    /// unwinding after `body` exits.
    pub fn recover<T>(&self, slot: &mut Option<DynError>, body: impl FnOnce() -> T) -> Option<T> {
        if self.quiet_panics {
            install_quiet_hook();
        }
        match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(value) => Some(value),
            Err(signal) => {
                recover_into(slot, Some(signal));
                None
            }
        }
    }

    /// Run `body` as an exported entry point: a raised fault becomes `Err`.
    pub fn boundary<T>(&self, body: impl FnOnce() -> T) -> Result<T, DynError> {
        let mut err = None;
        let value = self.recover(&mut err, body);
        match (value, err) {
            (Some(value), _) => Ok(value),
            (None, Some(err)) => Err(err),
            (None, None) => Err(Box::new(Error::invariant_violation(
                "boundary unwound without recording an error",
            ))),
        }
    }

    /// [`Checker::boundary`] for bodies that also return errors normally.
    pub fn try_boundary<T, E>(&self, body: impl FnOnce() -> Result<T, E>) -> Result<T, DynError>
    where
        E: Into<DynError>,
    {
        self.boundary(body)?.map_err(Into::into)
    }

    fn raise_at(&self, err: DynError, origin: &'static Location<'static>) -> ! {
        raise(self.faulter.fault(err, origin))
    }
}

/// `None` for an empty [`ErrorChain`], which stands for "no error".
fn present(err: DynError) -> Option<DynError> {
    if err.downcast_ref::<ErrorChain>().is_some_and(ErrorChain::is_empty) {
        None
    } else {
        Some(err)
    }
}

/// A fault must carry a cause, so an empty chain is replaced by an
/// invalid-argument error.
fn cause_of(err: DynError) -> DynError {
    present(err).unwrap_or_else(|| {
        Box::new(
            Error::invalid_argument("empty error chain used as an error")
                .with_operation("checker::fault"),
        ) as DynError
    })
}

/// Absorb a captured panic payload if it is a raised fault.
///
/// - `None`: nothing happened, `slot` is untouched.
/// - a [`FaultSignal`]: `slot` becomes the chain of its previous value
///   followed by the fault's error.
/// - anything else: unwinding resumes with the very same payload.
pub fn recover_into(slot: &mut Option<DynError>, signal: Option<Box<dyn Any + Send>>) {
    let Some(signal) = signal else {
        return;
    };
    match signal.downcast::<FaultSignal>() {
        Ok(raised) => {
            let recovered = raised.into_fault().into_error();
            let prior = slot.take();
            tracing::debug!(
                error = %recovered,
                had_prior = prior.is_some(),
                "recovered fault at boundary"
            );
            let joined = chain([prior, present(recovered)])
                .map(|c| Box::new(c) as DynError)
                .unwrap_or_else(|| {
                    Box::new(Error::invariant_violation("fault recovered without an error"))
                        as DynError
                });
            *slot = Some(joined);
        }
        Err(foreign) => {
            tracing::trace!("foreign panic passing through fault boundary");
            panic::resume_unwind(foreign)
        }
    }
}

/// Raise an assertion fault through `checker` unless `cond` holds.
///
/// ```rust
/// use faultline_core::{Checker, ensure};
///
/// let checker = Checker::new();
/// let err = checker
///     .boundary(|| ensure!(checker, 1 + 1 == 3, "math is broken: {}", 1 + 1))
///     .unwrap_err();
/// assert_eq!(err.to_string(), "math is broken: 2");
/// ```
#[macro_export]
macro_rules! ensure {
    ($checker:expr, $cond:expr, $($arg:tt)+) => {
        $checker.assert_truef($cond, ::std::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::PlainFault;
    use crate::output::Debugged;
    use crate::trace::get_trace;
    use pretty_assertions::assert_eq;

    fn run(checker: &Checker, body: impl FnOnce()) -> Option<String> {
        let mut err = None;
        checker.recover(&mut err, body);
        err.map(|e| e.to_string())
    }

    #[test]
    fn test_recover_table() {
        let check = Checker::new();

        assert_eq!(run(&check, || check.assert_true(false, "error1")).as_deref(), Some("error1"));
        assert_eq!(run(&check, || check.assert_true(true, "error1")), None);

        assert_eq!(
            run(&check, || crate::ensure!(check, false, "error1 {}", "error")).as_deref(),
            Some("error1 error")
        );
        assert_eq!(run(&check, || crate::ensure!(check, true, "error1 {}", "error")), None);

        assert_eq!(
            run(&check, || {
                check.unwrap(Err::<&str, _>("error1"));
            })
            .as_deref(),
            Some("error1")
        );
        assert_eq!(
            run(&check, || assert_eq!(check.unwrap(Ok::<_, DynError>("str")), "str")),
            None
        );

        assert_eq!(
            run(&check, || {
                check.unwrap_with_output("str", Some("error1"));
            })
            .as_deref(),
            Some("error1; output: str")
        );
        assert_eq!(
            run(&check, || {
                check.unwrap_with_output(b"str bytes".to_vec(), Some("error1"));
            })
            .as_deref(),
            Some("error1; output: str bytes")
        );
        assert_eq!(
            run(&check, || {
                assert_eq!(check.unwrap_with_output("str", None::<DynError>), "str")
            }),
            None
        );

        assert_eq!(run(&check, || check.unwrap_error(Some("error1"))).as_deref(), Some("error1"));
        assert_eq!(run(&check, || check.unwrap_error(None::<DynError>)), None);
    }

    #[test]
    fn test_recovered_error_keeps_cause_type() {
        let check = Checker::new();
        let err = check
            .boundary(|| check.unwrap("x".parse::<i32>()))
            .unwrap_err();
        let chain = err.downcast_ref::<ErrorChain>().expect("recovered into a chain");
        assert_eq!(chain.len(), 1);
        assert!(chain.errors()[0].downcast_ref::<std::num::ParseIntError>().is_some());
    }

    #[test]
    fn test_assertion_error_is_structured() {
        let check = Checker::new();
        let err = check.boundary(|| check.assert_true(false, "cond failed")).unwrap_err();
        let chain = err.downcast_ref::<ErrorChain>().expect("chain");
        let inner = chain.errors()[0].downcast_ref::<Error>().expect("faultline error");
        assert_eq!(inner.kind(), faultline_error::ErrorKind::AssertionFailed);
        assert_eq!(inner.operation(), "checker::assert_true");
    }

    #[test]
    fn test_boundary_returns_value() {
        let check = Checker::new();
        assert_eq!(check.boundary(|| check.unwrap(Ok::<_, DynError>(5)) + 1).ok(), Some(6));
    }

    #[test]
    fn test_try_boundary() {
        let check = Checker::new();
        let normal: Result<(), DynError> = check.try_boundary(|| Err::<(), _>("returned"));
        assert_eq!(normal.unwrap_err().to_string(), "returned");

        let raised: Result<(), DynError> = check.try_boundary(|| {
            check.assert_true(false, "raised");
            Ok::<_, DynError>(())
        });
        assert_eq!(raised.unwrap_err().to_string(), "raised");
    }

    #[test]
    fn test_prior_error_comes_first() {
        let check = Checker::new();
        let mut err: Option<DynError> = Some("prior".into());
        check.recover(&mut err, || check.unwrap_error(Some("cause")));
        assert_eq!(err.map(|e| e.to_string()).as_deref(), Some("prior; cause"));
    }

    #[test]
    fn test_recover_into_without_signal() {
        let mut err: Option<DynError> = Some("untouched".into());
        recover_into(&mut err, None);
        assert_eq!(err.map(|e| e.to_string()).as_deref(), Some("untouched"));

        let mut none: Option<DynError> = None;
        Checker::new().recover_into(&mut none, None);
        assert!(none.is_none());
    }

    #[test]
    fn test_recover_into_reraises_foreign_payload() {
        let mut err: Option<DynError> = None;
        let payload = panic::catch_unwind(AssertUnwindSafe(|| {
            recover_into(&mut err, Some(Box::new("different panic")));
        }))
        .expect_err("foreign payload must be re-raised");

        assert_eq!(payload.downcast_ref::<&str>(), Some(&"different panic"));
        assert!(err.is_none());
    }

    #[test]
    fn test_foreign_panic_escapes_boundary() {
        let check = Checker::new();
        let payload = panic::catch_unwind(AssertUnwindSafe(|| {
            let _: Result<(), DynError> = check.boundary(|| panic::panic_any(42_u32));
        }))
        .expect_err("foreign panic must escape");
        assert_eq!(payload.downcast_ref::<u32>(), Some(&42));
    }

    #[test]
    fn test_fault_is_not_raised() {
        let check = Checker::new();
        let fault = check.fault("manual");
        assert_eq!(fault.to_string(), "manual");

        let result: Result<(), DynError> = check.boundary(|| raise(fault));
        assert_eq!(result.unwrap_err().to_string(), "manual");
    }

    #[test]
    fn test_manual_signal_round_trip() {
        let signal: Box<dyn Any + Send> =
            Box::new(FaultSignal::new(Box::new(PlainFault::new("e"))));
        let mut err = None;
        recover_into(&mut err, Some(signal));
        assert_eq!(err.map(|e| e.to_string()).as_deref(), Some("e"));
    }

    #[test]
    fn test_set_faulter_chains() {
        let mut check = Checker::new();
        check.set_faulter(TracingFaulter::new()).set_faulter(PlainFaulter);
        assert!(format!("{:?}", check.faulter()).contains("PlainFaulter"));
    }

    fn parse_port(check: &Checker, text: &str) -> u16 {
        check.unwrap(text.parse::<u16>())
    }

    #[test]
    fn test_tracing_origin_is_caller() {
        let check = Checker::with_tracing();
        let err = check.boundary(|| parse_port(&check, "http")).unwrap_err();

        let trace = get_trace(&*err).expect("traced");
        assert!(
            trace[0].function().ends_with("::parse_port"),
            "unexpected origin {:?}",
            trace[0]
        );
        let message = err.to_string();
        assert!(message.starts_with("checker.rs:"), "{message}");
        assert!(message.ends_with("::parse_port: invalid digit found in string"), "{message}");
    }

    fn check_port_range(check: &Checker, port: u32) {
        check.assert_true(port < 65536, "port out of range");
    }

    fn check_port_assigned(check: &Checker, port: u32) {
        crate::ensure!(check, port != 0, "port {} is reserved", port);
    }

    #[test]
    fn test_tracing_origin_for_assertions() {
        let check = Checker::with_tracing();

        let err = check.boundary(|| check_port_range(&check, 70000)).unwrap_err();
        let trace = get_trace(&*err).expect("traced");
        assert!(trace[0].function().ends_with("::check_port_range"), "{:?}", trace[0]);
        let message = err.to_string();
        assert!(message.ends_with("::check_port_range: port out of range"), "{message}");

        let err = check.boundary(|| check_port_assigned(&check, 0)).unwrap_err();
        let trace = get_trace(&*err).expect("traced");
        assert!(trace[0].function().ends_with("::check_port_assigned"), "{:?}", trace[0]);
        let message = err.to_string();
        assert!(message.ends_with("::check_port_assigned: port 0 is reserved"), "{message}");
    }

    #[test]
    fn test_empty_chain_counts_as_no_error() {
        for check in [Checker::new(), Checker::with_tracing()] {
            let mut slot = None;
            let value = check.recover(&mut slot, || {
                check.unwrap_error(Some(ErrorChain::new()));
                7
            });
            assert_eq!(value, Some(7));
            assert!(slot.is_none());

            let output = check.boundary(|| {
                check.unwrap_with_output("out", Some(ErrorChain::new()))
            });
            assert_eq!(output.ok(), Some("out"));
        }
    }

    #[test]
    fn test_empty_chain_cannot_be_unwrapped() {
        for check in [Checker::new(), Checker::with_tracing()] {
            let err = check
                .boundary(|| check.unwrap(Err::<u8, _>(ErrorChain::new())))
                .unwrap_err();
            let message = err.to_string();
            assert!(message.ends_with("empty error chain used as an error"), "{message}");

            let fault = check.fault(ErrorChain::new());
            assert!(fault.to_string().ends_with("empty error chain used as an error"));
        }
    }

    #[test]
    fn test_recovered_empty_fault_still_reports() {
        let signal: Box<dyn Any + Send> =
            Box::new(FaultSignal::new(Box::new(PlainFault::new(ErrorChain::new()))));
        let mut err = None;
        recover_into(&mut err, Some(signal));
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("fault recovered without an error")
        );
    }

    #[test]
    fn test_unwrap_with_debug_output() {
        let check = Checker::new();
        let err = check
            .boundary(|| {
                check.unwrap_with_output(Debugged(vec!["a".to_string()]), Some("exit status 1"));
            })
            .unwrap_err();
        assert_eq!(err.to_string(), r#"exit status 1; output: ["a"]"#);
    }

    #[test]
    fn test_checker_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Checker>();
    }
}
