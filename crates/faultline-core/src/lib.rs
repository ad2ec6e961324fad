//! # faultline-core
//!
//! Raise faults deep inside a call stack and recover them exactly once, at
//! the exported entry point, as ordinary error values.
//!
//! ```rust
//! use faultline_core::Checker;
//!
//! fn read_port(check: &Checker, text: &str) -> u16 {
//!     let port = check.unwrap(text.parse::<u16>());
//!     check.assert_true(port >= 1024, "privileged port");
//!     port
//! }
//!
//! let check = Checker::new();
//! assert_eq!(check.boundary(|| read_port(&check, "8080")).unwrap(), 8080);
//!
//! let err = check.boundary(|| read_port(&check, "80")).unwrap_err();
//! assert_eq!(err.to_string(), "privileged port");
//! ```
//!
//! Only [`FaultSignal`] payloads are absorbed by a boundary. Other panics
//! (index out of bounds, failed `expect`, ...) keep unwinding, so genuine bugs
//! are never disguised as error returns. Faults travel by unwinding, so every
//! build profile must keep `panic = "unwind"`.

pub mod checker;
pub mod config;
pub mod fault;
pub mod faulter;
pub mod hook;
pub mod output;
pub mod site;
pub mod trace;

pub use checker::{Checker, recover_into};
pub use config::{CheckerConfig, FaultMode};
pub use fault::{Fault, FaultSignal, PlainFault, raise};
pub use faulter::{Faulter, PlainFaulter, TracingFaulter};
pub use hook::install_quiet_hook;
pub use output::{Debugged, OutputText};
pub use site::CallSite;
pub use trace::{
    DEFAULT_MAX_FRAMES, TracedFault, get_trace, traced, type_prefix, type_prefix_of,
    verbose_trace,
};

pub use faultline_error::DynError;
