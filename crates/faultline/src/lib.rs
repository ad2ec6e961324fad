//! # faultline
//!
//! Turn internal faults into ordinary error returns at a well-defined
//! boundary, and aggregate several errors into one.
//!
//! ```rust
//! use faultline::prelude::*;
//!
//! fn checked_div(check: &Checker, a: u32, b: u32) -> u32 {
//!     ensure!(check, b != 0, "cannot divide {} by zero", a);
//!     a / b
//! }
//!
//! pub fn ratio(a: u32, b: u32) -> Result<u32, DynError> {
//!     let check = Checker::new();
//!     check.boundary(|| checked_div(&check, a, b))
//! }
//!
//! assert_eq!(ratio(9, 3).unwrap(), 3);
//! assert_eq!(ratio(9, 0).unwrap_err().to_string(), "cannot divide 9 by zero");
//! ```

pub use faultline_core::*;
pub use faultline_error::{Error, ErrorChain, ErrorKind, Result, chain, contains};

pub mod prelude {
    //! The names most entry points need.

    pub use crate::{
        Checker, CheckerConfig, Debugged, DynError, ErrorChain, OutputText, chain, contains, ensure,
        get_trace, traced, verbose_trace,
    };
}
