//! # faultline-error
//!
//! Error values shared by the faultline crates.
//!
//! ## Design Philosophy
//!
//! - **DynError**: the currency every boundary returns, any `std::error::Error`
//! - **Error + ErrorKind**: structured errors produced by the library itself
//! - **ErrorChain**: an ordered, flat list of errors rendered as one message
//!
//! ## Usage
//!
//! ```rust
//! use faultline_error::{chain, contains, DynError, Error};
//!
//! let first: DynError = Error::unexpected("disk full").into();
//! let second: DynError = Error::assertion_failed("index out of date").into();
//! let joined = chain([Some(first), None, Some(second)]).unwrap();
//!
//! assert_eq!(joined.to_string(), "disk full; index out of date");
//! assert!(contains(Some(&joined), Some(&Error::unexpected("disk full"))));
//! ```
//!
//! ## Principles
//!
//! - An empty chain is "no error" and never escapes as `Some`
//! - Chains never nest, appending a chain appends its items
//! - Membership is decided by rendered message, not identity

mod chain;
mod error;
mod kind;

pub use chain::{ErrorChain, chain, contains};
pub use error::Error;
pub use kind::ErrorKind;

/// Boxed error accepted and returned at every boundary.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using the boxed boundary error.
pub type Result<T, E = DynError> = std::result::Result<T, E>;
