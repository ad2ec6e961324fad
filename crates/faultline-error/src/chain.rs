//! Ordered, flattening aggregation of errors.

use std::error::Error as StdError;
use std::fmt;

use crate::DynError;

/// An ordered list of errors that renders as a single error.
///
/// Items are always leaf errors: appending another `ErrorChain` appends its
/// items instead of nesting it. Insertion order is the order in which the
/// failures happened and is preserved by [`fmt::Display`], which joins the
/// item messages with `"; "`.
#[derive(Debug, Default)]
pub struct ErrorChain {
    errors: Vec<DynError>,
}

impl ErrorChain {
    /// Create an empty chain.
    ///
    /// An empty chain stands for "no error"; use [`ErrorChain::into_error`] or
    /// [`chain`] when handing it to code expecting an optional error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error, flattening it if it is itself a chain.
    pub fn append(&mut self, err: impl Into<DynError>) -> &mut Self {
        let err: DynError = err.into();
        match err.downcast::<ErrorChain>() {
            Ok(nested) => self.errors.extend(nested.errors),
            Err(err) => self.errors.push(err),
        }
        self
    }

    /// The errors in the order they were appended.
    pub fn errors(&self) -> &[DynError] {
        &self.errors
    }

    /// Number of errors in the chain.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether the chain holds no errors at all.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the chain, returning its errors.
    pub fn into_errors(self) -> Vec<DynError> {
        self.errors
    }

    /// Convert into an optional error; an empty chain becomes `None`.
    pub fn into_error(self) -> Option<DynError> {
        if self.errors.is_empty() {
            None
        } else {
            Some(Box::new(self))
        }
    }

    /// Whether `target` matches the whole chain or one of its items.
    ///
    /// See [`contains`] for the exact rules.
    pub fn contains(&self, target: &(dyn StdError + 'static)) -> bool {
        contains(Some(self), Some(target))
    }
}

impl fmt::Display for ErrorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl StdError for ErrorChain {}

impl Extend<DynError> for ErrorChain {
    fn extend<I: IntoIterator<Item = DynError>>(&mut self, iter: I) {
        for err in iter {
            self.append(err);
        }
    }
}

impl Extend<Option<DynError>> for ErrorChain {
    fn extend<I: IntoIterator<Item = Option<DynError>>>(&mut self, iter: I) {
        for err in iter.into_iter().flatten() {
            self.append(err);
        }
    }
}

impl FromIterator<DynError> for ErrorChain {
    fn from_iter<I: IntoIterator<Item = DynError>>(iter: I) -> Self {
        let mut chain = ErrorChain::new();
        chain.extend(iter);
        chain
    }
}

impl FromIterator<Option<DynError>> for ErrorChain {
    fn from_iter<I: IntoIterator<Item = Option<DynError>>>(iter: I) -> Self {
        let mut chain = ErrorChain::new();
        chain.extend(iter);
        chain
    }
}

impl IntoIterator for ErrorChain {
    type Item = DynError;
    type IntoIter = std::vec::IntoIter<DynError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorChain {
    type Item = &'a DynError;
    type IntoIter = std::slice::Iter<'a, DynError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Build a chain from a list of optional errors.
///
/// Absent entries are skipped and nested chains are flattened. If nothing is
/// left the result is `None`, never an empty chain.
pub fn chain<I>(errs: I) -> Option<ErrorChain>
where
    I: IntoIterator<Item = Option<DynError>>,
{
    let chain: ErrorChain = errs.into_iter().collect();
    if chain.is_empty() { None } else { Some(chain) }
}

/// Message-based membership test between two optional errors.
///
/// Returns true when both are present and either
/// their rendered messages are equal, or one of them is an [`ErrorChain`]
/// with an item whose message equals the other one's. Two distinct error
/// values with the same text count as contained.
pub fn contains(
    chain: Option<&(dyn StdError + 'static)>,
    target: Option<&(dyn StdError + 'static)>,
) -> bool {
    let (Some(chain), Some(target)) = (chain, target) else {
        return false;
    };

    let chain_message = chain.to_string();
    let target_message = target.to_string();
    if chain_message == target_message {
        return true;
    }

    let any_item_matches = |candidate: &(dyn StdError + 'static), message: &str| {
        candidate
            .downcast_ref::<ErrorChain>()
            .is_some_and(|c| c.errors.iter().any(|e| e.to_string() == message))
    };

    any_item_matches(chain, &target_message) || any_item_matches(target, &chain_message)
}
