//! Text rendering of values attached to failed operations.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Output;

/// Renders a value for the `output: ...` entry of
/// [`crate::Checker::unwrap_with_output`].
///
/// Byte sequences decode as (lossy) UTF-8 text rather than a list of numbers.
/// Values without an impl can be passed wrapped in [`Debugged`].
pub trait OutputText {
    fn output_text(&self) -> String;
}

impl OutputText for str {
    fn output_text(&self) -> String {
        self.to_string()
    }
}

impl OutputText for String {
    fn output_text(&self) -> String {
        self.clone()
    }
}

impl OutputText for Cow<'_, str> {
    fn output_text(&self) -> String {
        self.to_string()
    }
}

impl OutputText for [u8] {
    fn output_text(&self) -> String {
        String::from_utf8_lossy(self).into_owned()
    }
}

impl<const N: usize> OutputText for [u8; N] {
    fn output_text(&self) -> String {
        self.as_slice().output_text()
    }
}

impl OutputText for Vec<u8> {
    fn output_text(&self) -> String {
        self.as_slice().output_text()
    }
}

/// Stdout followed by stderr.
impl OutputText for Output {
    fn output_text(&self) -> String {
        let mut text = self.stdout.output_text();
        text.push_str(&self.stderr.output_text());
        text
    }
}

impl OutputText for Path {
    fn output_text(&self) -> String {
        self.to_string_lossy().into_owned()
    }
}

impl OutputText for PathBuf {
    fn output_text(&self) -> String {
        self.as_path().output_text()
    }
}

impl OutputText for OsStr {
    fn output_text(&self) -> String {
        self.to_string_lossy().into_owned()
    }
}

impl OutputText for OsString {
    fn output_text(&self) -> String {
        self.as_os_str().output_text()
    }
}

impl<T: OutputText> OutputText for Option<T> {
    fn output_text(&self) -> String {
        match self {
            Some(value) => value.output_text(),
            None => "None".to_string(),
        }
    }
}

/// Renders any `Debug` value, for outputs with no [`OutputText`] impl.
///
/// ```rust
/// use faultline_core::{Checker, Debugged};
///
/// let check = Checker::new();
/// let lines = check.boundary(|| {
///     check.unwrap_with_output(Debugged(vec!["a", "b"]), None::<&str>).into_inner()
/// });
/// assert_eq!(lines.unwrap(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Debugged<T>(pub T);

impl<T> Debugged<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: fmt::Debug> OutputText for Debugged<T> {
    fn output_text(&self) -> String {
        format!("{:?}", self.0)
    }
}

impl<T: OutputText + ?Sized> OutputText for &T {
    fn output_text(&self) -> String {
        (**self).output_text()
    }
}

macro_rules! display_output_text {
    ($($ty:ty),* $(,)?) => {
        $(
            impl OutputText for $ty {
                fn output_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_output_text!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
