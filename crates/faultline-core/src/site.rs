//! Call-site descriptors recorded in traces.

use std::fmt;
use std::panic::Location;
use std::path::Path;

/// One stack frame: source file, line and function name.
///
/// Equality is structural. Call sites only feed diagnostics and never decide
/// control flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    file: String,
    line: i64,
    function: String,
}

impl CallSite {
    pub const UNKNOWN_FILE: &'static str = "?";
    pub const UNKNOWN_FUNCTION: &'static str = "?";

    pub fn new(file: impl Into<String>, line: i64, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
        }
    }

    /// The site used when no frame could be captured.
    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN_FILE, -1, Self::UNKNOWN_FUNCTION)
    }

    /// A site known only by its source location.
    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(
            location.file(),
            i64::from(location.line()),
            Self::UNKNOWN_FUNCTION,
        )
    }

    pub(crate) fn from_symbol(symbol: &backtrace::BacktraceSymbol) -> Self {
        let function = symbol
            .name()
            .map(|name| format!("{:#}", name))
            .unwrap_or_else(|| Self::UNKNOWN_FUNCTION.to_string());
        let file = symbol
            .filename()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| Self::UNKNOWN_FILE.to_string());
        let line = symbol.lineno().map(i64::from).unwrap_or(-1);
        Self::new(file, line, function)
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> i64 {
        self.line
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    /// Whether the function name lies under the path `prefix`.
    ///
    /// Leading `<` of qualified impl paths such as
    /// `<krate::Type as krate::Trait>::method` is ignored. The prefix must end
    /// on a path segment boundary, so `krate::Checker` does not claim
    /// `krate::CheckerConfig::new`.
    pub fn is_within(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return false;
        }
        let Some(rest) = self.function.trim_start_matches('<').strip_prefix(prefix) else {
            return false;
        };
        prefix.ends_with("::")
            || rest.is_empty()
            || rest.starts_with("::")
            || rest.starts_with('>')
            || rest.starts_with(' ')
    }

    fn file_name(&self) -> &str {
        Path::new(&self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file)
    }
}

impl Default for CallSite {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_name(), self.line, self.function)
    }
}
