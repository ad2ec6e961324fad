//! Checker configuration.

use std::sync::Arc;

use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::faulter::{Faulter, PlainFaulter, TracingFaulter};
use crate::trace::DEFAULT_MAX_FRAMES;

/// Which kind of fault a Checker raises.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FaultMode {
    /// Faults carry only their cause.
    #[default]
    Plain,
    /// Faults record the call stack outside the boundary.
    Traced,
}

/// Configuration options for building a [`crate::Checker`].
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Fault strategy.
    pub mode: FaultMode,
    /// Function path prefix treated as boundary plumbing when tracing.
    /// `None` means the Checker type's own path.
    pub boundary_prefix: Option<String>,
    /// Maximum number of call sites recorded per trace.
    pub max_frames: usize,
    /// Keep the panic hook quiet for raised faults.
    pub quiet_panics: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            mode: FaultMode::default(),
            boundary_prefix: None,
            max_frames: DEFAULT_MAX_FRAMES,
            quiet_panics: true,
        }
    }
}

impl CheckerConfig {
    /// Default options with call-stack tracing turned on.
    pub fn traced() -> Self {
        Self {
            mode: FaultMode::Traced,
            ..Self::default()
        }
    }

    pub(crate) fn faulter(&self) -> Arc<dyn Faulter> {
        match self.mode {
            FaultMode::Plain => Arc::new(PlainFaulter),
            FaultMode::Traced => {
                let faulter = match &self.boundary_prefix {
                    Some(prefix) => TracingFaulter::with_boundary(prefix.clone()),
                    None => TracingFaulter::new(),
                };
                Arc::new(faulter.max_frames(self.max_frames))
            }
        }
    }
}
