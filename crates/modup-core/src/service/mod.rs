//! Process lifecycle control for managed module services.
//!
//! Each module binary self-reports through three invocations (`status`,
//! `start`, `stop`). The [`ServiceControl`] capability abstracts that
//! contract so orchestration logic never touches process plumbing, and
//! alternative status-reporting mechanisms can be substituted.

pub mod process;

pub use process::ProcessControl;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Observed run state of a module's service process.
///
/// Always obtained fresh via a probe; never cached across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeState {
    Running,
    Stopped,
}

/// Failure of a status, start or stop directive.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The directive could not be invoked at all.
    #[error("failed to invoke '{} {directive}': {source}", binary.display())]
    Invoke {
        binary: PathBuf,
        directive: &'static str,
        #[source]
        source: io::Error,
    },

    /// The directive ran but exited unsuccessfully.
    #[error("'{} {directive}' exited with {status}", binary.display())]
    Exited {
        binary: PathBuf,
        directive: &'static str,
        status: ExitStatus,
    },

    /// The directive completed but reported failure in its output.
    #[error("'{} {directive}' reported failure: {output}", binary.display())]
    Failed {
        binary: PathBuf,
        directive: &'static str,
        output: String,
    },
}

/// Capability to query and drive a module's service process.
///
/// A probe that cannot be executed or interpreted must surface as an
/// error, never as `Stopped`: guessing "stopped" risks double-starting a
/// process that is in fact running.
pub trait ServiceControl {
    /// Query whether the module's service is currently active.
    fn probe(&self, binary: &Path) -> Result<RuntimeState, ServiceError>;

    /// Issue the start directive and block until it reports its outcome.
    fn start(&self, binary: &Path) -> Result<(), ServiceError>;

    /// Issue the stop directive and block until it reports its outcome.
    fn stop(&self, binary: &Path) -> Result<(), ServiceError>;
}
