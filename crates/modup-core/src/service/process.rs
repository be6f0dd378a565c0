//! Directive execution against real module processes.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::{RuntimeState, ServiceControl, ServiceError};

/// Marker substring a module prints from `status` while its service is
/// active.
const RUNNING_MARKER: &str = "running";

/// Marker substring a module prints from `start`/`stop` when the
/// directive did not succeed.
const FAILURE_MARKER: &str = "fail";

/// [`ServiceControl`] backed by invoking the module binary itself.
///
/// Directive calls block until the child process exits; the module
/// contract is that it reports its own outcome synchronously. No retries
/// and no polling for actual process termination.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessControl;

impl ProcessControl {
    pub fn new() -> Self {
        Self
    }

    fn invoke(&self, binary: &Path, directive: &'static str) -> Result<String, ServiceError> {
        debug!(binary = %binary.display(), directive, "invoking module directive");
        let output = Command::new(binary)
            .arg(directive)
            .output()
            .map_err(|source| ServiceError::Invoke {
                binary: binary.to_path_buf(),
                directive,
                source,
            })?;
        if !output.status.success() {
            return Err(ServiceError::Exited {
                binary: binary.to_path_buf(),
                directive,
                status: output.status,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_directive(&self, binary: &Path, directive: &'static str) -> Result<(), ServiceError> {
        let output = self.invoke(binary, directive)?;
        if output.contains(FAILURE_MARKER) {
            return Err(ServiceError::Failed {
                binary: binary.to_path_buf(),
                directive,
                output: output.trim().to_string(),
            });
        }
        Ok(())
    }
}

impl ServiceControl for ProcessControl {
    fn probe(&self, binary: &Path) -> Result<RuntimeState, ServiceError> {
        let output = self.invoke(binary, "status")?;
        if output.contains(RUNNING_MARKER) {
            Ok(RuntimeState::Running)
        } else {
            Ok(RuntimeState::Stopped)
        }
    }

    fn start(&self, binary: &Path) -> Result<(), ServiceError> {
        self.run_directive(binary, "start")
    }

    fn stop(&self, binary: &Path) -> Result<(), ServiceError> {
        self.run_directive(binary, "stop")
    }
}
