//! Shared fixtures for orchestration tests: a scripted service control
//! that records every invocation, and tempdir-backed install layouts.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use modup_core::registry::ModuleRegistry;
use modup_core::service::{RuntimeState, ServiceControl, ServiceError};
use modup_core::update::InstallLayout;

/// A recorded control-plane invocation, identified by module binary name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Probe(String),
    Stop(String),
    Start(String),
}

/// Scripted [`ServiceControl`] recording every invocation in order.
///
/// Behavior is keyed by the binary's file name. Optionally snapshots the
/// content of a watched file at each invocation, so tests can assert
/// what the filesystem looked like when a call happened.
#[derive(Debug, Default)]
pub struct FakeControl {
    calls: RefCell<Vec<(Call, Option<String>)>>,
    running: HashSet<String>,
    probe_errors: HashSet<String>,
    stop_failures: HashSet<String>,
    start_failures: HashSet<String>,
    watch: Option<PathBuf>,
}

impl FakeControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the module's probe to report `Running`.
    pub fn running(mut self, name: &str) -> Self {
        self.running.insert(name.to_string());
        self
    }

    /// Script the module's probe to fail.
    pub fn probe_error(mut self, name: &str) -> Self {
        self.probe_errors.insert(name.to_string());
        self
    }

    /// Script the module's stop directive to report failure.
    pub fn fail_stop(mut self, name: &str) -> Self {
        self.stop_failures.insert(name.to_string());
        self
    }

    /// Script the module's start directive to report failure.
    pub fn fail_start(mut self, name: &str) -> Self {
        self.start_failures.insert(name.to_string());
        self
    }

    /// Snapshot this file's content alongside every recorded call.
    pub fn watch(mut self, path: impl Into<PathBuf>) -> Self {
        self.watch = Some(path.into());
        self
    }

    /// All recorded calls, in invocation order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().iter().map(|(c, _)| c.clone()).collect()
    }

    /// Recorded calls paired with the watched file's content at the time
    /// of the call.
    pub fn calls_with_snapshots(&self) -> Vec<(Call, Option<String>)> {
        self.calls.borrow().clone()
    }

    /// Calls that touched the named module.
    pub fn calls_for(&self, name: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(c, Call::Probe(n) | Call::Stop(n) | Call::Start(n) if n == name)
            })
            .collect()
    }

    fn record(&self, call: Call) {
        let snapshot = self
            .watch
            .as_deref()
            .and_then(|p| fs::read_to_string(p).ok());
        self.calls.borrow_mut().push((call, snapshot));
    }

    fn name_of(binary: &Path) -> String {
        binary
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl ServiceControl for FakeControl {
    fn probe(&self, binary: &Path) -> Result<RuntimeState, ServiceError> {
        let name = Self::name_of(binary);
        self.record(Call::Probe(name.clone()));
        if self.probe_errors.contains(&name) {
            return Err(ServiceError::Invoke {
                binary: binary.to_path_buf(),
                directive: "status",
                source: io::Error::other("scripted probe failure"),
            });
        }
        Ok(if self.running.contains(&name) {
            RuntimeState::Running
        } else {
            RuntimeState::Stopped
        })
    }

    fn stop(&self, binary: &Path) -> Result<(), ServiceError> {
        let name = Self::name_of(binary);
        self.record(Call::Stop(name.clone()));
        if self.stop_failures.contains(&name) {
            return Err(ServiceError::Failed {
                binary: binary.to_path_buf(),
                directive: "stop",
                output: format!("stop {name} fail"),
            });
        }
        Ok(())
    }

    fn start(&self, binary: &Path) -> Result<(), ServiceError> {
        let name = Self::name_of(binary);
        self.record(Call::Start(name.clone()));
        if self.start_failures.contains(&name) {
            return Err(ServiceError::Failed {
                binary: binary.to_path_buf(),
                directive: "start",
                output: format!("start {name} fail"),
            });
        }
        Ok(())
    }
}

/// Tempdir-backed install root and staged payload directory.
pub struct Fixture {
    pub temp: TempDir,
    pub install_root: PathBuf,
    pub staged_root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("tempdir should succeed");
        let install_root = temp.path().join("install");
        let staged_root = temp.path().join("bin");
        fs::create_dir_all(&install_root).expect("create_dir_all should succeed");
        fs::create_dir_all(&staged_root).expect("create_dir_all should succeed");
        Self {
            temp,
            install_root,
            staged_root,
        }
    }

    pub fn layout(&self) -> InstallLayout {
        InstallLayout::new(&self.install_root, &self.staged_root)
    }

    pub fn registry(&self) -> ModuleRegistry {
        ModuleRegistry::platform_default()
    }

    /// Place a staged candidate binary.
    pub fn stage_binary(&self, name: &str, content: &str) {
        write_file(&self.staged_root.join(name), content);
    }

    /// Create a module install directory with a deployed binary.
    pub fn install_module(&self, name: &str, content: &str) {
        write_file(&self.install_root.join(name).join(name), content);
    }

    /// Place a file in the staged resource tree.
    pub fn stage_resource(&self, relative: &str, content: &str) {
        write_file(&self.staged_root.join(relative), content);
    }

    /// Place a file under a module's install directory.
    pub fn install_file(&self, module: &str, relative: &str, content: &str) {
        write_file(&self.install_root.join(module).join(relative), content);
    }

    pub fn installed_binary(&self, name: &str) -> PathBuf {
        self.install_root.join(name).join(name)
    }

    pub fn read_installed_binary(&self, name: &str) -> String {
        fs::read_to_string(self.installed_binary(name)).expect("read should succeed")
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create_dir_all should succeed in test temp dirs");
    }
    fs::write(path, content).expect("write should succeed in test temp dirs");
}
