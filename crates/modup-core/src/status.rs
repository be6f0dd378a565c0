//! Point-in-time status collection for deployed modules.
//!
//! This is a read-only view over the same data the updater acts on:
//! module presence, binary freshness and probed service state. Probe and
//! hashing failures degrade to `Unknown` here instead of aborting the
//! collection; the strict fail-fast rule binds the updater only.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::fs::fingerprint_file;
use crate::registry::ModuleRegistry;
use crate::service::{RuntimeState, ServiceControl};
use crate::update::InstallLayout;

/// Freshness of an installed binary relative to its staged candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryState {
    /// Installed and staged fingerprints match.
    UpToDate,
    /// Fingerprints differ; an update run would replace the binary.
    Stale,
    /// No binary at the module's install path.
    MissingInstalled,
    /// No staged candidate to compare against.
    MissingStaged,
    /// One of the fingerprints could not be computed.
    Unknown,
}

/// Probed service state, or `Unknown` when the probe failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Running,
    Stopped,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleStatus {
    pub name: String,
    pub installed: bool,
    /// `None` when the module is absent or hashing was not requested.
    pub binary: Option<BinaryState>,
    /// `None` when the module is absent.
    pub service: Option<ServiceState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub installed: usize,
    pub stale: usize,
    pub running: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformStatus {
    pub install_root: PathBuf,
    pub modules: Vec<ModuleStatus>,
    pub summary: StatusSummary,
}

/// Collect the current state of every registered module.
///
/// With `verify` set, installed and staged binaries are hashed to report
/// freshness; without it only presence and service state are collected.
pub fn collect_status(
    layout: &InstallLayout,
    registry: &ModuleRegistry,
    control: &dyn ServiceControl,
    verify: bool,
) -> PlatformStatus {
    let mut modules = Vec::new();
    let mut summary = StatusSummary {
        installed: 0,
        stale: 0,
        running: 0,
    };

    for module in registry.modules() {
        if !registry.is_present(&layout.install_root, &module.name) {
            modules.push(ModuleStatus {
                name: module.name.clone(),
                installed: false,
                binary: None,
                service: None,
            });
            continue;
        }
        summary.installed += 1;

        let installed_binary = layout.installed_binary(module);
        let binary = verify.then(|| {
            binary_state(&module.name, &installed_binary, &layout.staged_binary(module))
        });
        if binary == Some(BinaryState::Stale) {
            summary.stale += 1;
        }

        let service = match control.probe(&installed_binary) {
            Ok(RuntimeState::Running) => ServiceState::Running,
            Ok(RuntimeState::Stopped) => ServiceState::Stopped,
            Err(err) => {
                warn!(module = %module.name, error = %err, "status probe failed");
                ServiceState::Unknown
            }
        };
        if service == ServiceState::Running {
            summary.running += 1;
        }

        modules.push(ModuleStatus {
            name: module.name.clone(),
            installed: true,
            binary,
            service: Some(service),
        });
    }

    PlatformStatus {
        install_root: layout.install_root.clone(),
        modules,
        summary,
    }
}

fn binary_state(module: &str, installed: &Path, staged: &Path) -> BinaryState {
    if !installed.is_file() {
        return BinaryState::MissingInstalled;
    }
    if !staged.is_file() {
        return BinaryState::MissingStaged;
    }
    match (fingerprint_file(installed), fingerprint_file(staged)) {
        (Ok(a), Ok(b)) if a == b => BinaryState::UpToDate,
        (Ok(_), Ok(_)) => BinaryState::Stale,
        (Err(err), _) | (_, Err(err)) => {
            warn!(module, error = %err, "fingerprint failed");
            BinaryState::Unknown
        }
    }
}
