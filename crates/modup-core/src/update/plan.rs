//! Per-run selection of modules eligible for update.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::registry::{ModuleDescriptor, ModuleRegistry, ResourceMapping};

/// Filesystem locations an update run operates on.
#[derive(Debug, Clone)]
pub struct InstallLayout {
    /// Root of the deployed installation, one subdirectory per module.
    pub install_root: PathBuf,
    /// Directory holding the staged candidate binaries and resources.
    pub staged_root: PathBuf,
}

impl InstallLayout {
    pub fn new(install_root: impl Into<PathBuf>, staged_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            staged_root: staged_root.into(),
        }
    }

    /// The module's install directory.
    pub fn module_dir(&self, module: &ModuleDescriptor) -> PathBuf {
        self.install_root.join(&module.name)
    }

    /// The currently deployed binary.
    pub fn installed_binary(&self, module: &ModuleDescriptor) -> PathBuf {
        self.module_dir(module).join(&module.binary)
    }

    /// The staged candidate binary.
    pub fn staged_binary(&self, module: &ModuleDescriptor) -> PathBuf {
        self.staged_root.join(&module.binary)
    }

    /// Absolute source directory for a resource mapping.
    pub fn resource_source(&self, mapping: &ResourceMapping) -> PathBuf {
        self.staged_root.join(&mapping.source)
    }

    /// Absolute destination directory for a resource mapping.
    pub fn resource_target(&self, module: &ModuleDescriptor, mapping: &ResourceMapping) -> PathBuf {
        self.module_dir(module).join(&mapping.target)
    }
}

/// Ordered subset of the registry actually present under the install
/// root, computed fresh each run.
#[derive(Debug, Clone)]
pub struct UpdatePlan {
    modules: Vec<ModuleDescriptor>,
}

impl UpdatePlan {
    /// Modules to evaluate, in registry order.
    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Select the modules to evaluate for this run.
///
/// Registry order is preserved; a module whose install subdirectory does
/// not exist under the root is skipped entirely and will never be
/// probed, stopped, started or copied.
pub fn build_plan(registry: &ModuleRegistry, install_root: &Path) -> UpdatePlan {
    let mut modules = Vec::new();
    for module in registry.modules() {
        if registry.is_present(install_root, &module.name) {
            modules.push(module.clone());
        } else {
            debug!(module = %module.name, "not installed, skipping");
        }
    }
    UpdatePlan { modules }
}
