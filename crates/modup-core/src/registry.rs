//! Static description of the platform's deployable modules.
//!
//! The registry is an explicit value constructed once at startup and
//! passed into the orchestration layer; iteration order is update order.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Association between a staged asset directory and its install location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMapping {
    /// Source directory, relative to the staged payload root.
    pub source: PathBuf,
    /// Destination directory, relative to the module's install directory.
    pub target: PathBuf,
}

/// One independently deployable service unit of the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Module name; also the name of its install subdirectory.
    pub name: String,
    /// Binary file name, relative to the staged payload root and to the
    /// module's install directory.
    pub binary: String,
    /// Non-binary assets that travel with the module.
    pub resources: Vec<ResourceMapping>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>, binary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binary: binary.into(),
            resources: Vec::new(),
        }
    }

    pub fn with_resource(mut self, source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.resources.push(ResourceMapping {
            source: source.into(),
            target: target.into(),
        });
        self
    }
}

/// Ordered registry of every module known to the platform.
///
/// A module that exposes services consumed by others sorts before its
/// consumers; the orchestrator processes modules in exactly this order.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    modules: Vec<ModuleDescriptor>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl ModuleRegistry {
    /// Create a registry from an explicit, already-ordered module list.
    pub fn new(modules: Vec<ModuleDescriptor>) -> Self {
        Self { modules }
    }

    /// The platform's fixed module set: `core` and `cell` provide the
    /// services the `frontend` consumes; the frontend additionally
    /// carries its static web asset tree.
    pub fn platform_default() -> Self {
        Self::new(vec![
            ModuleDescriptor::new("core", "core"),
            ModuleDescriptor::new("cell", "cell"),
            ModuleDescriptor::new("frontend", "frontend")
                .with_resource(PathBuf::from("frontend_files").join("web_root"), "web_root"),
        ])
    }

    /// All registered modules, in update order.
    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    /// Look up a module by name.
    pub fn describe(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Whether the module's install subdirectory exists under the root.
    /// Contents are not inspected.
    pub fn is_present(&self, install_root: &Path, name: &str) -> bool {
        install_root.join(name).is_dir()
    }
}
