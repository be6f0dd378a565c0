//! The stop → replace → sync → restart update sequence.

use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::fs::{fingerprint_file, replace_file, sync_tree};
use crate::registry::ModuleDescriptor;
use crate::service::{RuntimeState, ServiceControl};
use crate::update::plan::{InstallLayout, UpdatePlan};

/// Pause between a stop directive and the binary overwrite, giving the
/// stopped process time to release its executable. The stop directive
/// reports before the process has necessarily exited.
const SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Result of evaluating one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleOutcome {
    /// Installed and staged binaries share a fingerprint; nothing done.
    UpToDate,
    /// Binary (and resources) replaced.
    Updated { restarted: bool },
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
    pub name: String,
    pub outcome: ModuleOutcome,
}

/// Summary over the whole plan.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub modules: Vec<ModuleReport>,
    /// Count of modules whose binary was actually replaced.
    pub updated: usize,
}

/// Drives the per-module update sequence over an [`UpdatePlan`].
///
/// Modules are processed one at a time, in plan order. The first fatal
/// error halts the batch: remaining modules are abandoned, and modules
/// already updated keep their new files (there is no rollback).
pub struct UpdateOrchestrator<'a> {
    layout: InstallLayout,
    control: &'a dyn ServiceControl,
    settle_delay: Duration,
}

impl<'a> UpdateOrchestrator<'a> {
    pub fn new(layout: InstallLayout, control: &'a dyn ServiceControl) -> Self {
        Self {
            layout,
            control,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Override the pause inserted between stop and overwrite.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Process every module in the plan.
    pub fn run(&self, plan: &UpdatePlan) -> anyhow::Result<UpdateReport> {
        let mut modules = Vec::with_capacity(plan.len());
        let mut updated = 0;
        for module in plan.modules() {
            let outcome = self
                .update_module(module)
                .with_context(|| format!("Failed to update module '{}'", module.name))?;
            if matches!(outcome, ModuleOutcome::Updated { .. }) {
                updated += 1;
            }
            modules.push(ModuleReport {
                name: module.name.clone(),
                outcome,
            });
        }
        Ok(UpdateReport { modules, updated })
    }

    fn update_module(&self, module: &ModuleDescriptor) -> anyhow::Result<ModuleOutcome> {
        let installed = self.layout.installed_binary(module);
        let staged = self.layout.staged_binary(module);

        let installed_digest = fingerprint_file(&installed).with_context(|| {
            format!(
                "Failed to fingerprint installed binary '{}'",
                installed.display()
            )
        })?;
        let staged_digest = fingerprint_file(&staged).with_context(|| {
            format!("Failed to fingerprint staged binary '{}'", staged.display())
        })?;
        if installed_digest == staged_digest {
            info!(module = %module.name, "already up to date");
            return Ok(ModuleOutcome::UpToDate);
        }

        let state = self
            .control
            .probe(&installed)
            .with_context(|| format!("Failed to probe status of module '{}'", module.name))?;
        let was_running = state == RuntimeState::Running;

        if was_running {
            self.control
                .stop(&installed)
                .with_context(|| format!("Failed to stop module '{}'", module.name))?;
            info!(module = %module.name, "service stopped");
            std::thread::sleep(self.settle_delay);
        }

        replace_file(&staged, &installed)
            .with_context(|| format!("Failed to overwrite binary '{}'", installed.display()))?;
        info!(binary = %installed.display(), "binary overwritten");

        for mapping in &module.resources {
            let source = self.layout.resource_source(mapping);
            let target = self.layout.resource_target(module, mapping);
            let copied = sync_tree(&source, &target)
                .with_context(|| format!("Failed to sync resources to '{}'", target.display()))?;
            info!(files = copied, target = %target.display(), "resources synchronized");
        }

        if was_running {
            self.control
                .start(&installed)
                .with_context(|| format!("Failed to restart module '{}'", module.name))?;
            info!(module = %module.name, "service restarted");
        }

        Ok(ModuleOutcome::Updated {
            restarted: was_running,
        })
    }
}
