//! Modup Core Library
//!
//! Provides the domain logic for detecting and applying in-place updates
//! to the platform's deployed service modules (binary replacement,
//! resource synchronization, and service lifecycle control).

pub mod fs;
pub mod registry;
pub mod service;
pub mod status;
pub mod update;

/// Re-exports of commonly used types
pub mod prelude {
    // Filesystem
    pub use crate::fs::{Fingerprint, fingerprint_file, replace_file, sync_tree};

    // Registry
    pub use crate::registry::{ModuleDescriptor, ModuleRegistry, ResourceMapping};

    // Service control
    pub use crate::service::{ProcessControl, RuntimeState, ServiceControl, ServiceError};

    // Status
    pub use crate::status::{BinaryState, ModuleStatus, PlatformStatus, ServiceState, collect_status};

    // Update orchestration
    pub use crate::update::{
        InstallLayout, ModuleOutcome, ModuleReport, UpdateOrchestrator, UpdatePlan, UpdateReport,
        build_plan,
    };
}
