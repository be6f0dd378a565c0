//! Update orchestration for deployed platform modules.

pub mod orchestrator;
pub mod plan;

pub use orchestrator::{ModuleOutcome, ModuleReport, UpdateOrchestrator, UpdateReport};
pub use plan::{InstallLayout, UpdatePlan, build_plan};
