//! Modup - Platform Module Update Utility
//!
//! Usage:
//!   modup                # Update staged modules (prompts for the root)
//!   modup update ...     # Same, with explicit paths
//!   modup status         # Show per-module deployment state

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use modup_core::registry::ModuleRegistry;
use modup_core::service::ProcessControl;
use modup_core::status::{BinaryState, PlatformStatus, ServiceState, collect_status};
use modup_core::update::{InstallLayout, ModuleOutcome, UpdateOrchestrator, build_plan};

/// Install location the surrounding installer provisions by default.
const DEFAULT_PROJECT_ROOT: &str = "/opt/platform";

/// Directory holding the staged payload, relative to the installer's
/// working directory.
const DEFAULT_STAGED_ROOT: &str = "bin";

#[derive(Parser)]
#[command(name = "modup")]
#[command(about = "Platform module update utility", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace installed module binaries that differ from the staged payload
    Update {
        /// Installed project root (prompted when omitted)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Directory holding the staged candidate binaries
        #[arg(long, default_value = DEFAULT_STAGED_ROOT)]
        staged: PathBuf,

        /// Accept the default project root without prompting
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show per-module deployment and service state
    Status {
        /// Installed project root (prompted when omitted)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Directory holding the staged candidate binaries
        #[arg(long, default_value = DEFAULT_STAGED_ROOT)]
        staged: PathBuf,

        /// Verify binary freshness (slower, hashes files)
        #[arg(long)]
        verify: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Accept the default project root without prompting
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modup=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let command = Cli::parse().command.unwrap_or(Commands::Update {
        root: None,
        staged: PathBuf::from(DEFAULT_STAGED_ROOT),
        yes: false,
    });

    match command {
        Commands::Update { root, staged, yes } => run_update(root, staged, yes),
        Commands::Status {
            root,
            staged,
            verify,
            format,
            yes,
        } => run_status(root, staged, verify, format, yes),
    }
}

/// Resolve the project root: explicit flag, or a single prompt
/// pre-filled with the installer's default location.
fn resolve_root(root: Option<PathBuf>, yes: bool) -> Result<PathBuf> {
    if let Some(root) = root {
        return Ok(root);
    }
    if yes {
        return Ok(PathBuf::from(DEFAULT_PROJECT_ROOT));
    }
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Project installed path")
        .default(DEFAULT_PROJECT_ROOT.to_string())
        .interact_text()?;
    Ok(PathBuf::from(input))
}

fn run_update(root: Option<PathBuf>, staged: PathBuf, yes: bool) -> Result<()> {
    let root = resolve_root(root, yes)?;
    if !root.is_dir() {
        anyhow::bail!("project path '{}' does not exist", root.display());
    }

    let registry = ModuleRegistry::platform_default();
    let plan = build_plan(&registry, &root);
    if plan.is_empty() {
        println!("No module available under {}", root.display());
        return Ok(());
    }

    let layout = InstallLayout::new(root, staged);
    let control = ProcessControl::new();
    let orchestrator = UpdateOrchestrator::new(layout, &control);
    let report = orchestrator.run(&plan)?;

    for module in &report.modules {
        match module.outcome {
            ModuleOutcome::UpToDate => {
                println!("• module {} already updated", module.name);
            }
            ModuleOutcome::Updated { restarted: true } => {
                println!("✓ module {} updated and restarted", module.name);
            }
            ModuleOutcome::Updated { restarted: false } => {
                println!("✓ module {} updated", module.name);
            }
        }
    }
    println!("{}", style(format!("{} module(s) updated", report.updated)).bold());

    Ok(())
}

fn run_status(
    root: Option<PathBuf>,
    staged: PathBuf,
    verify: bool,
    format: OutputFormat,
    yes: bool,
) -> Result<()> {
    let root = resolve_root(root, yes)?;
    let registry = ModuleRegistry::platform_default();
    let layout = InstallLayout::new(root, staged);
    let control = ProcessControl::new();

    let status = collect_status(&layout, &registry, &control, verify);

    match format {
        OutputFormat::Table => print_status_table(&status),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
    }

    Ok(())
}

fn print_status_table(status: &PlatformStatus) {
    println!("Project: {}", status.install_root.display());
    println!();
    println!("  {:<12} {:<12} {:<14} Service", "Module", "Installed", "Binary");
    println!("  {}", "-".repeat(52));

    for module in &status.modules {
        let installed = if module.installed { "yes" } else { "-" };
        let binary = module.binary.map(binary_label).unwrap_or("-");
        let service = module.service.map(service_label).unwrap_or("-");
        println!(
            "  {:<12} {:<12} {:<14} {}",
            module.name, installed, binary, service
        );
    }

    println!();
    println!(
        "Summary: {} installed, {} stale, {} running",
        status.summary.installed, status.summary.stale, status.summary.running
    );
}

fn binary_label(state: BinaryState) -> &'static str {
    match state {
        BinaryState::UpToDate => "up to date",
        BinaryState::Stale => "stale",
        BinaryState::MissingInstalled => "missing",
        BinaryState::MissingStaged => "no candidate",
        BinaryState::Unknown => "unknown",
    }
}

fn service_label(state: ServiceState) -> &'static str {
    match state {
        ServiceState::Running => "running",
        ServiceState::Stopped => "stopped",
        ServiceState::Unknown => "unknown",
    }
}
