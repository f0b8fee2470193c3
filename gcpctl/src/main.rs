//! `gcpctl` — drive the disk lifecycle operations by hand.
//!
//! The orchestration engine normally owns the instance state and invokes the
//! lifecycle operations itself. `gcpctl` stands in for it during development
//! and operations work: node instance state lives in a JSON file, and each
//! subcommand runs one lifecycle operation against it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use libgcp::RestCompute;
use libgcp::auth::{FileTokenProvider, StaticTokenProvider, TokenProvider};
use libgcp::config::GcpConfig;
use libgcp::context::{NodeContext, RelationshipContext};
use libgcp::lifecycle::{self, CreateDiskParams};

#[derive(Parser)]
#[command(name = "gcpctl", about = "Compute Engine disk lifecycle operations")]
struct Cli {
    /// Provider configuration file (YAML). Falls back to GCP_* environment
    /// variables when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a disk and record it in the instance state file.
    Create {
        /// Instance state file. Created when absent.
        #[arg(long)]
        state: PathBuf,
        /// Node instance id used to derive the disk name.
        #[arg(long, default_value = "gcpctl_disk")]
        instance_id: String,
        /// Disk name. Derived from the instance id when omitted.
        #[arg(long)]
        name: Option<String>,
        /// Source image to initialize the disk from.
        #[arg(long)]
        image: Option<String>,
        /// Disk size in gigabytes.
        #[arg(long)]
        size_gb: Option<u64>,
    },
    /// Delete the disk recorded in the instance state file.
    Delete {
        /// Instance state file.
        #[arg(long)]
        state: PathBuf,
    },
    /// Promote the disk recorded in one state file to the boot disk of the
    /// instance recorded in another.
    AddBootDisk {
        /// State file of the instance node (relationship source).
        #[arg(long)]
        source_state: PathBuf,
        /// State file of the disk node (relationship target).
        #[arg(long)]
        target_state: PathBuf,
    },
}

fn load_state(path: &Path, fallback_instance_id: Option<&str>) -> Result<NodeContext> {
    if path.exists() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read state file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse state file {}", path.display()))
    } else if let Some(instance_id) = fallback_instance_id {
        Ok(NodeContext::new(instance_id))
    } else {
        bail!("state file {} does not exist", path.display());
    }
}

fn save_state(path: &Path, ctx: &NodeContext) -> Result<()> {
    let raw = serde_json::to_string_pretty(ctx)?;
    std::fs::write(path, raw).with_context(|| format!("write state file {}", path.display()))?;
    Ok(())
}

/// An explicit `--config` wins; otherwise the node-declared configuration
/// (falling back to the environment) is used.
fn resolve_config(cli_config: Option<&Path>, ctx: &NodeContext) -> Result<GcpConfig> {
    match cli_config {
        Some(path) => Ok(GcpConfig::from_yaml_file(path)?),
        None => Ok(ctx.gcp_config()?),
    }
}

fn token_provider(config: &GcpConfig) -> Result<Arc<dyn TokenProvider>> {
    if let Some(auth) = &config.auth {
        return Ok(Arc::new(FileTokenProvider::new(auth)));
    }
    if let Ok(token) = std::env::var("GCP_ACCESS_TOKEN") {
        return Ok(Arc::new(StaticTokenProvider::new(token)));
    }
    bail!("no credentials: set `auth` in the config or GCP_ACCESS_TOKEN in the environment");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Create {
            state,
            instance_id,
            name,
            image,
            size_gb,
        } => {
            let mut ctx = load_state(&state, Some(&instance_id))?;
            let config = resolve_config(cli.config.as_deref(), &ctx)?;
            let compute = RestCompute::new(&config, token_provider(&config)?)?;

            lifecycle::create(
                &compute,
                &mut ctx,
                CreateDiskParams {
                    name,
                    image,
                    size_gb,
                },
            )
            .await?;
            save_state(&state, &ctx)?;
            info!(state = %state.display(), "disk created and recorded");
        }
        Command::Delete { state } => {
            let mut ctx = load_state(&state, None)?;
            let config = resolve_config(cli.config.as_deref(), &ctx)?;
            let compute = RestCompute::new(&config, token_provider(&config)?)?;

            lifecycle::delete(&compute, &mut ctx).await?;
            save_state(&state, &ctx)?;
            info!(state = %state.display(), "disk deleted and state cleared");
        }
        Command::AddBootDisk {
            source_state,
            target_state,
        } => {
            let mut rel = RelationshipContext {
                source: load_state(&source_state, None)?,
                target: load_state(&target_state, None)?,
            };
            lifecycle::add_boot_disk(&mut rel)?;
            save_state(&source_state, &rel.source)?;
            save_state(&target_state, &rel.target)?;
            info!("boot disk recorded on instance state");
        }
    }

    Ok(())
}
