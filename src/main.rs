mod error;
mod migration;
mod storage;
mod utils;


use clap::{Parser, Subcommand};
use migration::{
    IdempotentSink, LogProgress, MigrationDriver, NodeWorkflow, Observers, RunSummary, Workflow,
    WorkspaceWorkflow,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Migriert Shock Records in BlobStore und Workspace S3 Records
///
/// Der Lauf ist idempotent und kann nach einem Abbruch komplett wiederholt werden.
#[derive(Parser)]
#[command(name = "shock-migrate", version, about)]
struct Cli {
    /// TOML Konfigurationsdatei (optional)
    #[arg(long, default_value = "migration.toml")]
    config: PathBuf,

    /// Überschreibt `progress_interval` aus der Konfiguration
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    progress_interval: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Shock Nodes aus dem S3 Bucket Listing nach BlobStore übertragen
    Nodes,
    /// Workspace Shock Mappings in S3 Objekt-Einträge übertragen
    Workspace,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = utils::Config::load(&cli.config)?;
    if let Some(interval) = cli.progress_interval {
        config.progress_interval = interval;
    }

    // Initialize logging
    let _guard = utils::init_logging(config.log_json, config.log_dir.as_deref());

    let metrics = Arc::new(utils::Metrics::new()?);
    let observer = Arc::new(
        Observers::default()
            .with(Arc::new(LogProgress))
            .with(metrics.clone()),
    );

    // Initialize storage layer
    let stores = storage::Stores::connect(&config).await?;

    let summary = match cli.command {
        Command::Nodes => {
            let workflow = NodeWorkflow::from_stores(&stores, config.s3_bucket.clone());
            let sink = IdempotentSink::new(stores.blob_nodes.clone());
            run(workflow, sink, observer, config.progress_interval).await
        }
        Command::Workspace => {
            let workflow = WorkspaceWorkflow::new(stores.workspace_shock.clone());
            let sink = IdempotentSink::new(stores.workspace_s3.clone());
            run(workflow, sink, observer, config.progress_interval).await
        }
    };

    if let Ok(summary) = &summary {
        metrics.record_summary(summary);
        if let Some(stats) = summary.resolver {
            tracing::info!(
                legacy_reads = stats.legacy_reads,
                cache_hits = stats.cache_hits,
                "User resolution"
            );
        }
    }
    if let Some(path) = &config.metrics_file {
        metrics.write_to(path)?;
    }

    summary?;
    Ok(())
}

async fn run<W: Workflow>(
    workflow: W,
    sink: IdempotentSink,
    observer: Arc<Observers>,
    interval: u64,
) -> anyhow::Result<RunSummary> {
    let mut driver = MigrationDriver::new(workflow, sink, observer, interval);
    Ok(driver.run().await?)
}
