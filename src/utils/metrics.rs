use crate::migration::{Progress, ProgressObserver, RunSummary};
use anyhow::{Context, Result};
use prometheus::{Encoder, IntCounter, IntGaugeVec, Registry, TextEncoder};
use std::path::Path;

/// Prometheus Metrics für Migrationsläufe
pub struct Metrics {
    pub registry: Registry,
    pub records_processed: IntGaugeVec,
    pub records_written: IntCounter,
    pub legacy_user_reads: IntCounter,
    pub user_cache_hits: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let records_processed = IntGaugeVec::new(
            prometheus::Opts::new(
                "migration_records_processed",
                "Records processed in the current run",
            ),
            &["workflow"],
        )?;

        let records_written =
            IntCounter::new("migration_records_written_total", "Target documents written")?;

        let legacy_user_reads = IntCounter::new(
            "migration_legacy_user_reads_total",
            "Users read from the legacy store",
        )?;

        let user_cache_hits = IntCounter::new(
            "migration_user_cache_hits_total",
            "User lookups served from the run cache",
        )?;

        registry.register(Box::new(records_processed.clone()))?;
        registry.register(Box::new(records_written.clone()))?;
        registry.register(Box::new(legacy_user_reads.clone()))?;
        registry.register(Box::new(user_cache_hits.clone()))?;

        Ok(Self {
            registry,
            records_processed,
            records_written,
            legacy_user_reads,
            user_cache_hits,
        })
    }

    /// Übernehme die Zähler eines abgeschlossenen Laufs
    pub fn record_summary(&self, summary: &RunSummary) {
        self.records_written.inc_by(summary.written);
        if let Some(stats) = summary.resolver {
            self.legacy_user_reads.inc_by(stats.legacy_reads);
            self.user_cache_hits.inc_by(stats.cache_hits);
        }
    }

    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Schreibe alle Metrics im Text-Format
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render()?)
            .with_context(|| format!("Failed to write metrics to {}", path.display()))
    }
}

impl ProgressObserver for Metrics {
    fn report(&self, workflow: &str, progress: Progress) {
        self.records_processed
            .with_label_values(&[workflow])
            .set(i64::try_from(progress.processed).unwrap_or(i64::MAX));
    }
}
