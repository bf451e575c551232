use crate::error::MigrationError;
use crate::migration::progress::{ProgressObserver, ProgressTracker};
use crate::migration::resolver::ResolverStats;
use crate::migration::sink::IdempotentSink;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::TryStreamExt;
use std::sync::Arc;

/// Eine Record-Familie: Quelle, Übersetzung und Ziel
#[async_trait]
pub trait Workflow: Send {
    type Source: Send;

    fn name(&self) -> &'static str;

    /// Gesamtanzahl, falls ohne vollständiges Listing bekannt
    async fn total(&self) -> Result<Option<u64>, MigrationError>;

    fn sources(&self) -> BoxStream<'static, Result<Self::Source, MigrationError>>;

    async fn migrate_one(
        &mut self,
        source: Self::Source,
        sink: &mut IdempotentSink,
    ) -> Result<(), MigrationError>;

    fn resolver_stats(&self) -> Option<ResolverStats> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Completed,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub workflow: &'static str,
    pub processed: u64,
    pub written: u64,
    pub resolver: Option<ResolverStats>,
}

/// Führt einen Workflow über die komplette Quelle aus
///
/// Jeder Fehler bricht den Lauf ab. Recovery ist ein kompletter Neustart.
pub struct MigrationDriver<W: Workflow> {
    workflow: W,
    sink: IdempotentSink,
    observer: Arc<dyn ProgressObserver>,
    interval: u64,
    state: DriverState,
}

impl<W: Workflow> MigrationDriver<W> {
    pub fn new(
        workflow: W,
        sink: IdempotentSink,
        observer: Arc<dyn ProgressObserver>,
        interval: u64,
    ) -> Self {
        Self {
            workflow,
            sink,
            observer,
            interval,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub async fn run(&mut self) -> Result<RunSummary, MigrationError> {
        if self.state != DriverState::Idle {
            return Err(MigrationError::NotIdle(self.state));
        }
        self.state = DriverState::Running;
        tracing::info!(workflow = self.workflow.name(), "Starting migration");

        match self.drive().await {
            Ok(summary) => {
                self.state = DriverState::Completed;
                tracing::info!(
                    workflow = summary.workflow,
                    processed = summary.processed,
                    written = summary.written,
                    "Migration completed"
                );
                Ok(summary)
            }
            Err(e) => {
                self.state = DriverState::Aborted;
                tracing::error!(
                    workflow = self.workflow.name(),
                    written = self.sink.written(),
                    error = %e,
                    "Migration aborted"
                );
                Err(e)
            }
        }
    }

    async fn drive(&mut self) -> Result<RunSummary, MigrationError> {
        let name = self.workflow.name();
        let total = self.workflow.total().await?;
        let mut tracker = ProgressTracker::new(self.interval, total);
        let mut sources = self.workflow.sources();

        while let Some(source) = sources.try_next().await? {
            self.workflow.migrate_one(source, &mut self.sink).await?;
            tracker.record(name, self.observer.as_ref());
        }
        tracker.finish(name, self.observer.as_ref());

        Ok(RunSummary {
            workflow: name,
            processed: tracker.processed(),
            written: self.sink.written(),
            resolver: self.workflow.resolver_stats(),
        })
    }
}
