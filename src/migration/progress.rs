use std::sync::Arc;

/// Fortschritt eines Laufs; `total` ist unbekannt beim Bucket Listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: u64,
    pub total: Option<u64>,
    pub finished: bool,
}

/// Empfänger für Fortschrittsmeldungen, ohne Einfluss auf den Lauf
pub trait ProgressObserver: Send + Sync {
    fn report(&self, workflow: &str, progress: Progress);
}

/// Fortschritt als strukturiertes Log-Event
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn report(&self, workflow: &str, progress: Progress) {
        match progress.total {
            Some(total) => tracing::info!(
                workflow,
                processed = progress.processed,
                total,
                finished = progress.finished,
                "Processed {}/{} records",
                progress.processed,
                total
            ),
            None => tracing::info!(
                workflow,
                processed = progress.processed,
                finished = progress.finished,
                "Processed {} records",
                progress.processed
            ),
        }
    }
}

/// Verteile Meldungen an mehrere Observer
#[derive(Default)]
pub struct Observers(Vec<Arc<dyn ProgressObserver>>);

impl Observers {
    pub fn with(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.0.push(observer);
        self
    }
}

impl ProgressObserver for Observers {
    fn report(&self, workflow: &str, progress: Progress) {
        for observer in &self.0 {
            observer.report(workflow, progress);
        }
    }
}

/// Zählt Records und meldet alle `interval` Records
pub struct ProgressTracker {
    interval: u64,
    processed: u64,
    total: Option<u64>,
}

impl ProgressTracker {
    pub fn new(interval: u64, total: Option<u64>) -> Self {
        Self {
            interval: interval.max(1),
            processed: 0,
            total,
        }
    }

    pub fn record(&mut self, workflow: &str, observer: &dyn ProgressObserver) {
        self.processed += 1;
        if self.processed % self.interval == 0 {
            observer.report(workflow, self.snapshot(false));
        }
    }

    pub fn finish(&self, workflow: &str, observer: &dyn ProgressObserver) {
        observer.report(workflow, self.snapshot(true));
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    fn snapshot(&self, finished: bool) -> Progress {
        Progress {
            processed: self.processed,
            total: self.total,
            finished,
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Sammelt alle Meldungen
    #[derive(Default)]
    pub struct Recorder(pub Mutex<Vec<Progress>>);

    impl ProgressObserver for Recorder {
        fn report(&self, _workflow: &str, progress: Progress) {
            self.0.lock().unwrap().push(progress);
        }
    }

    impl Recorder {
        pub fn reports(&self) -> Vec<Progress> {
            self.0.lock().unwrap().clone()
        }
    }

    #[test]
    fn test_reports_on_interval_and_finish() {
        let recorder = Recorder::default();
        let mut tracker = ProgressTracker::new(100, Some(250));
        for _ in 0..250 {
            tracker.record("nodes", &recorder);
        }
        tracker.finish("nodes", &recorder);

        let processed: Vec<(u64, bool)> =
            recorder.reports().iter().map(|p| (p.processed, p.finished)).collect();
        assert_eq!(processed, vec![(100, false), (200, false), (250, true)]);
        assert!(recorder.reports().iter().all(|p| p.total == Some(250)));
    }

    #[test]
    fn test_zero_interval_clamped() {
        let recorder = Recorder::default();
        let mut tracker = ProgressTracker::new(0, None);
        tracker.record("nodes", &recorder);
        assert_eq!(recorder.reports().len(), 1);
    }

    #[test]
    fn test_fanout() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let observers = Observers::default().with(a.clone()).with(b.clone());
        observers.report("nodes", Progress { processed: 1, total: None, finished: true });
        assert_eq!(a.reports().len(), 1);
        assert_eq!(b.reports().len(), 1);
    }
}
