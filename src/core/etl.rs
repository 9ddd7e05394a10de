use crate::core::{BatchSummary, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load. Nothing is written unless the
    /// whole input parsed and classified.
    pub async fn run(&self) -> Result<BatchSummary> {
        tracing::info!("🚀 Starting validation run");

        // Extract
        let table = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", table.records.len());
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(table).await?;
        tracing::info!(
            "Classified {} records ({} valid, {} invalid, {} warnings)",
            result.total_records,
            result.valid.len(),
            result.invalid.len(),
            result.warnings.len()
        );
        self.monitor.log_stats("Transform");

        // Load
        let summary = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(summary)
    }
}
