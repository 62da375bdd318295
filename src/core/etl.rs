use crate::core::{Pipeline, SalesDigest};
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub digest: SalesDigest,
}

pub struct InsightEngine<P: Pipeline> {
    pipeline: P,
    monitor: ResourceMonitor,
}

impl<P: Pipeline> InsightEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting sales audit");
        self.monitor.sample("start");

        let ledger = self.pipeline.extract().await?;
        tracing::info!("Extracted {} ledger rows", ledger.len());
        self.monitor.sample("extract");

        let report = self.pipeline.transform(ledger).await?;
        let digest = report.analysis.digest.clone();
        tracing::info!(
            "Summarized {} distinct items",
            report.analysis.ranking.len()
        );
        self.monitor.sample("transform");

        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.sample("load");
        self.monitor.finish();

        Ok(RunSummary {
            output_path,
            digest,
        })
    }
}
