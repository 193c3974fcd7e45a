use crate::core::Pipeline;
use crate::domain::model::DrawOutcome;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: DrawOutcome,
    pub warnings: usize,
    /// `None` on a dry run.
    pub output_path: Option<String>,
}

pub struct DrawRunner<P: Pipeline> {
    pipeline: P,
    dry_run: bool,
}

impl<P: Pipeline> DrawRunner<P> {
    pub fn with_dry_run(pipeline: P, dry_run: bool) -> Self {
        Self { pipeline, dry_run }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting draw...");

        // Extract
        tracing::info!("📥 Loading bull and female lists...");
        let store = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} bulls and {} females",
            store.bull_count(),
            store.female_count()
        );

        // Draw
        let result = self.pipeline.transform(store).await?;
        let outcome = result.outcome.clone();
        let warnings = result.warnings.len();

        if self.dry_run {
            tracing::info!("🔍 Dry run: skipping result files");
            return Ok(RunSummary {
                outcome,
                warnings,
                output_path: None,
            });
        }

        // Load
        tracing::info!("📤 Writing result files...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunSummary {
            outcome,
            warnings,
            output_path: Some(output_path),
        })
    }
}
