use crate::config::MATCH_LOG_FILE;
use crate::core::draw::DrawEngine;
use crate::core::loader::{parse_bulls, parse_females};
use crate::core::rank::RankIndex;
use crate::core::report::ReportAggregator;
use crate::core::store::RecordStore;
use crate::core::{ConfigProvider, DrawResult, Pipeline, Storage};
use crate::domain::model::MatchLog;
use crate::utils::error::Result;
use std::path::Path;

/// Reads both lists, runs the draw and writes the donator and junior results.
pub struct DrawPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DrawPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .to_string()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DrawPipeline<S, C> {
    async fn extract(&self) -> Result<RecordStore> {
        let bull_file = self.config.bull_file();
        let female_file = self.config.female_file();

        tracing::debug!("Reading bull list from {}", bull_file);
        let bull_data = self.storage.read_file(bull_file).await?;
        let bulls = parse_bulls(bull_data.as_slice(), bull_file)?;

        tracing::debug!("Reading female list from {}", female_file);
        let female_data = self.storage.read_file(female_file).await?;
        let females = parse_females(female_data.as_slice(), female_file)?;

        let (store, warnings) = RecordStore::from_records(bulls, females)?;
        if !warnings.is_empty() {
            tracing::warn!(
                "{} preferences name bulls that are not on the bull list",
                warnings.len()
            );
        }
        Ok(store)
    }

    async fn transform(&self, mut store: RecordStore) -> Result<DrawResult> {
        let index = RankIndex::build(&store);
        let engine = DrawEngine::new(self.config.seed());
        let outcome = engine.run(&mut store, &index)?;

        let donator_csv = ReportAggregator::by_provider(&store).to_csv()?;
        let junior_csv = ReportAggregator::by_member(&store).to_csv()?;

        Ok(DrawResult {
            outcome,
            donator_csv,
            junior_csv,
            warnings: store.warnings().to_vec(),
        })
    }

    /// Outputs are staged under `.tmp` names and renamed into place only after every write
    /// has succeeded.
    async fn load(&self, result: DrawResult) -> Result<String> {
        let mut outputs = vec![
            (self.output_file(self.config.donator_file()), result.donator_csv.into_bytes()),
            (self.output_file(self.config.junior_file()), result.junior_csv.into_bytes()),
        ];
        if self.config.write_match_log() {
            let json_data = serde_json::to_string_pretty(&MatchLog::from(&result.outcome))?;
            outputs.push((self.output_file(MATCH_LOG_FILE), json_data.into_bytes()));
        }

        for (path, data) in &outputs {
            tracing::debug!("Writing {} ({} bytes)", path, data.len());
            self.storage.write_file(&staging_path(path), data).await?;
        }

        for (path, _) in &outputs {
            self.storage.rename_file(&staging_path(path), path).await?;
            tracing::debug!("Saved {}", path);
        }

        Ok(self.config.output_path().to_string())
    }
}

fn staging_path(path: &str) -> String {
    format!("{}.tmp", path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrawSettings;
    use crate::utils::error::DrawError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        fail_writes_to: Option<String>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
                fail_writes_to: None,
            }
        }

        fn failing_writes_to(path: &str) -> Self {
            Self {
                fail_writes_to: Some(path.to_string()),
                ..Self::new()
            }
        }

        async fn put(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|data| String::from_utf8_lossy(data).to_string())
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                DrawError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.fail_writes_to.as_deref() == Some(path) {
                return Err(DrawError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("cannot write {}", path),
                )));
            }
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn rename_file(&self, from: &str, to: &str) -> Result<()> {
            let mut files = self.files.lock().await;
            let data = files.remove(from).ok_or_else(|| {
                DrawError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", from),
                ))
            })?;
            files.insert(to.to_string(), data);
            Ok(())
        }
    }

    const BULLS: &str = "Bull Name,Donator Name,Donator Email,Straws\n\
                         R1,Acme,acme@x,2\n\
                         R2,Other,other@x,unlimited\n";
    const FEMALES: &str = "Female Name,Member Name,Member Email,Rank,Bull1,Bull2\n\
                           X,Ann,ann@x,1,R1,R2\n\
                           Y,Bob,bob@x,1,R1,R2\n\
                           Z,Ann,ann@x,2,Ghost\n";

    fn settings() -> DrawSettings {
        let mut settings = DrawSettings::new("bulls.csv", "females.csv");
        settings.output_path = "out".to_string();
        settings.seed = Some(3);
        settings
    }

    #[tokio::test]
    async fn test_extract_builds_store_with_warnings() {
        let storage = MockStorage::new();
        storage.put("bulls.csv", BULLS).await;
        storage.put("females.csv", FEMALES).await;
        let pipeline = DrawPipeline::new(storage, settings());

        let store = pipeline.extract().await.unwrap();

        assert_eq!(store.bull_count(), 2);
        assert_eq!(store.female_count(), 3);
        assert_eq!(store.warnings().len(), 1);
        assert_eq!(store.warnings()[0].bull_name, "Ghost");
    }

    #[tokio::test]
    async fn test_missing_input_fails_before_any_output() {
        let storage = MockStorage::new();
        storage.put("bulls.csv", BULLS).await;
        let pipeline = DrawPipeline::new(storage.clone(), settings());

        assert!(pipeline.extract().await.is_err());
        assert!(storage.get_file("out/donator_output.csv").await.is_none());
    }

    #[tokio::test]
    async fn test_full_pipeline_writes_both_reports() {
        let storage = MockStorage::new();
        storage.put("bulls.csv", BULLS).await;
        storage.put("females.csv", FEMALES).await;
        let pipeline = DrawPipeline::new(storage.clone(), settings());

        let store = pipeline.extract().await.unwrap();
        let result = pipeline.transform(store).await.unwrap();
        assert_eq!(result.outcome.matched, 2);
        assert_eq!(result.outcome.unmatched, 1);

        let output_path = pipeline.load(result).await.unwrap();
        assert_eq!(output_path, "out");

        let junior = storage.get_file("out/junior_output.csv").await.unwrap();
        assert!(junior.contains("Result for,Ann,at,ann@x"));
        assert!(junior.contains("Z,None,,"));

        let donator = storage.get_file("out/donator_output.csv").await.unwrap();
        assert!(donator.contains("Result for,Acme,at acme@x"));
        assert!(storage.get_file("out/match_log.json").await.is_none());
    }

    #[tokio::test]
    async fn test_match_log_written_when_enabled() {
        let storage = MockStorage::new();
        storage.put("bulls.csv", BULLS).await;
        storage.put("females.csv", FEMALES).await;
        let mut config = settings();
        config.write_match_log = true;
        let pipeline = DrawPipeline::new(storage.clone(), config);

        let store = pipeline.extract().await.unwrap();
        let result = pipeline.transform(store).await.unwrap();
        pipeline.load(result).await.unwrap();

        let log = storage.get_file("out/match_log.json").await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(json["seed"], 3);
        assert_eq!(json["events"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_previous_reports_untouched() {
        let storage = MockStorage::failing_writes_to("out/junior_output.csv.tmp");
        storage.put("bulls.csv", BULLS).await;
        storage.put("females.csv", FEMALES).await;
        storage.put("out/donator_output.csv", "previous run").await;
        let pipeline = DrawPipeline::new(storage.clone(), settings());

        let store = pipeline.extract().await.unwrap();
        let result = pipeline.transform(store).await.unwrap();
        let err = pipeline.load(result).await.unwrap_err();

        assert!(matches!(err, DrawError::IoError(_)));
        assert_eq!(
            storage.get_file("out/donator_output.csv").await.as_deref(),
            Some("previous run")
        );
        assert!(storage.get_file("out/junior_output.csv").await.is_none());
    }

    #[tokio::test]
    async fn test_load_leaves_no_staging_files() {
        let storage = MockStorage::new();
        storage.put("bulls.csv", BULLS).await;
        storage.put("females.csv", FEMALES).await;
        let pipeline = DrawPipeline::new(storage.clone(), settings());

        let store = pipeline.extract().await.unwrap();
        let result = pipeline.transform(store).await.unwrap();
        pipeline.load(result).await.unwrap();

        let files = storage.files.lock().await;
        assert!(files.keys().all(|path| !path.ends_with(".tmp")));
        assert!(files.contains_key("out/donator_output.csv"));
        assert!(files.contains_key("out/junior_output.csv"));
    }
}
