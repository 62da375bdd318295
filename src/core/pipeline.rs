use crate::core::ledger::{delimiter_for_path, read_ledger};
use crate::core::prompt::internal_audit_prompt;
use crate::core::summarizer::Summarizer;
use crate::core::{AuditReport, ConfigProvider, Ledger, OutputFormat, Pipeline, Storage};
use crate::utils::error::Result;
use std::io::Write;
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};

pub struct AuditPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> AuditPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }
}

/// Renders each requested format to the bytes that get written.
pub fn render_outputs(report: &AuditReport, formats: &[OutputFormat]) -> Result<Vec<(OutputFormat, Vec<u8>)>> {
    let mut outputs = Vec::with_capacity(formats.len());

    for format in OutputFormat::unique(formats) {
        let bytes = match format {
            OutputFormat::Json => {
                let document = serde_json::json!({
                    "generated_at": report.generated_at.to_rfc3339(),
                    "rows_read": report.analysis.rows_read,
                    "distinct_items": report.analysis.ranking.len(),
                    "digest": &report.analysis.digest,
                });
                serde_json::to_vec_pretty(&document)?
            }
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.write_record(["rank", "item_name", "total_quantity"])?;
                for (rank, item) in report.analysis.ranking.iter().enumerate() {
                    writer.write_record([
                        (rank + 1).to_string(),
                        item.item_name.clone(),
                        item.total_quantity.to_string(),
                    ])?;
                }
                writer.into_inner().map_err(|e| e.into_error())?
            }
            OutputFormat::Prompt => report.prompt.clone().into_bytes(),
        };
        outputs.push((format, bytes));
    }

    Ok(outputs)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AuditPipeline<S, C> {
    async fn extract(&self) -> Result<Ledger> {
        let path = self.config.ledger_path();
        tracing::info!("📥 Reading sales ledger from: {}", path);

        let data = self.storage.read_file(path).await?;
        let delimiter = self
            .config
            .delimiter()
            .unwrap_or_else(|| delimiter_for_path(path));

        let ledger = read_ledger(&data, delimiter)?;
        tracing::info!("✅ Loaded {} rows", ledger.len());
        Ok(ledger)
    }

    async fn transform(&self, ledger: Ledger) -> Result<AuditReport> {
        let summarizer = Summarizer::new(self.config.columns());
        let analysis = summarizer.analyze(&ledger)?;

        tracing::info!(
            "🔍 Digest: {} units across {} items, peak slot {}",
            analysis.digest.total_units_sold,
            analysis.ranking.len(),
            analysis.digest.peak_time_slot
        );

        let prompt = internal_audit_prompt(self.config.profile(), &analysis.digest);

        Ok(AuditReport {
            analysis,
            prompt,
            generated_at: chrono::Utc::now(),
        })
    }

    async fn load(&self, report: AuditReport) -> Result<String> {
        let outputs = render_outputs(&report, &self.config.output_formats())?;

        match self.config.bundle_name() {
            Some(bundle) => {
                tracing::debug!("Creating ZIP bundle with {} files", outputs.len());

                let zip_data = {
                    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                    for (format, bytes) in &outputs {
                        zip.start_file(format.file_name(), SimpleFileOptions::default())?;
                        zip.write_all(bytes)?;
                    }
                    zip.finish()?.into_inner()
                };

                let path = self.output_file(bundle);
                tracing::debug!("Writing ZIP bundle ({} bytes) to {}", zip_data.len(), path);
                self.storage.write_file(&path, &zip_data).await?;
                Ok(path)
            }
            None => {
                for (format, bytes) in &outputs {
                    let path = self.output_file(format.file_name());
                    tracing::debug!("Writing {} ({} bytes)", path, bytes.len());
                    self.storage.write_file(&path, bytes).await?;
                }
                Ok(self.config.output_path().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ColumnMapping, PeakTimeSlot, RestaurantProfile};
    use crate::utils::error::InsightError;
    use std::collections::HashMap;
    use std::io::Read;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &[u8]) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                InsightError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        ledger_path: String,
        columns: ColumnMapping,
        profile: RestaurantProfile,
        formats: Vec<OutputFormat>,
        bundle: Option<String>,
    }

    impl MockConfig {
        fn new(ledger_path: &str) -> Self {
            Self {
                ledger_path: ledger_path.to_string(),
                columns: ColumnMapping::default(),
                profile: RestaurantProfile {
                    name: "Pikio Taco".to_string(),
                    ..RestaurantProfile::default()
                },
                formats: OutputFormat::ALL.to_vec(),
                bundle: Some("insights_bundle.zip".to_string()),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn ledger_path(&self) -> &str {
            &self.ledger_path
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn columns(&self) -> ColumnMapping {
            self.columns.clone()
        }

        fn profile(&self) -> &RestaurantProfile {
            &self.profile
        }

        fn output_formats(&self) -> Vec<OutputFormat> {
            self.formats.clone()
        }

        fn bundle_name(&self) -> Option<&str> {
            self.bundle.as_deref()
        }
    }

    const SALES: &[u8] = b"item_name,quantity_sold,time_slot\n\
Tacos,10,19:00\n\
Nachos,3,13:00\n\
Quesadilla,7,19:00\n\
Tacos,5,20:00\n";

    #[tokio::test]
    async fn test_extract_reads_ledger() {
        let storage = MockStorage::with_file("sales.csv", SALES);
        let pipeline = AuditPipeline::new(storage, MockConfig::new("sales.csv"));

        let ledger = pipeline.extract().await.unwrap();
        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.column_index("time_slot"), Some(2));
    }

    #[tokio::test]
    async fn test_extract_uses_tab_delimiter_for_tsv() {
        let storage = MockStorage::with_file("sales.tsv", b"item_name\tquantity_sold\nTacos\t2\n");
        let pipeline = AuditPipeline::new(storage, MockConfig::new("sales.tsv"));

        let ledger = pipeline.extract().await.unwrap();
        assert_eq!(ledger.rows()[0], vec!["Tacos", "2"]);
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let storage = MockStorage::with_file("other.csv", SALES);
        let pipeline = AuditPipeline::new(storage, MockConfig::new("sales.csv"));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, InsightError::IoError(_)));
    }

    #[tokio::test]
    async fn test_transform_builds_digest_and_prompt() {
        let storage = MockStorage::with_file("sales.csv", SALES);
        let pipeline = AuditPipeline::new(storage, MockConfig::new("sales.csv"));

        let ledger = pipeline.extract().await.unwrap();
        let report = pipeline.transform(ledger).await.unwrap();

        let digest = &report.analysis.digest;
        assert_eq!(digest.total_units_sold, 25);
        assert_eq!(digest.top_sellers[0].item_name, "Tacos");
        assert_eq!(digest.peak_time_slot, PeakTimeSlot::Slot("19:00".to_string()));
        assert!(report.prompt.contains("Pikio Taco"));
        assert!(report.prompt.contains("Peak time slot: 19:00"));
    }

    #[tokio::test]
    async fn test_transform_reports_missing_columns() {
        let storage = MockStorage::with_file("sales.csv", b"product,units\nTacos,1\n");
        let pipeline = AuditPipeline::new(storage, MockConfig::new("sales.csv"));

        let ledger = pipeline.extract().await.unwrap();
        let err = pipeline.transform(ledger).await.unwrap_err();
        assert!(matches!(err, InsightError::MissingColumnError { ref columns } if columns.len() == 2));
    }

    #[tokio::test]
    async fn test_load_writes_zip_bundle() {
        let storage = MockStorage::with_file("sales.csv", SALES);
        let pipeline = AuditPipeline::new(storage.clone(), MockConfig::new("sales.csv"));

        let ledger = pipeline.extract().await.unwrap();
        let report = pipeline.transform(ledger).await.unwrap();
        let path = pipeline.load(report).await.unwrap();

        let expected = Path::new("out").join("insights_bundle.zip");
        assert_eq!(path, expected.to_string_lossy());

        let zip_data = storage.get_file(&path).await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        assert_eq!(archive.len(), 3);

        let mut csv_content = String::new();
        archive
            .by_name("item_totals.csv")
            .unwrap()
            .read_to_string(&mut csv_content)
            .unwrap();
        let lines: Vec<&str> = csv_content.lines().collect();
        assert_eq!(lines[0], "rank,item_name,total_quantity");
        assert_eq!(lines[1], "1,Tacos,15");
        assert_eq!(lines[3], "3,Nachos,3");

        let mut json_content = String::new();
        archive
            .by_name("sales_digest.json")
            .unwrap()
            .read_to_string(&mut json_content)
            .unwrap();
        let document: serde_json::Value = serde_json::from_str(&json_content).unwrap();
        assert_eq!(document["rows_read"], 4);
        assert_eq!(document["digest"]["total_units_sold"], 25);
        assert_eq!(document["digest"]["bottom_sellers"][0]["item_name"], "Nachos");
    }

    #[tokio::test]
    async fn test_load_bundles_each_format_once() {
        let storage = MockStorage::with_file("sales.csv", SALES);
        let mut config = MockConfig::new("sales.csv");
        config.formats = vec![OutputFormat::Json, OutputFormat::Prompt, OutputFormat::Prompt];
        let pipeline = AuditPipeline::new(storage.clone(), config);

        let ledger = pipeline.extract().await.unwrap();
        let report = pipeline.transform(ledger).await.unwrap();
        let path = pipeline.load(report).await.unwrap();

        let zip_data = storage.get_file(&path).await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["internal_audit_prompt.txt", "sales_digest.json"]);
    }

    #[tokio::test]
    async fn test_load_writes_loose_files_without_bundle() {
        let storage = MockStorage::with_file("sales.csv", SALES);
        let mut config = MockConfig::new("sales.csv");
        config.bundle = None;
        config.formats = vec![OutputFormat::Prompt];
        let pipeline = AuditPipeline::new(storage.clone(), config);

        let ledger = pipeline.extract().await.unwrap();
        let report = pipeline.transform(ledger).await.unwrap();
        let path = pipeline.load(report).await.unwrap();
        assert_eq!(path, "out");

        let prompt_path = Path::new("out").join("internal_audit_prompt.txt");
        let prompt = storage.get_file(&prompt_path.to_string_lossy()).await.unwrap();
        assert!(String::from_utf8(prompt).unwrap().starts_with("ROLE: Data Analyst"));

        let json_path = Path::new("out").join("sales_digest.json");
        assert!(storage.get_file(&json_path.to_string_lossy()).await.is_none());
    }
}
