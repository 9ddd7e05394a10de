use crate::core::table::{parse_table, write_table};
use crate::core::{BatchResult, BatchSummary, ConfigProvider, Pipeline, Storage, Table};
use crate::domain::model::OutputKind;
use crate::domain::services::batch;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const SUMMARY_STEM: &str = "resumen";

/// 讀取分隔檔、驗證每筆紀錄、寫出有效/無效/警告三個檔案
pub struct CsvPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CsvPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn file_name(&self, stem: &str, timestamp: Option<&str>, extension: &str) -> String {
        output_file_name(self.config.run_id(), stem, timestamp, extension)
    }
}

/// `{run_id}_{stem}_{timestamp}.{extension}`, skipping the parts that are absent.
pub fn output_file_name(
    run_id: Option<&str>,
    stem: &str,
    timestamp: Option<&str>,
    extension: &str,
) -> String {
    let mut name = String::new();
    if let Some(run_id) = run_id.filter(|id| !id.is_empty()) {
        name.push_str(run_id);
        name.push('_');
    }
    name.push_str(stem);
    if let Some(timestamp) = timestamp {
        name.push('_');
        name.push_str(timestamp);
    }
    name.push('.');
    name.push_str(extension);
    name
}

fn bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CsvPipeline<S, C> {
    async fn extract(&self) -> Result<Table> {
        tracing::info!("📥 Reading input file: {}", self.config.input_path());
        let bytes = self.storage.read_file(self.config.input_path()).await?;

        let table = parse_table(&bytes, self.config.delimiter())?;
        tracing::info!(
            "📊 CSV loaded successfully. Total records: {}",
            table.records.len()
        );
        tracing::info!("Columns found: {:?}", table.columns);
        Ok(table)
    }

    async fn transform(&self, table: Table) -> Result<BatchResult> {
        tracing::info!("🔧 Validating {} records", table.records.len());
        Ok(batch::process(table))
    }

    async fn load(&self, result: BatchResult) -> Result<BatchSummary> {
        let timestamp = self
            .config
            .timestamped()
            .then(|| chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());

        let mut summary = BatchSummary::from_result(&result);
        let mut written: Vec<(String, Vec<u8>)> = Vec::new();

        for kind in OutputKind::ALL {
            let records = result.records(kind);
            // 空的集合不產生檔案
            if records.is_empty() {
                continue;
            }

            let columns = batch::output_columns(&result.columns, kind);
            let data = write_table(&columns, records, self.config.delimiter())?;
            let name = self.file_name(kind.file_stem(), timestamp.as_deref(), "csv");

            tracing::debug!("Writing {} rows to {}", records.len(), name);
            self.storage.write_file(&name, &data).await?;
            summary.set_file(kind, name.clone());
            written.push((name, data));
        }

        if self.config.summary_json() {
            let name = self.file_name(SUMMARY_STEM, timestamp.as_deref(), "json");
            let data = serde_json::to_vec_pretty(&summary)?;
            self.storage.write_file(&name, &data).await?;
            tracing::debug!("Summary written to {}", name);
            written.push((name, data));
        }

        if let Some(bundle_name) = self.config.bundle_filename() {
            tracing::debug!("Creating ZIP bundle with {} files", written.len());
            let zip_data = bundle(&written)?;
            self.storage.write_file(bundle_name, &zip_data).await?;
            tracing::info!("📦 Bundle saved: {}", bundle_name);
        }

        tracing::info!(
            "💾 Output written to {} ({} files)",
            self.config.output_path(),
            written.len()
        );
        Ok(summary)
    }
}
