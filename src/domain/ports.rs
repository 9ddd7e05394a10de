use crate::domain::model::{BatchResult, BatchSummary, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn delimiter(&self) -> u8;
    /// Prefix for every output file name, e.g. an upload id.
    fn run_id(&self) -> Option<&str>;
    fn timestamped(&self) -> bool;
    fn summary_json(&self) -> bool;
    fn bundle_filename(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Table>;
    async fn transform(&self, table: Table) -> Result<BatchResult>;
    async fn load(&self, result: BatchResult) -> Result<BatchSummary>;
}
