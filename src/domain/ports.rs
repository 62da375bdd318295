use crate::domain::model::{AuditReport, ColumnMapping, Ledger, OutputFormat, RestaurantProfile};
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
    fn ledger_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn columns(&self) -> ColumnMapping;
    fn profile(&self) -> &RestaurantProfile;
    fn output_formats(&self) -> Vec<OutputFormat>;
    /// Archive name when the outputs are bundled, `None` to write loose files.
    fn bundle_name(&self) -> Option<&str>;
    /// Explicit field delimiter; otherwise inferred from the ledger extension.
    fn delimiter(&self) -> Option<u8> {
        None
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Ledger>;
    async fn transform(&self, ledger: Ledger) -> Result<AuditReport>;
    async fn load(&self, report: AuditReport) -> Result<String>;
}
