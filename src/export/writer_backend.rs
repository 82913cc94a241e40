use crate::batch::Comparison;
use crate::error::ExportError;
use async_trait::async_trait;

#[async_trait]
pub trait ReportWriterBackend: Send {
    /// Persist one comparison report
    async fn write_report(&mut self, comparison: &Comparison) -> Result<(), ExportError>;

    /// Flush pending writes to storage
    async fn flush(&mut self) -> Result<(), ExportError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
