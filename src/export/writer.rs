//! Unified writer interface for reputation reports
//!
//! Routes writes to either the JSONL or the SQLite backend.

use super::json_writer::JsonReportWriter;
use super::sqlite_writer::SqliteReportWriter;
use super::writer_backend::ReportWriterBackend;
use crate::batch::Comparison;
use crate::error::ExportError;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Jsonl,
    Sqlite,
}

pub enum ReportWriter {
    Jsonl(JsonReportWriter),
    Sqlite(SqliteReportWriter),
}

impl ReportWriter {
    pub fn new(backend: BackendType, path: impl AsRef<Path>) -> Result<Self, ExportError> {
        match backend {
            BackendType::Jsonl => Ok(ReportWriter::Jsonl(JsonReportWriter::new(path)?)),
            BackendType::Sqlite => Ok(ReportWriter::Sqlite(SqliteReportWriter::new(path)?)),
        }
    }

    pub async fn write_report(&mut self, comparison: &Comparison) -> Result<(), ExportError> {
        match self {
            ReportWriter::Jsonl(w) => w.write_report(comparison).await,
            ReportWriter::Sqlite(w) => w.write_report(comparison).await,
        }
    }

    pub async fn flush(&mut self) -> Result<(), ExportError> {
        match self {
            ReportWriter::Jsonl(w) => w.flush().await,
            ReportWriter::Sqlite(w) => w.flush().await,
        }
    }

    pub fn backend_type(&self) -> &'static str {
        match self {
            ReportWriter::Jsonl(w) => w.backend_type(),
            ReportWriter::Sqlite(w) => w.backend_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchResult;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_routes_to_backend() {
        let dir = tempdir().unwrap();
        let comparison = Comparison::from_results(BatchResult::new(), 0);

        let mut jsonl = ReportWriter::new(BackendType::Jsonl, dir.path().join("r.jsonl")).unwrap();
        let mut sqlite = ReportWriter::new(BackendType::Sqlite, dir.path().join("r.db")).unwrap();
        assert_eq!(jsonl.backend_type(), "JSONL");
        assert_eq!(sqlite.backend_type(), "SQLite");

        for writer in [&mut jsonl, &mut sqlite] {
            writer.write_report(&comparison).await.unwrap();
            writer.flush().await.unwrap();
        }

        assert!(dir.path().join("r.jsonl").exists());
        assert!(dir.path().join("r.db").exists());
    }
}
