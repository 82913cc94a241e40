//! JSONL report writer - one comparison per line, appended to a file

use super::writer_backend::ReportWriterBackend;
use crate::batch::Comparison;
use crate::error::ExportError;
use async_trait::async_trait;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct ReportLine<'a> {
    generated_at: i64,
    #[serde(flatten)]
    comparison: &'a Comparison,
}

pub struct JsonReportWriter {
    writer: BufWriter<std::fs::File>,
}

impl JsonReportWriter {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        log::info!("📝 Writing reputation reports to: {}", path.display());

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

#[async_trait]
impl ReportWriterBackend for JsonReportWriter {
    async fn write_report(&mut self, comparison: &Comparison) -> Result<(), ExportError> {
        let line = ReportLine {
            generated_at: chrono::Utc::now().timestamp(),
            comparison,
        };
        let json = serde_json::to_string(&line)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ExportError> {
        self.writer.flush()?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "JSONL"
    }
}
