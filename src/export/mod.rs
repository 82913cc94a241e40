//! Report rendering and persistence

pub mod format;
pub mod json_writer;
pub mod sqlite_writer;
pub mod writer;
pub mod writer_backend;

pub use format::{export_comparison, ExportFormat, CSV_HEADER};
pub use json_writer::JsonReportWriter;
pub use sqlite_writer::SqliteReportWriter;
pub use writer::{BackendType, ReportWriter};
pub use writer_backend::ReportWriterBackend;
