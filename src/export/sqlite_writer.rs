//! SQLite writer for reputation scores
//!
//! Keeps one row per address in `reputation_scores`; rescoring an address
//! overwrites its previous row.

use super::writer_backend::ReportWriterBackend;
use crate::batch::{AccountOutcome, Comparison};
use crate::error::ExportError;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;

pub struct SqliteReportWriter {
    conn: Connection,
}

impl SqliteReportWriter {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, ExportError> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS reputation_scores (
                address TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                reputation_score REAL,
                rank INTEGER,
                total_transactions INTEGER,
                unique_receivers INTEGER,
                total_volume REAL,
                asa_holdings INTEGER,
                breakdown TEXT,
                error TEXT,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_score ON reputation_scores(reputation_score DESC)",
            [],
        )?;

        log::info!("✅ SQLite reputation store initialized");

        Ok(Self { conn })
    }

    fn upsert_all(&mut self, comparison: &Comparison) -> Result<usize, ExportError> {
        let ranks: HashMap<&str, usize> = comparison
            .ranking
            .iter()
            .map(|r| (r.address.as_str(), r.rank))
            .collect();
        let now = chrono::Utc::now().timestamp();

        let tx = self.conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO reputation_scores (
                    address, status, reputation_score, rank, total_transactions,
                    unique_receivers, total_volume, asa_holdings, breakdown, error, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                ON CONFLICT(address) DO UPDATE SET
                    status = excluded.status,
                    reputation_score = excluded.reputation_score,
                    rank = excluded.rank,
                    total_transactions = excluded.total_transactions,
                    unique_receivers = excluded.unique_receivers,
                    total_volume = excluded.total_volume,
                    asa_holdings = excluded.asa_holdings,
                    breakdown = excluded.breakdown,
                    error = excluded.error,
                    updated_at = excluded.updated_at
                "#,
            )?;

            for (address, outcome) in &comparison.detailed_results {
                match outcome {
                    AccountOutcome::Scored(b) => {
                        stmt.execute(params![
                            address,
                            "scored",
                            b.reputation_score,
                            ranks.get(address.as_str()).map(|r| *r as i64),
                            b.analysis.total_transactions as i64,
                            b.analysis.unique_receivers as i64,
                            b.analysis.total_volume,
                            b.analysis.asa_holdings_count as i64,
                            serde_json::to_string(b)?,
                            Option::<String>::None,
                            now,
                        ])?;
                    }
                    AccountOutcome::Failed { reason } => {
                        stmt.execute(params![
                            address,
                            "failed",
                            Option::<f64>::None,
                            Option::<i64>::None,
                            Option::<i64>::None,
                            Option::<i64>::None,
                            Option::<f64>::None,
                            Option::<i64>::None,
                            Option::<String>::None,
                            reason,
                            now,
                        ])?;
                    }
                }
                count += 1;
            }
        }
        tx.commit()?;

        Ok(count)
    }
}

#[async_trait]
impl ReportWriterBackend for SqliteReportWriter {
    async fn write_report(&mut self, comparison: &Comparison) -> Result<(), ExportError> {
        let count = self.upsert_all(comparison)?;
        log::debug!("✅ Upserted {} reputation rows", count);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ExportError> {
        // Each report commits in its own transaction
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}
