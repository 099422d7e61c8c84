//! Transcript Store
//!
//! SQLite-backed storage for call transcripts and analysis results.
//! The analyzer only sees the narrow [`AnalysisPersistence`] contract;
//! the read queries used by the service boundary live on [`TranscriptStore`].

use super::types::{
    NewAnalysis, NewTranscript, StoredAnalysis, Transcript, TranscriptSummary, TranscriptText,
};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use log::debug;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub const DEFAULT_DB_PATH: &str = "call_transcripts.db";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

// ============================================================
// PERSISTENCE CONTRACT
// ============================================================

/// What the analyzer needs from storage
pub trait AnalysisPersistence {
    /// Store an analysis result, returning its assigned id
    fn save_analysis(&self, analysis: &NewAnalysis<'_>) -> Result<i64, StoreError>;

    fn fetch_transcript_text(&self, transcript_id: i64) -> Result<Option<String>, StoreError>;

    fn fetch_transcripts_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<TranscriptText>, StoreError>;
}

// ============================================================
// SQLITE STORE
// ============================================================

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS call_transcripts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_id TEXT NOT NULL,
        customer_name TEXT NOT NULL,
        transcript TEXT NOT NULL,
        call_date TEXT NOT NULL,
        duration_seconds INTEGER,
        phone_number TEXT
    );

    CREATE TABLE IF NOT EXISTS analysis_results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        transcript_id INTEGER NOT NULL,
        customer_id TEXT NOT NULL,
        intent TEXT,
        sentiment TEXT,
        confidence_score REAL,
        analysis_date TEXT NOT NULL,
        raw_analysis TEXT,
        FOREIGN KEY (transcript_id) REFERENCES call_transcripts(id)
    );

    CREATE INDEX IF NOT EXISTS idx_transcripts_customer_id ON call_transcripts(customer_id);
    CREATE INDEX IF NOT EXISTS idx_analysis_customer_id ON analysis_results(customer_id);
";

/// SQLite-backed transcript and analysis store
#[derive(Clone)]
pub struct TranscriptStore {
    conn: Arc<Mutex<Connection>>,
}

impl TranscriptStore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        debug!("Opened transcript database at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    /// Create an in-memory store for testing
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Insert a transcript, stamping it with the current time
    pub fn insert_transcript(&self, transcript: &NewTranscript) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO call_transcripts
             (customer_id, customer_name, transcript, call_date, duration_seconds, phone_number)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                transcript.customer_id,
                transcript.customer_name,
                transcript.transcript,
                now_timestamp(),
                transcript.duration_seconds,
                transcript.phone_number,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn transcript_count(&self) -> Result<u64, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM call_transcripts", [], |row| {
            row.get(0)
        })?;
        Ok(count as u64)
    }

    pub fn get_transcript(&self, transcript_id: i64) -> Result<Option<Transcript>, StoreError> {
        let conn = self.conn()?;
        let transcript = conn
            .query_row(
                "SELECT id, customer_id, customer_name, transcript,
                        call_date, duration_seconds, phone_number
                 FROM call_transcripts
                 WHERE id = ?1",
                [transcript_id],
                transcript_from_row,
            )
            .optional()?;
        Ok(transcript)
    }

    /// All transcripts, most recent call first
    pub fn list_transcripts(&self) -> Result<Vec<TranscriptSummary>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, customer_id, customer_name, duration_seconds, call_date
             FROM call_transcripts
             ORDER BY call_date DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(TranscriptSummary {
                id: row.get(0)?,
                customer_id: row.get(1)?,
                customer_name: row.get(2)?,
                duration_seconds: row.get(3)?,
                call_date: timestamp_column(row, 4)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// All transcripts for one customer, most recent call first
    pub fn transcripts_for_customer(&self, customer_id: &str) -> Result<Vec<Transcript>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, customer_id, customer_name, transcript,
                    call_date, duration_seconds, phone_number
             FROM call_transcripts
             WHERE customer_id = ?1
             ORDER BY call_date DESC, id DESC",
        )?;

        let rows = stmt.query_map([customer_id], transcript_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_analysis(&self, analysis_id: i64) -> Result<Option<StoredAnalysis>, StoreError> {
        let conn = self.conn()?;
        let analysis = conn
            .query_row(
                "SELECT id, transcript_id, customer_id, intent, sentiment,
                        confidence_score, analysis_date, raw_analysis
                 FROM analysis_results
                 WHERE id = ?1",
                [analysis_id],
                analysis_from_row,
            )
            .optional()?;
        Ok(analysis)
    }

    /// Every saved analysis for a customer, newest first
    pub fn customer_analysis_history(
        &self,
        customer_id: &str,
    ) -> Result<Vec<StoredAnalysis>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, transcript_id, customer_id, intent, sentiment,
                    confidence_score, analysis_date, raw_analysis
             FROM analysis_results
             WHERE customer_id = ?1
             ORDER BY analysis_date DESC, id DESC",
        )?;

        let rows = stmt.query_map([customer_id], analysis_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl AnalysisPersistence for TranscriptStore {
    fn save_analysis(&self, analysis: &NewAnalysis<'_>) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO analysis_results
             (transcript_id, customer_id, intent, sentiment, confidence_score, analysis_date, raw_analysis)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                analysis.transcript_id,
                analysis.customer_id,
                analysis.intent.as_str(),
                analysis.sentiment.as_str(),
                analysis.confidence_score,
                now_timestamp(),
                analysis.raw_analysis,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(
            "Saved analysis {} for transcript {} ({})",
            id,
            analysis.transcript_id,
            analysis.intent.as_str()
        );
        Ok(id)
    }

    fn fetch_transcript_text(&self, transcript_id: i64) -> Result<Option<String>, StoreError> {
        let conn = self.conn()?;
        let text = conn
            .query_row(
                "SELECT transcript FROM call_transcripts WHERE id = ?1",
                [transcript_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(text)
    }

    fn fetch_transcripts_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<TranscriptText>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, transcript
             FROM call_transcripts
             WHERE customer_id = ?1
             ORDER BY call_date DESC, id DESC",
        )?;

        let rows = stmt.query_map([customer_id], |row| {
            Ok(TranscriptText {
                id: row.get(0)?,
                transcript: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

// ============================================================
// ROW MAPPING
// ============================================================

/// Fixed-width UTC timestamps so text ordering matches time ordering
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// SQLite `CURRENT_TIMESTAMP` layout, always UTC
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(e) => NaiveDateTime::parse_from_str(raw, SQLITE_TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|_| e),
    }
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn transcript_from_row(row: &Row<'_>) -> rusqlite::Result<Transcript> {
    Ok(Transcript {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        customer_name: row.get(2)?,
        transcript: row.get(3)?,
        call_date: timestamp_column(row, 4)?,
        duration_seconds: row.get(5)?,
        phone_number: row.get(6)?,
    })
}

fn analysis_from_row(row: &Row<'_>) -> rusqlite::Result<StoredAnalysis> {
    Ok(StoredAnalysis {
        id: row.get(0)?,
        transcript_id: row.get(1)?,
        customer_id: row.get(2)?,
        intent: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        sentiment: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        confidence_score: row.get::<_, Option<f64>>(5)?.unwrap_or_default(),
        analysis_date: timestamp_column(row, 6)?,
        raw_analysis: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
    })
}
