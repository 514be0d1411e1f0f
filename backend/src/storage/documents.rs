use super::Database;
use chrono::{DateTime, Utc};
use common::model::audit::AuditValues;
use common::model::document::GeneratedDocument;
use log::warn;
use rusqlite::{params, OptionalExtension, Row};

const SELECT: &str = "SELECT d.id, d.template_id, t.name, d.filename, d.created_at, d.meta
     FROM generated_documents d
     LEFT JOIN templates t ON t.id = d.template_id";

fn from_row(row: &Row<'_>) -> rusqlite::Result<GeneratedDocument> {
    let id: i64 = row.get(0)?;
    let raw_meta: String = row.get(5)?;
    let meta = AuditValues::from_json(&raw_meta).unwrap_or_else(|e| {
        warn!("Generated document {} has unreadable values: {}", id, e);
        AuditValues::new()
    });
    Ok(GeneratedDocument {
        id,
        template_id: row.get(1)?,
        template_name: row.get(2)?,
        filename: row.get(3)?,
        created_at: row.get(4)?,
        meta,
    })
}

/// Midnight UTC of the day containing `now`.
fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc()
}

impl Database {
    /// Records one generation event.
    pub fn insert_document(
        &self,
        template_id: i64,
        filename: &str,
        meta: &AuditValues,
    ) -> rusqlite::Result<GeneratedDocument> {
        let json = meta
            .to_json()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO generated_documents (template_id, filename, created_at, meta)
             VALUES (?1, ?2, ?3, ?4)",
            params![template_id, filename, Utc::now(), json],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(&format!("{SELECT} WHERE d.id = ?1"), params![id], from_row)
    }

    pub fn get_document(&self, id: i64) -> rusqlite::Result<Option<GeneratedDocument>> {
        self.connect()?
            .query_row(&format!("{SELECT} WHERE d.id = ?1"), params![id], from_row)
            .optional()
    }

    /// Returns `false` when no such record existed.
    pub fn delete_document(&self, id: i64) -> rusqlite::Result<bool> {
        let deleted = self
            .connect()?
            .execute("DELETE FROM generated_documents WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Lists records newest first, optionally keeping only those whose
    /// template name contains `term`.
    pub fn list_documents(&self, term: Option<&str>) -> rusqlite::Result<Vec<GeneratedDocument>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT}
             WHERE ?1 IS NULL OR instr(t.name, ?1) > 0
             ORDER BY d.created_at DESC, d.id DESC"
        ))?;
        let rows = stmt.query_map(params![term], from_row)?;
        rows.collect()
    }

    pub fn count_documents(&self) -> rusqlite::Result<i64> {
        self.connect()?
            .query_row("SELECT COUNT(*) FROM generated_documents", [], |row| row.get(0))
    }

    /// Records created since midnight UTC.
    pub fn count_documents_today(&self) -> rusqlite::Result<i64> {
        self.connect()?.query_row(
            "SELECT COUNT(*) FROM generated_documents WHERE created_at >= ?1",
            params![start_of_day(Utc::now())],
            |row| row.get(0),
        )
    }
}
