use super::Database;
use chrono::Utc;
use common::model::template::{DocumentTemplate, TemplateDraft};
use rusqlite::{params, OptionalExtension, Row};

const COLUMNS: &str = "id, name, description, template_text, created_at, last_modified";

fn from_row(row: &Row<'_>) -> rusqlite::Result<DocumentTemplate> {
    Ok(DocumentTemplate {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        template_text: row.get(3)?,
        created_at: row.get(4)?,
        last_modified: row.get(5)?,
    })
}

impl Database {
    pub fn create_template(&self, draft: &TemplateDraft) -> rusqlite::Result<DocumentTemplate> {
        let conn = self.connect()?;
        let now = Utc::now();
        conn.execute(
            "INSERT INTO templates (name, description, template_text, created_at, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![draft.name.trim(), draft.description, draft.template_text, now],
        )?;
        Ok(DocumentTemplate {
            id: conn.last_insert_rowid(),
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
            template_text: draft.template_text.clone(),
            created_at: now,
            last_modified: now,
        })
    }

    pub fn get_template(&self, id: i64) -> rusqlite::Result<Option<DocumentTemplate>> {
        self.connect()?
            .query_row(
                &format!("SELECT {COLUMNS} FROM templates WHERE id = ?1"),
                params![id],
                from_row,
            )
            .optional()
    }

    /// Replaces the editable fields and bumps `last_modified`.
    /// Returns `None` when the template does not exist.
    pub fn update_template(
        &self,
        id: i64,
        draft: &TemplateDraft,
    ) -> rusqlite::Result<Option<DocumentTemplate>> {
        let changed = self.connect()?.execute(
            "UPDATE templates SET name = ?1, description = ?2, template_text = ?3, last_modified = ?4
             WHERE id = ?5",
            params![
                draft.name.trim(),
                draft.description,
                draft.template_text,
                Utc::now(),
                id
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_template(id)
    }

    /// Deletes a template together with its generated-document records.
    ///
    /// Returns the file names of the removed records so their PDFs can be
    /// cleaned up, or `None` when the template does not exist.
    pub fn delete_template(&self, id: i64) -> rusqlite::Result<Option<Vec<String>>> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let filenames = {
            let mut stmt = tx.prepare("SELECT filename FROM generated_documents WHERE template_id = ?1")?;
            let rows = stmt.query_map(params![id], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<Vec<String>>>()?
        };
        tx.execute(
            "DELETE FROM generated_documents WHERE template_id = ?1",
            params![id],
        )?;
        let deleted = tx.execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Ok(None);
        }
        tx.commit()?;
        Ok(Some(filenames))
    }

    /// Lists templates newest first, optionally keeping only names that
    /// contain `term` (case-sensitive).
    pub fn list_templates(&self, term: Option<&str>) -> rusqlite::Result<Vec<DocumentTemplate>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM templates
             WHERE ?1 IS NULL OR instr(name, ?1) > 0
             ORDER BY id DESC"
        ))?;
        let rows = stmt.query_map(params![term], from_row)?;
        rows.collect()
    }

    pub fn count_templates(&self) -> rusqlite::Result<i64> {
        self.connect()?
            .query_row("SELECT COUNT(*) FROM templates", [], |row| row.get(0))
    }
}
