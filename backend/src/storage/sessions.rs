use super::{Database, User};
use chrono::{DateTime, Duration, Utc};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Sessions older than this are refused and removed.
pub const SESSION_TTL_HOURS: i64 = 12;

fn oldest_live(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(SESSION_TTL_HOURS)
}

fn prune_expired(conn: &Connection, now: DateTime<Utc>) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM sessions WHERE created_at < ?1",
        params![oldest_live(now)],
    )
}

impl Database {
    /// Opens a session for `user_id` and returns its token. Expired sessions
    /// of every user are dropped on the way.
    pub fn create_session(&self, user_id: i64) -> rusqlite::Result<String> {
        let token = Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let conn = self.connect()?;
        prune_expired(&conn, now)?;
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![token, user_id, now],
        )?;
        Ok(token)
    }

    /// The user owning `token`, if the session exists and has not expired.
    pub fn session_user(&self, token: &str) -> rusqlite::Result<Option<User>> {
        let now = Utc::now();
        let conn = self.connect()?;
        let removed = prune_expired(&conn, now)?;
        if removed > 0 {
            debug!("Removed {removed} expired sessions");
        }
        conn.query_row(
            "SELECT u.id, u.username, u.password_hash
             FROM sessions s JOIN users u ON u.id = s.user_id
             WHERE s.token = ?1 AND s.created_at >= ?2",
            params![token, oldest_live(now)],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            },
        )
        .optional()
    }

    pub fn delete_session(&self, token: &str) -> rusqlite::Result<()> {
        self.connect()?
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(())
    }
}
