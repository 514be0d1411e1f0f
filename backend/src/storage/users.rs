use super::Database;
use rusqlite::{params, OptionalExtension};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

impl Database {
    pub fn find_user(&self, username: &str) -> rusqlite::Result<Option<User>> {
        self.connect()?
            .query_row(
                "SELECT id, username, password_hash FROM users WHERE username = ?1",
                params![username],
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

    pub fn create_user(&self, username: &str, password_hash: &str) -> rusqlite::Result<User> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
            params![username, password_hash],
        )?;
        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::database::tests::scratch;

    #[test]
    fn usernames_are_unique() {
        let (_dir, db) = scratch();
        let user = db
            .create_user("admin", "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA")
            .unwrap();
        assert_eq!(db.find_user("admin").unwrap(), Some(user));
        assert!(db.find_user("nobody").unwrap().is_none());
        assert!(db.create_user("admin", "other").is_err());
    }
}
