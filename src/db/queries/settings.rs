use rusqlite::{params, Connection};

use crate::date_utils::now_iso;

pub fn get_setting(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    match conn.query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
        row.get(0)
    }) {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    tracing::debug!(key, "Storing setting");
    conn.execute(
        "INSERT INTO settings (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now_iso()],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE settings (key TEXT PRIMARY KEY, value TEXT NOT NULL, updated_at TEXT NOT NULL);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_set_then_overwrite() {
        let conn = conn();
        assert_eq!(get_setting(&conn, "taxonomy").unwrap(), None);

        set_setting(&conn, "taxonomy", "[\"a\"]").unwrap();
        set_setting(&conn, "taxonomy", "[\"b\"]").unwrap();

        assert_eq!(
            get_setting(&conn, "taxonomy").unwrap().as_deref(),
            Some("[\"b\"]")
        );
    }
}
