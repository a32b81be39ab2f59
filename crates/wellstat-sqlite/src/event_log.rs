use rusqlite::{params, Connection};

/// An event row about to be appended.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NewEvent<'a> {
    pub wellbore_id: &'a str,
    pub level: &'a str,
    pub description_code: u32,
    pub timestamp_millis: u64,
    pub auxiliary: Option<&'a [u8]>,
}

/// Append one event row. A duplicate key fails like any other statement.
pub(crate) fn insert(conn: &Connection, event: &NewEvent<'_>) -> rusqlite::Result<usize> {
    match event.auxiliary {
        Some(aux) => conn.execute(
            "INSERT INTO EventRecord
                 (wellboreId, level, descriptionCode, timestampMillis, auxiliary)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.wellbore_id,
                event.level,
                event.description_code,
                event.timestamp_millis as i64,
                aux
            ],
        ),
        None => conn.execute(
            "INSERT INTO EventRecord
                 (wellboreId, level, descriptionCode, timestampMillis)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                event.wellbore_id,
                event.level,
                event.description_code,
                event.timestamp_millis as i64
            ],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn event(aux: Option<&[u8]>) -> NewEvent<'_> {
        NewEvent {
            wellbore_id: "W1",
            level: "info",
            description_code: 10,
            timestamp_millis: 100_500,
            auxiliary: aux,
        }
    }

    #[test]
    fn test_payload_is_bound_as_blob() {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_tables(&conn).unwrap();

        let payload = [0u8, b'\'', 0xff, b';'];
        insert(&conn, &event(Some(&payload[..]))).unwrap();

        let stored: Vec<u8> = conn
            .query_row("SELECT auxiliary FROM EventRecord", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, payload);
    }

    #[test]
    fn test_missing_payload_is_null() {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_tables(&conn).unwrap();

        insert(&conn, &event(None)).unwrap();
        let stored: Option<Vec<u8>> = conn
            .query_row("SELECT auxiliary FROM EventRecord", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, None);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_tables(&conn).unwrap();

        insert(&conn, &event(None)).unwrap();
        assert!(insert(&conn, &event(Some(&b"other"[..]))).is_err());

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM EventRecord", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
