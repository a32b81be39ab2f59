use rusqlite::{params_from_iter, types::Value, Connection};
use wellstat_core::{error::Result, normalize_range, BoundaryTag, EventRecord, TimeBoundary};

use crate::errors::statement_error;

/// A descending, time-bounded event-log query for one wellbore.
///
/// Boundary values are bound as parameters; the SQL text only varies with
/// which comparisons are present.
#[derive(Debug, Clone)]
pub struct RangeQuery {
    sql: String,
    params: Vec<Value>,
}

impl RangeQuery {
    /// Build the query. Reversed bounds are swapped; `max_return == 0`
    /// means no limit.
    pub fn build(
        wellbore_id: &str,
        begin: TimeBoundary,
        end: TimeBoundary,
        max_return: u32,
    ) -> Self {
        let (begin, end) = normalize_range(begin, end);

        let mut sql = String::from(
            "SELECT wellboreId, level, descriptionCode, timestampMillis, auxiliary \
             FROM EventRecord WHERE wellboreId = ?",
        );
        let mut params = vec![Value::Text(wellbore_id.to_string())];

        let lower = match begin.tag {
            BoundaryTag::NotSet => None,
            BoundaryTag::Included => Some(">="),
            BoundaryTag::Excluded => Some(">"),
        };
        let upper = match end.tag {
            BoundaryTag::NotSet => None,
            BoundaryTag::Included => Some("<="),
            BoundaryTag::Excluded => Some("<"),
        };

        for (op, bound) in [(lower, begin), (upper, end)] {
            if let Some(op) = op {
                sql.push_str(" AND timestampMillis ");
                sql.push_str(op);
                sql.push_str(" ?");
                params.push(Value::Integer(bound.timestamp_millis() as i64));
            }
        }

        sql.push_str(" ORDER BY timestampMillis DESC");

        if max_return > 0 {
            sql.push_str(" LIMIT ?");
            params.push(Value::Integer(i64::from(max_return)));
        }

        Self { sql, params }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Execute against `conn`, decoding each row into an owned record.
    pub fn run(&self, conn: &Connection) -> Result<Vec<EventRecord>> {
        let mut stmt = conn.prepare(&self.sql).map_err(statement_error)?;
        let rows = stmt
            .query_map(params_from_iter(self.params.iter()), |row| {
                let auxiliary: Option<Vec<u8>> = row.get(4)?;
                Ok(EventRecord {
                    wellbore_id: row.get(0)?,
                    level: row.get(1)?,
                    description_code: row.get::<_, i64>(2)? as u32,
                    timestamp_millis: row.get::<_, i64>(3)? as u64,
                    auxiliary: auxiliary.unwrap_or_default(),
                })
            })
            .map_err(statement_error)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(statement_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::{self, NewEvent};
    use crate::schema;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_tables(&conn).unwrap();
        for (i, (sec, ms)) in [(100u32, 0u32), (100, 500), (101, 0), (102, 250), (103, 999)]
            .into_iter()
            .enumerate()
        {
            let payload = vec![i as u8; i];
            let event = NewEvent {
                wellbore_id: "W1",
                level: "info",
                description_code: 10,
                timestamp_millis: EventRecord::timestamp_from_parts(sec, ms),
                auxiliary: if i % 2 == 0 {
                    None
                } else {
                    Some(payload.as_slice())
                },
            };
            event_log::insert(&conn, &event).unwrap();
        }
        let other = NewEvent {
            wellbore_id: "W2",
            level: "error",
            description_code: 2001,
            timestamp_millis: 101_000,
            auxiliary: None,
        };
        event_log::insert(&conn, &other).unwrap();
        conn
    }

    fn times(records: &[EventRecord]) -> Vec<u64> {
        records.iter().map(|r| r.timestamp_millis).collect()
    }

    #[test]
    fn test_sql_for_each_tag_combination() {
        let q = RangeQuery::build("W1", TimeBoundary::not_set(), TimeBoundary::not_set(), 0);
        assert!(q.sql().ends_with("WHERE wellboreId = ? ORDER BY timestampMillis DESC"));
        assert_eq!(q.params().len(), 1);

        let q = RangeQuery::build(
            "W1",
            TimeBoundary::included(100, 500),
            TimeBoundary::excluded(102, 0),
            5,
        );
        assert!(q.sql().contains("timestampMillis >= ? AND timestampMillis < ?"));
        assert!(q.sql().ends_with("LIMIT ?"));
        assert_eq!(
            q.params()[1..],
            [
                Value::Integer(100_500),
                Value::Integer(102_000),
                Value::Integer(5)
            ]
        );

        let q = RangeQuery::build("W1", TimeBoundary::not_set(), TimeBoundary::included(1, 2), 0);
        assert!(q.sql().contains("AND timestampMillis <= ?"));
        assert!(!q.sql().contains(">"));
    }

    #[test]
    fn test_unbounded_returns_all_descending() {
        let conn = seeded();
        let q = RangeQuery::build("W1", TimeBoundary::not_set(), TimeBoundary::not_set(), 0);
        let records = q.run(&conn).unwrap();
        assert_eq!(times(&records), vec![103_999, 102_250, 101_000, 100_500, 100_000]);
        assert!(records.iter().all(|r| r.wellbore_id == "W1"));
    }

    #[test]
    fn test_inclusive_and_exclusive_bounds() {
        let conn = seeded();

        let q = RangeQuery::build(
            "W1",
            TimeBoundary::included(100, 500),
            TimeBoundary::included(102, 250),
            0,
        );
        assert_eq!(times(&q.run(&conn).unwrap()), vec![102_250, 101_000, 100_500]);

        let q = RangeQuery::build(
            "W1",
            TimeBoundary::excluded(100, 500),
            TimeBoundary::excluded(102, 250),
            0,
        );
        assert_eq!(times(&q.run(&conn).unwrap()), vec![101_000]);

        let q = RangeQuery::build("W1", TimeBoundary::excluded(101, 0), TimeBoundary::not_set(), 0);
        assert_eq!(times(&q.run(&conn).unwrap()), vec![103_999, 102_250]);
    }

    #[test]
    fn test_reversed_bounds_are_swapped() {
        let conn = seeded();
        let forward = RangeQuery::build(
            "W1",
            TimeBoundary::included(100, 500),
            TimeBoundary::excluded(103, 0),
            0,
        )
        .run(&conn)
        .unwrap();
        let reversed = RangeQuery::build(
            "W1",
            TimeBoundary::excluded(103, 0),
            TimeBoundary::included(100, 500),
            0,
        )
        .run(&conn)
        .unwrap();
        assert_eq!(forward, reversed);
        assert_eq!(times(&forward), vec![102_250, 101_000, 100_500]);
    }

    #[test]
    fn test_limit_keeps_most_recent() {
        let conn = seeded();
        let q = RangeQuery::build("W1", TimeBoundary::not_set(), TimeBoundary::not_set(), 2);
        assert_eq!(times(&q.run(&conn).unwrap()), vec![103_999, 102_250]);
    }

    #[test]
    fn test_null_payload_decodes_empty() {
        let conn = seeded();
        let q = RangeQuery::build("W1", TimeBoundary::not_set(), TimeBoundary::not_set(), 0);
        let records = q.run(&conn).unwrap();
        let newest = &records[0];
        assert_eq!(newest.timestamp_millis, 103_999);
        assert!(newest.auxiliary.is_empty());
        let with_payload = &records[1];
        assert_eq!(with_payload.auxiliary, vec![3u8; 3]);
    }

    #[test]
    fn test_unknown_wellbore_is_empty() {
        let conn = seeded();
        let q = RangeQuery::build("W9", TimeBoundary::not_set(), TimeBoundary::not_set(), 0);
        assert!(q.run(&conn).unwrap().is_empty());
    }
}
