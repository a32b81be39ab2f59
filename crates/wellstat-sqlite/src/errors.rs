use wellstat_core::error::{StoreError, SQLITE_ERROR};

/// Extended result code and message reported by SQLite.
pub(crate) fn sqlite_status(err: &rusqlite::Error) -> (i32, String) {
    match err {
        rusqlite::Error::SqliteFailure(e, msg) => (
            e.extended_code,
            msg.clone().unwrap_or_else(|| e.to_string()),
        ),
        other => (SQLITE_ERROR, other.to_string()),
    }
}

pub(crate) fn open_error(err: rusqlite::Error) -> StoreError {
    let (code, message) = sqlite_status(&err);
    StoreError::Open { code, message }
}

pub(crate) fn schema_error(err: rusqlite::Error) -> StoreError {
    let (code, message) = sqlite_status(&err);
    StoreError::Schema { code, message }
}

pub(crate) fn statement_error(err: rusqlite::Error) -> StoreError {
    let (code, message) = sqlite_status(&err);
    StoreError::Statement { code, message }
}

pub(crate) fn transaction_error(err: rusqlite::Error) -> StoreError {
    let (code, message) = sqlite_status(&err);
    StoreError::Transaction { code, message }
}
