use mongodb::error::{CommandError, ErrorKind, WriteError, WriteFailure};
use movies_core::StoreError;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// MySQL `ER_DUP_ENTRY`.
const MYSQL_DUPLICATE_ENTRY: u16 = 1062;
/// PostgreSQL `unique_violation`.
const POSTGRES_UNIQUE_VIOLATION: &str = "23505";
/// MongoDB `DuplicateKey` and its legacy forms.
const MONGO_DUPLICATE_KEY_CODES: [i32; 3] = [11000, 11001, 12582];

/// Whether `err` is a unique-constraint violation.
///
/// Asks the driver first and falls back to the backend's native error
/// code. Error text is never inspected.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    let Some(db_err) = err.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation()
        || db_err
            .try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>()
            .is_some_and(|e| e.number() == MYSQL_DUPLICATE_ENTRY)
        || db_err
            .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
            .is_some_and(|e| e.code() == POSTGRES_UNIQUE_VIOLATION)
}

pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_) => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

/// Whether `err` is a duplicate `_id` (or other unique index) write error.
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    let code = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(WriteError { code, .. })) => *code,
        ErrorKind::Command(CommandError { code, .. }) => *code,
        _ => return false,
    };

    MONGO_DUPLICATE_KEY_CODES.contains(&code)
}

pub(crate) fn map_mongo_error(err: mongodb::error::Error) -> StoreError {
    let message = err.to_string();

    match err.kind.as_ref() {
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::Shutdown => StoreError::Unavailable(message),
        ErrorKind::BsonDeserialization(_) => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_transient() {
        assert!(map_sqlx_error(sqlx::Error::PoolTimedOut).is_transient());
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StoreError::Timeout(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused"
            ))),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn decode_errors_are_invalid_data() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::ColumnNotFound("title".into())),
            StoreError::InvalidData(_)
        ));
    }

    #[test]
    fn other_errors_are_query_errors() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::Protocol("unexpected packet".into())),
            StoreError::Query(_)
        ));
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn mongo_io_errors_are_unavailable() {
        let err = mongodb::error::Error::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(!is_duplicate_key(&err));
        assert!(matches!(map_mongo_error(err), StoreError::Unavailable(_)));
    }

    #[test]
    fn mongo_custom_errors_are_query_errors() {
        let err = mongodb::error::Error::custom("unexpected reply");
        assert!(!is_duplicate_key(&err));
        assert!(matches!(map_mongo_error(err), StoreError::Query(_)));
    }
}
