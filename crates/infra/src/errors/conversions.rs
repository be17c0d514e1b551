//! Conversions from external infrastructure errors into domain errors.

use calbridge_domain::BridgeError;
use r2d2::Error as PoolError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BridgeError);

impl From<InfraError> for BridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BridgeError> for InfraError {
    fn from(value: BridgeError) -> Self {
        InfraError(value)
    }
}

trait IntoBridgeError {
    fn into_bridge(self) -> BridgeError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for SqlError {
    fn into_bridge(self) -> BridgeError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => BridgeError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        BridgeError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        BridgeError::Database("foreign key constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 1299) => {
                        BridgeError::Database("not null constraint violation".into())
                    }
                    _ => BridgeError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => BridgeError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                BridgeError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                BridgeError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::InvalidPath(path) => BridgeError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => BridgeError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for PoolError {
    fn into_bridge(self) -> BridgeError {
        BridgeError::Database(format!("connection pool error: {self}"))
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(value.into_bridge())
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::ffi;

    use super::*;

    #[test]
    fn busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            ffi::Error { code: ffi::ErrorCode::DatabaseBusy, extended_code: 5 },
            None,
        );
        let mapped: BridgeError = InfraError::from(err).into();
        assert_eq!(mapped, BridgeError::Database("database is busy".into()));
    }

    #[test]
    fn foreign_key_violation_is_named() {
        let err = SqlError::SqliteFailure(
            ffi::Error { code: ffi::ErrorCode::ConstraintViolation, extended_code: 787 },
            Some("FOREIGN KEY constraint failed".into()),
        );
        let mapped: BridgeError = InfraError::from(err).into();
        assert_eq!(mapped, BridgeError::Database("foreign key constraint violation".into()));
    }

    #[test]
    fn no_rows_is_not_found() {
        let mapped: BridgeError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert!(matches!(mapped, BridgeError::NotFound(_)));
    }
}
