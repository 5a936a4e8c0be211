use sqlx::error::ErrorKind;

use crate::application::ports::user_repository::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
}

/// Reads the driver's constraint classification, if the error carries one.
pub(crate) fn violation_of(err: &sqlx::Error) -> Option<Violation> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    match db_err.kind() {
        ErrorKind::UniqueViolation => Some(Violation::Unique),
        ErrorKind::ForeignKeyViolation => Some(Violation::ForeignKey),
        _ => None,
    }
}

pub(crate) fn db_operation(err: sqlx::Error) -> StoreError {
    StoreError::DatabaseOperation(err.into())
}

pub(crate) fn scan_failed(err: sqlx::Error) -> StoreError {
    StoreError::DataScanFailed(err.into())
}
