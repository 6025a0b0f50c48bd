use scylla::deserialize::DeserializationError;
use scylla::errors::{ExecutionError, IntoRowsResultError, MaybeFirstRowError, RowsError};
use thiserror::Error;

/// Failures surfaced by the data mappers.
#[derive(Debug, Error)]
pub enum MapperError {
    /// A point lookup matched no row.
    #[error("no row matches the requested key")]
    NotFound,
    /// A paging call was made with no scan in flight.
    #[error("no active paged query, start a scan with find_all first")]
    NoActiveQuery,
    /// The store rejected or failed the request.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A driver or row-mapping failure, with the original cause preserved.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query execution failed")]
    Execution(#[from] ExecutionError),
    #[error("result carries no row set")]
    Rows(#[from] IntoRowsResultError),
    #[error("result rows have an unexpected shape")]
    RowShape(#[from] RowsError),
    #[error("first-row access failed")]
    FirstRow(#[from] MaybeFirstRowError),
    #[error("row deserialization failed")]
    Deserialize(#[from] DeserializationError),
    #[error("unknown user status code {0:?}")]
    UnknownStatus(String),
}
