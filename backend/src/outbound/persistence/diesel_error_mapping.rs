//! Shared Diesel error mapping for the post and follower repositories.

use tracing::debug;

use super::pool::PoolError;
use crate::domain::ports::{FollowerRepositoryError, PostRepositoryError};

/// Port errors with the `Connection`/`Query` pair every repository shares.
pub(crate) trait RepositoryError {
    fn connection(message: String) -> Self;
    fn query(message: String) -> Self;
}

impl RepositoryError for PostRepositoryError {
    fn connection(message: String) -> Self {
        Self::Connection { message }
    }

    fn query(message: String) -> Self {
        Self::Query { message }
    }
}

impl RepositoryError for FollowerRepositoryError {
    fn connection(message: String) -> Self {
        Self::Connection { message }
    }

    fn query(message: String) -> Self {
        Self::Query { message }
    }
}

/// Pool checkout and build failures are connection errors.
pub(crate) fn pool_error<E: RepositoryError>(error: PoolError) -> E {
    map_pool_error(error, E::connection)
}

/// Diesel failures mapped through [`map_diesel_error`].
pub(crate) fn diesel_error<E: RepositoryError>(error: diesel::result::Error) -> E {
    map_diesel_error(
        error,
        |message| E::query(message.to_owned()),
        |message| E::connection(message.to_owned()),
    )
}

fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query/connection constructors.
///
/// `NotFound`, query-builder, and constraint failures are query errors; a
/// closed connection is a connection error.
fn map_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("constraint violated")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}
