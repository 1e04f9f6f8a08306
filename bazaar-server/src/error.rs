//! Unified service-layer error type for bazaar-server
//!
//! `ServiceError` bridges store and database errors (`StoreError`, `sqlx::Error`)
//! and the API-layer error (`AppError`), so handlers can use `?` throughout.

use axum::response::IntoResponse;
use shared::StoreError;
use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::App(e.into())
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Map a sqlx error into a store error.
///
/// Pool exhaustion and broken connections are transport failures; the
/// resolver degrades on them and clients see 503.
pub fn store_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::transport(e)
        }
        _ => StoreError::database(e),
    }
}

/// Like [`store_error`], turning a unique violation into the rejection built
/// by `on_conflict`.
pub fn write_error(e: sqlx::Error, on_conflict: impl FnOnce() -> AppError) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => on_conflict().into(),
        _ => store_error(e),
    }
}
