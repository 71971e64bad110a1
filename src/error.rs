use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::domain::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Order {0} not found")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Dangling reference: {0}")]
    ForeignKey(String),

    #[error("Partial write: {0}")]
    PartialWrite(String),

    #[error("Stored total {stored} of order {order_id} does not match item total {computed}")]
    TotalMismatch {
        order_id: String,
        stored: i64,
        computed: i64,
    },

    #[error("Stored order is invalid: {0}")]
    InvalidRecord(#[from] ValidationError),

    #[error("ORM error")]
    OrmError(#[source] DbErr),
}

impl AppError {
    /// Everything except a missing order is a storage-layer failure.
    pub fn is_persistence(&self) -> bool {
        !matches!(self, AppError::NotFound(_))
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if let Some(sql_err) = err.sql_err() {
            match sql_err {
                SqlErr::UniqueConstraintViolation(message) => return AppError::Duplicate(message),
                SqlErr::ForeignKeyConstraintViolation(message) => return AppError::ForeignKey(message),
                _ => {}
            }
        }
        match err {
            DbErr::RecordNotUpdated => AppError::PartialWrite("row was not updated".into()),
            other => AppError::OrmError(other),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
