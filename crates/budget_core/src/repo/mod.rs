//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for services and items.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Every statement uses a fixed column list and positional parameters;
//!   no user value is ever spliced into SQL text.
//! - Repository APIs return semantic errors (`*NotFound`, `DuplicateService`)
//!   in addition to DB transport errors.

pub mod item_repo;
pub mod service_repo;

use crate::db::DbError;
use crate::model::item::ItemId;
use crate::period::Period;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for service/item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    ServiceNotFound {
        period: Period,
        service_name: String,
    },
    ItemNotFound(ItemId),
    /// `(period, service_name)` unique index rejected the write.
    DuplicateService {
        period: Period,
        service_name: String,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ServiceNotFound {
                period,
                service_name,
            } => write!(f, "service `{service_name}` not found for {period}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::DuplicateService {
                period,
                service_name,
            } => write!(f, "service `{service_name}` already exists for {period}"),
            Self::InvalidData(message) => write!(f, "invalid persisted budget data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ServiceNotFound { .. } => None,
            Self::ItemNotFound(_) => None,
            Self::DuplicateService { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
    )
}
