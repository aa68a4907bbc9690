//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and the budget engine into the
//!   operations a front end needs (dashboard, registration, history).
//! - Keep CLI/UI layers decoupled from storage details.
//!
//! # Invariants
//! - Every rejection is a `BudgetError`; nothing panics on user input.
//! - Validation and duplicate checks happen before any mutation.

pub mod budget_service;
pub mod item_service;

use crate::model::item::ItemId;
use crate::model::ValidationError;
use crate::period::Period;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BudgetResult<T> = Result<T, BudgetError>;

/// Error returned by use-case services.
#[derive(Debug)]
pub enum BudgetError {
    /// Input rejected; nothing was written.
    Validation(ValidationError),
    /// No service with this name in the period.
    ServiceNotFound {
        period: Period,
        service_name: String,
    },
    /// No item with this id.
    ItemNotFound(ItemId),
    /// Items can only be registered once the period has a service.
    NoServicesInPeriod(Period),
    /// Persistence failure.
    Store(RepoError),
}

impl Display for BudgetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ServiceNotFound {
                period,
                service_name,
            } => write!(f, "service `{service_name}` not found for {period}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::NoServicesInPeriod(period) => write!(
                f,
                "no services registered for {period}; register a service first"
            ),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BudgetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for BudgetError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for BudgetError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ServiceNotFound {
                period,
                service_name,
            } => Self::ServiceNotFound {
                period,
                service_name,
            },
            RepoError::ItemNotFound(id) => Self::ItemNotFound(id),
            RepoError::DuplicateService {
                period,
                service_name,
            } => Self::Validation(ValidationError::DuplicateService {
                period,
                service_name,
            }),
            other => Self::Store(other),
        }
    }
}

impl BudgetError {
    /// Short stable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::ServiceNotFound { .. } => "service_not_found",
            Self::ItemNotFound(_) => "item_not_found",
            Self::NoServicesInPeriod(_) => "no_services",
            Self::Store(_) => "store",
        }
    }
}
