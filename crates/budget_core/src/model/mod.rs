//! Budget domain model.
//!
//! # Responsibility
//! - Define services (per-period spending caps) and items (purchases).
//! - Turn raw user input drafts into validated insert payloads.
//!
//! # Invariants
//! - `(period, service_name)` identifies at most one service.
//! - Items link to services by name and derived period only.

pub mod item;
pub mod service;

use crate::period::Period;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected user input. No mutation is performed when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is blank after trimming.
    EmptyField(&'static str),
    /// Upper limit is not a positive integer.
    InvalidUpperLimit(String),
    /// Item price is not a non-negative integer.
    InvalidPrice(String),
    /// Purchase date is not a valid `YYYY-MM-DD` date.
    InvalidPurchaseDate(String),
    /// Attribute is not part of the fixed category list.
    InvalidAttribute(String),
    /// A service with this name already exists in the period.
    DuplicateService {
        period: Period,
        service_name: String,
    },
    /// An item with this name was already bought under the service.
    DuplicateItem {
        service_name: String,
        item_name: String,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` must not be empty"),
            Self::InvalidUpperLimit(value) => {
                write!(f, "upper limit must be a positive integer, got `{value}`")
            }
            Self::InvalidPrice(value) => {
                write!(f, "item price must be a non-negative integer, got `{value}`")
            }
            Self::InvalidPurchaseDate(value) => {
                write!(f, "purchase date must be YYYY-MM-DD, got `{value}`")
            }
            Self::InvalidAttribute(value) => write!(f, "unknown item attribute `{value}`"),
            Self::DuplicateService {
                period,
                service_name,
            } => write!(
                f,
                "a service named `{service_name}` already exists for {period}"
            ),
            Self::DuplicateItem {
                service_name,
                item_name,
            } => write!(
                f,
                "an item named `{item_name}` was already purchased with `{service_name}`"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Returns the trimmed value, or `EmptyField` when nothing is left.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(trimmed.to_string())
    }
}
