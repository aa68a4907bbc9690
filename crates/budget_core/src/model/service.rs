//! Service domain model.
//!
//! # Responsibility
//! - Represent one recurring cost category scoped to a single period.
//! - Validate registration and edit input.
//!
//! # Invariants
//! - `upper_limit` of newly validated input is strictly positive.
//! - Persisted rows may still carry a zero limit; ratio code must cope.

use super::{require_text, ValidationError};
use crate::period::Period;
use serde::{Deserialize, Serialize};

/// Autoincrement surrogate key; larger means created later.
pub type ServiceId = i64;

/// Persisted service record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: ServiceId,
    pub period: Period,
    pub service_name: String,
    /// Monthly spending cap in whole monetary units.
    pub upper_limit: i64,
}

/// Validated payload for inserting one service row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewService {
    pub period: Period,
    pub service_name: String,
    pub upper_limit: i64,
}

/// Raw registration input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDraft {
    pub service_name: String,
    pub upper_limit: String,
}

impl ServiceDraft {
    pub fn new(service_name: impl Into<String>, upper_limit: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            upper_limit: upper_limit.into(),
        }
    }

    /// Validates the draft and scopes it to `period`.
    pub fn validate(&self, period: Period) -> Result<NewService, ValidationError> {
        let service_name = require_text("service_name", &self.service_name)?;
        let upper_limit = parse_upper_limit(&self.upper_limit)?;
        Ok(NewService {
            period,
            service_name,
            upper_limit,
        })
    }
}

/// Raw edit input. `new_name = None` keeps the current name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceEdit {
    pub new_name: Option<String>,
    pub upper_limit: String,
}

/// Validated edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceChange {
    pub new_name: Option<String>,
    pub upper_limit: i64,
}

impl ServiceEdit {
    pub fn validate(&self) -> Result<ServiceChange, ValidationError> {
        let upper_limit = parse_upper_limit(&self.upper_limit)?;
        let new_name = match self.new_name.as_deref() {
            Some(name) => Some(require_text("service_name", name)?),
            None => None,
        };
        Ok(ServiceChange {
            new_name,
            upper_limit,
        })
    }
}

fn parse_upper_limit(value: &str) -> Result<i64, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("upper_limit"));
    }
    match trimmed.parse::<i64>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ValidationError::InvalidUpperLimit(trimmed.to_string())),
    }
}
