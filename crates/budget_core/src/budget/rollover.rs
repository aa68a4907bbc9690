//! Carry service definitions forward into a period that has none yet.
//!
//! # Responsibility
//! - On first access to a period, clone the services of the period owning
//!   the most recently created service row.
//!
//! # Invariants
//! - A populated period is never modified.
//! - The check and the clone run inside one `IMMEDIATE` transaction, and
//!   inserts are `OR IGNORE` against the `(year_month, service_name)` unique
//!   index, so concurrent callers cannot duplicate rows.
//! - Either every cloned row becomes visible or none does.

use crate::model::service::Service;
use crate::period::Period;
use crate::repo::service_repo::list_services_in;
use crate::repo::{RepoError, RepoResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::Serialize;
use std::time::Instant;

/// What `ensure_period_initialized` found or did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolloverOutcome {
    pub period: Period,
    /// Services of `period` after the call.
    pub services: Vec<Service>,
    /// Period the services were cloned from; `None` when nothing was cloned.
    pub source_period: Option<Period>,
    /// Rows inserted by this call.
    pub inserted: usize,
}

impl RolloverOutcome {
    fn unchanged(period: Period, services: Vec<Service>) -> Self {
        Self {
            period,
            services,
            source_period: None,
            inserted: 0,
        }
    }
}

/// Returns the services of `period`, cloning them forward first if needed.
///
/// The source is the period of the row with the highest `service_id`, not
/// the lexicographically latest period. With an empty store nothing is
/// inserted and the result is empty.
pub fn ensure_period_initialized(conn: &Connection, period: Period) -> RepoResult<RolloverOutcome> {
    let existing = list_services_in(conn, period)?;
    if !existing.is_empty() {
        return Ok(RolloverOutcome::unchanged(period, existing));
    }

    let started_at = Instant::now();
    match clone_forward(conn, period) {
        Ok(outcome) => {
            if let Some(source) = outcome.source_period {
                info!(
                    "event=period_rollover module=budget status=ok period={} source_period={} inserted={} duration_ms={}",
                    period,
                    source,
                    outcome.inserted,
                    started_at.elapsed().as_millis()
                );
            }
            Ok(outcome)
        }
        Err(err) => {
            error!(
                "event=period_rollover module=budget status=error period={} duration_ms={} error={}",
                period,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn clone_forward(conn: &Connection, period: Period) -> RepoResult<RolloverOutcome> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    // Another caller may have finished the clone while we waited for the lock.
    let existing = list_services_in(&tx, period)?;
    if !existing.is_empty() {
        tx.commit()?;
        return Ok(RolloverOutcome::unchanged(period, existing));
    }

    let newest: Option<String> = tx
        .query_row(
            "SELECT year_month
             FROM service
             ORDER BY service_id DESC
             LIMIT 1;",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let Some(source_text) = newest else {
        tx.commit()?;
        return Ok(RolloverOutcome::unchanged(period, Vec::new()));
    };
    let source_period = source_text.parse::<Period>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid period `{source_text}` in service.year_month"
        ))
    })?;

    let inserted = tx.execute(
        "INSERT OR IGNORE INTO service (
            year_month,
            service_name,
            upper_limit
        )
        SELECT ?1, service_name, upper_limit
        FROM service
        WHERE year_month = ?2
        ORDER BY service_id ASC;",
        params![period.to_string(), source_period.to_string()],
    )?;

    let services = list_services_in(&tx, period)?;
    tx.commit()?;

    Ok(RolloverOutcome {
        period,
        services,
        source_period: Some(source_period),
        inserted,
    })
}
