//! Service repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `service` table keyed by `(period, service_name)`.
//! - Expose the rollover entry point used on first access to a period.
//!
//! # Invariants
//! - Listings are ordered by `service_id ASC` (creation order).
//! - Deleting a service never touches items that reference its name.

use super::{is_constraint_violation, RepoError, RepoResult};
use crate::budget::rollover::{self, RolloverOutcome};
use crate::model::service::{NewService, Service, ServiceChange};
use crate::period::Period;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(crate) const SERVICE_SELECT_SQL: &str = "SELECT
    service_id,
    year_month,
    service_name,
    upper_limit
FROM service";

/// Repository interface for service records.
pub trait ServiceRepository {
    fn create_service(&self, service: &NewService) -> RepoResult<Service>;
    fn get_service(&self, period: Period, service_name: &str) -> RepoResult<Option<Service>>;
    fn list_services(&self, period: Period) -> RepoResult<Vec<Service>>;
    /// Every service of every period, in creation order.
    fn list_all_services(&self) -> RepoResult<Vec<Service>>;
    /// Whether `period` has at least one service.
    fn service_exists_in(&self, period: Period) -> RepoResult<bool>;
    fn any_service_exists(&self) -> RepoResult<bool>;
    /// Applies a limit change and optional rename to one service.
    fn update_service(
        &self,
        period: Period,
        service_name: &str,
        change: &ServiceChange,
    ) -> RepoResult<Service>;
    fn delete_service(&self, period: Period, service_name: &str) -> RepoResult<()>;
    /// Clones the latest period's services into `period` when it has none.
    fn ensure_period_initialized(&self, period: Period) -> RepoResult<RolloverOutcome>;
}

/// SQLite-backed service repository.
pub struct SqliteServiceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteServiceRepository<'conn> {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ServiceRepository for SqliteServiceRepository<'_> {
    fn create_service(&self, service: &NewService) -> RepoResult<Service> {
        let inserted = self.conn.execute(
            "INSERT INTO service (
                year_month,
                service_name,
                upper_limit
            ) VALUES (?1, ?2, ?3);",
            params![
                service.period.to_string(),
                service.service_name.as_str(),
                service.upper_limit,
            ],
        );

        match inserted {
            Ok(_) => Ok(Service {
                service_id: self.conn.last_insert_rowid(),
                period: service.period,
                service_name: service.service_name.clone(),
                upper_limit: service.upper_limit,
            }),
            Err(err) if is_constraint_violation(&err) => Err(RepoError::DuplicateService {
                period: service.period,
                service_name: service.service_name.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn get_service(&self, period: Period, service_name: &str) -> RepoResult<Option<Service>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SERVICE_SELECT_SQL}
             WHERE year_month = ?1
               AND service_name = ?2;"
        ))?;
        let mut rows = stmt.query(params![period.to_string(), service_name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_service_row(row)?));
        }
        Ok(None)
    }

    fn list_services(&self, period: Period) -> RepoResult<Vec<Service>> {
        list_services_in(self.conn, period)
    }

    fn list_all_services(&self) -> RepoResult<Vec<Service>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SERVICE_SELECT_SQL} ORDER BY service_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut services = Vec::new();
        while let Some(row) = rows.next()? {
            services.push(parse_service_row(row)?);
        }
        Ok(services)
    }

    fn service_exists_in(&self, period: Period) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM service WHERE year_month = ?1);",
            [period.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn any_service_exists(&self) -> RepoResult<bool> {
        let exists: i64 =
            self.conn
                .query_row("SELECT EXISTS(SELECT 1 FROM service);", [], |row| row.get(0))?;
        Ok(exists == 1)
    }

    fn update_service(
        &self,
        period: Period,
        service_name: &str,
        change: &ServiceChange,
    ) -> RepoResult<Service> {
        let target_name = change.new_name.as_deref().unwrap_or(service_name);
        let updated = self
            .conn
            .query_row(
                "UPDATE service
                 SET
                    service_name = ?1,
                    upper_limit = ?2
                 WHERE year_month = ?3
                   AND service_name = ?4
                 RETURNING service_id, year_month, service_name, upper_limit;",
                params![
                    target_name,
                    change.upper_limit,
                    period.to_string(),
                    service_name
                ],
                |row| Ok(parse_service_row(row)),
            )
            .optional();

        match updated {
            Ok(Some(service)) => service,
            Ok(None) => Err(RepoError::ServiceNotFound {
                period,
                service_name: service_name.to_string(),
            }),
            Err(err) if is_constraint_violation(&err) => Err(RepoError::DuplicateService {
                period,
                service_name: target_name.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn delete_service(&self, period: Period, service_name: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM service
             WHERE year_month = ?1
               AND service_name = ?2;",
            params![period.to_string(), service_name],
        )?;

        if changed == 0 {
            return Err(RepoError::ServiceNotFound {
                period,
                service_name: service_name.to_string(),
            });
        }

        Ok(())
    }

    fn ensure_period_initialized(&self, period: Period) -> RepoResult<RolloverOutcome> {
        rollover::ensure_period_initialized(self.conn, period)
    }
}

pub(crate) fn list_services_in(conn: &Connection, period: Period) -> RepoResult<Vec<Service>> {
    let mut stmt = conn.prepare(&format!(
        "{SERVICE_SELECT_SQL}
         WHERE year_month = ?1
         ORDER BY service_id ASC;"
    ))?;
    let mut rows = stmt.query([period.to_string()])?;
    let mut services = Vec::new();
    while let Some(row) = rows.next()? {
        services.push(parse_service_row(row)?);
    }
    Ok(services)
}

pub(crate) fn parse_service_row(row: &Row<'_>) -> RepoResult<Service> {
    let period_text: String = row.get("year_month")?;
    let period = period_text.parse::<Period>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid period `{period_text}` in service.year_month"
        ))
    })?;

    Ok(Service {
        service_id: row.get("service_id")?,
        period,
        service_name: row.get("service_name")?,
        upper_limit: row.get("upper_limit")?,
    })
}
