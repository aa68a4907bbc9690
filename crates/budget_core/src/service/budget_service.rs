//! Service registration, dashboard and history use cases.
//!
//! # Responsibility
//! - Resolve the current period and roll services forward on first access.
//! - Validate and apply service create/edit/delete for the current period.
//! - Feed repository snapshots into the aggregation and history engines.
//!
//! # Invariants
//! - Edits and deletes only ever target the current period.
//! - `dashboard` is the only read path that may insert (via rollover).

use super::{BudgetError, BudgetResult};
use crate::budget::aggregate::{aggregate, AggregateResult, ServiceUsage};
use crate::budget::history::{history, UsageHistory};
use crate::clock::Clock;
use crate::model::item::Item;
use crate::model::service::{Service, ServiceDraft, ServiceEdit};
use crate::model::ValidationError;
use crate::period::{current_period, Period};
use crate::repo::item_repo::ItemRepository;
use crate::repo::service_repo::ServiceRepository;
use log::{info, warn};
use serde::Serialize;

/// Current-period overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub period: Period,
    /// `false` only before the very first service is registered.
    pub has_any_service: bool,
    /// Set when this call cloned services from an earlier period.
    pub rolled_over_from: Option<Period>,
    pub summary: AggregateResult,
}

/// One service's items and usage in one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDetail {
    pub period: Period,
    /// `false` when items reference a service that has no record in the
    /// period; `usage` then reports a zero limit.
    pub registered: bool,
    pub usage: ServiceUsage,
    pub items: Vec<Item>,
}

/// Use-case facade for services, the dashboard and history.
pub struct BudgetService<S: ServiceRepository, I: ItemRepository, C: Clock> {
    services: S,
    items: I,
    clock: C,
}

impl<S: ServiceRepository, I: ItemRepository, C: Clock> BudgetService<S, I, C> {
    pub fn new(services: S, items: I, clock: C) -> Self {
        Self {
            services,
            items,
            clock,
        }
    }

    pub fn current_period(&self) -> Period {
        current_period(&self.clock)
    }

    /// Current period summary, rolling services forward first if needed.
    pub fn dashboard(&self) -> BudgetResult<Dashboard> {
        let period = self.current_period();
        let outcome = self.services.ensure_period_initialized(period)?;
        let items = self.items.list_items(period)?;
        let summary = aggregate(&outcome.services, &items);

        Ok(Dashboard {
            period,
            has_any_service: !outcome.services.is_empty(),
            rolled_over_from: outcome.source_period,
            summary,
        })
    }

    /// Services of the current period, without rolling over.
    pub fn list_services(&self) -> BudgetResult<Vec<Service>> {
        Ok(self.services.list_services(self.current_period())?)
    }

    /// Whether any service has ever been registered.
    pub fn has_any_service(&self) -> BudgetResult<bool> {
        Ok(self.services.any_service_exists()?)
    }

    /// Registers a new service in the current period.
    pub fn register_service(&self, draft: &ServiceDraft) -> BudgetResult<Service> {
        let period = self.current_period();
        let result = self.try_register_service(period, draft);
        match &result {
            Ok(service) => info!(
                "event=service_register module=service status=ok period={} service_id={}",
                period, service.service_id
            ),
            Err(err) => warn!(
                "event=service_register module=service status=rejected period={} error_code={}",
                period,
                err.code()
            ),
        }
        result
    }

    fn try_register_service(&self, period: Period, draft: &ServiceDraft) -> BudgetResult<Service> {
        let new_service = draft.validate(period)?;
        if self
            .services
            .get_service(period, &new_service.service_name)?
            .is_some()
        {
            return Err(ValidationError::DuplicateService {
                period,
                service_name: new_service.service_name,
            }
            .into());
        }
        Ok(self.services.create_service(&new_service)?)
    }

    /// Changes the limit of a current-period service, optionally renaming it.
    ///
    /// Renaming detaches items still recorded under the old name.
    pub fn edit_service(&self, service_name: &str, edit: &ServiceEdit) -> BudgetResult<Service> {
        let period = self.current_period();
        let result = self.try_edit_service(period, service_name, edit);
        match &result {
            Ok(service) => info!(
                "event=service_edit module=service status=ok period={} service_id={}",
                period, service.service_id
            ),
            Err(err) => warn!(
                "event=service_edit module=service status=rejected period={} error_code={}",
                period,
                err.code()
            ),
        }
        result
    }

    fn try_edit_service(
        &self,
        period: Period,
        service_name: &str,
        edit: &ServiceEdit,
    ) -> BudgetResult<Service> {
        let mut change = edit.validate()?;
        if self.services.get_service(period, service_name)?.is_none() {
            return Err(BudgetError::ServiceNotFound {
                period,
                service_name: service_name.to_string(),
            });
        }

        if change.new_name.as_deref() == Some(service_name) {
            change.new_name = None;
        }
        if let Some(new_name) = change.new_name.as_deref() {
            if self.services.get_service(period, new_name)?.is_some() {
                return Err(ValidationError::DuplicateService {
                    period,
                    service_name: new_name.to_string(),
                }
                .into());
            }
        }

        Ok(self.services.update_service(period, service_name, &change)?)
    }

    /// Deletes a current-period service. Its items are left in place.
    pub fn delete_service(&self, service_name: &str) -> BudgetResult<()> {
        let period = self.current_period();
        match self.services.delete_service(period, service_name) {
            Ok(()) => {
                info!("event=service_delete module=service status=ok period={period}");
                Ok(())
            }
            Err(err) => {
                let err = BudgetError::from(err);
                warn!(
                    "event=service_delete module=service status=rejected period={} error_code={}",
                    period,
                    err.code()
                );
                Err(err)
            }
        }
    }

    /// Items and usage of one service in one period.
    ///
    /// An unregistered name is reported as a zero-limit pseudo-service so
    /// orphaned purchases stay visible.
    pub fn service_detail(&self, period: Period, service_name: &str) -> BudgetResult<ServiceDetail> {
        let items = self.items.list_service_items(period, service_name)?;
        let spent: i64 = items.iter().map(|item| item.item_price).sum();
        let service = self.services.get_service(period, service_name)?;

        let (registered, usage) = match service {
            Some(service) => (
                true,
                ServiceUsage::new(service.service_name, spent, service.upper_limit),
            ),
            None => (false, ServiceUsage::new(service_name, spent, 0)),
        };

        Ok(ServiceDetail {
            period,
            registered,
            usage,
            items,
        })
    }

    /// Month-over-month limits and usage across every recorded period.
    pub fn history(&self) -> BudgetResult<UsageHistory> {
        let services = self.services.list_all_services()?;
        let items = self.items.list_all_items()?;
        Ok(history(&services, &items))
    }
}
