//! Core domain logic for the monthly budget tracker.
//! This crate is the single source of truth for period, rollover and
//! aggregation rules.

pub mod budget;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod period;
pub mod repo;
pub mod service;

pub use budget::aggregate::{aggregate, AggregateResult, ServiceUsage};
pub use budget::history::{history, UsageHistory};
pub use budget::ratio::{ratio_text, usage_ratio, width_style};
pub use budget::rollover::{ensure_period_initialized, RolloverOutcome};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BudgetConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{Item, ItemAttribute, ItemDraft, ItemId, NewItem};
pub use model::service::{NewService, Service, ServiceChange, ServiceDraft, ServiceEdit, ServiceId};
pub use model::ValidationError;
pub use period::{current_date, current_period, Period, PeriodParseError};
pub use repo::item_repo::{ItemRepository, SqliteItemRepository};
pub use repo::service_repo::{ServiceRepository, SqliteServiceRepository};
pub use repo::{RepoError, RepoResult};
pub use service::budget_service::{BudgetService, Dashboard, ServiceDetail};
pub use service::item_service::ItemService;
pub use service::{BudgetError, BudgetResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
