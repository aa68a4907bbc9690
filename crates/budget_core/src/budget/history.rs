//! Month-over-month totals for trend charts.
//!
//! # Invariants
//! - Periods come from services only.
//! - An item counts toward its derived period whenever that period has any
//!   service; items in periods without services are dropped.
//! - A non-empty series always starts with one synthetic zero point for the
//!   month before the first recorded period.

use super::ratio::{ratio_text, usage_ratio};
use crate::model::item::Item;
use crate::model::service::Service;
use crate::period::Period;
use serde::Serialize;
use std::collections::BTreeMap;

/// Parallel per-period series plus grand totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageHistory {
    /// Ascending periods, padded with the leading zero point.
    pub periods: Vec<Period>,
    pub upper_limits: Vec<i64>,
    pub usages: Vec<i64>,
    pub total_upper_limit: i64,
    pub total_usage: i64,
    pub total_usage_ratio: Option<f64>,
    pub total_usage_ratio_text: String,
}

/// Builds the per-period series from a full snapshot of the store.
pub fn history(services: &[Service], items: &[Item]) -> UsageHistory {
    let mut totals: BTreeMap<Period, (i64, i64)> = BTreeMap::new();
    for service in services {
        totals.entry(service.period).or_insert((0, 0)).0 += service.upper_limit;
    }
    for item in items {
        if let Some(entry) = totals.get_mut(&item.period()) {
            entry.1 += item.item_price;
        }
    }

    let mut periods = Vec::with_capacity(totals.len() + 1);
    let mut upper_limits = Vec::with_capacity(totals.len() + 1);
    let mut usages = Vec::with_capacity(totals.len() + 1);

    if let Some(first) = totals.keys().next() {
        periods.push(first.previous());
        upper_limits.push(0);
        usages.push(0);
    }
    for (period, (limit, usage)) in &totals {
        periods.push(*period);
        upper_limits.push(*limit);
        usages.push(*usage);
    }

    let total_upper_limit = upper_limits.iter().sum();
    let total_usage = usages.iter().sum();
    let ratio = usage_ratio(total_usage, total_upper_limit);

    UsageHistory {
        periods,
        upper_limits,
        usages,
        total_upper_limit,
        total_usage,
        total_usage_ratio: ratio,
        total_usage_ratio_text: ratio_text(ratio),
    }
}
