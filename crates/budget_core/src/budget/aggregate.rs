//! Per-period usage aggregation.
//!
//! # Invariants
//! - Every provided service appears in the output, in input order, even with
//!   zero usage.
//! - An item counts toward a service only when both its `service_name` and
//!   its derived period match; anything else is ignored.

use super::ratio::{ratio_text, usage_ratio, width_style};
use crate::model::item::Item;
use crate::model::service::Service;
use crate::period::Period;
use serde::Serialize;
use std::collections::HashMap;

/// Display-ready usage of one service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceUsage {
    pub service_name: String,
    pub current_usage: i64,
    pub upper_limit: i64,
    /// `None` when `upper_limit` is zero.
    pub usage_ratio: Option<f64>,
    /// `"40.0%"` or `"-"`.
    pub usage_ratio_text: String,
    /// `"width:40.0%"`; may exceed 100%.
    pub width_style: String,
}

impl ServiceUsage {
    pub fn new(service_name: impl Into<String>, current_usage: i64, upper_limit: i64) -> Self {
        let ratio = usage_ratio(current_usage, upper_limit);
        Self {
            service_name: service_name.into(),
            current_usage,
            upper_limit,
            usage_ratio: ratio,
            usage_ratio_text: ratio_text(ratio),
            width_style: width_style(ratio),
        }
    }
}

/// Services of one period combined with their items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub services: Vec<ServiceUsage>,
    pub total_upper_limit: i64,
    pub total_current_usage: i64,
    pub total_usage_ratio: Option<f64>,
    pub total_usage_ratio_text: String,
    pub total_width_style: String,
}

/// Sums item prices per service and derives ratios.
pub fn aggregate(services: &[Service], items: &[Item]) -> AggregateResult {
    let mut spent: HashMap<(Period, &str), i64> = services
        .iter()
        .map(|service| ((service.period, service.service_name.as_str()), 0))
        .collect();

    for item in items {
        if let Some(total) = spent.get_mut(&(item.period(), item.service_name.as_str())) {
            *total += item.item_price;
        }
    }

    let usages: Vec<ServiceUsage> = services
        .iter()
        .map(|service| {
            let current = spent
                .get(&(service.period, service.service_name.as_str()))
                .copied()
                .unwrap_or(0);
            ServiceUsage::new(service.service_name.as_str(), current, service.upper_limit)
        })
        .collect();

    let total_upper_limit: i64 = services.iter().map(|service| service.upper_limit).sum();
    let total_current_usage: i64 = usages.iter().map(|usage| usage.current_usage).sum();
    let total_ratio = usage_ratio(total_current_usage, total_upper_limit);

    AggregateResult {
        services: usages,
        total_upper_limit,
        total_current_usage,
        total_usage_ratio: total_ratio,
        total_usage_ratio_text: ratio_text(total_ratio),
        total_width_style: width_style(total_ratio),
    }
}
