//! Plain-text renderers for command output.

use budget_core::{
    BudgetConfig, Dashboard, Item, ItemAttribute, Service, ServiceDetail, UsageHistory,
};
use std::fmt::Write;

pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Budget for {}", dashboard.period);
    if let Some(source) = dashboard.rolled_over_from {
        let _ = writeln!(out, "(services carried over from {source})");
    }
    if !dashboard.has_any_service {
        let _ = writeln!(
            out,
            "No services registered yet. Add one with `budget service add <name> <limit>`."
        );
        return out;
    }

    let summary = &dashboard.summary;
    let _ = writeln!(
        out,
        "{:<24} {:>12} {:>12} {:>8}",
        "SERVICE", "USAGE", "LIMIT", "RATIO"
    );
    for usage in &summary.services {
        let _ = writeln!(
            out,
            "{:<24} {:>12} {:>12} {:>8}",
            usage.service_name, usage.current_usage, usage.upper_limit, usage.usage_ratio_text
        );
    }
    let _ = writeln!(
        out,
        "{:<24} {:>12} {:>12} {:>8}",
        "TOTAL",
        summary.total_current_usage,
        summary.total_upper_limit,
        summary.total_usage_ratio_text
    );
    out
}

pub fn history(history: &UsageHistory) -> String {
    if history.periods.is_empty() {
        return "No history yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<8} {:>12} {:>12}", "MONTH", "LIMIT", "USAGE");
    for ((period, limit), usage) in history
        .periods
        .iter()
        .zip(&history.upper_limits)
        .zip(&history.usages)
    {
        let _ = writeln!(out, "{:<8} {:>12} {:>12}", period, limit, usage);
    }
    let _ = writeln!(
        out,
        "{:<8} {:>12} {:>12} ({})",
        "TOTAL", history.total_upper_limit, history.total_usage, history.total_usage_ratio_text
    );
    out
}

pub fn services(services: &[Service]) -> String {
    if services.is_empty() {
        return "No services in the current month.\n".to_string();
    }

    let mut out = String::new();
    for service in services {
        let _ = writeln!(
            out,
            "{:<24} {:>12}  ({})",
            service.service_name, service.upper_limit, service.period
        );
    }
    out
}

pub fn service_detail(detail: &ServiceDetail) -> String {
    let usage = &detail.usage;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", usage.service_name, detail.period);
    if !detail.registered {
        let _ = writeln!(out, "  not registered for this month");
    }
    let _ = writeln!(
        out,
        "  usage {} / limit {}  {}",
        usage.current_usage, usage.upper_limit, usage.usage_ratio_text
    );
    out.push_str(&items(&detail.items));
    out
}

pub fn items(items: &[Item]) -> String {
    if items.is_empty() {
        return "No items.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<10}  {:<16} {:<24} {:>10}  {}",
        "ID", "DATE", "SERVICE", "ITEM", "PRICE", "ATTRIBUTE"
    );
    for item in items {
        let _ = writeln!(
            out,
            "{:>6}  {:<10}  {:<16} {:<24} {:>10}  {}",
            item.item_id,
            item.purchase_date,
            item.service_name,
            item.item_name,
            item.item_price,
            item.item_attribute.as_str()
        );
    }
    out
}

pub fn attributes(attributes: &[ItemAttribute]) -> String {
    attributes
        .iter()
        .map(|attribute| format!("{}\n", attribute.as_str()))
        .collect()
}

pub fn config(config: &BudgetConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Budget configuration");
    let _ = writeln!(out, "====================");
    let _ = writeln!(out, "Database:  {}", config.database_path.display());
    let _ = writeln!(out, "Log dir:   {}", config.log_dir.display());
    let _ = writeln!(out, "Log level: {}", config.log_level);
    out
}

#[cfg(test)]
mod tests {
    use super::{attributes, history};
    use budget_core::{ItemAttribute, UsageHistory};

    #[test]
    fn attributes_one_per_line() {
        assert_eq!(
            attributes(&[ItemAttribute::Food, ItemAttribute::Other]),
            "food\nother\n"
        );
    }

    #[test]
    fn empty_history_has_placeholder() {
        let empty = UsageHistory {
            periods: Vec::new(),
            upper_limits: Vec::new(),
            usages: Vec::new(),
            total_upper_limit: 0,
            total_usage: 0,
            total_usage_ratio: None,
            total_usage_ratio_text: "-".to_string(),
        };
        assert_eq!(history(&empty), "No history yet.\n");
    }
}
