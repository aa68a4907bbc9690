//! Budget aggregation and rollover engine.
//!
//! # Responsibility
//! - `aggregate`: per-service and total usage for one period.
//! - `history`: per-period totals across every recorded period.
//! - `rollover`: clone the latest period's services into an empty period.
//! - `ratio`: usage ratio arithmetic and display formatting.
//!
//! # Invariants
//! - `aggregate`, `history` and `ratio` are pure; only `rollover` touches
//!   the store.
//! - Items are matched to services by name and derived period only.

pub mod aggregate;
pub mod history;
pub mod ratio;
pub mod rollover;
