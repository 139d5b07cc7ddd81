//! Discount calculations for installment purchases.
//!
//! This module provides the present-value discounting used both for live
//! previews and for the schedules stored with each simulation.

pub mod discount;

pub use discount::{ScheduleTotals, calculate_discount, monthly_rate};
