//! Present-value discounting of a level installment schedule.
//!
//! A purchase of `price` split into `n` equal monthly installments is worth
//! less than `price` today: each later installment is discounted by one more
//! month of interest.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Effective monthly rate: `(1 + annual / 100)^(1/12) - 1` |
//! | 2    | Nominal installment: `price / n` |
//! | 3    | Discount factor for installment `i`: `(1 + monthly)^(-i)` |
//! | 4    | Discounted value: nominal x factor |
//! | 5    | Discount: nominal - discounted value |
//!
//! # Example
//!
//! ```
//! use installment_core::calculations::{ScheduleTotals, calculate_discount};
//!
//! let results = calculate_discount(1200.0, 12, 12.0);
//!
//! assert_eq!(results.len(), 12);
//! assert_eq!(results[0].original_value, 100.0);
//! assert!((results[0].discounted_value - 99.06).abs() < 0.01);
//! assert!((results[11].discounted_value - 100.0 / 1.12).abs() < 1e-9);
//!
//! let totals = ScheduleTotals::from_results(&results);
//! assert!((totals.total_original - 1200.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::InstallmentResult;

/// Converts an annual nominal rate in percent to the equivalent effective
/// monthly rate (as a fraction, not a percentage).
pub fn monthly_rate(annual_interest_rate: f64) -> f64 {
    (1.0 + annual_interest_rate / 100.0).powf(1.0 / 12.0) - 1.0
}

/// Computes the discount schedule for `price` split into `installment_count`
/// monthly installments at `annual_interest_rate` percent per year.
///
/// The calculation never fails. An `installment_count` of zero yields an
/// empty schedule; non-finite inputs propagate into the values. Callers that
/// accept user input should validate first (the store does).
pub fn calculate_discount(
    price: f64,
    installment_count: u32,
    annual_interest_rate: f64,
) -> Vec<InstallmentResult> {
    debug!(price, installment_count, annual_interest_rate, "calculating discount schedule");

    if installment_count == 0 {
        return Vec::new();
    }

    let growth = 1.0 + monthly_rate(annual_interest_rate);
    let installment_value = price / f64::from(installment_count);

    (1..=installment_count)
        .map(|index| {
            let discount_factor = growth.powf(-f64::from(index));
            let discounted_value = installment_value * discount_factor;
            InstallmentResult {
                installment_index: index,
                original_value: installment_value,
                discounted_value,
                discount: installment_value - discounted_value,
            }
        })
        .collect()
}

/// Column sums of a discount schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    /// Sum of nominal installment values (the purchase price).
    pub total_original: f64,

    /// Present value of the whole schedule.
    pub total_discounted: f64,

    /// Total saved by paying the present value instead of the installments.
    pub total_discount: f64,
}

impl ScheduleTotals {
    pub fn from_results(results: &[InstallmentResult]) -> Self {
        results.iter().fold(Self::default(), |acc, row| Self {
            total_original: acc.total_original + row.original_value,
            total_discounted: acc.total_discounted + row.discounted_value,
            total_discount: acc.total_discount + row.discount,
        })
    }
}
