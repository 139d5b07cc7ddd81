use serde::{Deserialize, Serialize};

/// One row of a discount schedule.
///
/// `installment` is accepted on input for payloads written before the field
/// was renamed to `installmentIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentResult {
    #[serde(alias = "installment")]
    pub installment_index: u32,
    pub original_value: f64,
    pub discounted_value: f64,
    pub discount: f64,
}
