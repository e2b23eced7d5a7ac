use std::fmt;

use serde::{Deserialize, Serialize};

/// Card payment details. Transient: handed to the payment adapter, never stored.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    /// Amount in cents.
    pub order_price: i64,
    pub order_reference: u64,
    pub card_number: String,
    pub cvv: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub card_holder_name: String,
}

impl PaymentData {
    /// Card number with everything but the last four digits masked.
    pub fn masked_card_number(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().collect();
        let keep = digits.len().saturating_sub(4);
        digits
            .iter()
            .enumerate()
            .map(|(i, c)| if i < keep { '*' } else { *c })
            .collect()
    }
}

impl fmt::Debug for PaymentData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentData")
            .field("order_price", &self.order_price)
            .field("order_reference", &self.order_reference)
            .field("card_number", &self.masked_card_number())
            .field("cvv", &"[REDACTED]")
            .field("expiration_month", &self.expiration_month)
            .field("expiration_year", &self.expiration_year)
            .field("card_holder_name", &self.card_holder_name)
            .finish()
    }
}

/// Identifier the gateway returns for a completed charge.
pub type TransactionId = String;
