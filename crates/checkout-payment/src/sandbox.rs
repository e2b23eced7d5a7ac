//! Local stand-in for the card gateway.

use async_trait::async_trait;
use checkout_types::domain::payment::{PaymentData, TransactionId};
use checkout_types::ports::payment_adapter::{PaymentAdapter, PaymentError};
use uuid::Uuid;

/// Approves any positive amount on a Luhn-valid card. Nothing is charged.
#[derive(Debug, Clone, Default)]
pub struct SandboxGateway;

impl SandboxGateway {
    pub fn new() -> Self {
        Self
    }
}

fn luhn_valid(number: &str) -> bool {
    let digits: Option<Vec<u32>> = number.chars().map(|c| c.to_digit(10)).collect();
    let Some(digits) = digits else {
        return false;
    };
    if digits.len() < 12 {
        return false;
    }
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                *d
            }
        })
        .sum();
    sum % 10 == 0
}

#[async_trait]
impl PaymentAdapter for SandboxGateway {
    async fn pay(&self, payment: &PaymentData) -> Result<TransactionId, PaymentError> {
        if payment.order_price <= 0 {
            return Err(PaymentError::Declined {
                status: 422,
                reason: "amount must be positive".into(),
            });
        }
        if !luhn_valid(&payment.card_number) {
            return Err(PaymentError::Declined {
                status: 422,
                reason: "invalid card number".into(),
            });
        }
        let tid = format!("sandbox-{}", Uuid::new_v4());
        tracing::debug!(transaction_id = %tid, card = %payment.masked_card_number(), "sandbox charge approved");
        Ok(tid)
    }
}
