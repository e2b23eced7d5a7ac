use async_trait::async_trait;

use crate::domain::payment::{PaymentData, TransactionId};

#[derive(thiserror::Error, Debug)]
pub enum PaymentError {
    #[error("payment declined ({status}): {reason}")]
    Declined { status: u16, reason: String },

    #[error("payment gateway request failed: {0}")]
    Request(String),

    #[error("payment gateway returned an unreadable response: {0}")]
    Response(String),
}

#[async_trait]
pub trait PaymentAdapter: Send + Sync + 'static {
    async fn pay(&self, payment: &PaymentData) -> Result<TransactionId, PaymentError>;
}
