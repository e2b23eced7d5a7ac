use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::payment::PaymentData;

/// A persisted order linking a customer (cpf/email) to a payment transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub cpf: String,
    pub email: String,
    pub transaction_id: String,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer-facing part of a create request.
///
/// `delivered` defaults to `false` and is stored as given on create; later
/// changes go through [`OrderPatch`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    pub cpf: String,
    pub email: String,
    #[serde(default)]
    pub delivered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_data: OrderData,
    pub payment_data: PaymentData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetrieveOrderRequest {
    pub cpf: String,
}

/// Partial replacement of an order. Present fields overwrite, absent fields
/// are left alone. The id is not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered: Option<bool>,
}

/// Selects the first stored order matching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderQuery {
    Id(Uuid),
    Cpf(String),
}

impl OrderQuery {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            OrderQuery::Id(id) => order.id == *id,
            OrderQuery::Cpf(cpf) => order.cpf == *cpf,
        }
    }
}

impl Order {
    pub fn new(data: &OrderData, transaction_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            cpf: data.cpf.clone(),
            email: data.email.clone(),
            transaction_id: transaction_id.into(),
            delivered: data.delivered,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: &OrderPatch) {
        if let Some(cpf) = &patch.cpf {
            self.cpf = cpf.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(tid) = &patch.transaction_id {
            self.transaction_id = tid.clone();
        }
        if let Some(delivered) = patch.delivered {
            self.delivered = delivered;
        }
        self.updated_at = Utc::now();
    }
}
