//! JSON card-payment gateway client.

use std::fmt;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use checkout_types::domain::payment::{PaymentData, TransactionId};
use checkout_types::ports::payment_adapter::{PaymentAdapter, PaymentError};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

const MERCHANT_KEY_HEADER: &str = "MerchantKey";
const DECLINED_REASON: &str = "charge refused by gateway";

pub struct HttpPaymentGatewayBuilder {
    base: Url,
    merchant_key: Option<String>,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct HttpPaymentGateway {
    charge_url: Url,
    merchant_key: Option<String>,
    client: reqwest::Client,
}

impl fmt::Debug for HttpPaymentGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPaymentGateway")
            .field("charge_url", &self.charge_url.as_str())
            .field("merchant_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChargeRequest<'a> {
    order_reference: u64,
    amount: i64,
    card: Card<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Card<'a> {
    number: &'a str,
    cvv: &'a str,
    expiration_month: &'a str,
    expiration_year: &'a str,
    holder_name: &'a str,
}

impl<'a> From<&'a PaymentData> for ChargeRequest<'a> {
    fn from(p: &'a PaymentData) -> Self {
        Self {
            order_reference: p.order_reference,
            amount: p.order_price,
            card: Card {
                number: &p.card_number,
                cvv: &p.cvv,
                expiration_month: &p.expiration_month,
                expiration_year: &p.expiration_year,
                holder_name: &p.card_holder_name,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChargeResponse {
    transaction_id: String,
}

impl HttpPaymentGateway {
    /// Charges are posted to `<base_url>/payments`. A base path such as
    /// `https://host/api/v1` is kept whether or not it ends in a slash.
    pub fn builder(base_url: &str) -> anyhow::Result<HttpPaymentGatewayBuilder> {
        let mut base = Url::parse(base_url).context("invalid payment gateway url")?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(HttpPaymentGatewayBuilder {
            base,
            merchant_key: None,
            timeout: None,
            client: None,
        })
    }
}

impl HttpPaymentGatewayBuilder {
    pub fn with_merchant_key(mut self, key: impl Into<String>) -> Self {
        self.merchant_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<HttpPaymentGateway> {
        let charge_url = self
            .base
            .join("payments")
            .context("failed to join payment gateway url")?;

        let client = match self.client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(t) = self.timeout {
                    builder = builder.timeout(t);
                }
                builder.build()?
            }
        };

        Ok(HttpPaymentGateway {
            charge_url,
            merchant_key: self.merchant_key,
            client,
        })
    }
}

#[async_trait]
impl PaymentAdapter for HttpPaymentGateway {
    #[instrument(skip(self, payment), fields(order_reference = payment.order_reference, amount = payment.order_price))]
    async fn pay(&self, payment: &PaymentData) -> Result<TransactionId, PaymentError> {
        let mut request = self
            .client
            .post(self.charge_url.clone())
            .json(&ChargeRequest::from(payment));
        if let Some(key) = &self.merchant_key {
            request = request.header(MERCHANT_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Gateway text is logged, never returned to callers.
            let detail = response.text().await.unwrap_or_default();
            warn!(status = %status, card = %payment.masked_card_number(), %detail, "charge refused by gateway");
            return Err(PaymentError::Declined {
                status: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or(DECLINED_REASON)
                    .to_string(),
            });
        }

        let body: ChargeResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Response(e.to_string()))?;
        debug!(transaction_id = %body.transaction_id, "charge accepted");
        Ok(body.transaction_id)
    }
}
