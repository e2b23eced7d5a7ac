//! checkout-payment: outbound card-payment adapters.

use std::fmt;
use std::time::Duration;

use checkout_types::domain::payment::{PaymentData, TransactionId};
use checkout_types::ports::payment_adapter::{PaymentAdapter, PaymentError};

pub mod http;
pub mod sandbox;

#[derive(Clone, Default)]
pub struct GatewayConfig {
    /// Base url of the remote gateway. `None` selects the sandbox.
    pub url: Option<String>,
    pub merchant_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("url", &self.url)
            .field("merchant_key", &self.merchant_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub enum Gateway {
    Http(http::HttpPaymentGateway),
    Sandbox(sandbox::SandboxGateway),
}

pub fn build_gateway(config: &GatewayConfig) -> anyhow::Result<Gateway> {
    let Some(url) = config.url.as_deref() else {
        tracing::warn!("no payment gateway url configured, charges go to the sandbox");
        return Ok(Gateway::Sandbox(sandbox::SandboxGateway::new()));
    };

    let mut builder = http::HttpPaymentGateway::builder(url)?;
    if let Some(key) = &config.merchant_key {
        builder = builder.with_merchant_key(key.clone());
    }
    if let Some(timeout) = config.timeout {
        builder = builder.with_timeout(timeout);
    }
    let gateway = builder.build()?;
    tracing::info!(url, "payment gateway configured");
    Ok(Gateway::Http(gateway))
}

#[async_trait::async_trait]
impl PaymentAdapter for Gateway {
    async fn pay(&self, payment: &PaymentData) -> Result<TransactionId, PaymentError> {
        match self {
            Gateway::Http(g) => g.pay(payment).await,
            Gateway::Sandbox(g) => g.pay(payment).await,
        }
    }
}
