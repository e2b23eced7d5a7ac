//! Typed client for the checkout HTTP API.

use std::time::Duration;

use anyhow::Context;
use checkout_types::domain::order::{CreateOrderRequest, Order, OrderPatch};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Clone)]
pub struct CheckoutClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct CheckoutClient {
    base: Url,
    client: reqwest::Client,
}

/// Non-2xx answer from the service, with the `message` or `error` it carried.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("checkout api returned {status}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl CheckoutClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<CheckoutClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(CheckoutClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    pub async fn create_order(&self, req: &CreateOrderRequest) -> anyhow::Result<Order> {
        let res = self.client.post(self.url("orders")?).json(req).send().await?;
        read_json(res).await
    }

    /// First order stored for the cpf.
    pub async fn get_order(&self, cpf: &str) -> anyhow::Result<Order> {
        let res = self
            .client
            .get(self.url(&format!("orders/{cpf}"))?)
            .send()
            .await?;
        read_json(res).await
    }

    pub async fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        let res = self.client.get(self.url("orders")?).send().await?;
        read_json(res).await
    }

    pub async fn update_order(&self, id: &str, patch: &OrderPatch) -> anyhow::Result<Order> {
        let res = self
            .client
            .patch(self.url(&format!("orders/{id}"))?)
            .json(patch)
            .send()
            .await?;
        read_json(res).await
    }

    pub async fn mark_delivered(&self, id: &str) -> anyhow::Result<Order> {
        self.update_order(
            id,
            &OrderPatch {
                delivered: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete_order(&self, id: &str) -> anyhow::Result<()> {
        let res = self
            .client
            .delete(self.url(&format!("orders/{id}"))?)
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }
}

async fn check(res: Response) -> anyhow::Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body: ErrorBody = res.json().await.unwrap_or_default();
    let message = body
        .message
        .or(body.error)
        .unwrap_or_else(|| status.to_string());
    tracing::debug!(status = %status, %message, "checkout api error");
    Err(ApiError {
        status: status.as_u16(),
        message,
    }
    .into())
}

async fn read_json<T: DeserializeOwned>(res: Response) -> anyhow::Result<T> {
    Ok(check(res).await?.json().await?)
}

impl CheckoutClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<CheckoutClient> {
        if let Some(client) = self.client {
            return Ok(CheckoutClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(CheckoutClient {
            base: self.base,
            client,
        })
    }
}
