use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fmt;

#[derive(Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    pub database_url: Option<String>,
    pub payment_gateway_url: Option<String>,
    pub payment_merchant_key: Option<String>,
    pub payment_timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = get("SERVER_PORT").unwrap_or_else(|| "3000".into());
        let payment_timeout_secs = get("PAYMENT_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("PAYMENT_TIMEOUT_SECS is not a number: {raw}"))
            })
            .transpose()?;

        Ok(Self {
            server_port,
            database_url: get("DATABASE_URL"),
            payment_gateway_url: get("PAYMENT_GATEWAY_URL"),
            payment_merchant_key: get("PAYMENT_MERCHANT_KEY"),
            payment_timeout_secs,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_port", &self.server_port)
            .field("database_url", &self.database_url)
            .field("payment_gateway_url", &self.payment_gateway_url)
            .field(
                "payment_merchant_key",
                &self.payment_merchant_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("payment_timeout_secs", &self.payment_timeout_secs)
            .finish()
    }
}
