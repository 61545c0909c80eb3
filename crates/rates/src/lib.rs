//! reqwest implementation of the engine's [`RateLookup`] capability.
//!
//! The exchange API answers, for a given base currency, a map of rates per
//! counter currency; only the reference-currency entry is used. Every
//! failure mode ends up as a [`RateError`], which the engine turns into a
//! graceful fallback to the reference currency.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use engine::{
    Currency,
    store::{RateError, RateLookup},
};

/// Body of the exchange API response.
#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    #[serde(default)]
    data: HashMap<String, f64>,
}

/// HTTP client for the remote conversion-rate API.
#[derive(Clone, Debug)]
pub struct RateClient {
    http: reqwest::Client,
    base_url: Url,
    path: String,
    api_key: String,
}

impl RateClient {
    pub fn new(base_url: &str, path: &str, api_key: &str) -> Result<Self, RateError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| RateError::new(format!("invalid rates base url: {err}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            path: path.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, target: &Currency) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&self.path);
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("base_currency", target.code());
        url
    }
}

#[async_trait]
impl RateLookup for RateClient {
    async fn rate(&self, target: &Currency) -> Result<f64, RateError> {
        let response = self
            .http
            .get(self.endpoint(target))
            .send()
            .await
            .map_err(RateError::new)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::new(format!("exchange api returned {status}")));
        }

        let body: ExchangeResponse = response.json().await.map_err(RateError::new)?;

        body.data
            .get(Currency::REFERENCE_CODE)
            .copied()
            .ok_or_else(|| {
                RateError::new(format!(
                    "no {} rate in exchange response",
                    Currency::REFERENCE_CODE
                ))
            })
    }
}
