//! Live provider querying the Hetzner Cloud API.
//!
//! https://docs.hetzner.cloud/#server-types-get-all-server-types

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{HCLOUD_SERVER, LOCATION_ATTR, PriceProvider, SERVER_TYPE_ATTR};
use crate::error::{PricingError, PricingResult};
use crate::models::{PriceQuote, PriceSource};
use crate::plan::{Attributes, optional_str, required_str};

/// Hetzner Cloud API endpoint
pub const HCLOUD_API_URL: &str = "https://api.hetzner.cloud/v1";

/// Hetzner Cloud API configuration
#[derive(Debug, Clone)]
pub struct HcloudApiConfig {
    /// API token with read access
    pub token: String,
    /// API base URL (defaults to production)
    pub api_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl HcloudApiConfig {
    pub fn new(token: String) -> Self {
        Self {
            token,
            api_url: HCLOUD_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ServerTypesResponse {
    #[serde(default)]
    server_types: Vec<ServerType>,
}

#[derive(Debug, Deserialize)]
struct ServerType {
    name: String,
    #[serde(default)]
    prices: Vec<ServerTypePrice>,
}

#[derive(Debug, Deserialize)]
struct ServerTypePrice {
    location: String,
    price_hourly: PriceAmount,
    price_monthly: PriceAmount,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // gross is part of the payload but unused
struct PriceAmount {
    net: String,
    gross: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Hetzner Cloud API price provider
pub struct HcloudApiProvider {
    config: HcloudApiConfig,
    client: Client,
}

impl HcloudApiProvider {
    pub fn new(config: HcloudApiConfig) -> PricingResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("hcloud-cost/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { config, client })
    }

    async fn fetch_server_type(&self, name: &str) -> PricingResult<ServerType> {
        let url = format!(
            "{}/server_types?name={}",
            self.config.api_url.trim_end_matches('/'),
            urlencoding::encode(name)
        );
        debug!(server_type = name, "Querying Hetzner Cloud API");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(PricingError::RemoteStatus {
                status: status.as_u16(),
                message,
            });
        }

        let data: ServerTypesResponse = response.json().await?;

        data.server_types
            .into_iter()
            .find(|st| st.name == name)
            .ok_or_else(|| PricingError::ResourceNotFound(format!("server type {name}")))
    }
}

fn parse_net(amount: &PriceAmount) -> PricingResult<f64> {
    amount
        .net
        .trim()
        .parse()
        .map_err(|_| PricingError::MalformedRemotePrice(amount.net.clone()))
}

#[async_trait]
impl PriceProvider for HcloudApiProvider {
    fn name(&self) -> &'static str {
        "hcloud-api"
    }

    async fn get_price(
        &self,
        resource_type: &str,
        attributes: &Attributes,
    ) -> PricingResult<PriceQuote> {
        if resource_type != HCLOUD_SERVER {
            return Err(PricingError::UnsupportedResourceType(resource_type.to_string()));
        }
        let server_type = required_str(attributes, SERVER_TYPE_ATTR)?;
        let location = optional_str(attributes, LOCATION_ATTR)?;

        let st = self.fetch_server_type(server_type).await?;

        // Without a location the first entry in API order is used
        let price = st
            .prices
            .iter()
            .find(|p| location.is_none_or(|loc| p.location == loc))
            .ok_or_else(|| match location {
                Some(loc) => PricingError::PriceNotFound(format!("{server_type} in {loc}")),
                None => PricingError::PriceNotFound(server_type.to_string()),
            })?;

        let quote = PriceQuote {
            monthly: parse_net(&price.price_monthly)?,
            hourly: parse_net(&price.price_hourly)?,
            source: PriceSource::Live,
            as_of: Utc::now(),
        };

        info!(
            server_type,
            location = %price.location,
            monthly = quote.monthly,
            "Resolved live price"
        );

        Ok(quote)
    }
}
