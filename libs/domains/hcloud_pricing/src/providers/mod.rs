//! Price providers
//!
//! Two implementations of the same capability: the Hetzner Cloud API and the
//! bundled fallback table. The engine decides which one to ask.

pub mod fallback;
pub mod live;

use async_trait::async_trait;

use crate::error::PricingResult;
use crate::models::PriceQuote;
use crate::plan::Attributes;

pub use fallback::FallbackProvider;
pub use live::{HcloudApiConfig, HcloudApiProvider};

/// Terraform type of a Hetzner server
pub const HCLOUD_SERVER: &str = "hcloud_server";

/// Attribute holding the server SKU
pub const SERVER_TYPE_ATTR: &str = "server_type";

/// Attribute holding the location name
pub const LOCATION_ATTR: &str = "location";

/// Map a Terraform resource type to the price table category
pub fn category_for(resource_type: &str) -> Option<&'static str> {
    match resource_type {
        HCLOUD_SERVER => Some("server"),
        _ => None,
    }
}

/// Resolve a price for a resource from its type and attributes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    async fn get_price(
        &self,
        resource_type: &str,
        attributes: &Attributes,
    ) -> PricingResult<PriceQuote>;
}
