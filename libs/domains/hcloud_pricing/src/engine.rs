use tracing::{debug, warn};

use crate::error::{PricingError, PricingResult};
use crate::models::PriceQuote;
use crate::plan::Attributes;
use crate::providers::PriceProvider;

/// Chooses between the live and fallback providers.
///
/// Policy, in order:
/// 1. ask the live provider when configured and return its quote on success;
/// 2. on any live failure, log it and ask the fallback provider when configured,
///    returning whatever it answers;
/// 3. otherwise fail with [`PricingError::NoProviderAvailable`].
#[derive(Default)]
pub struct PricingEngine {
    live: Option<Box<dyn PriceProvider>>,
    fallback: Option<Box<dyn PriceProvider>>,
}

impl PricingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_live(mut self, provider: impl PriceProvider + 'static) -> Self {
        self.live = Some(Box::new(provider));
        self
    }

    pub fn with_fallback(mut self, provider: impl PriceProvider + 'static) -> Self {
        self.fallback = Some(Box::new(provider));
        self
    }

    pub fn has_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub async fn calculate(
        &self,
        resource_type: &str,
        attributes: &Attributes,
    ) -> PricingResult<PriceQuote> {
        if let Some(live) = &self.live {
            match live.get_price(resource_type, attributes).await {
                Ok(quote) => return Ok(quote),
                Err(e) => warn!(
                    resource_type,
                    provider = live.name(),
                    remote = e.is_remote(),
                    error = %e,
                    "Live price lookup failed, trying fallback"
                ),
            }
        }

        if let Some(fallback) = &self.fallback {
            debug!(resource_type, provider = fallback.name(), "Using fallback price");
            return fallback.get_price(resource_type, attributes).await;
        }

        Err(PricingError::NoProviderAvailable(resource_type.to_string()))
    }
}
