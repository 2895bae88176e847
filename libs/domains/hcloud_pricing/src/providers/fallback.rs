//! Fallback provider backed by the price table bundled into the binary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use super::{PriceProvider, SERVER_TYPE_ATTR, category_for};
use crate::error::{PricingError, PricingResult};
use crate::models::{PriceQuote, PriceRecord, PriceSource};
use crate::plan::{Attributes, required_str};

/// Bundled price list (EUR, net)
const FALLBACK_PRICES: &str = include_str!("../../data/fallback_prices.json");

/// Static price table: category -> SKU -> record
#[derive(Debug, Clone)]
pub struct FallbackProvider {
    loaded_at: DateTime<Utc>,
    prices: HashMap<String, HashMap<String, PriceRecord>>,
}

impl FallbackProvider {
    /// Load the bundled table. Failure here is a startup error.
    pub fn new() -> PricingResult<Self> {
        Self::from_json(FALLBACK_PRICES)
    }

    pub fn from_json(raw: &str) -> PricingResult<Self> {
        let records: Vec<PriceRecord> = serde_json::from_str(raw).map_err(|e| {
            PricingError::Configuration(format!("failed to parse fallback prices: {e}"))
        })?;
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<PriceRecord>) -> PricingResult<Self> {
        let mut prices: HashMap<String, HashMap<String, PriceRecord>> = HashMap::new();

        for record in records {
            if record.monthly_net < 0.0 || record.hourly_net < 0.0 {
                return Err(PricingError::Configuration(format!(
                    "negative fallback price for {}/{}",
                    record.category, record.name
                )));
            }
            prices
                .entry(record.category.clone())
                .or_default()
                .insert(record.name.clone(), record);
        }

        debug!(
            categories = prices.len(),
            records = prices.values().map(HashMap::len).sum::<usize>(),
            "Loaded fallback price table"
        );

        Ok(Self {
            loaded_at: Utc::now(),
            prices,
        })
    }

    pub fn lookup(&self, category: &str, name: &str) -> Option<&PriceRecord> {
        self.prices.get(category)?.get(name)
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.prices.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PriceProvider for FallbackProvider {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn get_price(
        &self,
        resource_type: &str,
        attributes: &Attributes,
    ) -> PricingResult<PriceQuote> {
        let category = category_for(resource_type)
            .ok_or_else(|| PricingError::UnsupportedResourceType(resource_type.to_string()))?;
        let server_type = required_str(attributes, SERVER_TYPE_ATTR)?;

        let record = self
            .lookup(category, server_type)
            .ok_or_else(|| PricingError::PriceNotFound(format!("{category}/{server_type}")))?;

        Ok(PriceQuote {
            monthly: record.monthly_net,
            hourly: record.hourly_net,
            source: PriceSource::Fallback,
            as_of: self.loaded_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: serde_json::Value) -> Attributes {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_bundled_table_loads() {
        let provider = FallbackProvider::new().unwrap();

        assert!(!provider.is_empty());
        let cx11 = provider.lookup("server", "cx11").unwrap();
        assert_eq!(cx11.monthly_net, 3.79);
        assert!(provider.lookup("server", "unknown-cpu").is_none());
        assert!(provider.lookup("volume", "cx11").is_none());
    }

    #[tokio::test]
    async fn test_get_price_known_server_types() {
        let provider = FallbackProvider::new().unwrap();

        for (server_type, expected) in [("cx11", 3.79), ("cpx11", 4.35), ("ccx63", 919.00)] {
            let quote = provider
                .get_price("hcloud_server", &attrs(json!({ "server_type": server_type })))
                .await
                .unwrap();
            assert_eq!(quote.monthly, expected, "{server_type}");
            assert_eq!(quote.source, PriceSource::Fallback);
        }
    }

    #[tokio::test]
    async fn test_get_price_is_stable() {
        let provider = FallbackProvider::new().unwrap();
        let attributes = attrs(json!({ "server_type": "cx11" }));

        let first = provider.get_price("hcloud_server", &attributes).await.unwrap();
        let second = provider.get_price("hcloud_server", &attributes).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.as_of, provider.loaded_at());
    }

    #[tokio::test]
    async fn test_get_price_unsupported_type() {
        let provider = FallbackProvider::new().unwrap();

        let err = provider
            .get_price("invalid_type", &Attributes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PricingError::UnsupportedResourceType(t) if t == "invalid_type"));
    }

    #[tokio::test]
    async fn test_get_price_missing_server_type() {
        let provider = FallbackProvider::new().unwrap();

        let err = provider
            .get_price("hcloud_server", &attrs(json!({ "location": "fsn1" })))
            .await
            .unwrap_err();
        assert!(matches!(err, PricingError::MissingAttribute("server_type")));
    }

    #[tokio::test]
    async fn test_get_price_unknown_server_type() {
        let provider = FallbackProvider::new().unwrap();

        let err = provider
            .get_price("hcloud_server", &attrs(json!({ "server_type": "unknown-cpu" })))
            .await
            .unwrap_err();
        assert!(matches!(err, PricingError::PriceNotFound(_)));
        assert!(err.to_string().contains("unknown-cpu"));
    }

    #[test]
    fn test_malformed_dataset_is_configuration_error() {
        let err = FallbackProvider::from_json("{ not a list").unwrap_err();
        assert!(matches!(err, PricingError::Configuration(_)));
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = FallbackProvider::from_json(
            r#"[{ "type": "server", "name": "cx11", "monthly_net": -1.0, "hourly_net": 0.0 }]"#,
        )
        .unwrap_err();
        assert!(matches!(err, PricingError::Configuration(_)));
    }

    #[test]
    fn test_later_record_overrides_earlier() {
        let provider = FallbackProvider::from_records(vec![
            PriceRecord {
                category: "server".to_string(),
                name: "cx11".to_string(),
                monthly_net: 3.29,
                hourly_net: 0.005,
            },
            PriceRecord {
                category: "server".to_string(),
                name: "cx11".to_string(),
                monthly_net: 3.79,
                hourly_net: 0.0052,
            },
        ])
        .unwrap();

        assert_eq!(provider.len(), 1);
        assert_eq!(provider.lookup("server", "cx11").unwrap().monthly_net, 3.79);
    }
}
