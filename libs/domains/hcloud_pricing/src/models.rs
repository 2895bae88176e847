use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::plan::ResourceChange;

/// Report currency. Hetzner bills in EUR and no conversion is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
}

/// Where a quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    #[strum(to_string = "Hetzner API")]
    Live,
    #[strum(to_string = "Fallback (Embedded)")]
    Fallback,
}

/// Entry of the bundled fallback price table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Resource family, e.g. `server`
    #[serde(rename = "type")]
    pub category: String,
    /// Provider SKU, e.g. `cx11`
    pub name: String,
    pub monthly_net: f64,
    pub hourly_net: f64,
}

/// Resolved price for one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub monthly: f64,
    pub hourly: f64,
    pub source: PriceSource,
    /// Load time of the fallback table, or query time for live prices
    pub as_of: DateTime<Utc>,
}

/// A priced resource in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    pub address: String,
    pub resource_type: String,
    pub name: String,
    #[serde(flatten)]
    pub quote: PriceQuote,
}

impl CostLineItem {
    pub fn new(change: &ResourceChange, quote: PriceQuote) -> Self {
        Self {
            address: change.address.clone(),
            resource_type: change.resource_type.clone(),
            name: change.name.clone(),
            quote,
        }
    }
}

/// A qualifying resource that could not be priced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedResource {
    pub address: String,
    pub resource_type: String,
    pub reason: String,
}

/// Priced plan. Items keep plan order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostReport {
    pub items: Vec<CostLineItem>,
    pub total_monthly: f64,
    pub total_hourly: f64,
    pub currency: Currency,
    /// Diagnostics only; renderers do not show these
    pub skipped: Vec<SkippedResource>,
}

impl CostReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item and fold it into the totals
    pub fn add_item(&mut self, item: CostLineItem) {
        self.total_monthly += item.quote.monthly;
        self.total_hourly += item.quote.hourly;
        self.items.push(item);
    }

    pub fn add_skipped(&mut self, change: &ResourceChange, reason: impl ToString) {
        self.skipped.push(SkippedResource {
            address: change.address.clone(),
            resource_type: change.resource_type.clone(),
            reason: reason.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
