//! Hetzner Cloud Pricing Domain
//!
//! Prices the changes of a Terraform plan with Hetzner Cloud server prices.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ Aggregator  │  ← Filters plan changes, accumulates the cost report
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Engine    │  ← Live first, fallback on any live failure
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Providers  │  ← Hetzner Cloud API / bundled price table
//! └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_hcloud_pricing::{calculate_total, FallbackProvider, Plan, PricingEngine};
//!
//! let plan = Plan::from_path("plan.json")?;
//! let engine = PricingEngine::new().with_fallback(FallbackProvider::new()?);
//! let report = calculate_total(&plan, &engine).await;
//! println!("{:.2} EUR/mo", report.total_monthly);
//! ```

pub mod aggregator;
pub mod engine;
pub mod error;
pub mod models;
pub mod plan;
pub mod providers;

// Re-export commonly used types
pub use aggregator::{HCLOUD_PREFIX, calculate_total};
pub use engine::PricingEngine;
pub use error::{PlanError, PricingError, PricingResult};
pub use models::{
    CostLineItem, CostReport, Currency, PriceQuote, PriceRecord, PriceSource, SkippedResource,
};
pub use plan::{Action, Attributes, Change, Plan, ResourceChange};
pub use providers::{FallbackProvider, HcloudApiConfig, HcloudApiProvider, PriceProvider};
