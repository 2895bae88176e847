//! Plan cost aggregation.

use tracing::{debug, info, instrument};

use crate::engine::PricingEngine;
use crate::models::{CostLineItem, CostReport};
use crate::plan::Plan;

/// Terraform type prefix of Hetzner Cloud resources
pub const HCLOUD_PREFIX: &str = "hcloud_";

/// Price every created or updated Hetzner resource of a plan.
///
/// Never fails: resources the engine cannot price are left out of the items
/// and totals and recorded in [`CostReport::skipped`]. Resources are priced one
/// after another in plan order.
#[instrument(skip_all, fields(resource_changes = plan.resource_changes.len()))]
pub async fn calculate_total(plan: &Plan, engine: &PricingEngine) -> CostReport {
    let mut report = CostReport::new();

    for change in &plan.resource_changes {
        if !change.is_priceable_change() {
            continue;
        }
        if !change.resource_type.starts_with(HCLOUD_PREFIX) {
            continue;
        }

        match engine.calculate(&change.resource_type, change.after()).await {
            Ok(quote) => {
                debug!(
                    address = %change.address,
                    monthly = quote.monthly,
                    source = %quote.source,
                    "Priced resource"
                );
                report.add_item(CostLineItem::new(change, quote));
            }
            Err(e) => {
                debug!(address = %change.address, error = %e, "Skipping resource");
                report.add_skipped(change, e);
            }
        }
    }

    info!(
        priced = report.items.len(),
        skipped = report.skipped.len(),
        total_monthly = report.total_monthly,
        "Cost estimate complete"
    );

    report
}
