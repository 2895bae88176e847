//! End-to-end pricing scenarios through the public API
//!
//! The fallback table used here is the one bundled with the crate; live
//! pricing is served by a wiremock stand-in for the Hetzner Cloud API.

use domain_hcloud_pricing::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn plan(changes: serde_json::Value) -> Plan {
    let bytes = serde_json::to_vec(&json!({
        "format_version": "1.2",
        "terraform_version": "1.7.5",
        "resource_changes": changes
    }))
    .unwrap();
    Plan::from_slice(&bytes).unwrap()
}

fn resource(resource_type: &str, name: &str, actions: &[&str], after: serde_json::Value) -> serde_json::Value {
    json!({
        "address": format!("{resource_type}.{name}"),
        "mode": "managed",
        "type": resource_type,
        "name": name,
        "provider_name": "registry.terraform.io/hetznercloud/hcloud",
        "change": { "actions": actions, "before": null, "after": after }
    })
}

fn fallback_engine() -> PricingEngine {
    PricingEngine::new().with_fallback(FallbackProvider::new().unwrap())
}

// ============================================================================
// Fallback-only pricing
// ============================================================================

#[tokio::test]
async fn test_single_server_priced_from_fallback() {
    let plan = plan(json!([resource(
        "hcloud_server",
        "web",
        &["create"],
        json!({ "server_type": "cx11", "location": "nbg1" })
    )]));

    let report = calculate_total(&plan, &fallback_engine()).await;

    assert_eq!(report.items.len(), 1);
    let item = &report.items[0];
    assert_eq!(item.address, "hcloud_server.web");
    assert_eq!(item.quote.source, PriceSource::Fallback);
    assert!((item.quote.monthly - 3.79).abs() < 1e-9);
    assert!((item.quote.hourly - 0.0052).abs() < 1e-9);
    assert_eq!(report.currency, Currency::Eur);
}

#[tokio::test]
async fn test_unknown_server_type_yields_empty_report() {
    let plan = plan(json!([resource(
        "hcloud_server",
        "web",
        &["create"],
        json!({ "server_type": "unknown-cpu" })
    )]));

    let report = calculate_total(&plan, &fallback_engine()).await;

    assert!(report.is_empty());
    assert_eq!(report.total_monthly, 0.0);
    assert_eq!(report.skipped.len(), 1);
}

#[tokio::test]
async fn test_firewall_is_not_priced() {
    let plan = plan(json!([resource(
        "hcloud_firewall",
        "default",
        &["create"],
        json!({ "name": "default" })
    )]));

    let report = calculate_total(&plan, &fallback_engine()).await;

    assert!(report.is_empty());
}

#[tokio::test]
async fn test_delete_only_is_excluded() {
    let plan = plan(json!([resource("hcloud_server", "old", &["delete"], json!(null))]));

    let report = calculate_total(&plan, &fallback_engine()).await;

    assert!(report.is_empty());
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn test_mixed_priceable_and_unpriceable_servers() {
    let plan = plan(json!([
        resource("hcloud_server", "app", &["create"], json!({ "server_type": "cpx11" })),
        resource("hcloud_server", "gpu", &["create"], json!({ "server_type": "unknown-cpu" })),
    ]));

    let report = calculate_total(&plan, &fallback_engine()).await;

    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].address, "hcloud_server.app");
    assert_eq!(report.total_monthly, report.items[0].quote.monthly);
    assert_eq!(report.total_hourly, report.items[0].quote.hourly);
}

#[tokio::test]
async fn test_plan_without_resource_changes() {
    let plan = Plan::from_slice(br#"{"format_version": "1.2", "planned_values": {}}"#).unwrap();

    let report = calculate_total(&plan, &fallback_engine()).await;

    assert!(report.is_empty());
    assert!(report.skipped.is_empty());
}

// ============================================================================
// Live pricing
// ============================================================================

async fn hcloud_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/server_types"))
        .and(query_param("name", "cx22"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "server_types": [{
                "name": "cx22",
                "prices": [{
                    "location": "fsn1",
                    "price_hourly": { "net": "0.0060000000", "gross": "0.0071400000" },
                    "price_monthly": { "net": "3.7900000000", "gross": "4.5101000000" }
                }]
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/server_types"))
        .and(query_param("name", "cx11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "server_types": [] })))
        .mount(&server)
        .await;
    server
}

fn live_provider(server: &MockServer) -> HcloudApiProvider {
    let mut config = HcloudApiConfig::new("test-token".to_string());
    config.api_url = server.uri();
    HcloudApiProvider::new(config).unwrap()
}

#[tokio::test]
async fn test_live_price_is_preferred() {
    let server = hcloud_api().await;
    let engine = fallback_engine().with_live(live_provider(&server));
    let plan = plan(json!([resource(
        "hcloud_server",
        "web",
        &["create"],
        json!({ "server_type": "cx22", "location": "fsn1" })
    )]));

    let report = calculate_total(&plan, &engine).await;

    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].quote.source, PriceSource::Live);
    assert_eq!(report.items[0].quote.monthly, 3.79);
}

#[tokio::test]
async fn test_live_miss_falls_back_per_resource() {
    let server = hcloud_api().await;
    let engine = fallback_engine().with_live(live_provider(&server));
    let plan = plan(json!([
        resource("hcloud_server", "new", &["create"], json!({ "server_type": "cx22" })),
        resource("hcloud_server", "legacy", &["update"], json!({ "server_type": "cx11" })),
    ]));

    let report = calculate_total(&plan, &engine).await;

    let sources: Vec<PriceSource> = report.items.iter().map(|i| i.quote.source).collect();
    assert_eq!(sources, vec![PriceSource::Live, PriceSource::Fallback]);
    assert_eq!(report.total_monthly, 3.79 + 3.79);
}

#[tokio::test]
async fn test_live_outage_without_fallback_skips_resources() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let engine = PricingEngine::new().with_live(live_provider(&server));
    let plan = plan(json!([resource(
        "hcloud_server",
        "web",
        &["create"],
        json!({ "server_type": "cx22" })
    )]));

    let report = calculate_total(&plan, &engine).await;

    assert!(report.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].reason.contains("No price provider"));
}
