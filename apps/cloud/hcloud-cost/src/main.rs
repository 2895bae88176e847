//! hcloud-cost
//!
//! Estimates Hetzner Cloud costs from a Terraform plan (JSON) and optionally
//! posts the estimate as a pull-request comment.

use clap::Parser;
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_hcloud_pricing::{
    FallbackProvider, HcloudApiProvider, Plan, PricingEngine, calculate_total,
};
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

mod config;
mod github;
mod report;

use config::Config;
use github::GithubCommenter;
use report::{render_console, render_markdown};

#[derive(Parser)]
#[command(name = "hcloud-cost", version)]
#[command(about = "Estimate Hetzner Cloud costs from Terraform plans")]
struct Cli {
    /// Path to the Terraform plan JSON file (`terraform show -json`)
    #[arg(short, long, env = "PLAN_PATH")]
    plan: PathBuf,

    /// Hetzner Cloud API token (HCLOUD_TOKEN takes precedence)
    #[arg(short, long)]
    token: Option<String>,

    /// Do not post the estimate to the pull request
    #[arg(long)]
    no_comment: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    init_tracing(&Environment::from_env());

    let config = Config::load(cli.plan, cli.token, !cli.no_comment)
        .wrap_err("Failed to load configuration")?;

    info!(plan_path = %config.plan_path.display(), "Starting cost estimate");

    let plan = Plan::from_path(&config.plan_path)
        .wrap_err_with(|| format!("Failed to parse plan {}", config.plan_path.display()))?;
    info!(
        resource_changes = plan.resource_changes.len(),
        "Plan parsed successfully"
    );

    let fallback = FallbackProvider::new().wrap_err("Failed to load fallback prices")?;
    let mut engine = PricingEngine::new().with_fallback(fallback);

    match config.hcloud.api_config() {
        Some(api_config) => {
            info!("Initializing Hetzner Cloud API client");
            engine = engine.with_live(
                HcloudApiProvider::new(api_config)
                    .wrap_err("Failed to build Hetzner Cloud API client")?,
            );
        }
        None => warn!("HCLOUD_TOKEN not set, using fallback pricing only"),
    }

    let report = calculate_total(&plan, &engine).await;
    for skipped in &report.skipped {
        debug!(address = %skipped.address, reason = %skipped.reason, "Resource not priced");
    }

    print!("{}", render_console(&report));

    if !config.post_comment {
        info!("Skipping GitHub comment (--no-comment)");
    } else if config.github.token.is_none() {
        info!("Skipping GitHub comment (GITHUB_TOKEN not set)");
    } else {
        info!("Posting comment to GitHub PR");
        // A failed comment does not fail the estimate
        let posted = match GithubCommenter::from_config(&config.github) {
            Ok(commenter) => commenter.post_comment(&render_markdown(&report)).await,
            Err(e) => Err(e),
        };
        match posted {
            Ok(_) => info!("GitHub comment posted successfully"),
            Err(e) => error!(error = %e, "Failed to post GitHub comment"),
        }
    }

    Ok(())
}
