//! Configuration for the cost estimator

use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or};
use domain_hcloud_pricing::HcloudApiConfig;
use domain_hcloud_pricing::providers::live::HCLOUD_API_URL;
use std::path::PathBuf;
use std::time::Duration;

const GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Terraform plan in JSON form (`terraform show -json`)
    pub plan_path: PathBuf,
    pub hcloud: HcloudConfig,
    pub github: GithubConfig,
    /// Post the report as a pull-request comment when GitHub is configured
    pub post_comment: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HcloudConfig {
    /// API token; live pricing is disabled without it
    pub token: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct GithubConfig {
    pub token: Option<String>,
    /// `owner/repo`
    pub repository: Option<String>,
    pub pr_number: Option<String>,
    pub api_url: String,
}

impl FromEnv for HcloudConfig {
    /// - HCLOUD_TOKEN: optional
    /// - HCLOUD_API_URL: defaults to the public API
    /// - HCLOUD_TIMEOUT_SECS: defaults to 10
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            token: env_optional("HCLOUD_TOKEN"),
            api_url: env_or_default("HCLOUD_API_URL", HCLOUD_API_URL),
            timeout_secs: env_parse_or("HCLOUD_TIMEOUT_SECS", 10)?,
        })
    }
}

impl FromEnv for GithubConfig {
    /// Reads the variables GitHub Actions provides (plus `PR_NUMBER`).
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            token: env_optional("GITHUB_TOKEN"),
            repository: env_optional("GITHUB_REPOSITORY"),
            pr_number: env_optional("PR_NUMBER"),
            api_url: env_or_default("GITHUB_API_URL", GITHUB_API_URL),
        })
    }
}

impl HcloudConfig {
    /// Live provider settings, if a token is available
    pub fn api_config(&self) -> Option<HcloudApiConfig> {
        let token = self.token.clone()?;
        Some(HcloudApiConfig {
            token,
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// `HCLOUD_TOKEN` wins over the `--token` flag.
    pub fn load(
        plan_path: PathBuf,
        token_flag: Option<String>,
        post_comment: bool,
    ) -> Result<Self, ConfigError> {
        let mut hcloud = HcloudConfig::from_env()?;
        if hcloud.token.is_none() {
            hcloud.token = token_flag
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
        }

        Ok(Self {
            plan_path,
            hcloud,
            github: GithubConfig::from_env()?,
            post_comment,
        })
    }
}
