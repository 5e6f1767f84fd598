//! Token resolution and client construction
//!
//! Builds an authenticated `OctocrabClient` for github.com or a GitHub
//! Enterprise host.

use crate::{OctocrabClient, DEFAULT_HOST};
use anyhow::{Context, Result};
use log::{debug, info};
use octocrab::Octocrab;
use std::sync::Arc;

/// Env var holding the bot's access token, valid for any host
pub const ACCESS_TOKEN_VAR: &str = "GITHUB_ACCESS_TOKEN";

/// Resolves GitHub tokens for different hosts
///
/// Tries multiple sources in order:
/// 1. `GITHUB_ACCESS_TOKEN`
/// 2. Host-specific env var (e.g., `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
/// 3. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
/// 4. `gh auth token --hostname {host}` command
#[derive(Debug, Clone)]
pub struct TokenResolver {
    /// Token from GITHUB_ACCESS_TOKEN
    access_token: Option<String>,
    /// Cached default token from GITHUB_TOKEN/GH_TOKEN
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a new token resolver from the process environment
    pub fn new() -> Self {
        let access_token = non_empty_var(ACCESS_TOKEN_VAR);
        let default_token = non_empty_var("GITHUB_TOKEN").or_else(|| non_empty_var("GH_TOKEN"));

        Self {
            access_token,
            default_token,
        }
    }

    /// Get a token for the given host (None = github.com)
    pub async fn get_token(&self, host: Option<&str>) -> Result<String> {
        let host = host.unwrap_or(DEFAULT_HOST);

        if let Some(ref token) = self.access_token {
            debug!("Using token from {} for host {}", ACCESS_TOKEN_VAR, host);
            return Ok(token.clone());
        }

        let env_key = host_env_key(host);
        if let Some(token) = non_empty_var(&env_key) {
            debug!("Using token from env var {} for host {}", env_key, host);
            return Ok(token);
        }

        if host == DEFAULT_HOST {
            if let Some(ref token) = self.default_token {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Ok(token.clone());
            }
        }

        debug!("Trying gh auth token for host {}", host);
        let output = tokio::process::Command::new("gh")
            .args(["auth", "token", "--hostname", host])
            .output()
            .await;

        // A missing gh binary is just one less source
        if let Ok(output) = output {
            if output.status.success() {
                let token = String::from_utf8(output.stdout)
                    .context("Invalid UTF-8 in gh auth token output")?
                    .trim()
                    .to_string();
                if !token.is_empty() {
                    debug!("Using token from gh CLI for host {}", host);
                    return Ok(token);
                }
            }
        }

        Err(anyhow::anyhow!(
            "No token found for host '{}'. \
             Set {} or {}, or run 'gh auth login --hostname {}'",
            host,
            ACCESS_TOKEN_VAR,
            env_key,
            host
        ))
    }
}

/// Build an authenticated client for the given host (None = github.com)
pub async fn connect(host: Option<&str>) -> Result<OctocrabClient> {
    let token = TokenResolver::new().get_token(host).await?;
    build_client(host, token)
}

/// Build a client for the given host with an explicit token
pub fn build_client(host: Option<&str>, token: String) -> Result<OctocrabClient> {
    let effective_host = host.unwrap_or(DEFAULT_HOST);
    info!("Creating GitHub client for host: {}", effective_host);

    let mut builder = Octocrab::builder().personal_token(token);
    if let Some(uri) = api_base_uri(host) {
        builder = builder.base_uri(&uri).context("Failed to set base URI")?;
    }

    let octocrab = builder.build().context("Failed to build Octocrab client")?;
    Ok(OctocrabClient::new(Arc::new(octocrab)))
}

/// REST base URI for an Enterprise host, None for github.com
fn api_base_uri(host: Option<&str>) -> Option<String> {
    match host {
        Some(h) if h != DEFAULT_HOST => Some(format!("https://{}/api/v3", h)),
        _ => None,
    }
}

/// Host-specific token variable, e.g. `GITHUB_TOKEN_GHE_EXAMPLE_COM`
fn host_env_key(host: &str) -> String {
    format!(
        "GITHUB_TOKEN_{}",
        host.replace(['.', '-'], "_").to_uppercase()
    )
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
