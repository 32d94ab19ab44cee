//! Service settings loaded once from the environment.
//!
//! Everything here is immutable after startup, including the ad unit
//! exclusion set, and is shared across handlers behind an `Arc`.

use anyhow::{Context, Result};
use std::env;

/// Page limit suggested by the remote inventory service.
const DEFAULT_PAGE_SIZE: u64 = 500;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Immutable service configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the remote inventory service.
    pub remote_url: String,
    /// Bearer credential for the remote service.
    pub api_key: String,
    /// Network code the inventory queries are scoped to.
    pub network_code: String,
    /// Parent id identifying the root record of the ad unit tree.
    pub root_parent_id: String,
    /// Ad unit ids always filtered out of root listings and the tree.
    pub exclude_ids: Vec<String>,
    /// Page limit for remote paged queries.
    pub page_size: u64,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
}

impl Settings {
    /// Read all settings from environment variables.
    pub fn from_env() -> Result<Self> {
        let remote_url = env::var("INVENTORY_API_URL")
            .context("INVENTORY_API_URL environment variable not set")?;
        let api_key = env::var("INVENTORY_API_KEY")
            .context("INVENTORY_API_KEY environment variable not set")?;
        let network_code =
            env::var("NETWORK_CODE").context("NETWORK_CODE environment variable not set")?;
        let root_parent_id =
            env::var("ROOT_PARENT_ID").context("ROOT_PARENT_ID environment variable not set")?;

        let exclude_ids = env::var("EXCLUDE_AD_UNITS")
            .map(|raw| parse_id_list(&raw))
            .unwrap_or_default();

        let page_size = match env::var("PAGE_SIZE") {
            Ok(raw) => raw
                .parse()
                .context("PAGE_SIZE must be a positive integer")?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            remote_url: remote_url.trim_end_matches('/').to_string(),
            api_key,
            network_code,
            root_parent_id,
            exclude_ids,
            page_size,
            bind_addr,
        })
    }
}

/// Parse a comma-separated id list, tolerating whitespace and empty entries.
fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        let ids = parse_id_list("21808883114, 21808959844,21809118501");
        assert_eq!(ids, vec!["21808883114", "21808959844", "21809118501"]);
    }

    #[test]
    fn test_parse_id_list_empty_entries() {
        assert!(parse_id_list("").is_empty());
        assert!(parse_id_list(" , ,").is_empty());
        assert_eq!(parse_id_list("42,").len(), 1);
    }
}
