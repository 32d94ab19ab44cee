#![allow(dead_code)]
//! Remote inventory service: query statements, wire types, and the HTTP
//! client implementation.
//!
//! The remote service only answers bounded-size pages; `fetcher::fetch_all`
//! drains it. The [`InventoryService`] trait is the seam that lets tests
//! substitute an in-memory stub for the HTTP client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::error::InventoryError;

/// Ad unit status values the remote filter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryStatus {
    Active,
    Inactive,
    Archived,
}

/// Sort orders the remote service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "name ASC")]
    NameAscending,
}

/// Declarative query over the remote ad unit collection.
///
/// One statement covers every listing variant: the filter and sort key
/// vary per endpoint, and the offset cursor is advanced by the fetch loop
/// until the result set is exhausted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    #[serde(flatten)]
    pub filter: Filter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<SortKey>,
    pub limit: u64,
    pub offset: u64,
}

/// Record filter applied by the remote service.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Restrict to these ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
    /// Drop these ids from the result set.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InventoryStatus>,
}

impl Statement {
    /// An unfiltered statement with the given page limit, at offset 0.
    pub fn new(limit: u64) -> Self {
        Self {
            filter: Filter::default(),
            order_by: None,
            limit,
            offset: 0,
        }
    }

    pub fn ids(mut self, ids: &[String]) -> Self {
        self.filter.ids = ids.to_vec();
        self
    }

    pub fn exclude_ids(mut self, ids: &[String]) -> Self {
        self.filter.exclude_ids = ids.to_vec();
        self
    }

    pub fn parent_id(mut self, id: impl Into<String>) -> Self {
        self.filter.parent_id = Some(id.into());
        self
    }

    pub fn status(mut self, status: InventoryStatus) -> Self {
        self.filter.status = Some(status);
        self
    }

    pub fn order_by(mut self, key: SortKey) -> Self {
        self.order_by = Some(key);
        self
    }

    /// Advance the offset cursor by one page.
    pub fn advance(&mut self) {
        self.offset += self.limit;
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// One page of a remote paged query.
///
/// `total_result_set_size` counts the full match set, not this page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdUnitPage {
    #[serde(default)]
    pub results: Vec<RemoteAdUnit>,
    #[serde(default)]
    pub total_result_set_size: u64,
}

/// Network descriptor owning the inventory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub network_code: String,
    pub effective_root_ad_unit_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Ad unit record as the remote service returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAdUnit {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ad_unit_code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub parent_path: Option<Vec<RemoteParentPath>>,
    #[serde(default)]
    pub ad_unit_sizes: Option<Vec<RemoteAdUnitSize>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteParentPath {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ad_unit_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAdUnitSize {
    #[serde(default)]
    pub full_display_string: Option<String>,
    #[serde(default)]
    pub environment_type: Option<String>,
    pub size: RemoteSize,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RemoteSize {
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// Service trait and HTTP client
// ============================================================================

/// Remote inventory capability.
///
/// The HTTP client implements it in production; tests drive the fetch
/// loop against in-memory stubs.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Network descriptor, including the effective root ad unit id.
    async fn current_network(&self) -> Result<Network, InventoryError>;

    /// One page of ad units matching the statement at its current offset.
    async fn ad_units_by_statement(
        &self,
        statement: &Statement,
    ) -> Result<AdUnitPage, InventoryError>;

    /// All ad unit sizes. The remote returns these unpaged.
    async fn ad_unit_sizes(&self) -> Result<Vec<RemoteAdUnitSize>, InventoryError>;
}

/// HTTP client for the remote inventory service.
#[derive(Clone)]
pub struct RemoteInventoryClient {
    client: Client,
    base_url: String,
    api_key: String,
    network_code: String,
}

impl RemoteInventoryClient {
    pub fn new(settings: &Settings) -> Result<Self, InventoryError> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.remote_url.clone(),
            api_key: settings.api_key.clone(),
            network_code: settings.network_code.clone(),
        })
    }

    fn network_url(&self, suffix: &str) -> String {
        format!("{}/networks/{}{}", self.base_url, self.network_code, suffix)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, InventoryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InventoryError::Api { status, body });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl InventoryService for RemoteInventoryClient {
    async fn current_network(&self) -> Result<Network, InventoryError> {
        debug!("Fetching network {}", self.network_code);

        let response = self
            .client
            .get(self.network_url(""))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        self.read_json(response).await
    }

    async fn ad_units_by_statement(
        &self,
        statement: &Statement,
    ) -> Result<AdUnitPage, InventoryError> {
        debug!(
            "Querying ad units at offset {} (limit {})",
            statement.offset, statement.limit
        );

        let response = self
            .client
            .post(self.network_url("/adUnits:query"))
            .bearer_auth(&self.api_key)
            .json(statement)
            .send()
            .await?;

        self.read_json(response).await
    }

    async fn ad_unit_sizes(&self) -> Result<Vec<RemoteAdUnitSize>, InventoryError> {
        debug!("Fetching ad unit sizes");

        let response = self
            .client
            .get(self.network_url("/adUnitSizes"))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        self.read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statement_advances_by_limit() {
        let mut statement = Statement::new(500);
        assert_eq!(statement.offset, 0);

        statement.advance();
        assert_eq!(statement.offset, 500);

        statement.advance();
        assert_eq!(statement.offset, 1000);
    }

    #[test]
    fn test_statement_wire_shape() {
        let statement = Statement::new(500)
            .parent_id("1000")
            .status(InventoryStatus::Active)
            .exclude_ids(&["7".to_string(), "8".to_string()])
            .order_by(SortKey::NameAscending);

        let value = serde_json::to_value(&statement).unwrap();
        assert_eq!(
            value,
            json!({
                "parentId": "1000",
                "status": "ACTIVE",
                "excludeIds": ["7", "8"],
                "orderBy": "name ASC",
                "limit": 500,
                "offset": 0,
            })
        );
    }

    #[test]
    fn test_empty_filter_fields_are_omitted() {
        let value = serde_json::to_value(Statement::new(100)).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("ids"));
        assert!(!obj.contains_key("excludeIds"));
        assert!(!obj.contains_key("parentId"));
        assert!(!obj.contains_key("status"));
        assert!(!obj.contains_key("orderBy"));
    }

    #[test]
    fn test_page_defaults() {
        let page: AdUnitPage = serde_json::from_str("{}").unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.total_result_set_size, 0);
    }
}
