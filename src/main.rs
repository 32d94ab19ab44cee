//! Inventory API - HTTP gateway over a remote paged ad-inventory service.

mod config;
mod error;
mod fetcher;
mod inventory;
mod schema;
mod tree;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Settings;
use error::{InventoryError, TreeError};
use fetcher::fetch_all;
use inventory::{InventoryService, InventoryStatus, RemoteInventoryClient, SortKey, Statement};
use schema::{AdUnit, AdUnitSize};
use tree::build_tree;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    settings: Arc<Settings>,
    inventory: Arc<dyn InventoryService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load settings
    let settings = Settings::from_env()?;
    info!(
        "Settings loaded: network {}, {} excluded ad units",
        settings.network_code,
        settings.exclude_ids.len()
    );

    // Initialize the remote inventory client
    let client = RemoteInventoryClient::new(&settings)?;
    info!("Inventory client initialized for {}", settings.remote_url);

    let bind_addr = settings.bind_addr.clone();

    // Build application state
    let state = AppState {
        settings: Arc::new(settings),
        inventory: Arc::new(client),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/adunits", get(root_ad_units))
        .route("/adunits/sizes", get(ad_unit_sizes))
        .route("/adunits/tree", get(ad_unit_tree))
        .route("/adunits/{id}", get(ad_units_by_parent))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Run server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Top-level ad units: the active children of the network's effective root,
/// minus the configured exclusion set.
async fn root_ad_units(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdUnit>>, (StatusCode, String)> {
    let network = state
        .inventory
        .current_network()
        .await
        .map_err(remote_failure)?;

    let statement = Statement::new(state.settings.page_size)
        .parent_id(network.effective_root_ad_unit_id)
        .status(InventoryStatus::Active)
        .exclude_ids(&state.settings.exclude_ids)
        .order_by(SortKey::NameAscending);

    let records = fetch_all(state.inventory.as_ref(), statement)
        .await
        .map_err(remote_failure)?;
    info!("Fetched {} top-level ad units", records.len());

    Ok(Json(records.into_iter().map(AdUnit::from).collect()))
}

/// Active children of a given parent ad unit.
async fn ad_units_by_parent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AdUnit>>, (StatusCode, String)> {
    let statement = Statement::new(state.settings.page_size)
        .parent_id(id)
        .status(InventoryStatus::Active)
        .order_by(SortKey::NameAscending);

    let records = fetch_all(state.inventory.as_ref(), statement)
        .await
        .map_err(remote_failure)?;

    Ok(Json(records.into_iter().map(AdUnit::from).collect()))
}

/// All ad unit sizes known to the network.
async fn ad_unit_sizes(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdUnitSize>>, (StatusCode, String)> {
    let sizes = state
        .inventory
        .ad_unit_sizes()
        .await
        .map_err(remote_failure)?;

    Ok(Json(sizes.into_iter().map(AdUnitSize::from).collect()))
}

/// The whole active ad unit tree for the configured network.
async fn ad_unit_tree(
    State(state): State<AppState>,
) -> Result<Json<AdUnit>, (StatusCode, String)> {
    let statement = Statement::new(state.settings.page_size)
        .status(InventoryStatus::Active)
        .exclude_ids(&state.settings.exclude_ids)
        .order_by(SortKey::NameAscending);

    let records = fetch_all(state.inventory.as_ref(), statement)
        .await
        .map_err(remote_failure)?;
    let flat: Vec<AdUnit> = records.into_iter().map(AdUnit::from).collect();

    // The root record is the unit parented directly under the configured
    // network root.
    let root_id = flat
        .iter()
        .find(|unit| unit.parent_id.as_deref() == Some(state.settings.root_parent_id.as_str()))
        .map(|unit| unit.id.clone())
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!(
                    "No ad unit parented under root {}",
                    state.settings.root_parent_id
                ),
            )
        })?;

    let tree = build_tree(&root_id, &flat).map_err(|e| match e {
        TreeError::RootNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        TreeError::Cycle(_) => {
            error!("Ad unit tree assembly failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })?;

    info!("Assembled ad unit tree from {} fetched units", flat.len());
    Ok(Json(tree))
}

// ============================================================================
// Helper functions
// ============================================================================

/// Map a remote query failure to a gateway error response.
fn remote_failure(err: InventoryError) -> (StatusCode, String) {
    error!("Remote inventory query failed: {}", err);
    (
        StatusCode::BAD_GATEWAY,
        format!("Failed to query ad inventory. {}", err),
    )
}
