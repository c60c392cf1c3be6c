//! API request handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use route_hub_core::{
    ContactPoint, CreateContactPointRequest, FilterRoutesRequest, FilterRoutesResponse,
    InsertRouteRequest, MatchedRoute, PreviewMatch, PreviewRoutingRequest, PreviewRoutingResponse,
    ReplaceRouteTreeRequest, RouteFilters, RouteNode, RouteUpdate, RouteWithId, VersionedRouteTree,
};
use route_hub_engine::{
    compute_inherited_tree, find_matching_routes, find_routes_matching_filters,
    find_routes_matching_predicate,
};
use route_hub_tree::strip_identifiers;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiError, AppState};

/// Every receiver a tree references must be a known contact point
async fn ensure_receivers_known(state: &AppState, root: &RouteNode) -> Result<(), ApiError> {
    let mut referenced = BTreeSet::new();
    collect_receivers(root, &mut referenced);

    let mut unknown = Vec::new();
    for name in referenced {
        if state
            .contact_point_storage
            .get_by_name(&name)
            .await?
            .is_none()
        {
            unknown.push(name);
        }
    }

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Unknown contact points referenced by routes: {}",
            unknown.join(", ")
        )))
    }
}

fn collect_receivers(node: &RouteNode, out: &mut BTreeSet<String>) {
    if let Some(receiver) = &node.receiver {
        out.insert(receiver.clone());
    }
    for child in &node.routes {
        collect_receivers(child, out);
    }
}

/// Persist an edited tree against the version the edit was based on
async fn save_edited_tree(
    state: &AppState,
    based_on_version: u64,
    root: &RouteWithId,
) -> Result<VersionedRouteTree, ApiError> {
    let config = strip_identifiers(root);
    ensure_receivers_known(state, &config).await?;
    let saved = state
        .route_storage
        .replace_tree(based_on_version, config)
        .await?;
    Ok(saved)
}

// ==================== Route tree handlers ====================

/// Get the current route tree with node ids and version
pub async fn get_route_tree(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let tree = state.route_storage.get_tree().await?;
    Ok(Json(tree))
}

/// Replace the whole route tree
pub async fn replace_route_tree(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReplaceRouteTreeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_receivers_known(&state, &req.root).await?;

    let saved = state.route_storage.replace_tree(req.version, req.root).await?;

    tracing::info!("Replaced route tree, now at version {}", saved.version);

    Ok(Json(saved))
}

/// Filter the route tree by contact point and/or label matchers
pub async fn filter_routes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FilterRoutesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tree = state.route_storage.get_tree().await?;

    let filters = RouteFilters {
        contact_point: req.contact_point,
        label_matchers: req.label_matchers,
    };
    let result = find_routes_matching_filters(Some(&tree.root), &filters)?;

    let mut matches: Vec<MatchedRoute> = result
        .matched_routes_with_path
        .into_iter()
        .map(|(route_id, path)| MatchedRoute { route_id, path })
        .collect();
    // shallower matches first, then by id for a stable order
    matches.sort_by(|a, b| a.path.len().cmp(&b.path.len()).then(a.route_id.cmp(&b.route_id)));

    Ok(Json(FilterRoutesResponse {
        filters_applied: result.filters_applied,
        matched_count: matches.len(),
        matches,
    }))
}

/// Preview which policies an alert label set would route to
pub async fn preview_routing(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PreviewRoutingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tree = state.route_storage.get_tree().await?;

    // resolve first so matched policies report their effective receiver
    let resolved = compute_inherited_tree(&tree.root);
    let matches = find_matching_routes(&resolved, &req.labels)
        .into_iter()
        .map(|route| PreviewMatch {
            route_id: route.id,
            receiver: route.receiver.clone(),
        })
        .collect();

    Ok(Json(PreviewRoutingResponse { matches }))
}

/// Insert a new route relative to an existing one
pub async fn insert_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<InsertRouteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tree = state.route_storage.get_tree().await?;

    let edited = route_hub_tree::add_route(&tree.root, id, req.route, req.position)?;
    let saved = save_edited_tree(&state, tree.version, &edited).await?;

    tracing::info!("Inserted route {:?} of {}", req.position, id);

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Merge a partial update into an existing route
pub async fn update_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<RouteUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let tree = state.route_storage.get_tree().await?;

    let edited = route_hub_tree::update_route(&tree.root, id, &update)?;
    let saved = save_edited_tree(&state, tree.version, &edited).await?;

    tracing::info!("Updated route {}", id);

    Ok(Json(saved))
}

/// Remove a route and its subtree
pub async fn delete_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let tree = state.route_storage.get_tree().await?;

    let edited = route_hub_tree::omit_route(&tree.root, id)?;
    let saved = save_edited_tree(&state, tree.version, &edited).await?;

    tracing::info!("Deleted route {}", id);

    Ok(Json(saved))
}

// ==================== Contact point handlers ====================

/// Create a new contact point
pub async fn create_contact_point(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateContactPointRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Contact point name cannot be empty".to_string(),
        ));
    }

    let saved = state
        .contact_point_storage
        .save(ContactPoint::new(req.name, req.integrations))
        .await?;

    tracing::info!("Created contact point '{}'", saved.name);

    Ok((StatusCode::CREATED, Json(saved)))
}

/// List all contact points
pub async fn list_contact_points(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let contact_points = state.contact_point_storage.list().await?;
    Ok(Json(contact_points))
}

/// Delete a contact point, unless the route tree still references it
pub async fn delete_contact_point(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let tree = state.route_storage.get_tree().await?;

    // Own receiver fields only: inherited uses trace back to an ancestor.
    // The reference check and the delete below are two separate storage
    // calls; a tree replace landing in between can still leave a dangling
    // receiver. A persistent backend would need a combined operation.
    let references = find_routes_matching_predicate(&tree.root, |route| {
        route.receiver.as_deref() == Some(name.as_str())
    })?;
    if !references.is_empty() {
        return Err(ApiError::Conflict(format!(
            "Contact point '{}' is in use by {} route(s)",
            name,
            references.len()
        )));
    }

    state.contact_point_storage.delete(&name).await?;

    tracing::info!("Deleted contact point '{}'", name);

    Ok(StatusCode::NO_CONTENT)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "route-hub"
    }))
}
