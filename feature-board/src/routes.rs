//! JSON endpoints over the [`FeatureStore`].
//!
//! | Method | Path                          | Success                     |
//! |--------|-------------------------------|-----------------------------|
//! | GET    | `/feature-requests`           | 200, array of requests      |
//! | POST   | `/feature-requests`           | 201, created request        |
//! | POST   | `/feature-requests/:id/vote`  | 200, `{success, votes}`     |
//!
//! The same routes are also served under `/api`. Bodies are read as JSON
//! whatever their `Content-Type`. A body that fails to parse is an internal
//! failure of the resource and is answered with its generic 500, never a 4xx.

use std::sync::Arc;

use anyhow::{Result, bail};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{BytesRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::{
    error::ApiError,
    model::{DEFAULT_PRODUCT_ID, FeatureRequest, VoteDirection},
    store::FeatureStore,
};

const FETCH_FAILED: &str = "Failed to fetch feature requests";
const CREATE_FAILED: &str = "Failed to create feature request";
const VOTE_FAILED: &str = "Failed to vote for feature request";
const VOTE_UPDATE_FAILED: &str = "Failed to update vote";

type SharedStore = Arc<FeatureStore>;
type QueryPairs = Vec<(String, String)>;

pub fn router(store: SharedStore) -> Router {
    let api = Router::new()
        .route("/feature-requests", get(list_handler).post(create_handler))
        .route("/feature-requests/:id/vote", post(vote_handler));

    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Body sent by clients creating a request. The server reads bodies
/// field by field, see [`read_fields`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeatureRequest {
    /// Required, must be non-empty.
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteOutcome {
    pub success: bool,
    pub votes: i64,
}

async fn list_handler(
    State(store): State<SharedStore>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<FeatureRequest>>, ApiError> {
    let Query(pairs) = query.map_err(|rejection| {
        error!(error = %rejection, "error fetching feature requests");
        ApiError::Internal(FETCH_FAILED)
    })?;

    // Repeated keys are allowed; the first one wins.
    let product_id = pairs
        .into_iter()
        .find(|(key, _)| key == "productId")
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_PRODUCT_ID.to_string());

    Ok(Json(store.list_by_product(&product_id)))
}

async fn create_handler(
    State(store): State<SharedStore>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<FeatureRequest>), ApiError> {
    let internal = |err: anyhow::Error| {
        error!(error = %err, "error creating feature request");
        ApiError::Internal(CREATE_FAILED)
    };

    let body = body.map_err(|rejection| internal(rejection.into()))?;
    let fields = read_fields(&body).map_err(internal)?;

    let Some(title) = truthy_text(&fields, "title").map_err(internal)? else {
        debug!("feature request rejected: title is missing");
        return Err(ApiError::TitleRequired);
    };
    let description = truthy_text(&fields, "description")
        .map_err(internal)?
        .unwrap_or_default();
    let product_id = match fields.get("productId") {
        None | Some(Value::Null) => DEFAULT_PRODUCT_ID.to_string(),
        Some(Value::String(product_id)) => product_id.clone(),
        Some(other) => return Err(internal(anyhow::anyhow!("productId is not a string: {other}"))),
    };

    let request = store.create(title, description, product_id);
    info!(id = %request.id, product = %request.product_id, "feature request submitted");

    Ok((StatusCode::CREATED, Json(request)))
}

async fn vote_handler(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<VoteOutcome>, ApiError> {
    let internal = |err: anyhow::Error| {
        error!(%id, error = %err, "error voting for feature request");
        ApiError::Internal(VOTE_FAILED)
    };

    let body = body.map_err(|rejection| internal(rejection.into()))?;
    let fields = read_fields(&body).map_err(internal)?;

    let Some(direction) = fields
        .get("direction")
        .and_then(Value::as_str)
        .and_then(VoteDirection::parse)
    else {
        debug!(%id, direction = ?fields.get("direction"), "vote rejected: invalid direction");
        return Err(ApiError::InvalidDirection);
    };

    if store.get_by_id(&id).is_none() {
        debug!(%id, "vote rejected: feature request not found");
        return Err(ApiError::NotFound);
    }

    // Unreachable while requests are never deleted: the lookup above and the
    // vote below see the same entry. Kept so a future delete can't turn a
    // vanished entry into a 404 that claims it never existed.
    let updated = store.vote(&id, direction).ok_or_else(|| {
        error!(%id, "feature request vanished between lookup and vote");
        ApiError::Internal(VOTE_UPDATE_FAILED)
    })?;

    Ok(Json(VoteOutcome {
        success: true,
        votes: updated.votes,
    }))
}

/// Parses a request body and returns its top-level fields.
///
/// Invalid JSON and a literal `null` are errors. Any other non-object value
/// has no fields.
fn read_fields(body: &[u8]) -> Result<Map<String, Value>> {
    match serde_json::from_slice(body)? {
        Value::Object(fields) => Ok(fields),
        Value::Null => bail!("request body is null"),
        _ => Ok(Map::new()),
    }
}

/// Reads an optional text field. Absent and falsy values (`null`, `false`,
/// `0`, `""`) are `None`; any other non-string value is an error.
fn truthy_text(fields: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match fields.get(key) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => bail!("{key} is not a string: {other}"),
    }
}
