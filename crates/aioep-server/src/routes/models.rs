use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use aioep_core::model::{ModelElement, ModelRelationship};
use aioep_core::store::{ModelStore, SaveRequest};
use aioep_core::StrategyError;

/// GET /api/strategy/models — list all saved motivation models.
pub async fn list_models(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let summaries = ModelStore::new(&root).list()?;
        Ok::<_, StrategyError>(serde_json::json!(summaries))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveModelBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target_year: Option<i32>,
    #[serde(default)]
    pub elements: Option<Vec<ModelElement>>,
    #[serde(default)]
    pub relationships: Option<Vec<ModelRelationship>>,
}

/// POST /api/strategy/models — save a new motivation model document.
pub async fn save_model(
    State(app): State<AppState>,
    Json(body): Json<SaveModelBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let elements = body.elements.ok_or(StrategyError::ElementsRequired)?;

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let receipt = ModelStore::new(&root).save(SaveRequest {
            name: body.name,
            source: body.source,
            target_year: body.target_year,
            elements,
            relationships: body.relationships.unwrap_or_default(),
        })?;
        for warning in &receipt.warnings {
            tracing::warn!("model save: {warning}");
        }
        Ok::<_, StrategyError>(serde_json::json!(receipt))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/strategy/models/{id} — read a single model document by id.
pub async fn get_model(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let model = ModelStore::new(&root).get(&id)?;
        Ok::<_, StrategyError>(serde_json::json!(model))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
