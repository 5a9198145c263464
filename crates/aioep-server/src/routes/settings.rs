use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use aioep_core::profile::CompanyProfile;
use aioep_core::StrategyError;

/// GET /api/settings — read the company profile (defaults when unset).
pub async fn get_settings(
    State(app): State<AppState>,
) -> Result<Json<CompanyProfile>, AppError> {
    let root = app.root.clone();
    let profile = tokio::task::spawn_blocking(move || CompanyProfile::load(&root))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    Ok(Json(profile))
}

/// PUT /api/settings — shallow-merge the supplied fields and persist.
pub async fn put_settings(
    State(app): State<AppState>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<CompanyProfile>, AppError> {
    let root = app.root.clone();
    let updated = tokio::task::spawn_blocking(move || {
        let updated = CompanyProfile::load(&root).merged(patch)?;
        updated.save(&root)?;
        Ok::<_, StrategyError>(updated)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(updated))
}
