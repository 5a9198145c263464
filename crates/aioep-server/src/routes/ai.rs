use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use aioep_core::gateway::LlmGateway;
use aioep_core::model::CumulativeModel;
use aioep_core::prompt::PromptStore;
use aioep_core::types::SubSkill;
use aioep_core::wizard::{run_sub_skill, Generation};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[serde(default)]
    pub sub_skill: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub existing_model: Option<CumulativeModel>,
}

/// POST /api/strategy/ai — run one sub-skill generation.
///
/// Stateless: the client session owns wizard state and passes the cumulative
/// model it wants used as context.
pub async fn generate(
    State(app): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let sub_skill_raw = body.sub_skill.clone().unwrap_or_default();
    let input = body.input.clone().unwrap_or_default();
    if sub_skill_raw.is_empty() || input.is_empty() {
        return Err(AppError::bad_request("subSkill and input are required"));
    }
    let sub_skill: SubSkill = sub_skill_raw.parse()?;

    let root = app.root.clone();
    let gateway_config = app.gateway.clone();
    let existing = body.existing_model;
    let result = tokio::task::spawn_blocking(move || {
        let prompts = PromptStore::new(&root);
        let gateway = LlmGateway::new(gateway_config)?;
        let generation = run_sub_skill(&prompts, &gateway, sub_skill, &input, existing.as_ref())?;

        Ok::<_, aioep_core::StrategyError>(match generation {
            Generation::Mock {
                message,
                system_prompt_length,
                feedback_patterns_loaded,
            } => serde_json::json!({
                "subSkill": sub_skill,
                "status": "mock",
                "message": message,
                "systemPromptLoaded": true,
                "systemPromptLength": system_prompt_length,
                "feedbackPatternsLoaded": feedback_patterns_loaded,
            }),
            Generation::Completed {
                value,
                model,
                usage,
            } => serde_json::json!({
                "subSkill": sub_skill,
                "status": "success",
                "result": value,
                "metadata": { "model": model, "usage": usage },
            }),
        })
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
