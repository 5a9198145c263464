use aioep_core::error::StrategyError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400 Bad Request errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain without touching the `StrategyError` enum.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<StrategyError>() {
            match e {
                StrategyError::InvalidSubSkill(_)
                | StrategyError::InvalidStage(_)
                | StrategyError::InvalidProvider(_)
                | StrategyError::EmptyInput
                | StrategyError::ElementsRequired
                | StrategyError::InvalidModelId(_) => StatusCode::BAD_REQUEST,
                StrategyError::ModelNotFound(_) | StrategyError::SessionNotFound => {
                    StatusCode::NOT_FOUND
                }
                StrategyError::Upstream { .. }
                | StrategyError::EmptyCompletion
                | StrategyError::Http(_) => StatusCode::BAD_GATEWAY,
                StrategyError::StageNotGenerative(_)
                | StrategyError::NothingToConfirm(_)
                | StrategyError::WizardComplete
                | StrategyError::FixUnavailable
                | StrategyError::NotReadyToArchive => StatusCode::UNPROCESSABLE_ENTITY,
                // Missing template or credential is an operator problem.
                StrategyError::TemplateMissing(_) => StatusCode::INTERNAL_SERVER_ERROR,
                StrategyError::CredentialMissing => StatusCode::SERVICE_UNAVAILABLE,
                StrategyError::Io(_) | StrategyError::Yaml(_) | StrategyError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_missing_maps_to_500() {
        let err = AppError(StrategyError::TemplateMissing("extract-drivers".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_sub_skill_maps_to_400() {
        let err = AppError(StrategyError::InvalidSubSkill("bogus".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn elements_required_maps_to_400() {
        let err = AppError(StrategyError::ElementsRequired.into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_maps_to_502() {
        let err = AppError(
            StrategyError::Upstream {
                status: 429,
                body: "rate limited".into(),
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn model_not_found_maps_to_404() {
        let err = AppError(StrategyError::ModelNotFound("model-1".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn credential_missing_maps_to_503() {
        let err = AppError(StrategyError::CredentialMissing.into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn wizard_state_errors_map_to_422() {
        let err = AppError(StrategyError::NotReadyToArchive.into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn bad_request_constructor_maps_to_400() {
        let err = AppError::bad_request("subSkill and input are required");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn non_strategy_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_body_is_json_error_envelope() {
        let err = AppError(StrategyError::ModelNotFound("model-1".into()).into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
