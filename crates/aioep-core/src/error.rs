use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("prompt template not found for sub-skill: {0}")]
    TemplateMissing(String),

    #[error("no AI credential configured: set OPENAI_API_KEY or ANTHROPIC_API_KEY")]
    CredentialMissing,

    #[error("invalid sub-skill '{0}': must be one of extract-drivers, derive-goals, decompose-initiatives, spawn-projects, validate-model")]
    InvalidSubSkill(String),

    #[error("invalid stage: {0}")]
    InvalidStage(String),

    #[error("invalid provider '{0}': must be 'openai' or 'anthropic'")]
    InvalidProvider(String),

    #[error("input text is required and must be non-empty")]
    EmptyInput,

    #[error("elements array is required")]
    ElementsRequired,

    #[error("AI API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("AI API returned no completion text")]
    EmptyCompletion,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("invalid model id: {0}")]
    InvalidModelId(String),

    #[error("no wizard session in progress: run 'aioep wizard start'")]
    SessionNotFound,

    #[error("stage '{0}' is not an AI-generation stage")]
    StageNotGenerative(String),

    #[error("stage '{0}' has no result to confirm: generate first")]
    NothingToConfirm(String),

    #[error("all stages are confirmed: run 'aioep wizard archive' to persist the model")]
    WizardComplete,

    #[error("fix is only available on the validate-model stage")]
    FixUnavailable,

    #[error("wizard is not at the confirm stage yet")]
    NotReadyToArchive,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("AI API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, StrategyError>;
