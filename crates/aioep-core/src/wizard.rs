//! Stage orchestrator for the strategy-modeling wizard.
//!
//! A fixed linear sequence of stages, each either manual or AI-generation.
//! The cursor is the frontier: it only advances when the human confirms the
//! current stage, so a later stage can never generate while an earlier one
//! is unconfirmed. Generation results are held unconfirmed until that
//! confirmation; only confirmed results enter the cumulative model handed to
//! later stages.
//!
//! Every failure (missing template, missing credential, transport error,
//! unparseable output) leaves the wizard in the same resumable state with no
//! stored result. Retries are always human-initiated.

use crate::error::{Result, StrategyError};
use crate::extract;
use crate::gateway::LlmGateway;
use crate::io;
use crate::model::{CumulativeModel, StageResult};
use crate::paths;
use crate::profile::CompanyProfile;
use crate::prompt::{self, PromptStore};
use crate::report::{ValidationCheck, ValidationReport};
use crate::store::{ModelStore, SaveReceipt, SaveRequest};
use crate::types::{Stage, SubSkill};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Generation outcomes
// ---------------------------------------------------------------------------

/// Raw outcome of one sub-skill invocation (stateless; also serves the HTTP
/// generation endpoint).
#[derive(Debug, Clone)]
pub enum Generation {
    /// The call went through and the response was coerced to JSON.
    Completed {
        value: Value,
        model: Option<String>,
        usage: Option<Value>,
    },
    /// No credential configured: deterministic placeholder so the rest of
    /// the wizard can be exercised without live AI access.
    Mock {
        message: String,
        system_prompt_length: usize,
        feedback_patterns_loaded: bool,
    },
}

/// Outcome of a generation as seen by the wizard, after shape-checking.
#[derive(Debug, Clone)]
pub enum StageGeneration {
    /// Parsed result, stored unconfirmed on the current stage.
    Ready(StageResult),
    /// Placeholder response; nothing stored.
    Mock { message: String },
    /// Extraction failed; the raw text is surfaced for human inspection and
    /// the stage keeps no result.
    Unparsed { raw: String },
}

pub const MOCK_MESSAGE: &str =
    "AI credential not configured. Set OPENAI_API_KEY or ANTHROPIC_API_KEY to enable AI-assisted modeling.";

/// Run one sub-skill: template lookup, credential check, single gateway
/// call, extraction. Template validation happens before any network I/O.
pub fn run_sub_skill(
    prompts: &PromptStore,
    gateway: &LlmGateway,
    sub_skill: SubSkill,
    input: &str,
    existing: Option<&CumulativeModel>,
) -> Result<Generation> {
    if input.trim().is_empty() {
        return Err(StrategyError::EmptyInput);
    }
    let system_prompt = prompts.system_prompt(sub_skill)?;

    if !gateway.has_credential() {
        return Ok(Generation::Mock {
            message: MOCK_MESSAGE.to_string(),
            system_prompt_length: system_prompt.len(),
            feedback_patterns_loaded: !prompts.feedback_patterns().trim().is_empty(),
        });
    }

    let user = prompt::user_message(input, existing);
    let completion = gateway.complete(&system_prompt, &user)?;
    Ok(Generation::Completed {
        value: extract::extract(&completion.text),
        model: completion.model,
        usage: completion.usage,
    })
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// Session-scoped wizard state. Created at wizard start, discarded at
/// completion or abandonment; serialized to `.aioep/wizard.yaml` so a CLI
/// session survives across invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wizard {
    pub input_text: String,
    pub target_year: i32,
    /// The frontier stage: everything before it is confirmed.
    pub current: Stage,
    /// Confirmed results keyed by stage; iteration order is stage order,
    /// which equals execution order.
    #[serde(default)]
    pub results: BTreeMap<Stage, StageResult>,
    /// Unconfirmed result for the current stage, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<StageResult>,
    /// Health report from the most recent validate-model generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ValidationReport>,
    /// Ids of documents archived from this session.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub archived: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wizard {
    /// Start a fresh session. The vision input is pre-filled from the
    /// company profile when one is configured.
    pub fn new(profile: &CompanyProfile, target_year: Option<i32>) -> Self {
        let now = Utc::now();
        Self {
            input_text: profile.prefill().unwrap_or_default(),
            target_year: target_year.unwrap_or(profile.current_year),
            current: Stage::Input,
            results: BTreeMap::new(),
            pending: None,
            report: None,
            archived: Vec::new(),
            started_at: now,
            updated_at: now,
        }
    }

    // -----------------------------------------------------------------------
    // Session persistence
    // -----------------------------------------------------------------------

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::wizard_path(root);
        if !path.exists() {
            return Err(StrategyError::SessionNotFound);
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::wizard_path(root), data.as_bytes())
    }

    /// Delete the session file. Returns `true` if one existed.
    pub fn discard(root: &Path) -> Result<bool> {
        let path = paths::wizard_path(root);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn is_confirmed(&self, stage: Stage) -> bool {
        stage < self.current
    }

    /// Union of all confirmed stages' results, in execution order.
    pub fn cumulative_model(&self) -> CumulativeModel {
        CumulativeModel::from_results(self.results.values())
    }

    /// Cumulative model plus the current unconfirmed result; context for
    /// targeted fix calls, which operate on what the human is looking at.
    fn working_model(&self) -> CumulativeModel {
        CumulativeModel::from_results(self.results.values().chain(self.pending.iter()))
    }

    // -----------------------------------------------------------------------
    // Input stage
    // -----------------------------------------------------------------------

    /// Replace the vision input. Allowed at any point; confirmed stages are
    /// not invalidated and later generations use the current text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
        self.updated_at = Utc::now();
    }

    fn confirm_input(&mut self) -> Result<()> {
        if self.input_text.trim().is_empty() {
            return Err(StrategyError::EmptyInput);
        }
        self.current = Stage::ExtractDrivers;
        self.updated_at = Utc::now();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Run the current stage's generation. Any previous unconfirmed result
    /// for the stage is discarded first, so this doubles as regeneration.
    pub fn generate(
        &mut self,
        prompts: &PromptStore,
        gateway: &LlmGateway,
    ) -> Result<StageGeneration> {
        let Some(sub_skill) = self.current.sub_skill() else {
            return Err(StrategyError::StageNotGenerative(
                self.current.as_str().to_string(),
            ));
        };

        self.pending = None;
        if self.current == Stage::ValidateModel {
            self.report = None;
        }

        let cumulative = self.cumulative_model();
        let existing = (!cumulative.is_empty()).then_some(&cumulative);
        let generation = run_sub_skill(prompts, gateway, sub_skill, &self.input_text, existing)?;
        self.updated_at = Utc::now();

        match generation {
            Generation::Mock { message, .. } => Ok(StageGeneration::Mock { message }),
            Generation::Completed { value, .. } => match parse_stage_result(&value) {
                Some(result) => {
                    if self.current == Stage::ValidateModel {
                        self.report = ValidationReport::from_value(&value);
                    }
                    self.pending = Some(result.clone());
                    Ok(StageGeneration::Ready(result))
                }
                None => Ok(StageGeneration::Unparsed {
                    raw: raw_text(&value),
                }),
            },
        }
    }

    /// Targeted fix for one WARNING/FAIL validation check. A successful fix
    /// replaces the validate stage's stored result and report; anything else
    /// leaves them untouched.
    pub fn fix(
        &mut self,
        prompts: &PromptStore,
        gateway: &LlmGateway,
        check: &ValidationCheck,
    ) -> Result<StageGeneration> {
        if self.current != Stage::ValidateModel {
            return Err(StrategyError::FixUnavailable);
        }

        let input = format!(
            "Fix the following issue and return the corrected elements and relationships:\nIssue: {}",
            check.describe()
        );
        let working = self.working_model();
        let existing = (!working.is_empty()).then_some(&working);
        let generation =
            run_sub_skill(prompts, gateway, SubSkill::ValidateModel, &input, existing)?;
        self.updated_at = Utc::now();

        match generation {
            Generation::Mock { message, .. } => Ok(StageGeneration::Mock { message }),
            Generation::Completed { value, .. } => {
                // A fix must carry corrected elements; otherwise keep what we had.
                match value.get("elements").and_then(|_| parse_stage_result(&value)) {
                    Some(result) => {
                        self.report = ValidationReport::from_value(&value);
                        self.pending = Some(result.clone());
                        Ok(StageGeneration::Ready(result))
                    }
                    None => Ok(StageGeneration::Unparsed {
                        raw: raw_text(&value),
                    }),
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Confirmation
    // -----------------------------------------------------------------------

    /// Confirm the current stage and advance the frontier. For `Input` this
    /// requires non-empty text; for AI stages an unconfirmed result.
    pub fn confirm_stage(&mut self) -> Result<()> {
        match self.current {
            Stage::Input => self.confirm_input(),
            Stage::Confirm => Err(StrategyError::WizardComplete),
            stage => {
                let result = self
                    .pending
                    .take()
                    .ok_or_else(|| StrategyError::NothingToConfirm(stage.as_str().to_string()))?;
                self.results.insert(stage, result);
                // Frontier advance; `Confirm` is terminal so next() always exists here.
                if let Some(next) = stage.next() {
                    self.current = next;
                }
                self.updated_at = Utc::now();
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Archive
    // -----------------------------------------------------------------------

    /// Persist the cumulative model as a new document. Only valid on the
    /// terminal stage; calling twice produces two documents. On failure the
    /// wizard stays here so the save can be retried without re-running
    /// earlier stages.
    pub fn archive(
        &mut self,
        store: &ModelStore,
        name: Option<String>,
        source: Option<String>,
    ) -> Result<SaveReceipt> {
        if self.current != Stage::Confirm {
            return Err(StrategyError::NotReadyToArchive);
        }
        let model = self.cumulative_model();
        let receipt = store.save(SaveRequest {
            name,
            source,
            target_year: Some(self.target_year),
            elements: model.elements,
            relationships: model.relationships,
        })?;
        self.archived.push(receipt.id.clone());
        self.updated_at = Utc::now();
        Ok(receipt)
    }
}

/// Shape-check an extracted value into a `StageResult`. `None` covers both
/// the `{raw}` sentinel and structurally unusable values.
fn parse_stage_result(value: &Value) -> Option<StageResult> {
    if extract::is_unparsed(value) {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

fn raw_text(value: &Value) -> String {
    match value.get("raw").and_then(Value::as_str) {
        Some(raw) => raw.to_string(),
        None => value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
