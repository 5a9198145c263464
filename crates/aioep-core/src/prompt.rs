//! Prompt template store — maps a sub-skill to its system-prompt template
//! and appends the shared feedback corpus when one exists.
//!
//! Layout:
//!   .aioep/prompts/<sub-skill>.prompt.md   — one template per sub-skill
//!   .aioep/feedback/patterns.md            — optional correction corpus
//!
//! Templates are collaborator-owned static files and are read fresh per
//! call; there is no cache to invalidate.

use crate::error::{Result, StrategyError};
use crate::model::CumulativeModel;
use crate::paths;
use crate::types::SubSkill;
use std::path::PathBuf;

/// Heading under which the feedback corpus is appended to every generation
/// system prompt.
pub const FEEDBACK_HEADING: &str = "## Correction patterns from earlier reviews";

// ---------------------------------------------------------------------------
// PromptStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PromptStore {
    root: PathBuf,
}

impl PromptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read the template for one sub-skill. A missing file is a
    /// configuration error, not an empty template.
    pub fn load(&self, sub_skill: SubSkill) -> Result<String> {
        let path = paths::prompt_path(&self.root, sub_skill);
        if !path.exists() {
            return Err(StrategyError::TemplateMissing(
                sub_skill.as_str().to_string(),
            ));
        }
        Ok(std::fs::read_to_string(&path)?)
    }

    /// Read the feedback corpus; empty string when none has been recorded.
    pub fn feedback_patterns(&self) -> String {
        let path = paths::feedback_path(&self.root);
        std::fs::read_to_string(&path).unwrap_or_default()
    }

    /// Full system prompt for one generation: the sub-skill template, plus
    /// the feedback corpus verbatim under a fixed heading when non-empty.
    pub fn system_prompt(&self, sub_skill: SubSkill) -> Result<String> {
        let template = self.load(sub_skill)?;
        let patterns = self.feedback_patterns();
        if patterns.trim().is_empty() {
            return Ok(template);
        }
        Ok(format!("{template}\n\n{FEEDBACK_HEADING}\n\n{patterns}"))
    }
}

// ---------------------------------------------------------------------------
// User message
// ---------------------------------------------------------------------------

/// Build the user message for a generation call: the free-text input, plus a
/// serialized dump of the cumulative model when any prior stage has
/// confirmed content.
pub fn user_message(input: &str, existing: Option<&CumulativeModel>) -> String {
    let mut msg = format!("Analyze the following input:\n\n{input}");
    if let Some(model) = existing.filter(|m| !m.is_empty()) {
        let dump = serde_json::to_string_pretty(model).unwrap_or_default();
        msg.push_str(&format!("\n\nExisting model context:\n{dump}"));
    }
    msg
}

// ---------------------------------------------------------------------------
// Default templates
// ---------------------------------------------------------------------------

/// Built-in template for a sub-skill, scaffolded by `aioep init` so a fresh
/// project works out of the box. Operators are expected to tune these files.
pub fn default_template(sub_skill: SubSkill) -> String {
    let body = match sub_skill {
        SubSkill::ExtractDrivers => DEFAULT_EXTRACT_DRIVERS,
        SubSkill::DeriveGoals => DEFAULT_DERIVE_GOALS,
        SubSkill::DecomposeInitiatives => DEFAULT_DECOMPOSE_INITIATIVES,
        SubSkill::SpawnProjects => DEFAULT_SPAWN_PROJECTS,
        SubSkill::ValidateModel => return DEFAULT_VALIDATE_MODEL.to_string(),
    };
    format!("{body}\n{JSON_CONTRACT}\n")
}

const JSON_CONTRACT: &str = r#"Respond with a single JSON object and nothing else:
{
  "elements": [
    { "id": "<unique-id>", "type": "<ElementType>", "name": "...", "description": "..." }
  ],
  "relationships": [
    { "id": "<unique-id>", "type": "<RelationshipType>", "sourceId": "...", "targetId": "...", "label": "..." }
  ]
}
Element types: Stakeholder, Driver, Assessment, Goal, Outcome, Principle, Requirement, WorkPackage.
Relationship types: Association, Influence, Aggregation, Realization, Composition, Specialization, Triggering.
Reference existing element ids from the model context instead of inventing duplicates."#;

const DEFAULT_EXTRACT_DRIVERS: &str = r#"# Sub-skill: extract-drivers

You are an enterprise-architecture analyst working in the ArchiMate motivation
viewpoint. From the supplied vision text, identify:

- Stakeholder elements: the people or bodies with an interest in the outcome.
- Driver elements: the internal or external forces that create pressure to act.
- Assessment elements: concrete pain points, each with a `severity` attribute
  (low, medium, high).

Link each Driver to the Stakeholders it concerns with Association
relationships, and each Assessment to the Driver it evidences with Influence
relationships.
"#;

const DEFAULT_DERIVE_GOALS: &str = r#"# Sub-skill: derive-goals

You are an enterprise-architecture analyst working in the ArchiMate motivation
viewpoint. From the pain points and drivers in the model context, derive:

- Goal elements: strategic goals that address the assessments.
- Outcome elements: measurable results, each with a `target` attribute
  stating the quantified target.

Link each Goal to the Assessments it addresses with Influence relationships
and each Outcome to its Goal with a Realization relationship.
"#;

const DEFAULT_DECOMPOSE_INITIATIVES: &str = r#"# Sub-skill: decompose-initiatives

You are an enterprise-architecture analyst working in the ArchiMate motivation
viewpoint. Decompose the goals in the model context into executable work:

- Requirement elements: what must hold for the goals to be reached, each with
  a `priority` attribute (must, should, could).
- WorkPackage elements: concrete initiatives that deliver the requirements.

Link each Requirement to its Goal with a Realization relationship and each
WorkPackage to the Requirements it delivers with Realization relationships.
"#;

const DEFAULT_SPAWN_PROJECTS: &str = r#"# Sub-skill: spawn-projects

You are an enterprise-architecture analyst. Turn the WorkPackage elements in
the model context into project charters: for each work package produce a
WorkPackage element enriched with `priority` and a description covering
scope, suggested phasing, and the outcomes it serves.
"#;

const DEFAULT_VALIDATE_MODEL: &str = r#"# Sub-skill: validate-model

You are an enterprise-architecture reviewer. Audit the motivation model in
the model context for completeness, consistency, and traceability:

- every Driver is associated with at least one Stakeholder;
- every Assessment influences a Driver and is addressed by a Goal;
- every Goal is realized by at least one Outcome or Requirement;
- relationship endpoints reference existing element ids.

Respond with a single JSON object and nothing else:
{
  "summary": { "overallHealth": "healthy" | "degraded" },
  "checks": [
    { "name": "...", "status": "PASS" | "WARNING" | "FAIL", "detail": "..." }
  ],
  "elements": [],
  "relationships": []
}
When asked to fix a specific issue, return the corrected full element and
relationship sets in `elements` and `relationships`.
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
