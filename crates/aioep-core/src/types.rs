use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// One step of the wizard's linear sequence. Manual stages (`Input`,
/// `Confirm`) bracket the four AI-generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Input,
    ExtractDrivers,
    DeriveGoals,
    DecomposeInitiatives,
    ValidateModel,
    Confirm,
}

impl Stage {
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Input,
            Stage::ExtractDrivers,
            Stage::DeriveGoals,
            Stage::DecomposeInitiatives,
            Stage::ValidateModel,
            Stage::Confirm,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Stage> {
        let all = Stage::all();
        all.get(self.index() + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Input => "input",
            Stage::ExtractDrivers => "extract_drivers",
            Stage::DeriveGoals => "derive_goals",
            Stage::DecomposeInitiatives => "decompose_initiatives",
            Stage::ValidateModel => "validate_model",
            Stage::Confirm => "confirm",
        }
    }

    /// The sub-skill an AI-generation stage maps to. `None` for manual stages.
    pub fn sub_skill(self) -> Option<SubSkill> {
        match self {
            Stage::Input | Stage::Confirm => None,
            Stage::ExtractDrivers => Some(SubSkill::ExtractDrivers),
            Stage::DeriveGoals => Some(SubSkill::DeriveGoals),
            Stage::DecomposeInitiatives => Some(SubSkill::DecomposeInitiatives),
            Stage::ValidateModel => Some(SubSkill::ValidateModel),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Input => "Vision input",
            Stage::ExtractDrivers => "Driver extraction",
            Stage::DeriveGoals => "Goal derivation",
            Stage::DecomposeInitiatives => "Initiative decomposition",
            Stage::ValidateModel => "Model validation",
            Stage::Confirm => "Confirm and archive",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = crate::error::StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(Stage::Input),
            "extract_drivers" => Ok(Stage::ExtractDrivers),
            "derive_goals" => Ok(Stage::DeriveGoals),
            "decompose_initiatives" => Ok(Stage::DecomposeInitiatives),
            "validate_model" => Ok(Stage::ValidateModel),
            "confirm" => Ok(Stage::Confirm),
            _ => Err(crate::error::StrategyError::InvalidStage(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SubSkill
// ---------------------------------------------------------------------------

/// One named AI-generation operation. The vocabulary is closed; template
/// lookups and request validation both run against this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubSkill {
    ExtractDrivers,
    DeriveGoals,
    DecomposeInitiatives,
    SpawnProjects,
    ValidateModel,
}

impl SubSkill {
    pub fn all() -> &'static [SubSkill] {
        &[
            SubSkill::ExtractDrivers,
            SubSkill::DeriveGoals,
            SubSkill::DecomposeInitiatives,
            SubSkill::SpawnProjects,
            SubSkill::ValidateModel,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubSkill::ExtractDrivers => "extract-drivers",
            SubSkill::DeriveGoals => "derive-goals",
            SubSkill::DecomposeInitiatives => "decompose-initiatives",
            SubSkill::SpawnProjects => "spawn-projects",
            SubSkill::ValidateModel => "validate-model",
        }
    }
}

impl fmt::Display for SubSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubSkill {
    type Err = crate::error::StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extract-drivers" => Ok(SubSkill::ExtractDrivers),
            "derive-goals" => Ok(SubSkill::DeriveGoals),
            "decompose-initiatives" => Ok(SubSkill::DecomposeInitiatives),
            "spawn-projects" => Ok(SubSkill::SpawnProjects),
            "validate-model" => Ok(SubSkill::ValidateModel),
            _ => Err(crate::error::StrategyError::InvalidSubSkill(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ElementType
// ---------------------------------------------------------------------------

/// ArchiMate motivation-viewpoint node vocabulary. Wire names are PascalCase
/// to match the persisted document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Stakeholder,
    Driver,
    Assessment,
    Goal,
    Outcome,
    Principle,
    Requirement,
    WorkPackage,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Stakeholder => "Stakeholder",
            ElementType::Driver => "Driver",
            ElementType::Assessment => "Assessment",
            ElementType::Goal => "Goal",
            ElementType::Outcome => "Outcome",
            ElementType::Principle => "Principle",
            ElementType::Requirement => "Requirement",
            ElementType::WorkPackage => "WorkPackage",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RelationshipType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    Association,
    Influence,
    Aggregation,
    Realization,
    Composition,
    Specialization,
    Triggering,
}

impl RelationshipType {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::Association => "Association",
            RelationshipType::Influence => "Influence",
            RelationshipType::Aggregation => "Aggregation",
            RelationshipType::Realization => "Realization",
            RelationshipType::Composition => "Composition",
            RelationshipType::Specialization => "Specialization",
            RelationshipType::Triggering => "Triggering",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckStatus
// ---------------------------------------------------------------------------

/// Status of one validation check in the model health report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

impl CheckStatus {
    pub fn needs_fix(self) -> bool {
        matches!(self, CheckStatus::Warning | CheckStatus::Fail)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Warning => "WARNING",
            CheckStatus::Fail => "FAIL",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn stage_ordering() {
        assert!(Stage::Input < Stage::ExtractDrivers);
        assert!(Stage::ValidateModel < Stage::Confirm);
    }

    #[test]
    fn stage_next_walks_the_sequence() {
        assert_eq!(Stage::Input.next(), Some(Stage::ExtractDrivers));
        assert_eq!(Stage::ValidateModel.next(), Some(Stage::Confirm));
        assert_eq!(Stage::Confirm.next(), None);
    }

    #[test]
    fn stage_roundtrip() {
        for stage in Stage::all() {
            let parsed = Stage::from_str(stage.as_str()).unwrap();
            assert_eq!(*stage, parsed);
        }
    }

    #[test]
    fn stage_sub_skill_mapping() {
        assert_eq!(Stage::Input.sub_skill(), None);
        assert_eq!(Stage::Confirm.sub_skill(), None);
        assert_eq!(
            Stage::ExtractDrivers.sub_skill(),
            Some(SubSkill::ExtractDrivers)
        );
        assert_eq!(
            Stage::ValidateModel.sub_skill(),
            Some(SubSkill::ValidateModel)
        );
    }

    #[test]
    fn sub_skill_roundtrip() {
        for s in SubSkill::all() {
            assert_eq!(SubSkill::from_str(s.as_str()).unwrap(), *s);
        }
    }

    #[test]
    fn sub_skill_rejects_unknown() {
        assert!(matches!(
            SubSkill::from_str("invent-features"),
            Err(crate::error::StrategyError::InvalidSubSkill(_))
        ));
    }

    #[test]
    fn element_type_wire_names() {
        let json = serde_json::to_string(&ElementType::WorkPackage).unwrap();
        assert_eq!(json, "\"WorkPackage\"");
        let parsed: ElementType = serde_json::from_str("\"Stakeholder\"").unwrap();
        assert_eq!(parsed, ElementType::Stakeholder);
    }

    #[test]
    fn check_status_wire_names() {
        let parsed: CheckStatus = serde_json::from_str("\"WARNING\"").unwrap();
        assert_eq!(parsed, CheckStatus::Warning);
        assert!(parsed.needs_fix());
        assert!(!CheckStatus::Pass.needs_fix());
    }
}
