use crate::error::{Result, StrategyError};
use crate::types::SubSkill;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const AIOEP_DIR: &str = ".aioep";
pub const PROMPTS_DIR: &str = ".aioep/prompts";
pub const FEEDBACK_DIR: &str = ".aioep/feedback";
pub const MODELS_DIR: &str = ".aioep/models";

pub const FEEDBACK_FILE: &str = ".aioep/feedback/patterns.md";
pub const SETTINGS_FILE: &str = ".aioep/settings.json";
pub const WIZARD_FILE: &str = ".aioep/wizard.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn aioep_dir(root: &Path) -> PathBuf {
    root.join(AIOEP_DIR)
}

pub fn prompts_dir(root: &Path) -> PathBuf {
    root.join(PROMPTS_DIR)
}

pub fn prompt_path(root: &Path, sub_skill: SubSkill) -> PathBuf {
    prompts_dir(root).join(format!("{}.prompt.md", sub_skill.as_str()))
}

pub fn feedback_path(root: &Path) -> PathBuf {
    root.join(FEEDBACK_FILE)
}

pub fn models_dir(root: &Path) -> PathBuf {
    root.join(MODELS_DIR)
}

pub fn model_path(root: &Path, id: &str) -> PathBuf {
    models_dir(root).join(format!("{id}.json"))
}

pub fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}

pub fn wizard_path(root: &Path) -> PathBuf {
    root.join(WIZARD_FILE)
}

// ---------------------------------------------------------------------------
// Model id validation
// ---------------------------------------------------------------------------

static MODEL_ID_RE: OnceLock<Regex> = OnceLock::new();

fn model_id_re() -> &'static Regex {
    MODEL_ID_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*$").unwrap())
}

/// Ids are looked up as file names, so reject anything that could escape
/// the models directory.
pub fn validate_model_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !model_id_re().is_match(id) {
        return Err(StrategyError::InvalidModelId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_model_ids() {
        for id in ["model-1718000000000", "m1", "a-b-c"] {
            validate_model_id(id).unwrap_or_else(|_| panic!("expected valid: {id}"));
        }
    }

    #[test]
    fn invalid_model_ids() {
        for id in ["", "-leading-dash", "has spaces", "UPPER", "../escape", "a/b"] {
            assert!(validate_model_id(id).is_err(), "expected invalid: {id}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            prompt_path(root, SubSkill::ExtractDrivers),
            PathBuf::from("/tmp/proj/.aioep/prompts/extract-drivers.prompt.md")
        );
        assert_eq!(
            model_path(root, "model-17"),
            PathBuf::from("/tmp/proj/.aioep/models/model-17.json")
        );
        assert_eq!(
            settings_path(root),
            PathBuf::from("/tmp/proj/.aioep/settings.json")
        );
    }
}
