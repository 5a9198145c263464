use crate::output::print_json;
use aioep_core::gateway::LlmGateway;
use aioep_core::model::CumulativeModel;
use aioep_core::prompt::PromptStore;
use aioep_core::types::SubSkill;
use aioep_core::wizard::{run_sub_skill, Generation};
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};

/// One-shot stateless generation: the wizard's generation primitive without
/// a session, useful for tuning prompt templates.
pub fn run(
    root: &Path,
    sub_skill: &str,
    text: Option<String>,
    input_file: Option<PathBuf>,
    model_context: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let sub_skill: SubSkill = sub_skill.parse()?;
    let input = match (text, input_file) {
        (Some(t), _) => t,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("provide --text or --input-file"),
    };

    let existing: Option<CumulativeModel> = match model_context {
        Some(path) => {
            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Some(serde_json::from_str(&data).context("model context is not a valid model")?)
        }
        None => None,
    };

    let prompts = PromptStore::new(root);
    let gateway = LlmGateway::from_env()?;
    let generation = run_sub_skill(&prompts, &gateway, sub_skill, &input, existing.as_ref())?;

    match generation {
        Generation::Mock { message, .. } => {
            if json {
                print_json(&serde_json::json!({ "status": "mock", "message": message }))?;
            } else {
                println!("{message}");
            }
        }
        Generation::Completed { value, model, usage } => {
            if json {
                print_json(&serde_json::json!({
                    "status": "success",
                    "result": value,
                    "metadata": { "model": model, "usage": usage },
                }))?;
            } else {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }
    }
    Ok(())
}
