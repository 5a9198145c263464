use crate::output::{print_json, print_table};
use aioep_core::gateway::LlmGateway;
use aioep_core::profile::CompanyProfile;
use aioep_core::prompt::PromptStore;
use aioep_core::store::ModelStore;
use aioep_core::types::Stage;
use aioep_core::wizard::{StageGeneration, Wizard};
use anyhow::{bail, Context};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum WizardSubcommand {
    /// Start a new wizard session (vision input pre-filled from settings)
    Start {
        /// Vision text
        #[arg(long, conflicts_with = "input_file")]
        text: Option<String>,
        /// Read vision text from a file
        #[arg(long)]
        input_file: Option<PathBuf>,
        /// Target year stamped on the archived model
        #[arg(long)]
        target_year: Option<i32>,
        /// Skip the company-profile pre-fill
        #[arg(long)]
        no_prefill: bool,
    },
    /// Show session progress, pending output, and the validation report
    Status,
    /// Replace the vision input text
    Input {
        #[arg(long, conflicts_with = "input_file")]
        text: Option<String>,
        #[arg(long)]
        input_file: Option<PathBuf>,
    },
    /// Run the current stage's AI generation (repeats discard the unconfirmed result)
    Generate,
    /// Confirm the current stage and advance
    Confirm,
    /// Run a targeted fix for one validation check (1-based index from status)
    Fix { check: usize },
    /// Persist the confirmed model as a new document
    Archive {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        source: Option<String>,
    },
    /// Discard the session
    Abandon,
}

pub fn run(root: &Path, subcmd: WizardSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        WizardSubcommand::Start {
            text,
            input_file,
            target_year,
            no_prefill,
        } => start(root, text, input_file, target_year, no_prefill, json),
        WizardSubcommand::Status => status(root, json),
        WizardSubcommand::Input { text, input_file } => set_input(root, text, input_file, json),
        WizardSubcommand::Generate => generate(root, json),
        WizardSubcommand::Confirm => confirm(root, json),
        WizardSubcommand::Fix { check } => fix(root, check, json),
        WizardSubcommand::Archive { name, source } => archive(root, name, source, json),
        WizardSubcommand::Abandon => abandon(root, json),
    }
}

fn read_input(text: Option<String>, input_file: Option<PathBuf>) -> anyhow::Result<Option<String>> {
    match (text, input_file) {
        (Some(t), _) => Ok(Some(t)),
        (None, Some(path)) => Ok(Some(
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        )),
        (None, None) => Ok(None),
    }
}

fn start(
    root: &Path,
    text: Option<String>,
    input_file: Option<PathBuf>,
    target_year: Option<i32>,
    no_prefill: bool,
    json: bool,
) -> anyhow::Result<()> {
    if aioep_core::paths::wizard_path(root).exists() {
        bail!("a wizard session is already in progress: use 'aioep wizard abandon' to discard it");
    }

    let profile = if no_prefill {
        CompanyProfile::default()
    } else {
        CompanyProfile::load(root)
    };
    let mut wizard = Wizard::new(&profile, target_year);
    if let Some(input) = read_input(text, input_file)? {
        wizard.set_input(input);
    }
    wizard.save(root).context("failed to save session")?;

    if json {
        print_json(&wizard)?;
    } else {
        println!("Started wizard session (target year {})", wizard.target_year);
        if wizard.input_text.is_empty() {
            println!("Next: aioep wizard input --text '<vision text>'");
        } else {
            println!("Vision input pre-filled ({} chars)", wizard.input_text.len());
            println!("Next: aioep wizard confirm");
        }
    }
    Ok(())
}

fn status(root: &Path, json: bool) -> anyhow::Result<()> {
    let wizard = Wizard::load(root)?;
    if json {
        return print_json(&wizard);
    }

    let rows: Vec<Vec<String>> = Stage::all()
        .iter()
        .map(|stage| {
            let marker = if wizard.is_confirmed(*stage) {
                "confirmed"
            } else if *stage == wizard.current {
                "current"
            } else {
                "-"
            };
            let summary = match wizard.results.get(stage) {
                Some(r) => format!("{} elements, {} relationships", r.elements.len(), r.relationships.len()),
                None => String::new(),
            };
            vec![stage.title().to_string(), marker.to_string(), summary]
        })
        .collect();
    print_table(&["stage", "state", "result"], rows);

    if let Some(pending) = &wizard.pending {
        println!(
            "\nUnconfirmed result on '{}': {} elements, {} relationships",
            wizard.current.title(),
            pending.elements.len(),
            pending.relationships.len()
        );
        println!("Review it, then 'aioep wizard confirm' or 'aioep wizard generate' to redo.");
    }

    if let Some(report) = &wizard.report {
        let health = report
            .summary
            .as_ref()
            .and_then(|s| s.overall_health.clone())
            .unwrap_or_else(|| "unknown".to_string());
        println!("\nModel health: {health}");
        for (i, check) in report.checks.iter().enumerate() {
            let detail = check.detail.as_deref().unwrap_or("");
            println!("  {}. [{}] {}: {}", i + 1, check.status, check.name, detail);
        }
        if !report.fixable_checks().is_empty() {
            println!("Run 'aioep wizard fix <n>' to request a targeted correction.");
        }
    }

    if !wizard.archived.is_empty() {
        println!("\nArchived documents: {}", wizard.archived.join(", "));
    }
    Ok(())
}

fn set_input(
    root: &Path,
    text: Option<String>,
    input_file: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let mut wizard = Wizard::load(root)?;
    let Some(input) = read_input(text, input_file)? else {
        bail!("provide --text or --input-file");
    };
    wizard.set_input(input);
    wizard.save(root)?;

    if json {
        print_json(&serde_json::json!({ "ok": true, "chars": wizard.input_text.len() }))?;
    } else {
        println!("Vision input updated ({} chars)", wizard.input_text.len());
    }
    Ok(())
}

fn generate(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut wizard = Wizard::load(root)?;
    let prompts = PromptStore::new(root);
    let gateway = LlmGateway::from_env()?;

    let outcome = wizard.generate(&prompts, &gateway)?;
    wizard.save(root)?;
    report_generation(&wizard, outcome, json)
}

fn confirm(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut wizard = Wizard::load(root)?;
    wizard.confirm_stage()?;
    wizard.save(root)?;

    if json {
        print_json(&serde_json::json!({ "current": wizard.current }))?;
    } else if wizard.current == Stage::Confirm {
        let model = wizard.cumulative_model();
        println!(
            "All stages confirmed: {} elements, {} relationships",
            model.elements.len(),
            model.relationships.len()
        );
        println!("Next: aioep wizard archive");
    } else {
        println!("Advanced to stage: {}", wizard.current.title());
    }
    Ok(())
}

fn fix(root: &Path, check_number: usize, json: bool) -> anyhow::Result<()> {
    let mut wizard = Wizard::load(root)?;
    let check = wizard
        .report
        .as_ref()
        .and_then(|r| r.checks.get(check_number.wrapping_sub(1)))
        .cloned()
        .with_context(|| format!("no validation check #{check_number}: see 'aioep wizard status'"))?;
    if !check.status.needs_fix() {
        bail!("check #{check_number} ({}) passed; nothing to fix", check.name);
    }

    let prompts = PromptStore::new(root);
    let gateway = LlmGateway::from_env()?;
    let outcome = wizard.fix(&prompts, &gateway, &check)?;
    wizard.save(root)?;
    report_generation(&wizard, outcome, json)
}

fn archive(
    root: &Path,
    name: Option<String>,
    source: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut wizard = Wizard::load(root)?;
    let store = ModelStore::new(root);
    let receipt = wizard.archive(&store, name, source)?;
    wizard.save(root)?;

    if json {
        print_json(&receipt)?;
    } else {
        println!(
            "Archived model {} ({} elements, {} relationships)",
            receipt.id, receipt.element_count, receipt.relationship_count
        );
        for warning in &receipt.warnings {
            println!("  warning: {warning}");
        }
        println!("Inspect it with: aioep model show {}", receipt.id);
    }
    Ok(())
}

fn abandon(root: &Path, json: bool) -> anyhow::Result<()> {
    let existed = Wizard::discard(root)?;
    if json {
        print_json(&serde_json::json!({ "discarded": existed }))?;
    } else if existed {
        println!("Wizard session discarded");
    } else {
        println!("No wizard session to discard");
    }
    Ok(())
}

fn report_generation(wizard: &Wizard, outcome: StageGeneration, json: bool) -> anyhow::Result<()> {
    match outcome {
        StageGeneration::Ready(result) => {
            if json {
                return print_json(&result);
            }
            println!(
                "Generated {} elements, {} relationships for '{}'",
                result.elements.len(),
                result.relationships.len(),
                wizard.current.title()
            );
            let rows: Vec<Vec<String>> = result
                .elements
                .iter()
                .map(|e| {
                    vec![
                        e.id.clone(),
                        e.element_type.to_string(),
                        e.name.clone(),
                        e.description.clone(),
                    ]
                })
                .collect();
            if !rows.is_empty() {
                print_table(&["id", "type", "name", "description"], rows);
            }
            for rel in &result.relationships {
                println!("  {} -[{}]-> {}", rel.source_id, rel.relationship_type, rel.target_id);
            }
            println!("Review, then 'aioep wizard confirm' (or 'generate' again to redo).");
        }
        StageGeneration::Mock { message } => {
            if json {
                return print_json(&serde_json::json!({ "status": "mock", "message": message }));
            }
            println!("{message}");
        }
        StageGeneration::Unparsed { raw } => {
            if json {
                return print_json(&serde_json::json!({ "status": "unparsed", "raw": raw }));
            }
            let excerpt: String = raw.chars().take(200).collect();
            println!("The model returned output that could not be parsed as JSON:");
            println!("  {excerpt}");
            println!("The stage kept no result; run 'aioep wizard generate' to retry.");
        }
    }
    Ok(())
}
