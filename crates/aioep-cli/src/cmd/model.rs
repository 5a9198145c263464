use crate::output::{print_json, print_table};
use aioep_core::store::ModelStore;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ModelSubcommand {
    /// List all archived models
    List,
    /// Show a full model document
    Show { id: String },
}

pub fn run(root: &Path, subcmd: ModelSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ModelSubcommand::List => list(root, json),
        ModelSubcommand::Show { id } => show(root, &id, json),
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let summaries = ModelStore::new(root).list()?;
    if json {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        println!("No archived models. Run the wizard: aioep wizard start");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.name.clone(),
                s.created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
                s.status.clone().unwrap_or_default(),
                s.target_year.map(|y| y.to_string()).unwrap_or_default(),
                s.element_count.to_string(),
                s.relationship_count.to_string(),
                s.error.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(
        &["id", "name", "created", "status", "year", "elements", "relationships", "error"],
        rows,
    );
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let model = ModelStore::new(root).get(id)?;
    if json {
        return print_json(&model);
    }

    println!("{} — {}", id, model.metadata.name);
    println!(
        "  source: {} | created: {} | status: {} | target year: {}",
        model.metadata.source,
        model.metadata.created_at.format("%Y-%m-%d %H:%M"),
        model.metadata.status,
        model.metadata.target_year
    );
    let rows: Vec<Vec<String>> = model
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
    print_table(&["id", "type", "name", "description"], rows);
    for rel in &model.relationships {
        let label = rel.label.as_deref().unwrap_or("");
        println!("  {} -[{}]-> {} {}", rel.source_id, rel.relationship_type, rel.target_id, label);
    }
    Ok(())
}
