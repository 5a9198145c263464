use aioep_core::profile::CompanyProfile;
use aioep_core::prompt::default_template;
use aioep_core::types::SubSkill;
use aioep_core::{io, paths};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing AIOEP in: {}", root.display());

    // 1. Create .aioep directory structure
    let dirs = [
        paths::AIOEP_DIR,
        paths::PROMPTS_DIR,
        paths::FEEDBACK_DIR,
        paths::MODELS_DIR,
    ];
    for dir in dirs {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    // 2. Scaffold the five sub-skill prompt templates if missing
    for sub_skill in SubSkill::all() {
        let path = paths::prompt_path(root, *sub_skill);
        let written = io::write_if_missing(&path, default_template(*sub_skill).as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        let rel = format!(".aioep/prompts/{}.prompt.md", sub_skill.as_str());
        if written {
            println!("  created: {rel}");
        } else {
            println!("  exists:  {rel}");
        }
    }

    // 3. Write default settings if missing
    let settings_path = paths::settings_path(root);
    if !settings_path.exists() {
        CompanyProfile::default()
            .save(root)
            .context("failed to write settings.json")?;
        println!("  created: {}", paths::SETTINGS_FILE);
    } else {
        println!("  exists:  {}", paths::SETTINGS_FILE);
    }

    println!("\nNext: aioep settings set --company-name <name>, then aioep wizard start");
    Ok(())
}
