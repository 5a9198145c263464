use crate::output::print_json;
use aioep_core::profile::CompanyProfile;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show the company profile
    Show,
    /// Update company profile fields
    Set {
        #[arg(long)]
        company_name: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long)]
        annual_revenue: Option<String>,
        #[arg(long)]
        employee_count: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        strategic_cycle: Option<String>,
        #[arg(long)]
        current_year: Option<i32>,
    },
}

pub fn run(root: &Path, subcmd: SettingsSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SettingsSubcommand::Show => show(root, json),
        SettingsSubcommand::Set {
            company_name,
            industry,
            annual_revenue,
            employee_count,
            description,
            strategic_cycle,
            current_year,
        } => {
            let mut profile = CompanyProfile::load(root);
            if let Some(v) = company_name {
                profile.company_name = v;
            }
            if let Some(v) = industry {
                profile.industry = v;
            }
            if let Some(v) = annual_revenue {
                profile.annual_revenue = v;
            }
            if let Some(v) = employee_count {
                profile.employee_count = v;
            }
            if let Some(v) = description {
                profile.description = v;
            }
            if let Some(v) = strategic_cycle {
                profile.strategic_cycle = v;
            }
            if let Some(v) = current_year {
                profile.current_year = v;
            }
            profile.save(root)?;
            if json {
                print_json(&profile)?;
            } else {
                println!("Settings updated");
            }
            Ok(())
        }
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let profile = CompanyProfile::load(root);
    if json {
        return print_json(&profile);
    }
    println!("company name:    {}", profile.company_name);
    println!("industry:        {}", profile.industry);
    println!("annual revenue:  {}", profile.annual_revenue);
    println!("employee count:  {}", profile.employee_count);
    println!("description:     {}", profile.description);
    println!("strategic cycle: {}", profile.strategic_cycle);
    println!("current year:    {}", profile.current_year);
    Ok(())
}
