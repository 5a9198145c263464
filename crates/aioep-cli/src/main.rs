mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{model::ModelSubcommand, settings::SettingsSubcommand, wizard::WizardSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "aioep",
    about = "AI-assisted strategy modeling — staged generation, human confirmation, archived motivation models",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .aioep/ or .git/)
    #[arg(long, global = true, env = "AIOEP_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize AIOEP in the current project
    Init,

    /// Drive a strategy-modeling wizard session
    Wizard {
        #[command(subcommand)]
        subcommand: WizardSubcommand,
    },

    /// Inspect archived models
    Model {
        #[command(subcommand)]
        subcommand: ModelSubcommand,
    },

    /// Manage the company profile
    Settings {
        #[command(subcommand)]
        subcommand: SettingsSubcommand,
    },

    /// Run one sub-skill generation without a wizard session
    Generate {
        /// Sub-skill id (extract-drivers, derive-goals, decompose-initiatives, spawn-projects, validate-model)
        sub_skill: String,
        /// Input text
        #[arg(long, conflicts_with = "input_file")]
        text: Option<String>,
        /// Read input text from a file
        #[arg(long)]
        input_file: Option<PathBuf>,
        /// JSON file with an existing model to pass as context
        #[arg(long)]
        model_context: Option<PathBuf>,
    },

    /// Start the HTTP API server
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Wizard { subcommand } => cmd::wizard::run(&root, subcommand, cli.json),
        Commands::Model { subcommand } => cmd::model::run(&root, subcommand, cli.json),
        Commands::Settings { subcommand } => cmd::settings::run(&root, subcommand, cli.json),
        Commands::Generate {
            sub_skill,
            text,
            input_file,
            model_context,
        } => cmd::generate::run(&root, &sub_skill, text, input_file, model_context, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
