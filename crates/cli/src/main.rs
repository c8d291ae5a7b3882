use clap::{Parser, Subcommand};
use ha_core::{
    config::resolve_models_dir, DiagnosisService, ErrorKind, FieldKind, ModelRegistry, PanelId,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "health-assistant")]
#[command(about = "Health Assistant disease prediction CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all panels and their fields
    Panels,
    /// Load every panel model and report which are available
    CheckModels {
        /// Directory holding the exported models (default: $HA_MODELS_DIR or saved_models/)
        #[arg(long)]
        models_dir: Option<PathBuf>,
    },
    /// Run one prediction
    Predict {
        /// Panel slug, e.g. heart-disease
        panel: PanelId,
        /// Field values as key=value; categorical fields take the choice label
        #[arg(value_parser = parse_pair)]
        values: Vec<(String, String)>,
        /// Directory holding the exported models (default: $HA_MODELS_DIR or saved_models/)
        #[arg(long)]
        models_dir: Option<PathBuf>,
    },
}

fn parse_pair(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{arg}'"))
}

fn load_registry(models_dir: Option<PathBuf>) -> Result<ModelRegistry, Box<dyn std::error::Error>> {
    let override_dir = models_dir.or_else(|| std::env::var("HA_MODELS_DIR").ok().map(PathBuf::from));
    let dir = resolve_models_dir(override_dir)?;
    Ok(ModelRegistry::load_dir(&dir)?)
}

fn print_panels() {
    for panel in PanelId::ALL {
        let spec = panel.spec();
        println!("{} ({})", spec.title, panel.slug());
        for field in spec.fields {
            match field.kind {
                FieldKind::Numeric => println!("  {:<28} {}", field.key, field.label),
                FieldKind::Categorical(choices) => {
                    let labels: Vec<&str> = choices.iter().map(|c| c.label).collect();
                    println!(
                        "  {:<28} {} [{}]",
                        field.key,
                        field.label,
                        labels.join(" | ")
                    );
                }
            }
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("ha_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Panels) => print_panels(),
        Some(Commands::CheckModels { models_dir }) => {
            let registry = load_registry(models_dir)?;
            for panel in PanelId::ALL {
                match registry.get(panel) {
                    Some(classifier) => println!(
                        "ok       {:<14} {} features",
                        panel.slug(),
                        classifier.n_features()
                    ),
                    None => println!("missing  {}", panel.slug()),
                }
            }
            let missing = registry.missing().len();
            if missing > 0 {
                eprintln!("{} of {} panel models are missing", missing, PanelId::ALL.len());
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Predict {
            panel,
            values,
            models_dir,
        }) => {
            let service = DiagnosisService::new(Arc::new(load_registry(models_dir)?));
            match service.diagnose(panel, values) {
                Ok(diagnosis) => println!("{}", diagnosis.message),
                Err(e) if e.kind() == ErrorKind::Internal => {
                    eprintln!("Error: {}", e);
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(ExitCode::from(2));
                }
            }
        }
        None => {
            println!("Use 'health-assistant --help' for commands");
        }
    }

    Ok(ExitCode::SUCCESS)
}
