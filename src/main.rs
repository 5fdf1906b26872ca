use anyhow::Result;
use clap::Parser;
use contract_compat::{CompatibilityConfig, CompatibilityRule, DiffContext};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "contract-compat")]
#[command(about = "Inspect the rule policy used to classify API contract changes")]
#[command(version)]
struct Args {
    #[arg(long, short, global = true, help = "Enable debug logging")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    #[command(about = "List compatibility rules and their effective severity")]
    Rules {
        #[arg(long, help = "Path to a YAML configuration file")]
        config: Option<PathBuf>,
        #[arg(long, help = "Output format", value_enum, default_value = "text")]
        format: OutputFormat,
    },
    #[command(about = "Validate a YAML configuration file")]
    CheckConfig {
        #[arg(help = "Path to the YAML configuration file")]
        file: PathBuf,
    },
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct RuleRow {
    id: &'static str,
    key: &'static str,
    category: &'static str,
    enabled_by_default: bool,
    enabled: bool,
    description: &'static str,
}

fn load_context(config: Option<&PathBuf>) -> Result<DiffContext> {
    let config = match config {
        Some(path) => CompatibilityConfig::from_yaml_file(path)?,
        None => CompatibilityConfig::default(),
    };
    Ok(DiffContext::from_config(&config)?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Commands::Rules { config, format } => {
            let context = load_context(config.as_ref())?;
            let rows: Vec<RuleRow> = CompatibilityRule::all()
                .iter()
                .map(|rule| RuleRow {
                    id: rule.id(),
                    key: rule.key(),
                    category: rule.category().id(),
                    enabled_by_default: rule.enabled_by_default(),
                    enabled: rule.enabled(&context),
                    description: rule.description(),
                })
                .collect();

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                }
                OutputFormat::Text => {
                    for row in &rows {
                        let severity = if row.enabled { "breaking" } else { "compatible" };
                        let marker = if row.enabled == row.enabled_by_default {
                            ""
                        } else {
                            " (overridden)"
                        };
                        println!("{:<10} {:<45} {}{}", row.category, row.id, severity, marker);
                        println!("           {}", row.description);
                    }
                    println!();
                    println!("Rules: {}", rows.len());
                    println!("Overridden: {}", context.overridden_rules().count());
                }
            }
        }
        Commands::CheckConfig { file } => {
            let outcome = CompatibilityConfig::from_yaml_file(&file)
                .and_then(|config| Ok(DiffContext::from_config(&config)?));
            match outcome {
                Ok(context) => {
                    println!("Configuration '{}' is valid.", file.display());
                    for (rule, enabled) in context.overridden_rules() {
                        let severity = if enabled { "breaking" } else { "compatible" };
                        println!("  {rule}: {severity}");
                    }
                }
                Err(err) => {
                    println!("Configuration '{}' is invalid: {err:#}", file.display());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
