use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use willow_core::batch::BatchValidator;
use willow_core::logging::BufferedFileEventLogger;
use willow_core::metrics::{InMemoryMetrics, Metrics};
use willow_core::report::{render_batch_summary, save_json_report};
use willow_core::rules::RuleSet;
use willow_core::scenario::ScenarioValidator;
use willow_core::schema::SchemaValidator;

#[derive(Parser)]
#[command(name = "willow", about = "Validate Willow scenario dataset files")]
struct Cli {
    /// Dataset JSON file to validate
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the JSON validation report
    #[arg(short, long)]
    output: PathBuf,

    /// TOML rules file overriding the built-in phrase lists
    #[arg(long)]
    rules: Option<PathBuf>,

    /// JSON Schema document layered on top of the built-in field checks
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Directory for per-run JSONL event logs
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Suppress the human-readable summary on stdout
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let rules = match &cli.rules {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading rules file {}", path.display()))?;
            toml::from_str::<RuleSet>(&raw)
                .with_context(|| format!("parsing rules file {}", path.display()))?
        }
        None => RuleSet::builtin(),
    };

    let schema = match &cli.schema {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading schema file {}", path.display()))?;
            let doc: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("parsing schema file {}", path.display()))?;
            SchemaValidator::with_json_schema(&doc)?
        }
        None => SchemaValidator::new(),
    };

    let scenario = ScenarioValidator::with_parts(schema, &rules)?;
    let metrics = Arc::new(InMemoryMetrics::new());
    let logger = Arc::new(BufferedFileEventLogger::new(1024, cli.log_dir.clone()));
    let validator = BatchValidator::new(Arc::new(scenario), metrics.clone(), logger, None);

    let report = validator.validate_scenario_file_parallel(&cli.input).await?;
    save_json_report(&report, &cli.output)
        .with_context(|| format!("writing report to {}", cli.output.display()))?;

    if !cli.quiet {
        print!("{}", render_batch_summary(&report.summary));
        let snapshot = metrics.snapshot();
        println!(
            "Schema failures: {}, legal failures: {}, trauma failures: {}",
            snapshot.schema_failures, snapshot.legal_failures, snapshot.trauma_failures
        );
        println!("Report written to {}", cli.output.display());
    }

    Ok(report.valid)
}
