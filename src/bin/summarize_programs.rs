use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use nederland_2029::config::Config;
use nederland_2029::llm::{LLMProviderConfig, LLM};
use nederland_2029::summaries::{
    locate_documents, ResultWriter, RunMode, SummaryGenerator, SummaryPipeline,
};
use nederland_2029::utils::init_logger;

/// Generate AI summaries from party programs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory containing PDF files
    #[arg(long)]
    programs_dir: Option<PathBuf>,

    /// Specific PDF files to process (instead of all files)
    #[arg(long, num_args = 1..)]
    files: Vec<String>,

    /// Use the predefined test file list
    #[arg(long)]
    test: bool,

    /// Don't save anything; print the summaries instead
    #[arg(long)]
    dry_run: bool,

    /// Directory for the per-party JSON files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Path of the aggregate JSON file
    #[arg(long)]
    aggregate_path: Option<PathBuf>,
}

/// `--test` wins over `--files`; neither means the whole directory
fn select_files(cli: &Cli, test_files: &[String]) -> Option<Vec<String>> {
    if cli.test {
        Some(test_files.to_vec())
    } else if !cli.files.is_empty() {
        Some(cli.files.clone())
    } else {
        None
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logger("nederland_2029=info", "summarize.log");

    let config = Config::from_env()?;
    let settings = config.summaries.clone();

    let programs_dir = cli.programs_dir.clone().unwrap_or(settings.programs_dir);
    let selection = select_files(&cli, &settings.test_files);

    // The only fatal precondition: the programs directory must exist
    let located = locate_documents(&programs_dir, selection.as_deref()).await?;

    match &selection {
        Some(files) if cli.test => println!("Processing test files: {:?}", files),
        Some(files) => println!("Processing specific files: {:?}", files),
        None => println!("Processing all programs from {}", programs_dir.display()),
    }
    if selection.is_some() {
        println!("From directory: {}", programs_dir.display());
    }

    if config.llm.openai_api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; generation requests will be rejected");
    }
    let llm = LLM::new(LLMProviderConfig {
        name: config.llm.provider.clone(),
        api_key: config.llm.openai_api_key.clone(),
        api_base: config.llm.api_base.clone(),
    })?;
    info!(provider = %llm.provider_name(), model = %config.llm.model, "Text generation client ready");

    let generator = SummaryGenerator::new(
        Arc::new(llm),
        config.llm.provider.clone(),
        config.llm.model.clone(),
        settings.max_chars,
    );

    let writer = ResultWriter::new(
        cli.output_dir.unwrap_or(settings.output_dir),
        cli.aggregate_path.unwrap_or(settings.aggregate_path),
    );
    let mode = if cli.dry_run { RunMode::DryRun } else { RunMode::Persist };

    let pipeline = SummaryPipeline::new(generator, writer, mode);
    let mut console = std::io::stdout();
    let report = pipeline.run(located, &mut console).await?;

    info!(
        parties = report.batch.len(),
        failures = report.failures.len(),
        dry_run = pipeline.is_dry_run(),
        "Done"
    );

    Ok(())
}
