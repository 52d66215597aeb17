mod analyzer;
mod config;
mod corpus;
mod model;
mod normalizer;
mod parser;
mod storage;
mod survey;

use analyzer::{KeywordClassifier, KeywordDictionary, aggregate, build_distribution, load_sources};
use clap::{Parser, Subcommand};
use config::{AppConfig, load_config};
use model::PipelineError;
use normalizer::LabelNormalizer;
use parser::{FileTableReader, TableReader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Shen Bao advertisement coding and survey preparation")]
struct Cli {
    /// JSON configuration file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge the per-category ad tables and code each headline's strategy
    Code {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build the stacked bar chart input from the coded dataset
    ChartData {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the word cloud text corpus per category
    Corpus {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Clean raw survey answers into a numeric table
    Survey {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Config load error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    let result = match cli.command {
        Command::Code { output } => {
            if let Some(output) = output {
                config.coding.output = output;
            }
            run_coding(&config)
        }
        Command::ChartData { input, output } => {
            if let Some(input) = input {
                config.charts.input = input;
            }
            if let Some(output) = output {
                config.charts.summary_output = output.with_extension("json");
                config.charts.distribution_output = output;
            }
            run_chart_data(&config)
        }
        Command::Corpus { input, output_dir } => {
            if let Some(input) = input {
                config.charts.input = input;
            }
            if let Some(dir) = output_dir {
                config.charts.corpus_dir = dir;
            }
            run_corpus(&config)
        }
        Command::Survey { input, output } => {
            if let Some(input) = input {
                config.survey.input = input;
            }
            if let Some(output) = output {
                config.survey.output = output;
            }
            run_survey(&config)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Merges the category tables, codes every headline and saves the result.
fn run_coding(config: &AppConfig) -> Result<(), PipelineError> {
    info!("Starting data integration and coding...");
    let coding = &config.coding;

    let sources = load_sources(&coding.sources, &FileTableReader::new())?;
    let classifier = KeywordClassifier::new(KeywordDictionary::from(&coding.keywords));
    let merged = aggregate(sources, &coding.headline_columns, &classifier)?;

    storage::write_dataset(&coding.output, &merged)?;
    info!("Successfully saved encoded data to: {}", coding.output.display());
    Ok(())
}

fn run_chart_data(config: &AppConfig) -> Result<(), PipelineError> {
    let charts = &config.charts;
    info!("Reading data from: {}", charts.input.display());

    let table = FileTableReader::new().read(&charts.input)?;
    let normalizer = LabelNormalizer::from_config(charts);
    let distribution = build_distribution(&table, charts, &normalizer)?;

    storage::write_table(
        &charts.distribution_output,
        &distribution.headers(),
        &distribution.rows(),
    )?;
    storage::write_json(&charts.summary_output, &distribution)?;
    Ok(())
}

fn run_corpus(config: &AppConfig) -> Result<(), PipelineError> {
    let charts = &config.charts;
    info!("Reading data from: {}", charts.input.display());

    let table = FileTableReader::new().read(&charts.input)?;
    info!("Successfully loaded {} records.", table.len());
    let normalizer = LabelNormalizer::from_config(charts);
    let by_category = corpus::collect_corpus(&table, charts, &normalizer)?;

    let written = corpus::write_corpus(&charts.corpus_dir, &by_category)?;
    if written.is_empty() {
        return Err(PipelineError::EmptyResult("corpus"));
    }
    info!("All word cloud inputs written to {}", charts.corpus_dir.display());
    Ok(())
}

fn run_survey(config: &AppConfig) -> Result<(), PipelineError> {
    info!("Starting survey data cleaning...");
    let cfg = &config.survey;

    let table = FileTableReader::new().read(&cfg.input)?;
    info!("Loaded raw data: {} responses.", table.len());

    let cleaned = survey::clean_survey(&table, cfg)?;
    storage::write_table(&cfg.output, &cleaned.columns, &cleaned.rows())?;
    info!(
        "Final valid sample size: {} ({} dropped by quality control)",
        cleaned.responses.len(),
        cleaned.dropped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use std::fs;

    fn source(category: &str, path: PathBuf) -> SourceConfig {
        SourceConfig {
            category: category.to_string(),
            path,
        }
    }

    #[test]
    fn coding_without_readable_sources_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.coding.sources = vec![
            source("美容", dir.path().join("absent_beauty.xlsx")),
            source("补脑", dir.path().join("absent_health.csv")),
        ];
        config.coding.output = dir.path().join("out/encoded_ads.csv");

        let err = run_coding(&config).unwrap_err();
        assert!(matches!(err, PipelineError::NoSources));
        assert!(!config.coding.output.exists());
    }

    #[test]
    fn coding_reads_spreadsheet_sources() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.coding.sources = vec![source(
            "美容",
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/raw_ads.xlsx"),
        )];
        config.coding.output = dir.path().join("encoded_ads.csv");

        run_coding(&config).unwrap();
        let written = fs::read_to_string(&config.coding.output).unwrap();
        let header = written.trim_start_matches('\u{feff}').lines().next().unwrap();
        assert_eq!(header, "完整标题,日期,Category,Strategy");
        assert_eq!(written.lines().count(), 3);
    }

    #[test]
    fn survey_without_passing_rows_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw_survey.csv");
        fs::write(
            &input,
            "1、您的性别,9、我不是机器人，请选择比较不符合\n男,非常不符合\n女,比较不符合\n",
        )
        .unwrap();
        let mut config = AppConfig::default();
        config.survey.input = input;
        config.survey.output = dir.path().join("clean_survey.csv");

        let err = run_survey(&config).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyResult(_)));
        assert!(!config.survey.output.exists());
    }

    #[test]
    fn survey_writes_passing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw_survey.csv");
        fs::write(
            &input,
            "1、您的性别,9、我不是机器人，请选择比较符合\n男,比较符合\n女,非常不符合\n",
        )
        .unwrap();
        let mut config = AppConfig::default();
        config.survey.input = input;
        config.survey.output = dir.path().join("clean_survey.csv");

        run_survey(&config).unwrap();
        let written = fs::read_to_string(&config.survey.output).unwrap();
        assert_eq!(written.trim_start_matches('\u{feff}').lines().count(), 2);
    }
}
