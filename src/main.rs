//! Resume screener: taxonomy-driven resume analysis and job-fit scoring

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_screener::analysis::engine::ScreeningEngine;
use resume_screener::analysis::taxonomy::SkillTaxonomy;
use resume_screener::cli::{self, Cli, Commands, ConfigAction, TaxonomyAction};
use resume_screener::config::Config;
use resume_screener::error::{Result, ScreenerError};
use resume_screener::input::InputManager;
use resume_screener::output::{BatchEntry, ReportGenerator};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Screen {
            resume,
            job,
            output,
            save,
            detailed,
        } => {
            info!("Starting resume analysis");

            cli::validate_file_extension(&resume, &["pdf", "txt", "md"])
                .map_err(|e| ScreenerError::InvalidInput(format!("Resume file: {}", e)))?;
            if let Some(job_path) = &job {
                cli::validate_file_extension(job_path, &["pdf", "txt", "md"])
                    .map_err(|e| ScreenerError::InvalidInput(format!("Job file: {}", e)))?;
            }
            let output_format =
                cli::parse_output_format(&output).map_err(ScreenerError::InvalidInput)?;

            let engine = build_engine(&config)?;
            let mut input_manager =
                InputManager::new().with_max_file_bytes(config.limits.max_file_bytes);

            let resume_text = input_manager.extract_text(&resume).await?;
            let job_text = match &job {
                Some(path) => Some(input_manager.extract_text(path).await?),
                None => None,
            };

            let analysis = engine.analyze(&resume_text, job_text.as_deref())?;

            let generator = ReportGenerator::new(
                config.output.color_output,
                detailed || config.output.detailed,
            );
            let report = generator.format(&analysis, &output_format)?;
            write_or_print(report, save)?;
        }

        Commands::Batch {
            resumes,
            job,
            output,
            save,
        } => {
            if resumes.is_empty() {
                return Err(ScreenerError::InvalidInput(
                    "No resume files given".to_string(),
                ));
            }
            if resumes.len() > config.limits.max_batch_files {
                return Err(ScreenerError::InvalidInput(format!(
                    "Batch accepts at most {} resumes, got {}",
                    config.limits.max_batch_files,
                    resumes.len()
                )));
            }
            let output_format =
                cli::parse_output_format(&output).map_err(ScreenerError::InvalidInput)?;

            let engine = build_engine(&config)?;
            let mut input_manager =
                InputManager::new().with_max_file_bytes(config.limits.max_file_bytes);

            let job_text = match &job {
                Some(path) => Some(input_manager.extract_text(path).await?),
                None => None,
            };

            // Extract every file first; a file that cannot be read keeps its
            // slot and surfaces as an error entry.
            let progress = ProgressBar::new(resumes.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            let mut extractions: Vec<std::result::Result<String, ScreenerError>> = Vec::new();
            for path in &resumes {
                progress.set_message(path.display().to_string());
                extractions.push(input_manager.extract_text(path).await);
                progress.inc(1);
            }
            progress.finish_and_clear();

            let texts: Vec<String> = extractions
                .iter()
                .map(|r| r.as_ref().map(|t| t.clone()).unwrap_or_default())
                .collect();
            let mut batch = engine.analyze_batch(&texts, job_text.as_deref());

            let entries: Vec<BatchEntry> = resumes
                .iter()
                .zip(extractions)
                .zip(batch.drain(..))
                .map(|((path, extraction), analysis)| BatchEntry {
                    name: file_label(path),
                    result: match extraction {
                        Ok(_) => analysis,
                        Err(e) => Err(e),
                    },
                })
                .collect();

            let generator = ReportGenerator::new(config.output.color_output, false);
            let report = generator.format_batch(&entries, &output_format)?;
            write_or_print(report, save)?;
        }

        Commands::Taxonomy { action } => match action {
            TaxonomyAction::Stats => {
                let taxonomy = load_taxonomy(&config)?;
                println!("Domains: {}", taxonomy.domain_count());
                println!("Skills (per-domain entries): {}", taxonomy.skill_count());
                println!("Distinct skills: {}", taxonomy.distinct_skills().len());
                for domain in taxonomy.domains() {
                    let count: usize = domain.subcategories.iter().map(|g| g.skills.len()).sum();
                    println!("  {:<28} {}", domain.name, count);
                }
            }
            TaxonomyAction::Validate { path } => {
                let taxonomy = SkillTaxonomy::load(&path)?;
                println!(
                    "OK: {} domains, {} skills",
                    taxonomy.domain_count(),
                    taxonomy.skill_count()
                );
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Reset) => {
                Config::default().save()?;
                println!("Configuration reset to defaults");
            }
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    ScreenerError::Configuration(format!("Failed to render config: {}", e))
                })?;
                println!("{}", content);
            }
        },
    }

    Ok(())
}

fn build_engine(config: &Config) -> Result<ScreeningEngine> {
    let taxonomy = load_taxonomy(config)?;
    info!(
        "Loaded taxonomy: {} domains, {} skills",
        taxonomy.domain_count(),
        taxonomy.skill_count()
    );
    ScreeningEngine::new(taxonomy, config)
}

fn load_taxonomy(config: &Config) -> Result<SkillTaxonomy> {
    match &config.taxonomy.path {
        Some(path) => SkillTaxonomy::load(path),
        None => SkillTaxonomy::builtin(),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn write_or_print(report: String, save: Option<PathBuf>) -> Result<()> {
    match save {
        Some(path) => {
            std::fs::write(&path, report)?;
            println!("Report saved to {}", path.display());
        }
        None => println!("{}", report),
    }
    Ok(())
}
