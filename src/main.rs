use anyhow::Result;
use brickwright::config::Config;
use brickwright::feedback::{submit_feedback, FeedbackSubmission};
use brickwright::generator::{GenerationRequest, OpenRouterGenerator};
use brickwright::parse::parse_instructions;
use brickwright::refine::RefinementOrchestrator;
use brickwright::report;
use brickwright::validate::validate_placements;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "brickwright",
    about = "Assemble and physically validate brick build instructions",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a build from a parts list and validate every placement
    Build {
        /// Path to the parts list (plain text)
        parts_file: PathBuf,

        /// Optional build theme
        #[arg(short, long)]
        theme: Option<String>,

        /// Override the correction cycle cap
        #[arg(long)]
        max_cycles: Option<u32>,

        /// Emit the outcome as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Parse and validate an instruction file without calling the generator
    Check {
        /// Path to the instruction text
        file: PathBuf,

        /// Emit the outcome as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Submit feedback on a generated build
    Feedback {
        /// Instruction file the feedback refers to
        file: PathBuf,

        /// Feedback type, e.g. positive or negative
        #[arg(short, long)]
        kind: String,

        /// Optional free-text comment
        #[arg(short, long)]
        comment: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load();

    match args.command {
        Command::Build {
            parts_file,
            theme,
            max_cycles,
            json,
        } => run_build(&config, &parts_file, theme, max_cycles, json).await,
        Command::Check { file, json } => run_check(&file, json),
        Command::Feedback {
            file,
            kind,
            comment,
        } => run_feedback(&config, &file, kind, comment).await,
    }
}

async fn run_build(
    config: &Config,
    parts_file: &PathBuf,
    theme: Option<String>,
    max_cycles: Option<u32>,
    json: bool,
) -> Result<()> {
    let parts_list = fs::read_to_string(parts_file)?;
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured. Set OPENROUTER_API_KEY or add openrouter_api_key to {}",
            Config::config_location()
        )
    })?;

    eprintln!("  Requesting build instructions...");
    let mut orchestrator = RefinementOrchestrator::new(OpenRouterGenerator::new(api_key));
    if let Some(cap) = max_cycles.or(config.max_refinement_cycles) {
        orchestrator = orchestrator.with_max_cycles(cap);
    }

    let outcome = orchestrator
        .run(GenerationRequest::initial(parts_list, theme))
        .await?;

    if json {
        println!("{}", report::outcome_to_json(&outcome)?);
        return Ok(());
    }

    let build = outcome.build();
    println!("{}", build.instructions.trim_end());
    println!();
    println!("{}", report::format_report(&build.report).trim_end());
    if !outcome.is_accepted() {
        eprintln!(
            "  Refinement exhausted after {} cycle(s); the build still has rejected steps.",
            build.cycles
        );
    }
    Ok(())
}

fn run_check(file: &PathBuf, json: bool) -> Result<()> {
    let text = fs::read_to_string(file)?;
    let plan = parse_instructions(&text);
    for skip in &plan.skipped {
        eprintln!("  Skipped line {}: {}", skip.line_number, skip.reason);
    }
    if plan.placements.is_empty() {
        anyhow::bail!("No build steps found in {}", file.display());
    }

    let validation = validate_placements(&plan.placements);

    if json {
        let value = serde_json::json!({
            "plan": plan,
            "accepted": validation.accepted,
            "rejected": validation.rejected,
            "occupied_cells": validation.grid.occupied_cells(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", report::format_report(&validation).trim_end());
    Ok(())
}

async fn run_feedback(
    config: &Config,
    file: &PathBuf,
    kind: String,
    comment: Option<String>,
) -> Result<()> {
    let instructions = fs::read_to_string(file)?;
    let submission = FeedbackSubmission::new(kind, comment, instructions);
    submit_feedback(config, &submission).await?;
    eprintln!("  Feedback submitted.");
    Ok(())
}
