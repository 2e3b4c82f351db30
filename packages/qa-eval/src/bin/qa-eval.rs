//! Command line entry point for running and evaluating the QA pipeline.
//!
//! Evaluation commands print a colored summary, or the full report as JSON
//! with `--json`.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qa_agent::{AgentConfig, LogTracer, OpenAiChatModel, Pipeline, TavilySearcher};
use qa_eval::{
    datasets, evaluate_group, evaluation_plan, quick_test, run_comprehensive, run_context,
    setup_datasets, verify_datasets, EvaluationReport, EvaluationStatus, LangfuseConfig,
    LangfuseStore, MetricGroup,
};

#[derive(Parser)]
#[command(name = "qa-eval")]
#[command(about = "Run and evaluate the scope-gated QA pipeline")]
struct Cli {
    /// Print full results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask { question: String },

    /// Run the three smoke-test questions
    Test,

    /// Evaluate topic verification
    Verify,

    /// Evaluate web search quality
    Search,

    /// Evaluate answer generation
    Answer,

    /// Evaluate the whole pipeline
    E2e,

    /// Run every evaluation in sequence
    Full,

    /// Show the evaluation plan and success criteria
    Plan,

    /// Manage the evaluation datasets in Langfuse
    Datasets {
        #[command(subcommand)]
        action: DatasetCommands,
    },
}

#[derive(Subcommand)]
enum DatasetCommands {
    /// Create the datasets and upload every item
    Setup,

    /// Compare stored item counts with the built-in fixtures
    Verify,

    /// Describe the built-in datasets
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,qa_agent=debug,qa_eval=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { question } => ask(&question, cli.json).await,
        Commands::Test => smoke_test(cli.json).await,
        Commands::Verify => evaluate(MetricGroup::Verification, cli.json).await,
        Commands::Search => evaluate(MetricGroup::Search, cli.json).await,
        Commands::Answer => evaluate(MetricGroup::Answer, cli.json).await,
        Commands::E2e => evaluate(MetricGroup::EndToEnd, cli.json).await,
        Commands::Full => full(cli.json).await,
        Commands::Plan => print_json(&evaluation_plan()),
        Commands::Datasets { action } => match action {
            DatasetCommands::Setup => datasets_setup(cli.json).await,
            DatasetCommands::Verify => datasets_verify(cli.json).await,
            DatasetCommands::Info => datasets_info(cli.json),
        },
    }
}

fn build_pipeline() -> Result<Pipeline<OpenAiChatModel, TavilySearcher>> {
    let config = AgentConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(model = %config.model, "Configuration loaded");

    let searcher =
        TavilySearcher::from_config(&config).context("Failed to create Tavily client")?;

    Ok(Pipeline::new(OpenAiChatModel::from_config(&config), searcher)
        .with_tracer(Arc::new(LogTracer)))
}

fn langfuse_store() -> Result<LangfuseStore> {
    let config = LangfuseConfig::from_env().context("Failed to load Langfuse configuration")?;
    LangfuseStore::new(&config).context("Failed to create Langfuse client")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

fn pass_fail(ok: bool) -> colored::ColoredString {
    if ok {
        "PASS".bright_green().bold()
    } else {
        "FAIL".bright_red().bold()
    }
}

async fn ask(question: &str, json: bool) -> Result<()> {
    let pipeline = build_pipeline()?;
    let state = pipeline
        .run(question)
        .await
        .context("Pipeline run failed")?;

    if json {
        return print_json(&state);
    }

    let scope = if state.in_scope() {
        "in scope".bright_green()
    } else {
        "out of scope".bright_yellow()
    };
    println!("{} {}", "Question:".bright_cyan().bold(), state.question());
    println!("{} {}", "Scope:".bright_cyan().bold(), scope);
    println!();
    println!("{}", state.final_answer());
    Ok(())
}

async fn smoke_test(json: bool) -> Result<()> {
    let pipeline = build_pipeline()?;
    let results = quick_test(&pipeline).await;

    if json {
        return print_json(&results);
    }

    for result in &results {
        println!("{} {}", "Q:".bright_cyan().bold(), result.question);
        match &result.error {
            Some(error) => println!("   {} {}", "error:".bright_red(), error),
            None => {
                let stages: Vec<String> = result.stages.iter().map(|s| s.to_string()).collect();
                println!("   in scope: {}", result.in_scope.unwrap_or(false));
                println!("   stages:   {}", stages.join(" → "));
                println!("   answer:   {}", result.answer_preview.as_deref().unwrap_or(""));
            }
        }
    }
    Ok(())
}

async fn evaluate(group: MetricGroup, json: bool) -> Result<()> {
    let pipeline = build_pipeline()?;
    let now = Local::now().naive_local();
    let report = evaluate_group(&pipeline, group, now, &run_context())
        .await
        .with_context(|| format!("{} evaluation failed", group))?;

    if json {
        return print_json(&report);
    }
    print_report(&report);
    Ok(())
}

async fn full(json: bool) -> Result<()> {
    let pipeline = build_pipeline()?;
    let now = Local::now().naive_local();
    let report = run_comprehensive(&pipeline, now, &run_context()).await;

    if json {
        return print_json(&report);
    }

    for (group, status) in &report.evaluations {
        match status {
            EvaluationStatus::Completed(r) => print_report(r),
            EvaluationStatus::Failed { error } => {
                println!("{} {}: {}", pass_fail(false), group, error);
                println!();
            }
        }
    }
    println!(
        "{} {}/{} evaluations completed",
        pass_fail(report.all_completed()),
        report.completed(),
        report.total()
    );
    Ok(())
}

fn print_report(report: &EvaluationReport) {
    println!(
        "{} {} on {}",
        "Evaluation".bright_cyan().bold(),
        report.group,
        report.dataset
    );
    if let Some(name) = &report.run_name {
        println!("   run:      {}", name);
    }
    println!(
        "   coverage: {}/{} scored ({} errored, {} timed out, {} invalid)",
        report.scored, report.total, report.errored, report.timed_out, report.invalid
    );

    for (name, summary) in &report.metrics {
        let verdict = match summary.passed {
            Some(passed) => format!(
                "{} (> {:.2})",
                pass_fail(passed),
                summary.threshold.unwrap_or_default()
            ),
            None => String::new(),
        };
        println!("   {:<28} {:.3} {}", name, summary.mean, verdict);
    }
    println!("   {:<28} {:.3}", "composite".bold(), report.composite);
    println!();
}

async fn datasets_setup(json: bool) -> Result<()> {
    let store = langfuse_store()?;
    let outcomes = setup_datasets(&store, &datasets()).await;

    if json {
        return print_json(&outcomes);
    }

    for outcome in &outcomes {
        match &outcome.error {
            Some(error) => println!("{} {}: {}", pass_fail(false), outcome.dataset, error),
            None => println!(
                "{} {}: {}/{} items added{}",
                pass_fail(outcome.added == outcome.total),
                outcome.dataset,
                outcome.added,
                outcome.total,
                if outcome.created { "" } else { " (existing dataset)" }
            ),
        }
    }
    Ok(())
}

async fn datasets_verify(json: bool) -> Result<()> {
    let store = langfuse_store()?;
    let checks = verify_datasets(&store, &datasets()).await;

    if json {
        return print_json(&checks);
    }

    for check in &checks {
        match &check.error {
            Some(error) => println!("{} {}: {}", pass_fail(false), check.dataset, error),
            None => println!(
                "{} {}: {}/{} items",
                pass_fail(check.complete),
                check.dataset,
                check.item_count,
                check.expected_count
            ),
        }
    }
    Ok(())
}

fn datasets_info(json: bool) -> Result<()> {
    let all = datasets();

    if json {
        return print_json(&all);
    }

    for dataset in &all {
        println!("{} ({} items)", dataset.name.bright_cyan().bold(), dataset.len());
        println!("   {}", dataset.description);
        println!("   metrics: {}", dataset.primary_metrics.join(", "));
    }
    Ok(())
}
