//! # mealworm-cli
//!
//! This is the main entry point for the `mealworm` command-line interface:
//! it wires the Notion document source and the configured AI provider into
//! the planning pipeline, runs it once, and prints the rendered plan.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use mealworm::providers::factory::create_provider;
use mealworm::{render, PlannerBuilder};
use mealworm_notion::{NotionConfig, NotionSource};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for the meal plan
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Model used for meal analysis and plan generation
    #[arg(long, env = "AI_MODEL", default_value = "gemini-2.5-flash")]
    model: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Text,
    Simple,
    Markdown,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let ai_provider = create_provider(&cli.model)?;
    let source = NotionSource::new(NotionConfig::from_env()?)?;

    let planner = PlannerBuilder::new()
        .ai_provider(Arc::from(ai_provider))
        .meal_source(Arc::new(source))
        .build()?;

    info!("Running the meal planning pipeline");
    let record = planner.run(Default::default()).await;

    if let Some(message) = &record.error_message {
        bail!("Meal planning failed: {message}");
    }
    let Some(plan) = &record.weekly_plan else {
        bail!("No meal plan was generated");
    };

    let output = match cli.format {
        OutputFormat::Text => render::to_text(plan),
        OutputFormat::Simple => render::to_simple(plan),
        OutputFormat::Markdown => render::to_markdown(plan),
    };
    println!("{output}");

    println!();
    println!("Total meals found: {}", record.existing_meals.len());
    if let Some(analysis) = record.preferences.get("analysis").and_then(Value::as_str) {
        println!();
        println!("Meal analysis:");
        println!("{analysis}");
    }

    Ok(())
}
