//! # Planning Pipeline
//!
//! The fixed four-stage state machine that produces a weekly meal plan:
//! fetch → analyze → generate → format. Each stage consumes the current
//! [`PlanningRecord`] and returns a [`StageOutput`] partial update; the
//! engine merges updates through the record's transition function and
//! short-circuits to the absorbing `error` state on the first failure.
//!
//! The engine itself never fails: every stage error and every orchestration
//! guard is converted into a terminal `error_message` on the record, and
//! [`Planner::run`] always returns the final record — completed, partial,
//! or failed.

use crate::constants::{DAYS_OF_WEEK, MEAL_KEYWORDS, MEAL_SEARCH_QUERY, PLACEHOLDER_MEAL_ID};
use crate::errors::PromptError;
use crate::extract::{collect_unique, extract_meals, flatten_blocks};
use crate::prompts::{
    build_analysis_prompt, build_planning_prompt, ANALYSIS_SYSTEM_PROMPT, PLANNING_SYSTEM_PROMPT,
};
use crate::providers::ai::AiProvider;
use crate::source::{MealSource, SourceError};
use crate::types::{DayPlan, Meal, PlanningRecord, StageOutput, Step, WeeklyMealPlan};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors raised inside a stage handler.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Document source error: {0}")]
    Source(#[from] SourceError),
    #[error("AI provider error: {0}")]
    Prompt(#[from] PromptError),
    #[error("Planner is not fully configured: {0}")]
    Configuration(String),
    #[error("An unexpected internal error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

/// One step of the fixed planning sequence.
///
/// A handler reads the record it is given and describes its changes as a
/// partial [`StageOutput`]; it never mutates shared state directly.
#[async_trait]
pub trait StageHandler: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// The step the record must be at for this handler to run.
    fn precondition(&self) -> Step;

    /// Prefix for the user-facing message when this stage fails.
    fn failure_context(&self) -> &'static str;

    async fn run(&self, record: &PlanningRecord) -> Result<StageOutput, PlanError>;
}

// --- Fetch ---

/// Discovers meal documents in the workspace and extracts them into the
/// deduplicated `existing_meals` set.
pub struct FetchStage {
    source: Arc<dyn MealSource>,
}

impl FetchStage {
    pub fn new(source: Arc<dyn MealSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl StageHandler for FetchStage {
    fn name(&self) -> &'static str {
        "fetch_meals"
    }

    fn precondition(&self) -> Step {
        Step::Start
    }

    fn failure_context(&self) -> &'static str {
        "Failed to fetch meals"
    }

    async fn run(&self, _record: &PlanningRecord) -> Result<StageOutput, PlanError> {
        info!("Fetching existing meals from the workspace");

        // Probe every meal keyword for candidate containers, first hit per
        // id wins.
        let mut seen_ids = HashSet::new();
        let mut containers = Vec::new();
        for keyword in MEAL_KEYWORDS {
            for container in self.source.list_containers(keyword).await? {
                if seen_ids.insert(container.id.clone()) {
                    containers.push(container);
                }
            }
        }
        debug!(count = containers.len(), "Discovered candidate containers");

        // Container passes come before the keyword search pass, so the
        // container variant of a title survives deduplication.
        let mut meals = Vec::new();
        for container in &containers {
            let documents = self.source.list_documents(&container.id).await?;
            meals.extend(extract_meals(&documents));
        }

        let searched = self.source.search_documents(MEAL_SEARCH_QUERY).await?;
        meals.extend(extract_meals(&searched));

        let mut unique = collect_unique(meals);

        // Body content is best-effort enrichment for the analysis prompt; a
        // failed body fetch leaves `page_content` unset.
        for meal in &mut unique {
            match self.source.document_body(&meal.id).await {
                Ok(blocks) => {
                    let content = flatten_blocks(&blocks);
                    if !content.is_empty() {
                        meal.page_content = Some(content);
                    }
                }
                Err(e) => {
                    warn!(meal_id = %meal.id, error = %e, "Failed to fetch document body");
                }
            }
        }

        // Zero meals is a valid empty result, not an error.
        info!(count = unique.len(), "Found unique meal documents");

        Ok(StageOutput {
            existing_meals: Some(unique),
            step: Some(Step::MealsFetched),
            ..Default::default()
        })
    }
}

// --- Analyze ---

/// Summarizes the fetched meals and asks the AI provider for a
/// natural-language analysis, merged into the preference map alongside
/// derived aggregates.
pub struct AnalyzeStage {
    ai_provider: Arc<dyn AiProvider>,
}

impl AnalyzeStage {
    pub fn new(ai_provider: Arc<dyn AiProvider>) -> Self {
        Self { ai_provider }
    }
}

#[async_trait]
impl StageHandler for AnalyzeStage {
    fn name(&self) -> &'static str {
        "analyze_meals"
    }

    fn precondition(&self) -> Step {
        Step::MealsFetched
    }

    fn failure_context(&self) -> &'static str {
        "Failed to analyze meals"
    }

    async fn run(&self, record: &PlanningRecord) -> Result<StageOutput, PlanError> {
        info!("Analyzing existing meals");
        let meals = &record.existing_meals;

        let mut preferences = record.preferences.clone();

        if meals.is_empty() {
            // An empty workspace is not a failure; later stages plan from
            // scratch.
            info!("No existing meals found, skipping analysis");
            preferences
                .entry("note")
                .or_insert(json!("No existing meals found"));
            return Ok(StageOutput {
                preferences: Some(preferences),
                step: Some(Step::MealsAnalyzed),
                ..Default::default()
            });
        }

        let user_prompt = build_analysis_prompt(meals);
        let analysis = self
            .ai_provider
            .generate(ANALYSIS_SYSTEM_PROMPT, &user_prompt)
            .await?;

        let cuisine_types: BTreeSet<String> = meals
            .iter()
            .filter_map(|meal| meal.cuisine_type.clone())
            .collect();
        let common_tags: BTreeSet<String> = meals
            .iter()
            .flat_map(|meal| meal.tags.iter().cloned())
            .collect();

        // Caller-seeded preference values win over derived ones.
        for (key, value) in [
            ("total_meals", json!(meals.len())),
            ("analysis", json!(analysis)),
            ("cuisine_types", json!(cuisine_types)),
            ("common_tags", json!(common_tags)),
        ] {
            preferences.entry(key).or_insert(value);
        }

        info!("Meal analysis complete");

        Ok(StageOutput {
            preferences: Some(preferences),
            step: Some(Step::MealsAnalyzed),
            ..Default::default()
        })
    }
}

// --- Generate ---

/// Asks the AI provider for a weekly plan and parses the response into a
/// structured [`WeeklyMealPlan`].
pub struct GenerateStage {
    ai_provider: Arc<dyn AiProvider>,
}

impl GenerateStage {
    pub fn new(ai_provider: Arc<dyn AiProvider>) -> Self {
        Self { ai_provider }
    }
}

#[async_trait]
impl StageHandler for GenerateStage {
    fn name(&self) -> &'static str {
        "generate_plan"
    }

    fn precondition(&self) -> Step {
        Step::MealsAnalyzed
    }

    fn failure_context(&self) -> &'static str {
        "Failed to generate meal plan"
    }

    async fn run(&self, record: &PlanningRecord) -> Result<StageOutput, PlanError> {
        info!("Generating weekly meal plan");

        let analysis = record
            .preferences
            .get("analysis")
            .and_then(Value::as_str)
            .unwrap_or("No analysis available");

        let user_prompt =
            build_planning_prompt(&record.existing_meals, analysis, &record.preferences);
        let response = self
            .ai_provider
            .generate(PLANNING_SYSTEM_PROMPT, &user_prompt)
            .await?;

        let plan = parse_plan_response(
            &response,
            &record.existing_meals,
            upcoming_week_start(Utc::now()),
        )?;

        info!("Weekly meal plan generated");

        Ok(StageOutput {
            weekly_plan: Some(plan),
            step: Some(Step::PlanGenerated),
            ..Default::default()
        })
    }
}

// --- Format ---

/// Validates that a plan was produced and marks the run complete.
///
/// The structure built by the generate stage is already in final shape, so
/// no further transformation happens here.
pub struct FormatStage;

#[async_trait]
impl StageHandler for FormatStage {
    fn name(&self) -> &'static str {
        "format_output"
    }

    fn precondition(&self) -> Step {
        Step::PlanGenerated
    }

    fn failure_context(&self) -> &'static str {
        "Failed to format meal plan"
    }

    async fn run(&self, record: &PlanningRecord) -> Result<StageOutput, PlanError> {
        info!("Formatting meal plan");
        if record.weekly_plan.is_none() {
            return Ok(StageOutput::error("No meal plan generated"));
        }
        Ok(StageOutput::advance(Step::Completed))
    }
}

// --- Engine ---

/// The pipeline engine: drives the fixed stage sequence over one record.
pub struct Planner {
    stages: Vec<Box<dyn StageHandler>>,
}

impl Planner {
    /// Runs the complete pipeline from a fresh record, optionally seeded
    /// with preference overrides.
    ///
    /// Always returns the final record, whether the run completed,
    /// partially completed, or failed; no error escapes this boundary.
    pub async fn run(&self, seed_preferences: Map<String, Value>) -> PlanningRecord {
        info!("Starting meal planning pipeline");
        let mut record = PlanningRecord::seeded(seed_preferences);

        for stage in &self.stages {
            if record.step == Step::Error {
                break;
            }
            if record.step != stage.precondition() {
                // Orchestration guard: a handler produced a step the next
                // stage cannot consume.
                error!(
                    stage = stage.name(),
                    step = %record.step,
                    "Pipeline reached an unexpected step"
                );
                let message = format!(
                    "Pipeline failed: stage `{}` expected step `{}`, found `{}`",
                    stage.name(),
                    stage.precondition(),
                    record.step
                );
                record = record.apply(StageOutput::error(message));
                break;
            }

            debug!(stage = stage.name(), "Running pipeline stage");
            let output = match stage.run(&record).await {
                Ok(output) => output,
                Err(e) => {
                    error!(stage = stage.name(), error = %e, "Pipeline stage failed");
                    StageOutput::error(format!("{}: {e}", stage.failure_context()))
                }
            };
            record = record.apply(output);
        }

        info!(step = %record.step, "Meal planning pipeline finished");
        record
    }
}

/// A builder for creating [`Planner`] instances.
///
/// Both collaborators are explicit so tests can substitute doubles for the
/// AI provider and the document source.
#[derive(Default)]
pub struct PlannerBuilder {
    ai_provider: Option<Arc<dyn AiProvider>>,
    meal_source: Option<Arc<dyn MealSource>>,
}

impl PlannerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AI provider used by the analyze and generate stages.
    pub fn ai_provider(mut self, ai_provider: Arc<dyn AiProvider>) -> Self {
        self.ai_provider = Some(ai_provider);
        self
    }

    /// Sets the document source used by the fetch stage.
    pub fn meal_source(mut self, meal_source: Arc<dyn MealSource>) -> Self {
        self.meal_source = Some(meal_source);
        self
    }

    /// Builds the planner with the fixed fetch → analyze → generate →
    /// format stage sequence.
    pub fn build(self) -> Result<Planner, PlanError> {
        let ai_provider = self
            .ai_provider
            .ok_or_else(|| PlanError::Configuration("an AI provider is required".to_string()))?;
        let meal_source = self
            .meal_source
            .ok_or_else(|| PlanError::Configuration("a meal source is required".to_string()))?;

        Ok(Planner {
            stages: vec![
                Box::new(FetchStage::new(meal_source)),
                Box::new(AnalyzeStage::new(Arc::clone(&ai_provider))),
                Box::new(GenerateStage::new(ai_provider)),
                Box::new(FormatStage),
            ],
        })
    }
}

// --- Plan-Response Parsing ---

/// Parses the model's plan text into a structured [`WeeklyMealPlan`].
///
/// A line counts as a day assignment only if it contains a colon and one of
/// the configured day names before the colon; the text after the first
/// colon, stripped of markdown decoration, is the proposed meal. Proposed
/// names are resolved against the available meals by bidirectional
/// case-insensitive substring containment, first match in catalog order
/// winning; unmatched names become placeholder meals. A `notes:` line
/// (case-insensitive) sets the plan notes, last one winning.
pub fn parse_plan_response(
    response: &str,
    available: &[Meal],
    week_starting: DateTime<Utc>,
) -> Result<WeeklyMealPlan, PlanError> {
    let decoration = Regex::new(r"[*_`#]+").map_err(PromptError::from)?;

    let mut days: Vec<DayPlan> = DAYS_OF_WEEK.iter().map(|day| DayPlan::new(*day)).collect();
    let mut notes: Option<String> = None;

    for line in response.lines() {
        let line = line.trim();

        if let Some(rest) = strip_prefix_ignore_case(line, "notes:") {
            let text = rest.trim();
            if !text.is_empty() {
                notes = Some(text.to_string());
            }
            continue;
        }

        let Some((before, after)) = line.split_once(':') else {
            continue;
        };
        let before = before.to_lowercase();
        let Some(day) = DAYS_OF_WEEK
            .iter()
            .copied()
            .find(|day| before.contains(day.to_lowercase().as_str()))
        else {
            continue;
        };

        let name = decoration.replace_all(after, "");
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let meal = match_meal(name, available).unwrap_or_else(|| placeholder_meal(name));

        // The configured week repeats Sunday; an assignment fills the
        // earliest still-open slot carrying that day name.
        if let Some(slot) = days
            .iter_mut()
            .find(|slot| slot.day.eq_ignore_ascii_case(day) && slot.dinner.is_none())
        {
            slot.dinner = Some(meal);
        }
    }

    Ok(WeeklyMealPlan {
        week_starting,
        days,
        notes,
        grocery_list: Vec::new(),
    })
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}

/// Resolves a proposed meal name against the catalog.
///
/// Containment is checked both ways so abbreviated proposals still match
/// decorated catalog titles and vice versa. When several titles match, the
/// first in catalog order wins.
fn match_meal(name: &str, available: &[Meal]) -> Option<Meal> {
    let needle = name.to_lowercase();
    available
        .iter()
        .find(|meal| {
            let title = meal.title.to_lowercase();
            title.contains(&needle) || needle.contains(&title)
        })
        .cloned()
}

/// Synthesizes a meal for a proposed name with no catalog match.
fn placeholder_meal(title: &str) -> Meal {
    let mut meal = Meal::new(PLACEHOLDER_MEAL_ID, title);
    meal.description = Some("Selected from the generated plan".to_string());
    meal
}

/// The upcoming Sunday at midnight UTC; if `now` falls on a Sunday, the one
/// after it.
pub fn upcoming_week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let mut days_ahead = (6 - i64::from(now.weekday().num_days_from_monday())) % 7;
    if days_ahead == 0 {
        days_ahead = 7;
    }
    (now + Duration::days(days_ahead))
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
}
