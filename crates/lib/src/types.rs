//! # Core Data Model
//!
//! The domain entities carried through the planning pipeline: the normalized
//! [`Meal`] record, the generated [`WeeklyMealPlan`], and the
//! [`PlanningRecord`] state object the pipeline engine threads through its
//! stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A normalized meal record extracted from one workspace document.
///
/// Only `title` is required for a meal to exist. Every other field is
/// best-effort: it is populated when the source document carries a
/// recognizable property of the right type, and left absent otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Opaque identifier of the source document.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    /// Preparation time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    /// Cooking time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_made: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    /// Flattened plain-text rendering of the source document body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_content: Option<String>,
    /// The unparsed source record, kept for traceability.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl Meal {
    /// Creates a meal with the two mandatory fields; everything else absent.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            cuisine_type: None,
            prep_time: None,
            cook_time: None,
            difficulty: None,
            ingredients: Vec::new(),
            tags: Vec::new(),
            last_made: None,
            rating: None,
            page_content: None,
            raw: Value::Null,
        }
    }
}

/// Meals planned for a single day.
///
/// Slots hold their own `Meal` values: either clones drawn from the fetched
/// set or placeholders synthesized from free plan text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<Meal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<Meal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<Meal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snacks: Vec<Meal>,
}

impl DayPlan {
    /// An empty plan for the named day.
    pub fn new(day: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            breakfast: None,
            lunch: None,
            dinner: None,
            snacks: Vec::new(),
        }
    }
}

/// A complete weekly meal plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMealPlan {
    pub week_starting: DateTime<Utc>,
    pub days: Vec<DayPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grocery_list: Vec<String>,
}

/// Position marker for the pipeline state machine.
///
/// The engine only ever moves along the fixed graph:
///
/// ```text
/// start → meals_fetched → meals_analyzed → plan_generated → completed
/// ```
///
/// with every arrow also able to divert to the absorbing `error` state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Start,
    MealsFetched,
    MealsAnalyzed,
    PlanGenerated,
    Completed,
    Error,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::MealsFetched => "meals_fetched",
            Step::MealsAnalyzed => "meals_analyzed",
            Step::PlanGenerated => "plan_generated",
            Step::Completed => "completed",
            Step::Error => "error",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The shared state object threaded through the pipeline's stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningRecord {
    #[serde(default)]
    pub existing_meals: Vec<Meal>,
    /// Open-ended preference map: caller-provided seed values plus the
    /// aggregates and narrative analysis merged in by the analyze stage.
    #[serde(default)]
    pub preferences: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_plan: Option<WeeklyMealPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub step: Step,
}

impl PlanningRecord {
    /// Starts a fresh record at `start`, seeded with preference overrides.
    pub fn seeded(preferences: Map<String, Value>) -> Self {
        Self {
            preferences,
            ..Default::default()
        }
    }

    /// The explicit state-transition function: merges a stage's partial
    /// output into the record and returns the updated record.
    pub fn apply(mut self, output: StageOutput) -> Self {
        if let Some(meals) = output.existing_meals {
            self.existing_meals = meals;
        }
        if let Some(preferences) = output.preferences {
            self.preferences = preferences;
        }
        if let Some(plan) = output.weekly_plan {
            self.weekly_plan = Some(plan);
        }
        if let Some(message) = output.error_message {
            self.error_message = Some(message);
        }
        if let Some(step) = output.step {
            self.step = step;
        }
        self
    }
}

/// A partial record update produced by one stage handler.
///
/// Fields left as `None` leave the corresponding record field untouched.
#[derive(Debug, Default)]
pub struct StageOutput {
    pub existing_meals: Option<Vec<Meal>>,
    pub preferences: Option<Map<String, Value>>,
    pub weekly_plan: Option<WeeklyMealPlan>,
    pub error_message: Option<String>,
    pub step: Option<Step>,
}

impl StageOutput {
    /// An output that advances the record to `step` with no other changes.
    pub fn advance(step: Step) -> Self {
        Self {
            step: Some(step),
            ..Default::default()
        }
    }

    /// An output that moves the record to the terminal `error` state.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            step: Some(Step::Error),
            ..Default::default()
        }
    }
}
