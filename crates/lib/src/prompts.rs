//! # Prompt Templates
//!
//! The system prompts and user-prompt builders for the analyze and generate
//! stages. Summaries are size-bounded here — first [`MAX_ANALYSIS_MEALS`]
//! meals, capped content excerpts — so prompt length stays proportional to
//! the configured caps rather than the workspace.

use crate::constants::{
    DAYS_OF_WEEK, MAX_ANALYSIS_MEALS, MAX_CONTENT_PREVIEW, MAX_DESCRIPTION_PREVIEW,
};
use crate::types::Meal;
use serde_json::{Map, Value};

/// The system prompt for the meal analysis stage.
pub const ANALYSIS_SYSTEM_PROMPT: &str =
    "You are a meal planning assistant analyzing existing recipes.";

/// The system prompt for the weekly plan generation stage.
pub const PLANNING_SYSTEM_PROMPT: &str =
    "You are an expert meal planner. Create balanced, varied weekly meal plans.";

/// Builds the analysis user prompt from a bounded summary of the fetched
/// meals.
pub fn build_analysis_prompt(meals: &[Meal]) -> String {
    let mut summary = Vec::new();
    for meal in meals.iter().take(MAX_ANALYSIS_MEALS) {
        let mut line = format!("- {}", meal.title);
        if let Some(cuisine) = &meal.cuisine_type {
            line.push_str(&format!(" ({cuisine})"));
        }
        if !meal.tags.is_empty() {
            line.push_str(&format!(" [Tags: {}]", meal.tags.join(", ")));
        }
        if let Some(content) = &meal.page_content {
            line.push_str(&format!(
                "\n  Content: {}",
                excerpt(content, MAX_CONTENT_PREVIEW)
            ));
        }
        summary.push(line);
    }

    format!(
        "Analyze the following {count} meals from the user's workspace:\n\n\
         {summary}\n\n\
         Please provide a brief analysis including:\n\
         1. Most common cuisine types and cooking styles\n\
         2. Common meal categories/tags and ingredients\n\
         3. Any patterns in meal complexity, prep time, or cooking methods\n\
         4. Suggested variety for weekly planning based on the actual meal content\n\
         5. Common ingredients and cooking techniques used\n\n\
         Focus on insights from the actual meal content rather than just metadata.\n\
         Keep your response concise and focused on insights for meal planning.",
        count = meals.len(),
        summary = summary.join("\n"),
    )
}

/// Builds the planning user prompt: the available meals, the planning
/// constraints, the caller's stored preferences, and the prior analysis.
pub fn build_planning_prompt(
    meals: &[Meal],
    analysis: &str,
    preferences: &Map<String, Value>,
) -> String {
    let available = meals
        .iter()
        .map(|meal| {
            let mut line = format!("- {}", meal.title);
            if let Some(cuisine) = &meal.cuisine_type {
                line.push_str(&format!(" ({cuisine})"));
            }
            if let Some(description) = &meal.description {
                line.push_str(&format!(
                    ": {}",
                    excerpt(description, MAX_DESCRIPTION_PREVIEW)
                ));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut constraints = vec![
        format!("- Plan for 8 days: {}", DAYS_OF_WEEK.join(", ")),
        "- Focus on dinner meals primarily".to_string(),
        "- Ensure variety across the week".to_string(),
        "- Consider meal complexity and prep time balance".to_string(),
        "- Avoid repeating the same meal in the same week".to_string(),
    ];
    constraints.extend(preference_lines(preferences));

    format!(
        "Create a weekly meal plan using the following {count} available meals:\n\n\
         {available}\n\n\
         Requirements:\n\
         {constraints}\n\n\
         Analysis of existing meals: {analysis}\n\n\
         Respond with one line per day in the exact format `Day: Meal Name`, using \
         the day names listed above, in order. You may finish with a single line \
         `Notes: ...` carrying any planning or grocery considerations.",
        count = meals.len(),
        constraints = constraints.join("\n"),
    )
}

/// Renders stored preference values into planning constraints.
///
/// Recognized keys mirror the saved user preferences; values may be a
/// string or an array of strings, and anything else is ignored.
fn preference_lines(preferences: &Map<String, Value>) -> Vec<String> {
    fn listed(value: &Value) -> Option<String> {
        match value {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Array(values) => {
                let joined = values
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                (!joined.is_empty()).then_some(joined)
            }
            _ => None,
        }
    }

    let mut lines = Vec::new();
    for (key, label) in [
        ("likes", "The user specifically likes"),
        ("dislikes", "The user does not like"),
        ("dietary_restrictions", "Every meal must comply with"),
        ("preferred_cuisines", "Favorite cuisines"),
        ("avoid_meal_types", "Avoid these kinds of meals"),
        ("eating_out_days", "Plan one eating-out dinner on"),
    ] {
        if let Some(values) = preferences.get(key).and_then(listed) {
            lines.push(format!("- {label}: {values}"));
        }
    }
    lines
}

/// Truncates on a character boundary, appending `...` when content was cut.
fn excerpt(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let truncated: String = content.chars().take(max_chars).collect();
    format!("{truncated}...")
}
