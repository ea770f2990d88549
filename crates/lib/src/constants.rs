//! # Shared Constants
//!
//! This module provides a centralized location for constants that are shared
//! across the `mealworm` workspace. Using these constants helps to avoid
//! "magic strings" and ensures consistency.

/// The eight day slots of a planning week.
///
/// Sunday opens and closes the week so the final dinner's leftovers carry
/// into the start of the next plan.
pub const DAYS_OF_WEEK: [&str; 8] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Keywords probed against the workspace to discover meal containers.
pub const MEAL_KEYWORDS: [&str; 8] = [
    "meal",
    "recipe",
    "food",
    "cooking",
    "kitchen",
    "dinner",
    "lunch",
    "breakfast",
];

/// The query used for the page-level search pass of the fetch stage.
pub const MEAL_SEARCH_QUERY: &str = "meal recipe";

/// Maximum number of meals summarized in the analysis prompt.
pub const MAX_ANALYSIS_MEALS: usize = 20;

/// Maximum characters of page content quoted per meal in the analysis prompt.
pub const MAX_CONTENT_PREVIEW: usize = 500;

/// Maximum characters of description quoted per meal in the planning prompt.
pub const MAX_DESCRIPTION_PREVIEW: usize = 100;

/// The `id` assigned to placeholder meals synthesized from plan text.
pub const PLACEHOLDER_MEAL_ID: &str = "placeholder";
