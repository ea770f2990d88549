//! # Prompt Builder Tests

use mealworm::prompts::{build_analysis_prompt, build_planning_prompt};
use mealworm::Meal;
use serde_json::{json, Map};

#[test]
fn test_analysis_prompt_caps_the_meal_summary() {
    let meals: Vec<Meal> = (0..30)
        .map(|i| Meal::new(format!("id-{i}"), format!("Dish Number {i}")))
        .collect();

    let prompt = build_analysis_prompt(&meals);
    // The headline reports the real total while the summary stops at 20.
    assert!(prompt.contains("the following 30 meals"));
    assert!(prompt.contains("- Dish Number 19"));
    assert!(!prompt.contains("- Dish Number 20"));
}

#[test]
fn test_analysis_prompt_truncates_page_content() {
    let mut meal = Meal::new("id-1", "Cassoulet");
    meal.page_content = Some("x".repeat(600));

    let prompt = build_analysis_prompt(&[meal]);
    assert!(prompt.contains(&format!("Content: {}...", "x".repeat(500))));
    assert!(!prompt.contains(&"x".repeat(501)));
}

#[test]
fn test_planning_prompt_lists_meals_and_days() {
    let mut meal = Meal::new("id-1", "Beef Tacos");
    meal.cuisine_type = Some("Mexican".to_string());
    meal.description = Some("d".repeat(150));

    let prompt = build_planning_prompt(&[meal], "Plenty of variety.", &Map::new());
    assert!(prompt.contains("- Beef Tacos (Mexican)"));
    // Long descriptions are excerpted.
    assert!(prompt.contains(&format!("{}...", "d".repeat(100))));
    assert!(!prompt.contains(&"d".repeat(101)));
    assert!(prompt.contains("Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday"));
    assert!(prompt.contains("Analysis of existing meals: Plenty of variety."));
}

#[test]
fn test_planning_prompt_renders_stored_preferences() {
    let mut preferences = Map::new();
    preferences.insert("dislikes".to_string(), json!(["olives", "capers"]));
    preferences.insert("preferred_cuisines".to_string(), json!(["asian", "italian"]));
    preferences.insert("eating_out_days".to_string(), json!("Friday"));
    // Unrecognized keys and non-string values are ignored.
    preferences.insert("total_meals".to_string(), json!(12));

    let prompt = build_planning_prompt(&[], "none", &preferences);
    assert!(prompt.contains("- The user does not like: olives, capers"));
    assert!(prompt.contains("- Favorite cuisines: asian, italian"));
    assert!(prompt.contains("- Plan one eating-out dinner on: Friday"));
    assert!(!prompt.contains("total_meals"));
}
