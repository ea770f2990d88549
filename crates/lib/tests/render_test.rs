//! # Plan Renderer Tests

use chrono::{TimeZone, Utc};
use mealworm::render;
use mealworm::types::{DayPlan, Meal, WeeklyMealPlan};

fn sample_plan() -> WeeklyMealPlan {
    let mut carbonara = Meal::new("page-1", "Spaghetti Carbonara");
    carbonara.cuisine_type = Some("Italian".to_string());
    carbonara.prep_time = Some(30);

    let mut sunday = DayPlan::new("Sunday");
    sunday.dinner = Some(carbonara);

    WeeklyMealPlan {
        week_starting: Utc.with_ymd_and_hms(2026, 8, 9, 0, 0, 0).unwrap(),
        days: vec![sunday, DayPlan::new("Monday")],
        notes: Some("Shop on Saturday".to_string()),
        grocery_list: vec!["Eggs".to_string(), "Pecorino".to_string()],
    }
}

#[test]
fn test_text_rendering() {
    let output = render::to_text(&sample_plan());

    assert!(output.contains("WEEKLY MEAL PLAN"));
    assert!(output.contains("Week starting: August 09, 2026"));
    assert!(output.contains("📅 SUNDAY"));
    assert!(output.contains("🌙 Dinner: Spaghetti Carbonara"));
    assert!(output.contains("   Cuisine: Italian"));
    assert!(output.contains("   Prep time: 30 minutes"));
    // A day with no meals still renders, with an explicit marker.
    assert!(output.contains("📅 MONDAY"));
    assert!(output.contains("   No meals planned"));
    assert!(output.contains("Shop on Saturday"));
    assert!(output.contains("• Eggs"));
}

#[test]
fn test_simple_rendering() {
    let output = render::to_simple(&sample_plan());
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[0], "Sunday: Spaghetti Carbonara (Italian)");
    assert_eq!(lines[1], "Monday: No meal planned");
    assert!(output.ends_with("Notes: Shop on Saturday"));
}

#[test]
fn test_markdown_rendering() {
    let output = render::to_markdown(&sample_plan());

    assert!(output.starts_with("# 🍽️ Weekly Meal Plan"));
    assert!(output.contains("**Week starting:** August 09, 2026"));
    assert!(output.contains("## Sunday"));
    assert!(output.contains("- **Dinner:** Spaghetti Carbonara _Italian_"));
    assert!(output.contains("  - Prep time: 30 minutes"));
    assert!(output.contains("- *No meals planned*"));
    assert!(output.contains("## 🛒 Grocery List"));
    assert!(output.contains("- Pecorino"));
}

#[test]
fn test_empty_plan_fallback() {
    let empty = WeeklyMealPlan {
        week_starting: Utc.with_ymd_and_hms(2026, 8, 9, 0, 0, 0).unwrap(),
        days: Vec::new(),
        notes: None,
        grocery_list: Vec::new(),
    };

    assert_eq!(render::to_text(&empty), "No meal plan available");
    assert_eq!(render::to_simple(&empty), "No meal plan available");
    assert_eq!(render::to_markdown(&empty), "# No meal plan available");
}
