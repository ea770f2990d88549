//! # Plan Rendering
//!
//! Pure, stateless mappings from a [`WeeklyMealPlan`] to textual output.
//! Nothing here touches the pipeline: rendering happens after a run, on
//! whatever plan the record carries.

use crate::types::{DayPlan, WeeklyMealPlan};

/// Renders the plan as plain text with per-day sections.
pub fn to_text(plan: &WeeklyMealPlan) -> String {
    if plan.days.is_empty() {
        return "No meal plan available".to_string();
    }

    let mut lines = Vec::new();
    lines.push("🍽️ WEEKLY MEAL PLAN".to_string());
    lines.push("=".repeat(30));
    lines.push(format!(
        "Week starting: {}",
        plan.week_starting.format("%B %d, %Y")
    ));
    lines.push(String::new());

    for day in &plan.days {
        let header = format!("📅 {}", day.day.to_uppercase());
        lines.push(header.clone());
        lines.push("-".repeat(header.chars().count()));

        if let Some(breakfast) = &day.breakfast {
            lines.push(format!("🌅 Breakfast: {}", breakfast.title));
        }
        if let Some(lunch) = &day.lunch {
            lines.push(format!("☀️ Lunch: {}", lunch.title));
        }
        if let Some(dinner) = &day.dinner {
            lines.push(format!("🌙 Dinner: {}", dinner.title));
            if let Some(cuisine) = &dinner.cuisine_type {
                lines.push(format!("   Cuisine: {cuisine}"));
            }
            if let Some(prep) = dinner.prep_time {
                lines.push(format!("   Prep time: {prep} minutes"));
            }
        }
        if !day.snacks.is_empty() {
            lines.push(format!("🍿 Snacks: {}", snack_names(day)));
        }
        if day.breakfast.is_none()
            && day.lunch.is_none()
            && day.dinner.is_none()
            && day.snacks.is_empty()
        {
            lines.push("   No meals planned".to_string());
        }
        lines.push(String::new());
    }

    if let Some(notes) = &plan.notes {
        lines.push("📝 NOTES".to_string());
        lines.push("=".repeat(15));
        lines.push(notes.clone());
        lines.push(String::new());
    }

    if !plan.grocery_list.is_empty() {
        lines.push("🛒 GROCERY LIST".to_string());
        lines.push("=".repeat(20));
        for item in &plan.grocery_list {
            lines.push(format!("• {item}"));
        }
    }

    lines.join("\n")
}

/// Renders the plan as one `day: meal` line per day.
pub fn to_simple(plan: &WeeklyMealPlan) -> String {
    if plan.days.is_empty() {
        return "No meal plan available".to_string();
    }

    let mut lines = Vec::new();
    for day in &plan.days {
        let meal = match &day.dinner {
            Some(dinner) => match &dinner.cuisine_type {
                Some(cuisine) => format!("{} ({cuisine})", dinner.title),
                None => dinner.title.clone(),
            },
            None => "No meal planned".to_string(),
        };
        lines.push(format!("{}: {meal}", day.day));
    }

    if let Some(notes) = &plan.notes {
        lines.push(format!("\nNotes: {notes}"));
    }

    lines.join("\n")
}

/// Renders the plan as markdown.
pub fn to_markdown(plan: &WeeklyMealPlan) -> String {
    if plan.days.is_empty() {
        return "# No meal plan available".to_string();
    }

    let mut lines = Vec::new();
    lines.push("# 🍽️ Weekly Meal Plan".to_string());
    lines.push(format!(
        "**Week starting:** {}",
        plan.week_starting.format("%B %d, %Y")
    ));
    lines.push(String::new());

    for day in &plan.days {
        lines.push(format!("## {}", day.day));

        if let Some(breakfast) = &day.breakfast {
            lines.push(format!("- **Breakfast:** {}", breakfast.title));
        }
        if let Some(lunch) = &day.lunch {
            lines.push(format!("- **Lunch:** {}", lunch.title));
        }
        if let Some(dinner) = &day.dinner {
            let mut line = format!("- **Dinner:** {}", dinner.title);
            if let Some(cuisine) = &dinner.cuisine_type {
                line.push_str(&format!(" _{cuisine}_"));
            }
            lines.push(line);
            if let Some(prep) = dinner.prep_time {
                lines.push(format!("  - Prep time: {prep} minutes"));
            }
        }
        if !day.snacks.is_empty() {
            lines.push(format!("- **Snacks:** {}", snack_names(day)));
        }
        if day.breakfast.is_none()
            && day.lunch.is_none()
            && day.dinner.is_none()
            && day.snacks.is_empty()
        {
            lines.push("- *No meals planned*".to_string());
        }
        lines.push(String::new());
    }

    if let Some(notes) = &plan.notes {
        lines.push("## 📝 Notes".to_string());
        lines.push(notes.clone());
        lines.push(String::new());
    }

    if !plan.grocery_list.is_empty() {
        lines.push("## 🛒 Grocery List".to_string());
        for item in &plan.grocery_list {
            lines.push(format!("- {item}"));
        }
    }

    lines.join("\n")
}

fn snack_names(day: &DayPlan) -> String {
    day.snacks
        .iter()
        .map(|snack| snack.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
