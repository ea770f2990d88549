//! # Plan-Response Parser Tests

use chrono::{TimeZone, Utc};
use mealworm::pipeline::{parse_plan_response, upcoming_week_start};
use mealworm::Meal;

fn week() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 9, 0, 0, 0).unwrap()
}

fn dinner_for<'a>(plan: &'a mealworm::WeeklyMealPlan, day: &str) -> Option<&'a Meal> {
    plan.days
        .iter()
        .find(|slot| slot.day == day)
        .and_then(|slot| slot.dinner.as_ref())
}

#[test]
fn test_substring_match_is_bidirectional() {
    let available = vec![Meal::new("page-1", "Spaghetti Carbonara (Quick)")];

    let plan = parse_plan_response("Monday: Spaghetti Carbonara", &available, week()).unwrap();
    let dinner = dinner_for(&plan, "Monday").expect("Monday dinner expected");
    assert_eq!(dinner.id, "page-1");
    assert_eq!(dinner.title, "Spaghetti Carbonara (Quick)");

    // The other direction: the proposed name contains the catalog title.
    let available = vec![Meal::new("page-2", "Tacos")];
    let plan = parse_plan_response("Friday: Beef Tacos Supreme", &available, week()).unwrap();
    let dinner = dinner_for(&plan, "Friday").expect("Friday dinner expected");
    assert_eq!(dinner.id, "page-2");
}

#[test]
fn test_first_catalog_match_wins() {
    let available = vec![
        Meal::new("page-1", "Curry"),
        Meal::new("page-2", "Green Curry"),
    ];

    let plan = parse_plan_response("Thursday: Green Curry", &available, week()).unwrap();
    // `Green Curry` contains `Curry`, and the first catalog entry is taken
    // even though the second is the exact title.
    assert_eq!(dinner_for(&plan, "Thursday").unwrap().id, "page-1");
}

#[test]
fn test_unmatched_name_synthesizes_placeholder() {
    let available = vec![Meal::new("page-1", "Spaghetti Carbonara (Quick)")];

    let plan = parse_plan_response("Tuesday: Zebra Surprise", &available, week()).unwrap();
    let dinner = dinner_for(&plan, "Tuesday").expect("Tuesday dinner expected");
    assert_eq!(dinner.id, "placeholder");
    assert_eq!(dinner.title, "Zebra Surprise");
    assert!(dinner.description.is_some());
}

#[test]
fn test_markdown_decoration_is_stripped() {
    let plan = parse_plan_response("- **Wednesday:** Beef Tacos", &[], week()).unwrap();
    assert_eq!(dinner_for(&plan, "Wednesday").unwrap().title, "Beef Tacos");
}

#[test]
fn test_doubled_sunday_fills_both_slots() {
    let response = "Sunday: First Roast\nMonday: Stir Fry\nSunday: Second Roast";
    let plan = parse_plan_response(response, &[], week()).unwrap();

    assert_eq!(plan.days.len(), 8);
    assert_eq!(plan.days[0].day, "Sunday");
    assert_eq!(plan.days[0].dinner.as_ref().unwrap().title, "First Roast");
    assert_eq!(plan.days[7].day, "Sunday");
    assert_eq!(plan.days[7].dinner.as_ref().unwrap().title, "Second Roast");
}

#[test]
fn test_non_assignment_lines_are_ignored() {
    let response = "Here is your plan\n\
                    Dinner ideas below\n\
                    Lunch: Sandwich\n\
                    Saturday curry night\n\
                    Saturday: Massaman Curry";
    let plan = parse_plan_response(response, &[], week()).unwrap();

    let assigned: Vec<_> = plan
        .days
        .iter()
        .filter(|slot| slot.dinner.is_some())
        .collect();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].day, "Saturday");
}

#[test]
fn test_last_notes_line_wins() {
    let response = "Monday: Pho\nNotes: first draft\nnotes: final grocery notes";
    let plan = parse_plan_response(response, &[], week()).unwrap();
    assert_eq!(plan.notes.as_deref(), Some("final grocery notes"));
}

#[test]
fn test_week_starting_is_carried_through() {
    let plan = parse_plan_response("", &[], week()).unwrap();
    assert_eq!(plan.week_starting, week());
    assert!(plan.notes.is_none());
    assert!(plan.grocery_list.is_empty());
}

#[test]
fn test_upcoming_week_start_lands_on_next_sunday() {
    // A Wednesday rolls forward to the Sunday four days later.
    let wednesday = Utc.with_ymd_and_hms(2026, 8, 5, 15, 30, 0).unwrap();
    assert_eq!(
        upcoming_week_start(wednesday),
        Utc.with_ymd_and_hms(2026, 8, 9, 0, 0, 0).unwrap()
    );

    // A Sunday skips to the following Sunday, never to itself.
    let sunday = Utc.with_ymd_and_hms(2026, 8, 9, 8, 0, 0).unwrap();
    assert_eq!(
        upcoming_week_start(sunday),
        Utc.with_ymd_and_hms(2026, 8, 16, 0, 0, 0).unwrap()
    );
}
