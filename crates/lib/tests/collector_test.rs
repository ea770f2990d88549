//! # Deduplicating Collector Tests

use mealworm::extract::collect_unique;
use mealworm::Meal;
use std::collections::HashSet;

#[test]
fn test_first_occurrence_wins_case_insensitively() {
    let meals = vec![
        Meal::new("db-pass", "Beef Tacos"),
        Meal::new("search-pass-1", "beef tacos"),
        Meal::new("search-pass-2", "BEEF TACOS"),
        Meal::new("db-pass-2", "Lentil Soup"),
    ];

    let unique = collect_unique(meals);
    assert_eq!(unique.len(), 2);
    assert_eq!(unique[0].title, "Beef Tacos");
    // The earliest-discovered variant survives, later ones are dropped no
    // matter what other fields they carry.
    assert_eq!(unique[0].id, "db-pass");
    assert_eq!(unique[1].title, "Lentil Soup");
}

#[test]
fn test_output_titles_are_pairwise_distinct() {
    let meals = vec![
        Meal::new("1", "Pad Thai"),
        Meal::new("2", "pad thai"),
        Meal::new("3", "Pho"),
        Meal::new("4", "PHO"),
        Meal::new("5", "Pho "),
    ];

    let unique = collect_unique(meals);
    let lowered: HashSet<String> = unique.iter().map(|m| m.title.to_lowercase()).collect();
    assert_eq!(lowered.len(), unique.len(), "titles must be distinct");
}

#[test]
fn test_input_order_is_preserved() {
    let meals = vec![
        Meal::new("1", "Gumbo"),
        Meal::new("2", "Ramen"),
        Meal::new("3", "Paella"),
    ];

    let titles: Vec<String> = collect_unique(meals).into_iter().map(|m| m.title).collect();
    assert_eq!(titles, vec!["Gumbo", "Ramen", "Paella"]);
}
