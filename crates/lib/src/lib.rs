//! # Meal Planning from Workspace Documents
//!
//! This crate turns a workspace full of meal and recipe documents into a
//! structured weekly meal plan. It drives a fixed four-stage pipeline —
//! fetch → analyze → generate → format — over a single mutable planning
//! record, using a configurable AI provider for analysis and plan
//! generation and a pluggable document source for discovery.

pub mod constants;
pub mod document;
pub mod errors;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod render;
pub mod source;
pub mod types;

pub use errors::PromptError;
pub use pipeline::{PlanError, Planner, PlannerBuilder};
pub use types::{DayPlan, Meal, PlanningRecord, StageOutput, Step, WeeklyMealPlan};
