//! Core types and logic for the gradebook.
//!
//! This module contains the grade entity and the calculator service that
//! derives statistics from a grade store.

pub mod calculator;
pub mod grade;

pub use calculator::{GradeCalculator, GradeSummary};
pub use grade::{Grade, MAX_GRADE_VALUE, MIN_GRADE_VALUE, PASSING_THRESHOLD};
