//! Grade spec parsing for command-line input.
//!
//! A grade spec has the form `NAME=VALUE:CREDITS`, for example
//! `Mathematik I=1.7:6`. The spec is split at the last `=` and then at the
//! last `:`, so course names may themselves contain either character.

use crate::core::Grade;
use crate::error::{Constraint, GradebookError, Result};

/// Parse a `NAME=VALUE:CREDITS` spec into a validated grade.
///
/// Structural problems are reported as [`GradebookError::InvalidInput`];
/// values that parse but break a grade invariant are reported as
/// [`GradebookError::Validation`].
pub fn parse_grade_spec(spec: &str) -> Result<Grade> {
    let (name, rest) = spec.rsplit_once('=').ok_or_else(|| {
        GradebookError::invalid_input(format!(
            "'{spec}' is not a grade spec (expected NAME=VALUE:CREDITS)"
        ))
    })?;

    let (value, credits) = rest.rsplit_once(':').ok_or_else(|| {
        GradebookError::invalid_input(format!(
            "'{spec}' is missing credits (expected NAME=VALUE:CREDITS)"
        ))
    })?;

    let value = value.trim();
    let grade_value: f64 = value.parse().map_err(|_| {
        GradebookError::invalid_input(format!("grade value '{value}' is not a number"))
    })?;

    let credits = credits.trim();
    let credits: i64 = credits.parse().map_err(|_| {
        GradebookError::invalid_input(format!("credits '{credits}' is not a whole number"))
    })?;
    let credits = u32::try_from(credits)
        .map_err(|_| GradebookError::validation(Constraint::Credits, credits))?;

    Grade::new(name.trim(), grade_value, credits)
}
