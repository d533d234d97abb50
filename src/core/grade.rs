//! Grade entity.
//!
//! A grade is one recorded course result: the course name, the grade value
//! on the 1.0 (best) to 5.0 (failed) scale, and the credit weight of the
//! course. Every way of producing or changing a grade runs the same
//! validation, including deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Constraint, GradebookError, Result};

/// Best possible grade value.
pub const MIN_GRADE_VALUE: f64 = 1.0;

/// Worst possible grade value.
pub const MAX_GRADE_VALUE: f64 = 5.0;

/// Highest grade value that still counts as passed.
pub const PASSING_THRESHOLD: f64 = 4.0;

/// One recorded course result.
///
/// Fields are private so the invariants hold for the lifetime of the value:
/// the course name is not blank, the grade value lies in
/// `[MIN_GRADE_VALUE, MAX_GRADE_VALUE]` and credits are at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrade")]
pub struct Grade {
    course_name: String,
    grade_value: f64,
    credits: u32,
}

/// Unvalidated wire shape of a grade.
#[derive(Deserialize)]
struct RawGrade {
    course_name: String,
    grade_value: f64,
    credits: u32,
}

impl TryFrom<RawGrade> for Grade {
    type Error = GradebookError;

    fn try_from(raw: RawGrade) -> Result<Self> {
        Grade::new(raw.course_name, raw.grade_value, raw.credits)
    }
}

impl Grade {
    /// Create a validated grade.
    ///
    /// Fails with [`GradebookError::Validation`] naming the first violated
    /// constraint (course name, then grade value, then credits).
    pub fn new(course_name: impl Into<String>, grade_value: f64, credits: u32) -> Result<Self> {
        let course_name = course_name.into();
        validate_course_name(&course_name)?;
        validate_grade_value(grade_value)?;
        validate_credits(credits)?;

        Ok(Self {
            course_name,
            grade_value,
            credits,
        })
    }

    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    pub fn grade_value(&self) -> f64 {
        self.grade_value
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    /// Replace the course name. On failure the grade is left unchanged.
    pub fn set_course_name(&mut self, course_name: impl Into<String>) -> Result<()> {
        let course_name = course_name.into();
        validate_course_name(&course_name)?;
        self.course_name = course_name;
        Ok(())
    }

    /// Replace the grade value. On failure the grade is left unchanged.
    pub fn set_grade_value(&mut self, grade_value: f64) -> Result<()> {
        validate_grade_value(grade_value)?;
        self.grade_value = grade_value;
        Ok(())
    }

    /// Replace the credits. On failure the grade is left unchanged.
    pub fn set_credits(&mut self, credits: u32) -> Result<()> {
        validate_credits(credits)?;
        self.credits = credits;
        Ok(())
    }

    /// Whether this grade counts as passed (`grade_value <= 4.0`).
    pub fn is_passed(&self) -> bool {
        self.grade_value <= PASSING_THRESHOLD
    }

    /// Grade value multiplied by credits.
    pub fn weighted_value(&self) -> f64 {
        self.grade_value * f64::from(self.credits)
    }

    /// Case-insensitive match of the course name against a trimmed query.
    ///
    /// A blank query never matches.
    pub fn matches_course(&self, name: &str) -> bool {
        let query = name.trim();
        if query.is_empty() {
            return false;
        }
        self.course_name.to_lowercase() == query.to_lowercase()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1} ({} credits, {})",
            self.course_name,
            self.grade_value,
            self.credits,
            if self.is_passed() { "passed" } else { "failed" }
        )
    }
}

fn validate_course_name(course_name: &str) -> Result<()> {
    if course_name.trim().is_empty() {
        return Err(GradebookError::validation(
            Constraint::CourseName,
            format!("{course_name:?}"),
        ));
    }
    Ok(())
}

fn validate_grade_value(grade_value: f64) -> Result<()> {
    // NaN fails the range check as well
    if !(MIN_GRADE_VALUE..=MAX_GRADE_VALUE).contains(&grade_value) {
        return Err(GradebookError::validation(
            Constraint::GradeValue,
            grade_value,
        ));
    }
    Ok(())
}

fn validate_credits(credits: u32) -> Result<()> {
    if credits == 0 {
        return Err(GradebookError::validation(Constraint::Credits, credits));
    }
    Ok(())
}
