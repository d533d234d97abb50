//! Report command for the gradebook.
//!
//! Prints every recorded grade followed by the aggregate statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Grade, GradeCalculator, GradeSummary};
use crate::storage::{GradeStore, MemoryGradeStore};

/// Options for the report command.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Decimal places for averages.
    pub precision: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            json: false,
            quiet: false,
            precision: 2,
        }
    }
}

/// Output format for the report command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    /// Whether the report was produced.
    pub success: bool,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// All grades in insertion order.
    pub grades: Vec<Grade>,
    /// Aggregate statistics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<GradeSummary>,
    /// Error message if the report failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportOutput {
    /// Create a successful output.
    pub fn success(grades: Vec<Grade>, summary: GradeSummary) -> Self {
        Self {
            success: true,
            generated_at: Utc::now(),
            grades,
            summary: Some(summary),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            generated_at: Utc::now(),
            grades: Vec::new(),
            summary: None,
            error: Some(error.into()),
        }
    }
}

/// The report command implementation.
pub struct ReportCommand<S: GradeStore = MemoryGradeStore> {
    calculator: GradeCalculator<S>,
}

impl<S: GradeStore> ReportCommand<S> {
    /// Create a new report command.
    pub fn new(calculator: GradeCalculator<S>) -> Self {
        Self { calculator }
    }

    /// Run the report command.
    pub fn run(&self) -> ReportOutput {
        let summary = self.calculator.summary();
        let grades = self.calculator.get_all_grades();
        tracing::debug!(count = summary.count, "built grade report");
        ReportOutput::success(grades, summary)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ReportOutput, options: &ReportOptions) -> String {
        format_report(output, options)
    }
}

/// Format a report according to the options.
pub fn format_report(output: &ReportOutput, options: &ReportOptions) -> String {
    if options.quiet {
        return String::new();
    }

    if options.json {
        serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
    } else {
        format_human_readable(output, options.precision)
    }
}

fn format_human_readable(output: &ReportOutput, precision: usize) -> String {
    if !output.success {
        return format!(
            "Report failed: {}\n",
            output.error.as_deref().unwrap_or("unknown error")
        );
    }

    if output.grades.is_empty() {
        return "No grades recorded.\n".to_string();
    }

    let mut lines = vec![format!("Recorded grades ({}):", output.grades.len())];
    lines.extend(format_grade_list(&output.grades));
    lines.push(String::new());

    if let Some(summary) = &output.summary {
        lines.extend(format_summary(summary, precision));
    }

    lines.join("\n") + "\n"
}

/// Numbered one-line-per-grade listing.
pub fn format_grade_list(grades: &[Grade]) -> Vec<String> {
    grades
        .iter()
        .enumerate()
        .map(|(i, grade)| format!("{:>3}. {}", i + 1, grade))
        .collect()
}

/// Aligned statistics block for a summary.
pub fn format_summary(summary: &GradeSummary, precision: usize) -> Vec<String> {
    let number = |value: Option<f64>| match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    };
    let grade = |value: &Option<Grade>| match value {
        Some(g) => g.to_string(),
        None => "-".to_string(),
    };

    vec![
        format!("Simple average:    {}", number(summary.simple_average)),
        format!("Weighted average:  {}", number(summary.weighted_average)),
        format!("Median:            {}", number(summary.median)),
        format!("Grade count:       {}", summary.count),
        format!("Total credits:     {}", summary.total_credits),
        format!("Best grade:        {}", grade(&summary.best)),
        format!("Worst grade:       {}", grade(&summary.worst)),
        format!(
            "Passed / failed:   {} / {}",
            summary.passed_count, summary.failed_count
        ),
    ]
}
