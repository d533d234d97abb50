//! Interactive shell for the gradebook.
//!
//! Reads one command per line and applies it to an in-memory calculator.
//! A failing command prints its error and the session continues; EOF or
//! `quit` ends it.

use std::io::{BufRead, Write};

use crate::cli::input::parse_grade_spec;
use crate::cli::report::{format_grade_list, format_summary};
use crate::core::{Grade, GradeCalculator};
use crate::error::{GradebookError, Result};
use crate::storage::{GradeStore, MemoryGradeStore};

const PROMPT: &str = "gradebook> ";

const HELP: &str = "\
Commands:
  add NAME=VALUE:CREDITS   record a grade (e.g. add Mathematik I=1.7:6)
  list                     show all grades
  find NAME                show grades for a course (case-insensitive)
  delete NAME              delete all grades for a course
  clear                    delete all grades
  average                  simple and weighted average
  stats                    all statistics
  passed                   show passed grades
  failed                   show failed grades
  help                     show this help
  quit                     leave the shell";

/// Result of executing one shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    /// Print the text (if any) and read the next line.
    Continue(String),
    /// End the session.
    Quit,
}

/// The shell command implementation.
pub struct ShellCommand<S: GradeStore = MemoryGradeStore> {
    calculator: GradeCalculator<S>,
    precision: usize,
}

impl<S: GradeStore> ShellCommand<S> {
    /// Create a new shell over the given calculator.
    pub fn new(calculator: GradeCalculator<S>, precision: usize) -> Self {
        Self {
            calculator,
            precision,
        }
    }

    /// The calculator the shell operates on.
    pub fn calculator(&self) -> &GradeCalculator<S> {
        &self.calculator
    }

    /// Run the read-eval-print loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<()> {
        writeln!(output, "Gradebook shell. Type 'help' for commands.")?;

        let mut lines = input.lines();
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            let Some(line) = lines.next() else {
                writeln!(output)?;
                break;
            };

            match self.execute(&line?) {
                Ok(ShellAction::Continue(text)) => {
                    if !text.is_empty() {
                        writeln!(output, "{text}")?;
                    }
                }
                Ok(ShellAction::Quit) => break,
                Err(err) => {
                    tracing::debug!(error = %err, "shell command failed");
                    writeln!(output, "error: {err}")?;
                }
            }
        }

        Ok(())
    }

    /// Execute a single command line.
    pub fn execute(&self, line: &str) -> Result<ShellAction> {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        let text = match command.to_lowercase().as_str() {
            "" => String::new(),
            "add" => {
                let grade = self.calculator.add_grade(parse_grade_spec(arg)?);
                format!("Added {grade}")
            }
            "list" => list_or(self.calculator.get_all_grades(), "No grades recorded."),
            "find" => {
                let name = require_arg(arg, "find NAME")?;
                let found = self.calculator.store().find_by_course_name(name);
                list_or(found, &format!("No grades found for '{name}'."))
            }
            "delete" => {
                let name = require_arg(arg, "delete NAME")?;
                if self.calculator.delete_grade_by_course_name(name) {
                    format!("Deleted grades for '{name}'.")
                } else {
                    format!("No grades found for '{name}'.")
                }
            }
            "clear" => {
                self.calculator.delete_all_grades();
                "Deleted all grades.".to_string()
            }
            "average" | "avg" => {
                let simple = self.calculator.calculate_simple_average()?;
                let weighted = self.calculator.calculate_weighted_average()?;
                format!(
                    "Simple average:    {:.*}\nWeighted average:  {:.*}",
                    self.precision, simple, self.precision, weighted
                )
            }
            "stats" => format_summary(&self.calculator.summary(), self.precision).join("\n"),
            "passed" => list_or(self.calculator.get_passed_grades(), "No passed grades."),
            "failed" => list_or(self.calculator.get_failed_grades(), "No failed grades."),
            "help" => HELP.to_string(),
            "quit" | "exit" => return Ok(ShellAction::Quit),
            other => {
                return Err(GradebookError::invalid_input(format!(
                    "unknown command '{other}' (type 'help' for commands)"
                )))
            }
        };

        Ok(ShellAction::Continue(text))
    }
}

fn list_or(grades: Vec<Grade>, empty_message: &str) -> String {
    if grades.is_empty() {
        empty_message.to_string()
    } else {
        format_grade_list(&grades).join("\n")
    }
}

fn require_arg<'a>(arg: &'a str, usage: &str) -> Result<&'a str> {
    if arg.is_empty() {
        return Err(GradebookError::invalid_input(format!("usage: {usage}")));
    }
    Ok(arg)
}
