//! CLI commands for the gradebook.
//!
//! - **report**: print all grades with aggregate statistics
//! - **shell**: interactive command loop
//! - **input**: grade spec parsing shared by both

pub mod input;
pub mod report;
pub mod shell;

pub use input::parse_grade_spec;
pub use report::{ReportCommand, ReportOptions, ReportOutput};
pub use shell::{ShellAction, ShellCommand};
