//! Gradebook - course grade bookkeeping
//!
//! Records course grades (course name, grade value on the 1.0 to 5.0 scale,
//! credit weight), validates them, and computes simple and credit-weighted
//! averages. A [`Grade`] is stored in a [`GradeStore`], and a
//! [`GradeCalculator`] reads the store to produce statistics.
//!
//! ```
//! use gradebook::{Grade, GradeCalculator, MemoryGradeStore};
//!
//! let calculator = GradeCalculator::new(MemoryGradeStore::new());
//! calculator.add_grade(Grade::new("Mathematik", 1.0, 10)?);
//! calculator.add_grade(Grade::new("Physik", 2.0, 5)?);
//!
//! let weighted = calculator.calculate_weighted_average()?;
//! assert!((weighted - 20.0 / 15.0).abs() < 1e-9);
//! # Ok::<(), gradebook::GradebookError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;

pub use config::Config;
pub use core::{Grade, GradeCalculator, GradeSummary};
pub use error::{Constraint, GradebookError, Result};
pub use storage::{GradeStore, MemoryGradeStore};
