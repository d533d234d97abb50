//! Grade storage for the gradebook.
//!
//! This module provides the `GradeStore` trait and its in-memory backend.

pub mod memory;
pub mod traits;

pub use memory::MemoryGradeStore;
pub use traits::GradeStore;
