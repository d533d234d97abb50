//! Grade storage traits.
//!
//! This module defines the `GradeStore` trait for grade collections.

use std::sync::Arc;

use crate::core::Grade;

/// Trait for grade storage backends.
///
/// A store is an ordered collection: insertion order is preserved and
/// duplicate grades (including repeated course names) are kept as distinct
/// entries. Course-name lookups compare case-insensitively against the
/// trimmed query; a blank query matches nothing.
pub trait GradeStore: Send + Sync {
    /// Append a grade and return the stored value.
    fn save(&self, grade: Grade) -> Grade;

    /// Snapshot of all grades in insertion order.
    ///
    /// The returned vector is a copy; changing it does not affect the store.
    fn find_all(&self) -> Vec<Grade>;

    /// All grades whose course name matches `name`.
    fn find_by_course_name(&self, name: &str) -> Vec<Grade>;

    /// The first grade whose course name matches `name`.
    fn find_one_by_course_name(&self, name: &str) -> Option<Grade>;

    /// Remove one grade equal to `grade`.
    ///
    /// Returns whether a grade was removed.
    fn delete(&self, grade: &Grade) -> bool;

    /// Remove every grade whose course name matches `name`.
    ///
    /// Returns whether at least one grade was removed.
    fn delete_by_course_name(&self, name: &str) -> bool;

    /// Remove all grades.
    fn delete_all(&self);

    /// Number of stored grades.
    fn count(&self) -> usize;

    /// Whether the store holds no grades.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// All grades that count as passed, in insertion order.
    fn find_all_passed(&self) -> Vec<Grade> {
        self.find_all().into_iter().filter(Grade::is_passed).collect()
    }

    /// All grades that count as failed, in insertion order.
    fn find_all_failed(&self) -> Vec<Grade> {
        self.find_all()
            .into_iter()
            .filter(|grade| !grade.is_passed())
            .collect()
    }
}

/// Blanket implementation of GradeStore for Arc-wrapped stores.
///
/// Lets a calculator and its caller hold the same store.
impl<T: GradeStore + ?Sized> GradeStore for Arc<T> {
    fn save(&self, grade: Grade) -> Grade {
        (**self).save(grade)
    }

    fn find_all(&self) -> Vec<Grade> {
        (**self).find_all()
    }

    fn find_by_course_name(&self, name: &str) -> Vec<Grade> {
        (**self).find_by_course_name(name)
    }

    fn find_one_by_course_name(&self, name: &str) -> Option<Grade> {
        (**self).find_one_by_course_name(name)
    }

    fn delete(&self, grade: &Grade) -> bool {
        (**self).delete(grade)
    }

    fn delete_by_course_name(&self, name: &str) -> bool {
        (**self).delete_by_course_name(name)
    }

    fn delete_all(&self) {
        (**self).delete_all()
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn find_all_passed(&self) -> Vec<Grade> {
        (**self).find_all_passed()
    }

    fn find_all_failed(&self) -> Vec<Grade> {
        (**self).find_all_failed()
    }
}
