//! In-memory grade storage.
//!
//! This module provides a thread-safe in-memory implementation of the
//! GradeStore trait. Grades live as long as the store.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::Grade;
use crate::storage::GradeStore;

/// In-memory grade store.
///
/// Thread-safe implementation using `RwLock<Vec>`. Mutations take the write
/// lock, so a snapshot never observes a half-applied change.
#[derive(Debug, Default)]
pub struct MemoryGradeStore {
    /// Grades in insertion order.
    grades: RwLock<Vec<Grade>>,
}

impl MemoryGradeStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            grades: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-filled with the given grades, in order.
    pub fn with_grades(grades: impl IntoIterator<Item = Grade>) -> Self {
        Self {
            grades: RwLock::new(grades.into_iter().collect()),
        }
    }

    // A panic while holding the lock cannot leave the Vec half-updated, so
    // a poisoned lock is safe to keep using.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Grade>> {
        self.grades.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Grade>> {
        self.grades.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GradeStore for MemoryGradeStore {
    fn save(&self, grade: Grade) -> Grade {
        let mut grades = self.write();
        tracing::debug!(course = grade.course_name(), value = grade.grade_value(), "saving grade");
        grades.push(grade.clone());
        grade
    }

    fn find_all(&self) -> Vec<Grade> {
        self.read().clone()
    }

    fn find_by_course_name(&self, name: &str) -> Vec<Grade> {
        self.read()
            .iter()
            .filter(|grade| grade.matches_course(name))
            .cloned()
            .collect()
    }

    fn find_one_by_course_name(&self, name: &str) -> Option<Grade> {
        self.read()
            .iter()
            .find(|grade| grade.matches_course(name))
            .cloned()
    }

    fn delete(&self, grade: &Grade) -> bool {
        let mut grades = self.write();
        match grades.iter().position(|stored| stored == grade) {
            Some(index) => {
                grades.remove(index);
                tracing::debug!(course = grade.course_name(), "deleted grade");
                true
            }
            None => false,
        }
    }

    fn delete_by_course_name(&self, name: &str) -> bool {
        let mut grades = self.write();
        let before = grades.len();
        grades.retain(|grade| !grade.matches_course(name));
        let removed = before - grades.len();
        if removed > 0 {
            tracing::debug!(course = name.trim(), removed, "deleted grades by course name");
        }
        removed > 0
    }

    fn delete_all(&self) {
        let mut grades = self.write();
        tracing::debug!(removed = grades.len(), "deleting all grades");
        grades.clear();
    }

    fn count(&self) -> usize {
        self.read().len()
    }

    fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn find_all_passed(&self) -> Vec<Grade> {
        self.read()
            .iter()
            .filter(|grade| grade.is_passed())
            .cloned()
            .collect()
    }

    fn find_all_failed(&self) -> Vec<Grade> {
        self.read()
            .iter()
            .filter(|grade| !grade.is_passed())
            .cloned()
            .collect()
    }
}
