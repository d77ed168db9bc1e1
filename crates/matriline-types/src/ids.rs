//! Type-safe identifiers.
//!
//! Subjects use UUID v7 (time-ordered) so archived lives sort by creation.
//! Cohorts only need to be unique within one subject and use a plain
//! sequence number.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for one subject (one life).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SubjectId(pub Uuid);

impl SubjectId {
    /// A fresh time-ordered identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SubjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "subject-{}", self.0)
    }
}

/// Sequence number of a cohort within its mother's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CohortId(pub u32);

impl CohortId {
    /// The identifier that follows this one.
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl core::fmt::Display for CohortId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "cohort-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_ids_are_unique() {
        let a = SubjectId::new();
        let b = SubjectId::new();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("subject-"));
    }

    #[test]
    fn cohort_id_sequence() {
        let first = CohortId(0);
        assert_eq!(first.next(), CohortId(1));
        assert_eq!(CohortId(u32::MAX).next(), CohortId(u32::MAX));
        assert_eq!(CohortId(3).to_string(), "cohort-3");
    }
}
