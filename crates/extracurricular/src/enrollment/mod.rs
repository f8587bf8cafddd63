//! Mutations over the registry: activity maintenance and student enrollment.
//!
//! Every operation is applied to a staged copy of the dataset, written through
//! the [`DatasetStore`], and only then committed to the registry. A failed save
//! therefore leaves memory and disk exactly as they were.

mod draft;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::domain::{ActivityId, Dataset, StudentId};
use crate::registry::{ClubRegistry, RegistryError};
use crate::store::{DatasetStore, LoadWarning, StoreError};

pub use draft::{ActivityDraft, ValidationError};

/// Service composing the registry with its backing store.
pub struct ClubService<S> {
    registry: ClubRegistry,
    store: S,
}

/// Result of deleting an activity, for confirmation prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    pub activity_id: ActivityId,
    pub name: String,
    pub affected_students: Vec<StudentId>,
}

/// Error raised by the enrollment service.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("student {student_id} is already enrolled in activity {activity_id}")]
    AlreadyEnrolled {
        student_id: StudentId,
        activity_id: ActivityId,
    },
    #[error("student {student_id} is not enrolled in activity {activity_id}")]
    NotEnrolled {
        student_id: StudentId,
        activity_id: ActivityId,
    },
    #[error("change was not saved: {0}")]
    Persist(#[from] StoreError),
}

impl<S: DatasetStore> ClubService<S> {
    /// Loads the dataset from `store`, returning any fallback warning.
    pub fn open(store: S) -> (Self, Option<LoadWarning>) {
        let outcome = store.load();
        let service = Self::new(ClubRegistry::new(outcome.dataset), store);
        (service, outcome.warning)
    }

    pub fn new(registry: ClubRegistry, store: S) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &ClubRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn add_activity(&mut self, draft: &ActivityDraft) -> Result<ActivityId, EnrollmentError> {
        let activity = draft.validate(&self.registry.dataset().teachers)?;
        let activity_id = self.registry.next_activity_id()?;

        let mut staged = self.stage();
        staged.activities.insert(activity_id, activity);
        self.commit(staged)?;

        tracing::info!(%activity_id, name = %draft.name.trim(), "activity added");
        Ok(activity_id)
    }

    pub fn update_activity(
        &mut self,
        activity_id: ActivityId,
        draft: &ActivityDraft,
    ) -> Result<(), EnrollmentError> {
        if self.registry.activity(activity_id).is_none() {
            return Err(RegistryError::ActivityNotFound(activity_id).into());
        }
        let activity = draft.validate(&self.registry.dataset().teachers)?;

        let mut staged = self.stage();
        staged.activities.insert(activity_id, activity);
        self.commit(staged)?;

        tracing::info!(%activity_id, "activity updated");
        Ok(())
    }

    /// Removes the activity and drops it from every enrollment list.
    pub fn delete_activity(
        &mut self,
        activity_id: ActivityId,
    ) -> Result<DeletionReport, EnrollmentError> {
        let mut staged = self.stage();
        let removed = staged
            .activities
            .remove(&activity_id)
            .ok_or(RegistryError::ActivityNotFound(activity_id))?;

        let mut affected_students = Vec::new();
        for (student_id, student) in &mut staged.students {
            let before = student.activities_enrolled.len();
            student.activities_enrolled.retain(|id| *id != activity_id);
            if student.activities_enrolled.len() != before {
                affected_students.push(*student_id);
            }
        }
        self.commit(staged)?;

        tracing::info!(
            %activity_id,
            affected = affected_students.len(),
            "activity deleted"
        );
        Ok(DeletionReport {
            activity_id,
            name: removed.name,
            affected_students,
        })
    }

    pub fn enroll(
        &mut self,
        student_id: StudentId,
        activity_id: ActivityId,
    ) -> Result<(), EnrollmentError> {
        if self.registry.activity(activity_id).is_none() {
            return Err(RegistryError::ActivityNotFound(activity_id).into());
        }

        let mut staged = self.stage();
        let student = staged
            .students
            .get_mut(&student_id)
            .ok_or(RegistryError::StudentNotFound(student_id))?;
        if student.is_enrolled(activity_id) {
            return Err(EnrollmentError::AlreadyEnrolled {
                student_id,
                activity_id,
            });
        }
        student.activities_enrolled.push(activity_id);
        self.commit(staged)?;

        tracing::info!(%student_id, %activity_id, "student enrolled");
        Ok(())
    }

    /// Leaving is allowed even when the activity no longer exists.
    pub fn withdraw(
        &mut self,
        student_id: StudentId,
        activity_id: ActivityId,
    ) -> Result<(), EnrollmentError> {
        let mut staged = self.stage();
        let student = staged
            .students
            .get_mut(&student_id)
            .ok_or(RegistryError::StudentNotFound(student_id))?;
        if !student.is_enrolled(activity_id) {
            return Err(EnrollmentError::NotEnrolled {
                student_id,
                activity_id,
            });
        }
        student.activities_enrolled.retain(|id| *id != activity_id);
        self.commit(staged)?;

        tracing::info!(%student_id, %activity_id, "student withdrew");
        Ok(())
    }

    fn stage(&self) -> Dataset {
        self.registry.dataset().clone()
    }

    fn commit(&mut self, staged: Dataset) -> Result<(), EnrollmentError> {
        if let Err(err) = self.store.save(&staged) {
            tracing::error!(error = %err, "save failed; change discarded");
            return Err(err.into());
        }
        self.registry.replace(staged);
        Ok(())
    }
}
