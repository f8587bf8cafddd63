use std::fmt::Debug;
use std::sync::Mutex;

use crate::domain::{
    Activity, ActivityId, Credential, Dataset, Role, Student, StudentId, Teacher, TeacherId,
};
use crate::eligibility::YearLevelSpec;
use crate::enrollment::{ActivityDraft, ClubService, EnrollmentError};
use crate::registry::{ClubRegistry, RegistryError};
use crate::store::{DatasetStore, LoadOutcome, StoreError};

/// Records every saved snapshot.
#[derive(Default)]
pub(super) struct MemoryStore {
    initial: Dataset,
    saves: Mutex<Vec<Dataset>>,
}

impl MemoryStore {
    pub(super) fn with(initial: Dataset) -> Self {
        Self {
            initial,
            saves: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn saves(&self) -> Vec<Dataset> {
        self.saves.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn last_saved(&self) -> Dataset {
        self.saves().pop().expect("at least one save")
    }
}

impl DatasetStore for MemoryStore {
    fn load(&self) -> LoadOutcome {
        LoadOutcome {
            dataset: self.initial.clone(),
            warning: None,
        }
    }

    fn save(&self, dataset: &Dataset) -> Result<(), StoreError> {
        self.saves
            .lock()
            .expect("store mutex poisoned")
            .push(dataset.clone());
        Ok(())
    }
}

/// Rejects every write like a read-only disk.
pub(super) struct FailingStore;

impl DatasetStore for FailingStore {
    fn load(&self) -> LoadOutcome {
        LoadOutcome {
            dataset: dataset(),
            warning: None,
        }
    }

    fn save(&self, _dataset: &Dataset) -> Result<(), StoreError> {
        Err(StoreError::Write {
            path: "/read-only/data.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

pub(super) fn activity(name: &str, cost: u32, years: &str) -> Activity {
    Activity {
        name: name.to_string(),
        year_level: YearLevelSpec::parse(years),
        location: "Library".to_string(),
        days: "Monday".to_string(),
        time: "3:30pm".to_string(),
        cost,
        teacher_id: Some(TeacherId(3001)),
        start_date: "03/02/2025".to_string(),
        end_date: "28/11/2025".to_string(),
    }
}

pub(super) fn student(firstname: &str, year: u8, enrolled: &[u32]) -> Student {
    Student {
        firstname: firstname.to_string(),
        surname: "Tester".to_string(),
        gender: "Female".to_string(),
        year_level: Some(year),
        house: "Banks".to_string(),
        dob: "01/01/2011".to_string(),
        activities_enrolled: enrolled.iter().copied().map(ActivityId).collect(),
    }
}

/// Chess (2001, $40) with two members, Robotics (2002, $100) with one.
pub(super) fn dataset() -> Dataset {
    let mut dataset = Dataset::default();
    dataset
        .activities
        .insert(ActivityId(2001), activity("Chess", 40, "all"));
    dataset
        .activities
        .insert(ActivityId(2002), activity("Robotics", 100, "9-10"));
    dataset
        .students
        .insert(StudentId(1001), student("Ana", 9, &[2001, 2002]));
    dataset
        .students
        .insert(StudentId(1002), student("Bea", 11, &[2001]));
    dataset
        .students
        .insert(StudentId(1003), student("Cal", 7, &[]));
    dataset.teachers.insert(
        TeacherId(3001),
        Teacher {
            firstname: "Ian".to_string(),
            surname: "Cole".to_string(),
            title: "Mr".to_string(),
            contact: "icole@school.example".to_string(),
        },
    );
    dataset.users.insert(
        "admin".to_string(),
        Credential {
            password: "admin123".to_string(),
            role: Role::Administrator,
            student_id: None,
        },
    );
    dataset
}

pub(super) fn service() -> ClubService<MemoryStore> {
    let (service, warning) = ClubService::open(MemoryStore::with(dataset()));
    assert!(warning.is_none());
    service
}

pub(super) fn failing_service() -> ClubService<FailingStore> {
    ClubService::new(ClubRegistry::new(dataset()), FailingStore)
}

pub(super) fn draft(name: &str, cost: &str) -> ActivityDraft {
    ActivityDraft {
        name: name.to_string(),
        year_levels: "9-10".to_string(),
        location: "Room C4".to_string(),
        days: "Wednesday".to_string(),
        time: "1:00pm".to_string(),
        cost: cost.to_string(),
        teacher_id: "3001".to_string(),
        start_date: "03/02/2025".to_string(),
        end_date: "28/11/2025".to_string(),
    }
}

/// Unwraps the lookup error from a service call that should have missed.
pub(super) fn registry_error<T: Debug>(result: Result<T, EnrollmentError>) -> RegistryError {
    match result {
        Err(EnrollmentError::Registry(err)) => err,
        other => panic!("expected a registry error, got {other:?}"),
    }
}
