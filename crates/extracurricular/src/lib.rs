//! Bookkeeping core for school extracurricular programs: the activity
//! catalogue, student enrollments, year-level eligibility and logins, backed
//! by a single JSON file.

pub mod auth;
pub mod config;
pub mod domain;
pub mod eligibility;
pub mod enrollment;
pub mod error;
pub mod registry;
pub mod store;
pub mod telemetry;

pub use auth::{authenticate, AuthError, Principal, Session};
pub use domain::{
    Activity, ActivityId, Credential, Dataset, Role, Student, StudentId, Teacher, TeacherId,
};
pub use eligibility::{is_eligible, YearLevelSpec};
pub use enrollment::{ActivityDraft, ClubService, DeletionReport, EnrollmentError};
pub use registry::{ClubRegistry, RegistryError};
pub use store::{DatasetStore, JsonFileStore, LoadOutcome, LoadWarning, StoreError};
