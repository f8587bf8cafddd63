//! Username/password check against the credential table.
//!
//! Passwords are stored and compared in plain text. There is no hashing,
//! lockout or rate limiting here.

use serde::Serialize;

use crate::domain::{Role, StudentId};
use crate::registry::ClubRegistry;

/// Who is acting, resolved from a credential record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "role", content = "student_id", rename_all = "lowercase")]
pub enum Principal {
    Administrator,
    Staff,
    Student(StudentId),
}

impl Principal {
    pub const fn role(self) -> Role {
        match self {
            Principal::Administrator => Role::Administrator,
            Principal::Staff => Role::Staff,
            Principal::Student(_) => Role::Student,
        }
    }

    pub const fn student_id(self) -> Option<StudentId> {
        match self {
            Principal::Student(id) => Some(id),
            _ => None,
        }
    }

    /// Adding, editing and deleting activities.
    pub const fn can_manage_activities(self) -> bool {
        matches!(self, Principal::Administrator)
    }

    /// Rosters, student tables and other people's summaries.
    pub const fn can_view_enrollments(self) -> bool {
        matches!(self, Principal::Administrator | Principal::Staff)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: String,
    pub principal: Principal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Unknown username and wrong password are deliberately indistinguishable.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("account '{username}' is misconfigured: {reason}")]
    Misconfigured { username: String, reason: String },
}

/// Exact, case-sensitive match on username and password.
pub fn authenticate(
    registry: &ClubRegistry,
    username: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let credential = match registry.credential(username) {
        Some(credential) if credential.password == password => credential,
        _ => {
            tracing::info!(%username, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }
    };

    let misconfigured = |reason: &str| AuthError::Misconfigured {
        username: username.to_string(),
        reason: reason.to_string(),
    };

    let principal = match credential.role {
        Role::Administrator => Principal::Administrator,
        Role::Staff => Principal::Staff,
        Role::Student => {
            let student_id = credential
                .student_id
                .ok_or_else(|| misconfigured("student login has no student id"))?;
            if registry.student(student_id).is_none() {
                let reason = format!("student {student_id} does not exist");
                return Err(misconfigured(&reason));
            }
            Principal::Student(student_id)
        }
    };

    tracing::info!(%username, role = principal.role().label(), "login accepted");
    Ok(Session {
        username: username.to_string(),
        principal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Credential, Dataset};
    use crate::store::seed_dataset;

    fn seeded() -> ClubRegistry {
        ClubRegistry::new(seed_dataset(5))
    }

    #[test]
    fn admin_login_resolves_administrator() {
        let session = authenticate(&seeded(), "admin", "admin123").expect("admin logs in");
        assert_eq!(session.principal, Principal::Administrator);
        assert!(session.principal.can_manage_activities());
    }

    #[test]
    fn wrong_password_and_unknown_user_fail_identically() {
        let registry = seeded();
        let wrong = authenticate(&registry, "admin", "wrong").expect_err("rejected");
        let ghost = authenticate(&registry, "ghost", "x").expect_err("rejected");
        assert_eq!(wrong, AuthError::InvalidCredentials);
        assert_eq!(wrong.to_string(), ghost.to_string());
    }

    #[test]
    fn usernames_are_case_sensitive() {
        assert_eq!(
            authenticate(&seeded(), "Admin", "admin123"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn student_login_carries_student_id() {
        let session = authenticate(&seeded(), "1001", "pass1001").expect("student logs in");
        assert_eq!(session.principal, Principal::Student(StudentId(1001)));
        assert_eq!(session.principal.role(), Role::Student);
        assert!(!session.principal.can_view_enrollments());
    }

    #[test]
    fn student_login_without_record_is_misconfigured() {
        let mut dataset = Dataset::default();
        dataset.users.insert(
            "orphan".to_string(),
            Credential {
                password: "pw".to_string(),
                role: Role::Student,
                student_id: Some(StudentId(404)),
            },
        );
        dataset.users.insert(
            "no-id".to_string(),
            Credential {
                password: "pw".to_string(),
                role: Role::Student,
                student_id: None,
            },
        );
        let registry = ClubRegistry::new(dataset);

        assert!(matches!(
            authenticate(&registry, "orphan", "pw"),
            Err(AuthError::Misconfigured { .. })
        ));
        assert!(matches!(
            authenticate(&registry, "no-id", "pw"),
            Err(AuthError::Misconfigured { .. })
        ));
        assert_eq!(
            authenticate(&registry, "orphan", "nope"),
            Err(AuthError::InvalidCredentials)
        );
    }
}
