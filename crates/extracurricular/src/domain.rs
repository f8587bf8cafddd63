use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::eligibility::YearLevelSpec;

/// Identifier wrapper for extracurricular activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub u32);

/// Identifier wrapper for enrolled students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u32);

/// Identifier wrapper for supervising teachers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherId(pub u32);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One extracurricular offering ("club").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "activity", default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "YearLevelSpec::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_level: Option<YearLevelSpec>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub days: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<TeacherId>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

/// A student record and the activities they have joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_level: Option<u8>,
    #[serde(default)]
    pub house: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default, deserialize_with = "lenient_enrollments")]
    pub activities_enrolled: Vec<ActivityId>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.surname)
            .trim()
            .to_string()
    }

    pub fn is_enrolled(&self, activity_id: ActivityId) -> bool {
        self.activities_enrolled.contains(&activity_id)
    }
}

/// Reference data for the staff member supervising an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub contact: String,
}

impl Teacher {
    pub fn display_name(&self) -> String {
        let parts = [&self.title, &self.firstname, &self.surname];
        parts
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Panel a user is allowed to open after logging in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Staff,
    Student,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Staff => "staff",
            Role::Student => "student",
        }
    }
}

/// Login entry keyed by username in [`Dataset::users`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub password: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<StudentId>,
}

/// The unit of atomic load and save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub activities: BTreeMap<ActivityId, Activity>,
    pub students: BTreeMap<StudentId, Student>,
    pub teachers: BTreeMap<TeacherId, Teacher>,
    pub users: BTreeMap<String, Credential>,
}

// Enrollment lists written by older tools are sometimes missing or not a list.
fn lenient_enrollments<'de, D>(deserializer: D) -> Result<Vec<ActivityId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        if !value.is_null() {
            tracing::warn!(found = %value, "activities_enrolled is not a list; resetting to empty");
        }
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .filter_map(|item| match item {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
        .filter_map(|raw| u32::try_from(raw).ok())
        .map(ActivityId)
        .collect())
}
