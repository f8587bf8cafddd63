use std::fmt;

use serde::Serialize;

use crate::domain::{ActivityId, StudentId, TeacherId};

/// One row of the administrator activity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityOverview {
    pub activity_id: ActivityId,
    pub name: String,
    pub cost: u32,
    pub enrollments: usize,
    pub income: u64,
}

/// Student listed against an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub student_id: StudentId,
    pub name: String,
    pub year_level: Option<u8>,
}

/// One row of the staff student table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentOverview {
    pub student_id: StudentId,
    pub name: String,
    pub year_level: Option<u8>,
    pub house: String,
    pub activity_count: usize,
}

/// Human-readable profile of a student and what they have joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    pub student_id: StudentId,
    pub name: String,
    pub gender: String,
    pub year_level: Option<u8>,
    pub house: String,
    pub dob: String,
    pub activities: Vec<String>,
    pub total_cost: u64,
}

impl fmt::Display for StudentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let activities = if self.activities.is_empty() {
            "None".to_string()
        } else {
            self.activities.join(", ")
        };

        writeln!(f, "Name: {}", or_na(&self.name))?;
        writeln!(f, "Gender: {}", or_na(&self.gender))?;
        writeln!(f, "Year Level: {}", year_or_na(self.year_level))?;
        writeln!(f, "House: {}", or_na(&self.house))?;
        writeln!(f, "Date of Birth: {}", or_na(&self.dob))?;
        writeln!(f, "Activities: {activities}")?;
        write!(f, "Total Cost: ${}", self.total_cost)
    }
}

/// Everything a student sees when selecting a club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubDetails {
    pub activity_id: ActivityId,
    pub name: String,
    pub year_levels: Option<String>,
    pub location: String,
    pub days: String,
    pub time: String,
    pub cost: u32,
    pub start_date: String,
    pub end_date: String,
    pub teacher_id: Option<TeacherId>,
    /// `None` when no teacher is assigned or the id does not resolve.
    pub teacher_name: Option<String>,
}

impl fmt::Display for ClubDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", or_na(&self.name))?;
        writeln!(
            f,
            "Year Level(s): {}",
            self.year_levels.as_deref().unwrap_or("N/A")
        )?;
        writeln!(f, "Location: {}", or_na(&self.location))?;
        writeln!(
            f,
            "Schedule: {} at {}",
            or_na(&self.days),
            or_na(&self.time)
        )?;
        writeln!(f, "Cost: ${}", self.cost)?;
        writeln!(
            f,
            "Dates: {} to {}",
            or_na(&self.start_date),
            or_na(&self.end_date)
        )?;
        write!(
            f,
            "Teacher: {}",
            self.teacher_name.as_deref().unwrap_or("N/A")
        )
    }
}

/// Split of activities shown on a student's panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentClubs {
    /// Every enrolled activity that still exists, eligible or not.
    pub enrolled: Vec<ActivityId>,
    /// Activities the student has not joined and qualifies for.
    pub available: Vec<ActivityId>,
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

fn year_or_na(year: Option<u8>) -> String {
    year.map_or_else(|| "N/A".to_string(), |year| year.to_string())
}
