use std::collections::BTreeMap;

use crate::domain::{Activity, Teacher, TeacherId};
use crate::eligibility::YearLevelSpec;

/// Activity fields exactly as captured by an entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityDraft {
    pub name: String,
    pub year_levels: String,
    pub location: String,
    pub days: String,
    pub time: String,
    pub cost: String,
    pub teacher_id: String,
    pub start_date: String,
    pub end_date: String,
}

/// Reasons a draft is refused before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("activity name cannot be empty")]
    EmptyName,
    #[error("cost '{0}' must be a whole number, e.g. 25")]
    InvalidCost(String),
    #[error("cost cannot be negative (got {0})")]
    NegativeCost(i64),
    #[error("teacher id '{0}' must be a number, e.g. 3001")]
    InvalidTeacherId(String),
    #[error("teacher {0} does not exist")]
    UnknownTeacher(TeacherId),
    #[error("invalid year levels: {0}")]
    InvalidYearLevels(String),
}

impl ActivityDraft {
    /// Builds the stored record, checking the teacher against `teachers`.
    pub fn validate(
        &self,
        teachers: &BTreeMap<TeacherId, Teacher>,
    ) -> Result<Activity, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let cost = parse_cost(&self.cost)?;

        let teacher_id = match self.teacher_id.trim() {
            "" => None,
            raw => {
                let id = raw
                    .parse()
                    .map(TeacherId)
                    .map_err(|_| ValidationError::InvalidTeacherId(raw.to_string()))?;
                if !teachers.contains_key(&id) {
                    return Err(ValidationError::UnknownTeacher(id));
                }
                Some(id)
            }
        };

        let year_level = YearLevelSpec::parse(&self.year_levels);
        if let Some(defect) = year_level.as_ref().and_then(YearLevelSpec::defect) {
            return Err(ValidationError::InvalidYearLevels(defect));
        }

        Ok(Activity {
            name: name.to_string(),
            year_level,
            location: self.location.trim().to_string(),
            days: self.days.trim().to_string(),
            time: self.time.trim().to_string(),
            cost,
            teacher_id,
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
        })
    }
}

fn parse_cost(raw: &str) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidCost(raw.to_string());
    match raw.trim().parse::<i64>() {
        Ok(value) if value < 0 => Err(ValidationError::NegativeCost(value)),
        Ok(value) => u32::try_from(value).map_err(|_| invalid()),
        Err(_) => Err(invalid()),
    }
}
