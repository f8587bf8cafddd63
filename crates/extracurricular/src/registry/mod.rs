//! In-memory owner of the dataset and the read-side queries over it.

mod views;

use crate::domain::{
    Activity, ActivityId, Credential, Dataset, Student, StudentId, Teacher, TeacherId,
};
use crate::eligibility::is_eligible_for;

pub use views::{
    ActivityOverview, ClubDetails, RosterEntry, StudentClubs, StudentOverview, StudentSummary,
};

/// Identifier assigned to the first activity of an empty catalogue.
pub const BASE_ACTIVITY_ID: ActivityId = ActivityId(2001);

/// Lookup misses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("activity {0} not found")]
    ActivityNotFound(ActivityId),
    #[error("student {0} not found")]
    StudentNotFound(StudentId),
    #[error("no activity id is left after {0}")]
    IdSpaceExhausted(ActivityId),
}

/// Exclusive owner of activities, students, teachers and credentials.
#[derive(Debug, Clone, Default)]
pub struct ClubRegistry {
    dataset: Dataset,
}

impl ClubRegistry {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub(crate) fn replace(&mut self, dataset: Dataset) {
        self.dataset = dataset;
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.dataset.activities.get(&id)
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.dataset.students.get(&id)
    }

    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.dataset.teachers.get(&id)
    }

    pub fn credential(&self, username: &str) -> Option<&Credential> {
        self.dataset.users.get(username)
    }

    pub fn has_credentials(&self) -> bool {
        !self.dataset.users.is_empty()
    }

    /// Number of students whose enrollment list contains `activity_id`.
    ///
    /// Unknown ids count as zero.
    pub fn count_enrollments(&self, activity_id: ActivityId) -> usize {
        self.dataset
            .students
            .values()
            .filter(|student| student.is_enrolled(activity_id))
            .count()
    }

    /// Cost multiplied by enrollment count, or `None` for an unknown activity.
    pub fn income(&self, activity_id: ActivityId) -> Option<u64> {
        let activity = self.activity(activity_id)?;
        let enrollments = self.count_enrollments(activity_id) as u64;
        Some(u64::from(activity.cost) * enrollments)
    }

    /// One past the largest activity id, or [`BASE_ACTIVITY_ID`] when empty.
    pub fn next_activity_id(&self) -> Result<ActivityId, RegistryError> {
        match self.dataset.activities.keys().next_back() {
            None => Ok(BASE_ACTIVITY_ID),
            Some(last) => last
                .0
                .checked_add(1)
                .map(ActivityId)
                .ok_or(RegistryError::IdSpaceExhausted(*last)),
        }
    }

    pub fn activity_overview(&self) -> Vec<ActivityOverview> {
        self.dataset
            .activities
            .iter()
            .map(|(id, activity)| {
                let enrollments = self.count_enrollments(*id);
                ActivityOverview {
                    activity_id: *id,
                    name: activity.name.clone(),
                    cost: activity.cost,
                    enrollments,
                    income: u64::from(activity.cost) * enrollments as u64,
                }
            })
            .collect()
    }

    pub fn roster(&self, activity_id: ActivityId) -> Result<Vec<RosterEntry>, RegistryError> {
        if self.activity(activity_id).is_none() {
            return Err(RegistryError::ActivityNotFound(activity_id));
        }

        Ok(self
            .dataset
            .students
            .iter()
            .filter(|(_, student)| student.is_enrolled(activity_id))
            .map(|(id, student)| RosterEntry {
                student_id: *id,
                name: student.full_name(),
                year_level: student.year_level,
            })
            .collect())
    }

    pub fn student_overview(&self) -> Vec<StudentOverview> {
        self.dataset
            .students
            .iter()
            .map(|(id, student)| StudentOverview {
                student_id: *id,
                name: student.full_name(),
                year_level: student.year_level,
                house: student.house.clone(),
                activity_count: student.activities_enrolled.len(),
            })
            .collect()
    }

    /// Sum of enrolled activity costs, skipping ids that no longer resolve.
    pub fn student_total_cost(&self, student_id: StudentId) -> Result<u64, RegistryError> {
        let student = self
            .student(student_id)
            .ok_or(RegistryError::StudentNotFound(student_id))?;
        Ok(self
            .resolved_enrollments(student_id, student)
            .map(|(_, activity)| u64::from(activity.cost))
            .sum())
    }

    pub fn student_summary(&self, student_id: StudentId) -> Result<StudentSummary, RegistryError> {
        let student = self
            .student(student_id)
            .ok_or(RegistryError::StudentNotFound(student_id))?;

        let mut activities = Vec::new();
        let mut total_cost = 0_u64;
        for (_, activity) in self.resolved_enrollments(student_id, student) {
            activities.push(activity.name.clone());
            total_cost += u64::from(activity.cost);
        }

        Ok(StudentSummary {
            student_id,
            name: student.full_name(),
            gender: student.gender.clone(),
            year_level: student.year_level,
            house: student.house.clone(),
            dob: student.dob.clone(),
            activities,
            total_cost,
        })
    }

    /// Rendered form of [`ClubRegistry::student_summary`].
    pub fn format_student_summary(&self, student_id: StudentId) -> Result<String, RegistryError> {
        self.student_summary(student_id).map(|summary| summary.to_string())
    }

    pub fn club_details(&self, activity_id: ActivityId) -> Result<ClubDetails, RegistryError> {
        let activity = self
            .activity(activity_id)
            .ok_or(RegistryError::ActivityNotFound(activity_id))?;
        let teacher_name = activity
            .teacher_id
            .and_then(|id| self.teacher(id))
            .map(Teacher::display_name);

        Ok(ClubDetails {
            activity_id,
            name: activity.name.clone(),
            year_levels: activity.year_level.as_ref().map(ToString::to_string),
            location: activity.location.clone(),
            days: activity.days.clone(),
            time: activity.time.clone(),
            cost: activity.cost,
            start_date: activity.start_date.clone(),
            end_date: activity.end_date.clone(),
            teacher_id: activity.teacher_id,
            teacher_name,
        })
    }

    /// Enrollment always wins over eligibility for the "enrolled" side.
    pub fn student_clubs(&self, student_id: StudentId) -> Result<StudentClubs, RegistryError> {
        let student = self
            .student(student_id)
            .ok_or(RegistryError::StudentNotFound(student_id))?;

        let mut clubs = StudentClubs::default();
        for (id, activity) in &self.dataset.activities {
            if student.is_enrolled(*id) {
                clubs.enrolled.push(*id);
            } else if is_eligible_for(student.year_level, activity.year_level.as_ref()) {
                clubs.available.push(*id);
            }
        }
        Ok(clubs)
    }

    fn resolved_enrollments<'a>(
        &'a self,
        student_id: StudentId,
        student: &'a Student,
    ) -> impl Iterator<Item = (ActivityId, &'a Activity)> + 'a {
        student
            .activities_enrolled
            .iter()
            .filter_map(move |id| match self.activity(*id) {
                Some(activity) => Some((*id, activity)),
                None => {
                    tracing::debug!(%student_id, activity_id = %id, "skipping stale enrollment");
                    None
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::YearLevelSpec;

    fn activity(name: &str, cost: u32, years: &str) -> Activity {
        Activity {
            name: name.to_string(),
            year_level: YearLevelSpec::parse(years),
            location: String::new(),
            days: String::new(),
            time: String::new(),
            cost,
            teacher_id: None,
            start_date: String::new(),
            end_date: String::new(),
        }
    }

    fn student(year: u8, enrolled: &[u32]) -> Student {
        Student {
            firstname: "Test".to_string(),
            surname: format!("Y{year}"),
            gender: String::new(),
            year_level: Some(year),
            house: "Cook".to_string(),
            dob: String::new(),
            activities_enrolled: enrolled.iter().copied().map(ActivityId).collect(),
        }
    }

    fn registry() -> ClubRegistry {
        let mut dataset = Dataset::default();
        dataset
            .activities
            .insert(ActivityId(2001), activity("Chess", 40, "all"));
        dataset
            .activities
            .insert(ActivityId(2002), activity("Robotics", 100, "9-10"));
        dataset
            .activities
            .insert(ActivityId(2003), activity("Choir", 15, "7,8"));
        dataset
            .students
            .insert(StudentId(1), student(9, &[2001, 2002]));
        dataset.students.insert(StudentId(2), student(11, &[2001]));
        dataset.students.insert(StudentId(3), student(7, &[9999]));
        ClubRegistry::new(dataset)
    }

    #[test]
    fn income_is_cost_times_enrollments() {
        let registry = registry();
        assert_eq!(registry.count_enrollments(ActivityId(2001)), 2);
        assert_eq!(registry.income(ActivityId(2001)), Some(80));
        assert_eq!(registry.income(ActivityId(2003)), Some(0));
        assert_eq!(registry.income(ActivityId(4242)), None);
        assert_eq!(registry.count_enrollments(ActivityId(4242)), 0);
    }

    #[test]
    fn overview_matches_point_queries() {
        let registry = registry();
        for row in registry.activity_overview() {
            assert_eq!(row.enrollments, registry.count_enrollments(row.activity_id));
            assert_eq!(Some(row.income), registry.income(row.activity_id));
        }
    }

    #[test]
    fn next_activity_id_follows_maximum() {
        assert_eq!(registry().next_activity_id(), Ok(ActivityId(2004)));
        assert_eq!(
            ClubRegistry::default().next_activity_id(),
            Ok(BASE_ACTIVITY_ID)
        );
    }

    #[test]
    fn next_activity_id_reports_exhausted_id_space() {
        let mut dataset = registry().into_dataset();
        dataset
            .activities
            .insert(ActivityId(u32::MAX), activity("Last", 0, ""));
        assert_eq!(
            ClubRegistry::new(dataset).next_activity_id(),
            Err(RegistryError::IdSpaceExhausted(ActivityId(u32::MAX)))
        );
    }

    #[test]
    fn summary_skips_stale_enrollments() {
        let registry = registry();
        let summary = registry.student_summary(StudentId(3)).expect("student 3");
        assert!(summary.activities.is_empty());
        assert_eq!(summary.total_cost, 0);

        let rendered = registry
            .format_student_summary(StudentId(1))
            .expect("student 1");
        assert!(rendered.contains("Activities: Chess, Robotics"));
        assert!(rendered.contains("Total Cost: $140"));
        assert_eq!(registry.student_total_cost(StudentId(1)), Ok(140));
    }

    #[test]
    fn summary_reports_missing_student() {
        assert_eq!(
            registry().format_student_summary(StudentId(77)),
            Err(RegistryError::StudentNotFound(StudentId(77)))
        );
    }

    #[test]
    fn enrolled_clubs_ignore_current_eligibility() {
        let registry = registry();
        let clubs = registry.student_clubs(StudentId(2)).expect("student 2");
        assert_eq!(clubs.enrolled, vec![ActivityId(2001)]);
        assert!(
            clubs.available.is_empty(),
            "year 11 fits neither 9-10 nor 7,8"
        );

        let mut dataset = registry.into_dataset();
        dataset
            .students
            .get_mut(&StudentId(2))
            .expect("student 2")
            .activities_enrolled
            .push(ActivityId(2002));
        let registry = ClubRegistry::new(dataset);
        let clubs = registry.student_clubs(StudentId(2)).expect("student 2");
        assert_eq!(clubs.enrolled, vec![ActivityId(2001), ActivityId(2002)]);
    }

    #[test]
    fn available_clubs_respect_year_levels() {
        let clubs = registry().student_clubs(StudentId(3)).expect("student 3");
        assert!(clubs.enrolled.is_empty(), "stale ids are not listed");
        assert_eq!(clubs.available, vec![ActivityId(2001), ActivityId(2003)]);
    }

    #[test]
    fn roster_lists_enrolled_students_in_id_order() {
        let registry = registry();
        let roster = registry.roster(ActivityId(2001)).expect("roster");
        let ids: Vec<StudentId> = roster.iter().map(|entry| entry.student_id).collect();
        assert_eq!(ids, vec![StudentId(1), StudentId(2)]);
        assert_eq!(
            registry.roster(ActivityId(1)),
            Err(RegistryError::ActivityNotFound(ActivityId(1)))
        );
    }

    #[test]
    fn club_details_resolve_teacher_name() {
        let mut dataset = registry().into_dataset();
        dataset.teachers.insert(
            TeacherId(3001),
            Teacher {
                firstname: "Ian".to_string(),
                surname: "Cole".to_string(),
                title: "Mr".to_string(),
                contact: String::new(),
            },
        );
        if let Some(chess) = dataset.activities.get_mut(&ActivityId(2001)) {
            chess.teacher_id = Some(TeacherId(3001));
        }
        let registry = ClubRegistry::new(dataset);

        let details = registry.club_details(ActivityId(2001)).expect("details");
        assert_eq!(details.teacher_name.as_deref(), Some("Mr Ian Cole"));
        assert!(details.to_string().contains("Year Level(s): all"));

        let robotics = registry.club_details(ActivityId(2002)).expect("details");
        assert!(robotics.to_string().ends_with("Teacher: N/A"));
    }
}
