use crate::render;
use clap::{Args, Parser, Subcommand};
use extracurricular::config::AppConfig;
use extracurricular::error::AppError;
use extracurricular::store::JsonFileStore;
use extracurricular::{
    authenticate, telemetry, ActivityDraft, ActivityId, ClubService, EnrollmentError, Principal,
    Session, StudentId,
};
use std::path::PathBuf;

type Service = ClubService<JsonFileStore>;

#[derive(Parser, Debug)]
#[command(
    name = "clubs",
    about = "Manage extracurricular activities and enrollments from the command line",
    version
)]
struct Cli {
    /// Path to the JSON data file (overrides CLUB_DATA_FILE)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Username to log in with
    #[arg(long, short)]
    user: String,
    /// Password for the given username
    #[arg(long, short)]
    password: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the role resolved for the login
    Whoami,
    /// List activities with enrollment counts and income
    Activities {
        /// Write the table as CSV
        #[arg(long)]
        csv: bool,
    },
    /// List the students enrolled in an activity
    Roster { activity_id: u32 },
    /// List all students with their activity counts
    Students,
    /// Show a student's profile, enrollments and total cost
    Summary { student_id: u32 },
    /// Show the details of one activity
    Details { activity_id: u32 },
    /// Show your enrolled and available clubs
    Clubs,
    /// Join a club
    Join { activity_id: u32 },
    /// Leave a club
    Leave { activity_id: u32 },
    /// Create a new activity
    AddActivity(ActivityFields),
    /// Replace the fields of an existing activity
    UpdateActivity {
        activity_id: u32,
        #[command(flatten)]
        fields: ActivityFields,
    },
    /// Delete an activity and remove it from every enrollment
    DeleteActivity { activity_id: u32 },
}

#[derive(Args, Debug)]
struct ActivityFields {
    /// Display name
    #[arg(long)]
    name: String,
    /// Cost in whole dollars
    #[arg(long)]
    cost: String,
    /// Eligible years: a range (9-10), a list (7,9,11), a single year, or "all"
    #[arg(long, default_value = "")]
    year_levels: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    days: String,
    #[arg(long, default_value = "")]
    time: String,
    /// Supervising teacher id
    #[arg(long, default_value = "")]
    teacher_id: String,
    /// Start date (dd/mm/yyyy)
    #[arg(long, default_value = "")]
    start_date: String,
    /// End date (dd/mm/yyyy)
    #[arg(long, default_value = "")]
    end_date: String,
}

impl From<ActivityFields> for ActivityDraft {
    fn from(fields: ActivityFields) -> Self {
        Self {
            name: fields.name,
            year_levels: fields.year_levels,
            location: fields.location,
            days: fields.days,
            time: fields.time,
            cost: fields.cost,
            teacher_id: fields.teacher_id,
            start_date: fields.start_date,
            end_date: fields.end_date,
        }
    }
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let mut storage = config.storage;
    if let Some(path) = cli.data {
        storage.data_file = path;
    }
    tracing::info!(
        environment = ?config.environment,
        data_file = ?storage.data_file,
        "starting clubs"
    );

    let (mut service, warning) = ClubService::open(storage.store());
    if let Some(warning) = warning {
        eprintln!("warning: {warning}");
    }
    if !service.registry().has_credentials() {
        return Err(AppError::NoCredentials);
    }
    if service.registry().dataset().teachers.is_empty() {
        tracing::warn!("no teacher records loaded; teacher details will be missing");
    }

    let session = authenticate(service.registry(), cli.user.trim(), cli.password.trim())?;
    execute(&mut service, &session, cli.command)
}

fn execute(service: &mut Service, session: &Session, command: Command) -> Result<(), AppError> {
    let principal = session.principal;

    match command {
        Command::Whoami => render::session(session),
        Command::Activities { csv } => {
            require(principal.can_view_enrollments(), "view activity income")?;
            let rows = service.registry().activity_overview();
            if csv {
                render::activity_overview_csv(&rows)?;
            } else {
                render::activity_overview(&rows);
            }
        }
        Command::Roster { activity_id } => {
            require(principal.can_view_enrollments(), "view rosters")?;
            let activity_id = ActivityId(activity_id);
            let roster = service.registry().roster(activity_id)?;
            let name = service
                .registry()
                .activity(activity_id)
                .map(|activity| activity.name.as_str())
                .unwrap_or_default();
            render::roster(activity_id, name, &roster);
        }
        Command::Students => {
            require(principal.can_view_enrollments(), "list students")?;
            render::student_overview(&service.registry().student_overview());
        }
        Command::Summary { student_id } => {
            let student_id = StudentId(student_id);
            require(
                principal.can_view_enrollments() || principal.student_id() == Some(student_id),
                "view another student's summary",
            )?;
            println!("{}", service.registry().format_student_summary(student_id)?);
        }
        Command::Details { activity_id } => {
            let details = service.registry().club_details(ActivityId(activity_id))?;
            println!("{details}");
        }
        Command::Clubs => {
            let student_id = own_student(principal)?;
            let clubs = service.registry().student_clubs(student_id)?;
            render::student_clubs(service.registry(), &clubs);
        }
        Command::Join { activity_id } => {
            let student_id = own_student(principal)?;
            let activity_id = ActivityId(activity_id);
            let name = activity_name(service, activity_id);
            match service.enroll(student_id, activity_id) {
                Ok(()) => println!("You have joined '{name}'."),
                Err(EnrollmentError::AlreadyEnrolled { .. }) => {
                    println!("You are already enrolled in '{name}'.");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Leave { activity_id } => {
            let student_id = own_student(principal)?;
            let activity_id = ActivityId(activity_id);
            let name = activity_name(service, activity_id);
            match service.withdraw(student_id, activity_id) {
                Ok(()) => println!("You have left '{name}'."),
                Err(EnrollmentError::NotEnrolled { .. }) => {
                    println!("You are not currently enrolled in '{name}'.");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::AddActivity(fields) => {
            require(principal.can_manage_activities(), "add activities")?;
            let activity_id = service.add_activity(&fields.into())?;
            println!("Activity {activity_id} added.");
        }
        Command::UpdateActivity {
            activity_id,
            fields,
        } => {
            require(principal.can_manage_activities(), "edit activities")?;
            let activity_id = ActivityId(activity_id);
            service.update_activity(activity_id, &fields.into())?;
            println!("Activity {activity_id} updated.");
        }
        Command::DeleteActivity { activity_id } => {
            require(principal.can_manage_activities(), "delete activities")?;
            let report = service.delete_activity(ActivityId(activity_id))?;
            render::deletion(&report);
        }
    }

    Ok(())
}

fn require(allowed: bool, action: &'static str) -> Result<(), AppError> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden { action })
    }
}

fn own_student(principal: Principal) -> Result<StudentId, AppError> {
    principal.student_id().ok_or(AppError::Forbidden {
        action: "manage club memberships",
    })
}

fn activity_name(service: &Service, activity_id: ActivityId) -> String {
    match service.registry().activity(activity_id) {
        Some(activity) => activity.name.clone(),
        None => format!("activity {activity_id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extracurricular::store::seed_dataset;
    use extracurricular::{ClubRegistry, DatasetStore};
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> Service {
        let store = JsonFileStore::new(dir.path().join("data.json"));
        ClubService::new(ClubRegistry::new(seed_dataset(0)), store)
    }

    fn session(principal: Principal) -> Session {
        Session {
            username: "tester".to_string(),
            principal,
        }
    }

    fn fields(name: &str) -> ActivityFields {
        ActivityFields {
            name: name.to_string(),
            cost: "15".to_string(),
            year_levels: "all".to_string(),
            location: "Hall".to_string(),
            days: "Friday".to_string(),
            time: "1:00pm".to_string(),
            teacher_id: String::new(),
            start_date: String::new(),
            end_date: String::new(),
        }
    }

    fn forbidden(result: Result<(), AppError>) -> bool {
        matches!(result, Err(AppError::Forbidden { .. }))
    }

    #[test]
    fn students_only_see_their_own_summary() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut service = service(&dir);
        let student = session(Principal::Student(StudentId(1001)));

        let own = Command::Summary { student_id: 1001 };
        execute(&mut service, &student, own).expect("own summary allowed");

        let other = Command::Summary { student_id: 1002 };
        assert!(forbidden(execute(&mut service, &student, other)));

        let staff = session(Principal::Staff);
        let other = Command::Summary { student_id: 1002 };
        execute(&mut service, &staff, other).expect("staff may view any summary");
    }

    #[test]
    fn only_administrators_manage_activities() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut service = service(&dir);
        let before = service.registry().next_activity_id().expect("id available");

        for principal in [Principal::Staff, Principal::Student(StudentId(1001))] {
            let caller = session(principal);
            let add = Command::AddActivity(fields("Film Club"));
            assert!(forbidden(execute(&mut service, &caller, add)));
            let delete = Command::DeleteActivity { activity_id: 2001 };
            assert!(forbidden(execute(&mut service, &caller, delete)));
        }
        assert!(service.registry().activity(before).is_none());
        assert!(service.registry().activity(ActivityId(2001)).is_some());

        let admin = session(Principal::Administrator);
        let add = Command::AddActivity(fields("Film Club"));
        execute(&mut service, &admin, add).expect("admin adds");
        let added = service.registry().activity(before).expect("activity added");
        assert_eq!(added.name, "Film Club");
    }

    #[test]
    fn joining_requires_a_student_login() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut service = service(&dir);

        for principal in [Principal::Administrator, Principal::Staff] {
            let caller = session(principal);
            let join = Command::Join { activity_id: 2006 };
            assert!(forbidden(execute(&mut service, &caller, join)));
            assert!(forbidden(execute(&mut service, &caller, Command::Clubs)));
        }

        let student = session(Principal::Student(StudentId(1005)));
        let join = Command::Join { activity_id: 2006 };
        execute(&mut service, &student, join).expect("student joins");
        let saved = service.store().load().dataset;
        let joined = &saved.students[&StudentId(1005)];
        assert!(joined.is_enrolled(ActivityId(2006)));

        let again = Command::Join { activity_id: 2006 };
        execute(&mut service, &student, again).expect("repeat join is informational");
    }

    #[test]
    fn enrollment_views_are_closed_to_students() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut service = service(&dir);
        let student = session(Principal::Student(StudentId(1001)));

        let roster = Command::Roster { activity_id: 2001 };
        assert!(forbidden(execute(&mut service, &student, roster)));
        let students = Command::Students;
        assert!(forbidden(execute(&mut service, &student, students)));
        let activities = Command::Activities { csv: false };
        assert!(forbidden(execute(&mut service, &student, activities)));

        let staff = session(Principal::Staff);
        let roster = Command::Roster { activity_id: 2001 };
        execute(&mut service, &staff, roster).expect("staff sees rosters");
        let details = Command::Details { activity_id: 2001 };
        execute(&mut service, &student, details).expect("anyone sees details");
    }
}
