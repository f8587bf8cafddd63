use extracurricular::error::AppError;
use extracurricular::registry::{ActivityOverview, RosterEntry, StudentClubs, StudentOverview};
use extracurricular::{ActivityId, ClubRegistry, DeletionReport, Principal, Session};

pub(crate) fn session(session: &Session) {
    match session.principal {
        Principal::Student(student_id) => println!(
            "Logged in as {} (student {student_id})",
            session.username
        ),
        principal => println!(
            "Logged in as {} ({})",
            session.username,
            principal.role().label()
        ),
    }
}

pub(crate) fn activity_overview(rows: &[ActivityOverview]) {
    println!(
        "{:<6} {:<28} {:>7} {:>9} {:>9}",
        "ID", "Activity", "Cost", "Enrolled", "Income"
    );
    for row in rows {
        println!(
            "{:<6} {:<28} {:>7} {:>9} {:>9}",
            row.activity_id,
            row.name,
            format!("${}", row.cost),
            row.enrollments,
            format!("${}", row.income)
        );
    }
}

pub(crate) fn activity_overview_csv(rows: &[ActivityOverview]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|err| AppError::Report(Box::new(err)))?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn roster(activity_id: ActivityId, name: &str, roster: &[RosterEntry]) {
    println!("Students enrolled in {name} ({activity_id}):");
    if roster.is_empty() {
        println!("  (none)");
        return;
    }
    for entry in roster {
        println!(
            "  {:<6} {:<28} year {}",
            entry.student_id,
            entry.name,
            year(entry.year_level)
        );
    }
}

pub(crate) fn student_overview(rows: &[StudentOverview]) {
    println!(
        "{:<6} {:<28} {:>4} {:<10} {:>10}",
        "ID", "Name", "Year", "House", "Activities"
    );
    for row in rows {
        println!(
            "{:<6} {:<28} {:>4} {:<10} {:>10}",
            row.student_id,
            row.name,
            year(row.year_level),
            row.house,
            row.activity_count
        );
    }
}

pub(crate) fn student_clubs(registry: &ClubRegistry, clubs: &StudentClubs) {
    println!("My clubs:");
    club_list(registry, &clubs.enrolled);
    println!("Available clubs:");
    club_list(registry, &clubs.available);
}

fn club_list(registry: &ClubRegistry, ids: &[ActivityId]) {
    if ids.is_empty() {
        println!("  (none)");
    }
    for id in ids {
        if let Some(activity) = registry.activity(*id) {
            println!("  {:<6} {:<28} ${}", id, activity.name, activity.cost);
        }
    }
}

pub(crate) fn deletion(report: &DeletionReport) {
    println!(
        "Activity '{}' ({}) deleted; removed from {} student enrollment(s).",
        report.name,
        report.activity_id,
        report.affected_students.len()
    );
}

fn year(level: Option<u8>) -> String {
    level.map_or_else(|| "N/A".to_string(), |level| level.to_string())
}
