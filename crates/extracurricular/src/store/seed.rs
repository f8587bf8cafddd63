//! Built-in dataset used when no usable data file exists.

use chrono::{Datelike, Local, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{
    Activity, ActivityId, Credential, Dataset, Role, Student, StudentId, Teacher, TeacherId,
};
use crate::eligibility::YearLevelSpec;

pub const DEFAULT_BULK_STUDENTS: usize = 40;

const HOUSES: [&str; 4] = ["Banks", "Cook", "Flinders", "Oxley"];
const GENDERS: [&str; 3] = ["Female", "Male", "Non-binary"];
const FIRST_NAMES: [&str; 16] = [
    "Aisha", "Ben", "Chloe", "Dev", "Ella", "Finn", "Grace", "Hamish", "Isla", "Jack", "Kai",
    "Lena", "Mia", "Noah", "Olivia", "Priya",
];
const SURNAMES: [&str; 12] = [
    "Anderson", "Brown", "Chen", "Dunn", "Evans", "Foster", "Gupta", "Hall", "Ito", "Jones",
    "Kelly", "Lee",
];

struct ActivityRow {
    id: u32,
    name: &'static str,
    years: &'static str,
    location: &'static str,
    days: &'static str,
    time: &'static str,
    cost: u32,
    teacher: u32,
}

const ACTIVITIES: [ActivityRow; 10] = [
    ActivityRow {
        id: 2001,
        name: "Chess Club",
        years: "7-12",
        location: "Library",
        days: "Monday",
        time: "3:30pm-4:30pm",
        cost: 20,
        teacher: 3001,
    },
    ActivityRow {
        id: 2002,
        name: "Robotics",
        years: "9-10",
        location: "Lab B2",
        days: "Tuesday",
        time: "3:30pm-5:00pm",
        cost: 120,
        teacher: 3002,
    },
    ActivityRow {
        id: 2003,
        name: "Debating",
        years: "10-12",
        location: "Room C4",
        days: "Wednesday",
        time: "1:00pm-1:40pm",
        cost: 0,
        teacher: 3003,
    },
    ActivityRow {
        id: 2004,
        name: "Junior Choir",
        years: "7,8",
        location: "Music Hall",
        days: "Thursday",
        time: "8:00am-8:45am",
        cost: 15,
        teacher: 3004,
    },
    ActivityRow {
        id: 2005,
        name: "Senior Basketball",
        years: "11-12",
        location: "Gym",
        days: "Monday, Thursday",
        time: "4:00pm-5:30pm",
        cost: 60,
        teacher: 3002,
    },
    ActivityRow {
        id: 2006,
        name: "Art Studio",
        years: "all",
        location: "Art Room",
        days: "Friday",
        time: "1:00pm-2:00pm",
        cost: 40,
        teacher: 3004,
    },
    ActivityRow {
        id: 2007,
        name: "Coding Club",
        years: "7,9,11",
        location: "Lab B1",
        days: "Wednesday",
        time: "3:30pm-4:30pm",
        cost: 30,
        teacher: 3001,
    },
    ActivityRow {
        id: 2008,
        name: "Drama Production",
        years: "8-12",
        location: "Theatre",
        days: "Tuesday, Thursday",
        time: "3:30pm-5:30pm",
        cost: 80,
        teacher: 3003,
    },
    ActivityRow {
        id: 2009,
        name: "Year 12 Study Group",
        years: "12",
        location: "Library",
        days: "Tuesday",
        time: "7:45am-8:30am",
        cost: 0,
        teacher: 3001,
    },
    ActivityRow {
        id: 2010,
        name: "Environmental Club",
        years: "all",
        location: "Garden",
        days: "Friday",
        time: "12:30pm-1:10pm",
        cost: 10,
        teacher: 3004,
    },
];

struct NamedStudent {
    id: u32,
    firstname: &'static str,
    surname: &'static str,
    gender: &'static str,
    year: u8,
    house: &'static str,
    dob: &'static str,
    enrolled: &'static [u32],
}

const NAMED_STUDENTS: [NamedStudent; 5] = [
    NamedStudent {
        id: 1001,
        firstname: "Sam",
        surname: "Taylor",
        gender: "Male",
        year: 9,
        house: "Banks",
        dob: "14/03/2011",
        enrolled: &[2001, 2002],
    },
    NamedStudent {
        id: 1002,
        firstname: "Priya",
        surname: "Patel",
        gender: "Female",
        year: 11,
        house: "Cook",
        dob: "02/09/2009",
        enrolled: &[2003],
    },
    NamedStudent {
        id: 1003,
        firstname: "Liam",
        surname: "Nguyen",
        gender: "Male",
        year: 7,
        house: "Flinders",
        dob: "21/06/2013",
        enrolled: &[2004, 2006],
    },
    NamedStudent {
        id: 1004,
        firstname: "Zoe",
        surname: "Williams",
        gender: "Female",
        year: 12,
        house: "Oxley",
        dob: "30/11/2007",
        enrolled: &[2005, 2009],
    },
    NamedStudent {
        id: 1005,
        firstname: "Ari",
        surname: "Cohen",
        gender: "Non-binary",
        year: 10,
        house: "Banks",
        dob: "08/01/2010",
        enrolled: &[],
    },
];

const TEACHERS: [(u32, &str, &str, &str, &str); 4] = [
    (3001, "Ian", "Cole", "Mr", "icole@school.test"),
    (3002, "Rachel", "Okafor", "Ms", "rokafor@school.test"),
    (3003, "Martin", "Fischer", "Dr", "mfischer@school.test"),
    (3004, "Hannah", "Reid", "Mrs", "hreid@school.test"),
];

/// Builds the fallback dataset with `bulk_students` randomly generated students.
pub fn seed_dataset(bulk_students: usize) -> Dataset {
    let mut dataset = Dataset::default();

    for row in &ACTIVITIES {
        dataset.activities.insert(
            ActivityId(row.id),
            Activity {
                name: row.name.to_string(),
                year_level: YearLevelSpec::parse(row.years),
                location: row.location.to_string(),
                days: row.days.to_string(),
                time: row.time.to_string(),
                cost: row.cost,
                teacher_id: Some(TeacherId(row.teacher)),
                start_date: "03/02/2025".to_string(),
                end_date: "28/11/2025".to_string(),
            },
        );
    }

    for (id, firstname, surname, title, contact) in TEACHERS {
        dataset.teachers.insert(
            TeacherId(id),
            Teacher {
                firstname: firstname.to_string(),
                surname: surname.to_string(),
                title: title.to_string(),
                contact: contact.to_string(),
            },
        );
    }

    for named in &NAMED_STUDENTS {
        dataset.students.insert(
            StudentId(named.id),
            Student {
                firstname: named.firstname.to_string(),
                surname: named.surname.to_string(),
                gender: named.gender.to_string(),
                year_level: Some(named.year),
                house: named.house.to_string(),
                dob: named.dob.to_string(),
                activities_enrolled: named.enrolled.iter().copied().map(ActivityId).collect(),
            },
        );
        dataset.users.insert(
            named.id.to_string(),
            Credential {
                password: format!("pass{}", named.id),
                role: Role::Student,
                student_id: Some(StudentId(named.id)),
            },
        );
    }

    let activity_ids: Vec<ActivityId> = dataset.activities.keys().copied().collect();
    let mut rng = rand::thread_rng();
    let first_bulk_id = NAMED_STUDENTS[NAMED_STUDENTS.len() - 1].id + 1;
    for id in (first_bulk_id..).take(bulk_students) {
        let year = rng.gen_range(7..=12);
        let student = Student {
            firstname: pick(&mut rng, &FIRST_NAMES),
            surname: pick(&mut rng, &SURNAMES),
            gender: pick(&mut rng, &GENDERS),
            year_level: Some(year),
            house: pick(&mut rng, &HOUSES),
            dob: random_dob(&mut rng, year),
            activities_enrolled: Vec::from_iter(activity_ids.choose(&mut rng).copied()),
        };
        dataset.students.insert(StudentId(id), student);
    }

    dataset.users.insert(
        "admin".to_string(),
        Credential {
            password: "admin123".to_string(),
            role: Role::Administrator,
            student_id: None,
        },
    );
    dataset.users.insert(
        "staff".to_string(),
        Credential {
            password: "staff123".to_string(),
            role: Role::Staff,
            student_id: None,
        },
    );

    dataset
}

fn pick<R: Rng>(rng: &mut R, options: &[&str]) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

// Year 7 students turn 13 during the school year.
fn random_dob<R: Rng>(rng: &mut R, year_level: u8) -> String {
    let birth_year = Local::now().year() - i32::from(year_level) - 6 + rng.gen_range(0..=1);
    NaiveDate::from_ymd_opt(birth_year, rng.gen_range(1..=12), rng.gen_range(1..=28))
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}
