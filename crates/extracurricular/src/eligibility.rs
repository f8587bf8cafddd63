//! Year-level restrictions attached to activities.
//!
//! Restrictions are stored on disk as free-form strings ("9-10", "7, 9, 11",
//! "10", "all"). They are parsed once, when a dataset is loaded or an activity
//! is entered, into a [`YearLevelSpec`]; the string form only exists at the
//! file boundary.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Serialize, Serializer};

/// Literal that the legacy data uses for "every secondary year".
const FULL_RANGE_TOKEN: &str = "7-12";

/// Parsed year-level restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearLevelSpec {
    Unrestricted,
    Range { min: u8, max: u8 },
    Set(BTreeSet<u8>),
    Exact(u8),
    /// Text that could not be read as a restriction. Evaluates as eligible.
    Malformed(String),
}

impl YearLevelSpec {
    /// Parses the legacy string form.
    ///
    /// Returns `None` when no restriction is recorded (blank or `N/A`).
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("n/a") {
            return None;
        }

        if text.to_ascii_lowercase().contains("all") || text == FULL_RANGE_TOKEN {
            return Some(Self::Unrestricted);
        }

        let parsed = if let Some((min, max)) = text.split_once('-') {
            parse_year(min)
                .zip(parse_year(max))
                .map(|(min, max)| Self::Range { min, max })
        } else if text.contains(',') {
            text.split(',')
                .map(parse_year)
                .collect::<Option<BTreeSet<u8>>>()
                .map(Self::Set)
        } else {
            parse_year(text).map(Self::Exact)
        };

        Some(parsed.unwrap_or_else(|| Self::Malformed(text.to_string())))
    }

    /// Whether a student in `year` may join an activity with this restriction.
    pub fn admits(&self, year: u8) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Range { min, max } => (*min..=*max).contains(&year),
            Self::Set(years) => years.contains(&year),
            Self::Exact(required) => *required == year,
            Self::Malformed(raw) => {
                tracing::warn!(spec = %raw, "unparsable year-level restriction treated as open");
                true
            }
        }
    }

    /// Restrictions that data entry should refuse.
    pub fn defect(&self) -> Option<String> {
        match self {
            Self::Malformed(raw) => Some(format!("'{raw}' is not a year range, list, or year")),
            Self::Range { min, max } if min > max => {
                Some(format!("range {min}-{max} has its bounds reversed"))
            }
            _ => None,
        }
    }

    pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Self>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SpecVisitor)
    }
}

fn parse_year(raw: &str) -> Option<u8> {
    raw.trim().parse().ok()
}

/// Eligibility check over the raw restriction text.
///
/// An absent restriction admits everyone.
pub fn is_eligible(student_year: u8, spec: &str) -> bool {
    YearLevelSpec::parse(spec).map_or(true, |parsed| parsed.admits(student_year))
}

/// Eligibility check used by availability queries.
///
/// Students without a recorded year only qualify for unrestricted activities.
pub fn is_eligible_for(student_year: Option<u8>, spec: Option<&YearLevelSpec>) -> bool {
    match (spec, student_year) {
        (None, _) => true,
        (Some(spec), Some(year)) => spec.admits(year),
        (Some(_), None) => false,
    }
}

impl fmt::Display for YearLevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrestricted => write!(f, "all"),
            Self::Range { min, max } => write!(f, "{min}-{max}"),
            Self::Set(years) => {
                let listed: Vec<String> = years.iter().map(u8::to_string).collect();
                write!(f, "{}", listed.join(", "))
            }
            Self::Exact(year) => write!(f, "{year}"),
            Self::Malformed(raw) => write!(f, "{raw}"),
        }
    }
}

impl Serialize for YearLevelSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct SpecVisitor;

impl<'de> Visitor<'de> for SpecVisitor {
    type Value = Option<YearLevelSpec>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a year-level string or number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(YearLevelSpec::parse(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Some(match u8::try_from(value) {
            Ok(year) => YearLevelSpec::Exact(year),
            Err(_) => YearLevelSpec::Malformed(value.to_string()),
        }))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Some(YearLevelSpec::Malformed(value.to_string())))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}
