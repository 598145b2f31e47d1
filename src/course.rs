use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::time_range::{ClockTime, TimeRange, TimeRangeError};

/// Day of the week a course can meet on
///
/// Ordering follows the academic week, which starts on Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Weekday {
    Saturday,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Saturday,
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Days offered when defining a course (Friday is the off-day)
    pub fn selectable() -> &'static [Weekday] {
        &Self::ALL[..6]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl FromStr for Weekday {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|day| day.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FormError::UnknownDay(s.to_string()))
    }
}

impl TryFrom<String> for Weekday {
    type Error = FormError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Weekday> for String {
    fn from(day: Weekday) -> Self {
        day.as_str().to_string()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of weekdays a course meets on; duplicates collapse on insert
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DaySet(BTreeSet<Weekday>);

impl DaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: Weekday) -> bool {
        self.0.insert(day)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }

    /// Course card rendering: `Saturday - Monday - Wednesday`
    pub fn display(&self) -> String {
        self.iter().map(|d| d.as_str()).collect::<Vec<_>>().join(" - ")
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A course offering as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Course {
    pub course_id: String,
    pub name: String,
    pub professor: String,
    pub days: DaySet,
    pub time: TimeRange,
}

/// Body of `POST /courses/create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCourse {
    pub name: String,
    pub professor: String,
    pub days: DaySet,
    pub time: TimeRange,
}

/// A single inline form problem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("at least one day must be selected")]
    NoDays,

    #[error("'{0}' is not a day of the week")]
    UnknownDay(String),

    #[error("{field}: {source}")]
    InvalidTime {
        field: &'static str,
        #[source]
        source: TimeRangeError,
    },
}

/// Every problem found in one submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) need attention", .0.len())]
pub struct FormErrors(pub Vec<FormError>);

impl FormErrors {
    pub fn iter(&self) -> impl Iterator<Item = &FormError> {
        self.0.iter()
    }

    /// Ok when nothing was collected
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Raw values from the course-definition form
#[derive(Debug, Clone, Default)]
pub struct CourseDraft {
    pub name: String,
    pub professor: String,
    pub days: Vec<String>,
    pub from_time: Option<String>,
    pub to_time: Option<String>,
}

impl CourseDraft {
    /// Validate every field and build the request body
    ///
    /// All problems are collected so they can be shown next to their fields
    /// together; nothing is sent while any remain.
    pub fn validate(&self) -> Result<NewCourse, FormErrors> {
        let mut errors = Vec::new();

        let name = required(&self.name, "course name", &mut errors);
        let professor = required(&self.professor, "professor name", &mut errors);

        let mut days = DaySet::new();
        let mut unknown_day = false;
        for raw in self.days.iter().filter(|d| !d.trim().is_empty()) {
            match raw.parse::<Weekday>() {
                Ok(day) => {
                    days.insert(day);
                }
                Err(e) => {
                    unknown_day = true;
                    errors.push(e);
                }
            }
        }
        if days.is_empty() && !unknown_day {
            errors.push(FormError::NoDays);
        }

        let from = clock_field(self.from_time.as_deref(), "from time", &mut errors);
        let to = clock_field(self.to_time.as_deref(), "to time", &mut errors);

        match (name, professor, from, to) {
            (Some(name), Some(professor), Some(from), Some(to)) if errors.is_empty() => Ok(NewCourse {
                name,
                professor,
                days,
                time: TimeRange::format(from, to),
            }),
            _ => Err(FormErrors(errors)),
        }
    }
}

fn required(value: &str, field: &'static str, errors: &mut Vec<FormError>) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FormError::Required(field));
        None
    } else {
        Some(value.to_string())
    }
}

fn clock_field(
    value: Option<&str>,
    field: &'static str,
    errors: &mut Vec<FormError>,
) -> Option<ClockTime> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => {
            errors.push(FormError::Required(field));
            None
        }
        Some(raw) => match raw.parse() {
            Ok(time) => Some(time),
            Err(source) => {
                errors.push(FormError::InvalidTime { field, source });
                None
            }
        },
    }
}

/// Optional search filters for `GET /courses`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CourseFilter {
    pub name: Option<String>,
    pub professor: Option<String>,
}

impl CourseFilter {
    pub fn new(name: Option<String>, professor: Option<String>) -> Self {
        Self { name, professor }
    }

    /// Query parameters with absent and blank filters pruned
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [("name", self.name.as_deref()), ("professor", self.professor.as_deref())]
            .into_iter()
            .filter_map(|(key, value)| {
                value.filter(|v| !v.trim().is_empty()).map(|v| (key, v))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CourseDraft {
        CourseDraft {
            name: "Compilers".to_string(),
            professor: "Dr. Hopper".to_string(),
            days: vec!["Monday".to_string(), "Wednesday".to_string()],
            from_time: Some("09:00".to_string()),
            to_time: Some("10:30".to_string()),
        }
    }

    #[test]
    fn valid_draft_builds_request_body() {
        let course = draft().validate().unwrap();

        assert_eq!(course.name, "Compilers");
        assert_eq!(course.professor, "Dr. Hopper");
        assert_eq!(course.days.len(), 2);
        assert_eq!(course.time.as_str(), "9:00 AM - 10:30 AM");
    }

    #[test]
    fn empty_day_selection_is_rejected() {
        let mut input = draft();
        input.days.clear();

        let errors = input.validate().unwrap_err();
        assert_eq!(errors.0, vec![FormError::NoDays]);
    }

    #[test]
    fn all_missing_fields_are_reported_together() {
        let input = CourseDraft::default();

        let errors = input.validate().unwrap_err();
        assert_eq!(
            errors.0,
            vec![
                FormError::Required("course name"),
                FormError::Required("professor name"),
                FormError::NoDays,
                FormError::Required("from time"),
                FormError::Required("to time"),
            ]
        );
    }

    #[test]
    fn malformed_time_is_reported_against_its_field() {
        let mut input = draft();
        input.to_time = Some("25:00".to_string());

        let errors = input.validate().unwrap_err();
        assert_eq!(
            errors.0,
            vec![FormError::InvalidTime {
                field: "to time",
                source: TimeRangeError::HourOutOfRange(25),
            }]
        );
    }

    #[test]
    fn unknown_day_is_rejected() {
        let mut input = draft();
        input.days.push("Funday".to_string());

        let errors = input.validate().unwrap_err();
        assert_eq!(errors.0, vec![FormError::UnknownDay("Funday".to_string())]);
    }

    #[test]
    fn duplicate_days_collapse() {
        let mut input = draft();
        input.days = vec!["monday".to_string(), "Monday".to_string(), "MONDAY".to_string()];

        let course = input.validate().unwrap();
        assert_eq!(course.days.len(), 1);
        assert!(course.days.contains(Weekday::Monday));
    }

    #[test]
    fn day_set_orders_from_saturday() {
        let days: DaySet = [Weekday::Thursday, Weekday::Saturday, Weekday::Monday]
            .into_iter()
            .collect();
        assert_eq!(days.display(), "Saturday - Monday - Thursday");
    }

    #[test]
    fn selectable_days_exclude_friday() {
        assert_eq!(Weekday::selectable().len(), 6);
        assert!(!Weekday::selectable().contains(&Weekday::Friday));
    }

    #[test]
    fn course_deserializes_from_backend_shape() {
        let json = r#"{
            "course_id": "42",
            "name": "Databases",
            "professor": "Dr. Codd",
            "days": ["Sunday", "Tuesday"],
            "time": "1:00 PM - 2:30 PM"
        }"#;

        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.course_id, "42");
        assert!(course.days.contains(Weekday::Sunday));
        assert_eq!(course.time.as_str(), "1:00 PM - 2:30 PM");
    }

    #[test]
    fn new_course_serializes_days_as_names() {
        let body = serde_json::to_value(draft().validate().unwrap()).unwrap();
        assert_eq!(body["days"], serde_json::json!(["Monday", "Wednesday"]));
        assert_eq!(body["time"], "9:00 AM - 10:30 AM");
    }

    #[test]
    fn filter_prunes_blank_values() {
        let filter = CourseFilter::new(Some("".to_string()), Some("Knuth".to_string()));
        assert_eq!(filter.query_pairs(), vec![("professor", "Knuth")]);

        let filter = CourseFilter::new(None, Some("  ".to_string()));
        assert!(filter.is_empty());
    }
}
