use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Date, Month, Weekday};

/// When a task is due, as spoken. Relative keywords are kept symbolic and
/// only resolved against a calendar date when ordering tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DueDate {
    Today,
    Tomorrow,
    NextWeek,
    Day(Weekday),
    /// Literal month-day phrase such as "March 5th".
    Date(String),
}

impl DueDate {
    pub fn as_string(&self) -> String {
        match self {
            Self::Today => "today".to_string(),
            Self::Tomorrow => "tomorrow".to_string(),
            Self::NextWeek => "nextWeek".to_string(),
            Self::Day(weekday) => weekday.to_string(),
            Self::Date(text) => text.clone(),
        }
    }

    /// Days from `today` until the due date, or `None` when the literal date
    /// cannot be read as a calendar day.
    pub fn days_from(&self, today: Date) -> Option<i64> {
        match self {
            Self::Today => Some(0),
            Self::Tomorrow => Some(1),
            Self::NextWeek => Some(7),
            Self::Day(weekday) => {
                let target = i64::from(weekday.number_days_from_monday());
                let current = i64::from(today.weekday().number_days_from_monday());
                Some((target - current).rem_euclid(7))
            }
            Self::Date(text) => {
                let (month, day) = parse_month_day(text)?;
                let this_year = Date::from_calendar_date(today.year(), month, day).ok();
                let due = match this_year {
                    Some(date) if date >= today => date,
                    _ => Date::from_calendar_date(today.year() + 1, month, day).ok()?,
                };
                Some((due - today).whole_days())
            }
        }
    }
}

impl From<String> for DueDate {
    fn from(value: String) -> Self {
        match value.as_str() {
            "today" => return Self::Today,
            "tomorrow" => return Self::Tomorrow,
            "nextWeek" => return Self::NextWeek,
            _ => {}
        }

        match weekday_from_name(&value) {
            Some(weekday) => Self::Day(weekday),
            None => Self::Date(value),
        }
    }
}

impl From<DueDate> for String {
    fn from(value: DueDate) -> Self {
        value.as_string()
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Monday),
        "tuesday" => Some(Weekday::Tuesday),
        "wednesday" => Some(Weekday::Wednesday),
        "thursday" => Some(Weekday::Thursday),
        "friday" => Some(Weekday::Friday),
        "saturday" => Some(Weekday::Saturday),
        "sunday" => Some(Weekday::Sunday),
        _ => None,
    }
}

pub fn month_from_name(name: &str) -> Option<Month> {
    match name.trim().to_ascii_lowercase().as_str() {
        "january" => Some(Month::January),
        "february" => Some(Month::February),
        "march" => Some(Month::March),
        "april" => Some(Month::April),
        "may" => Some(Month::May),
        "june" => Some(Month::June),
        "july" => Some(Month::July),
        "august" => Some(Month::August),
        "september" => Some(Month::September),
        "october" => Some(Month::October),
        "november" => Some(Month::November),
        "december" => Some(Month::December),
        _ => None,
    }
}

fn parse_month_day(text: &str) -> Option<(Month, u8)> {
    let mut parts = text.split_whitespace();
    let month = month_from_name(parts.next()?)?;
    let digits: String = parts
        .next()?
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    let day = digits.parse::<u8>().ok()?;
    Some((month, day))
}

#[cfg(test)]
mod tests {
    use super::DueDate;
    use time::macros::date;
    use time::Weekday;

    #[test]
    fn string_form_round_trips_through_serde() {
        let values = vec![
            DueDate::Today,
            DueDate::NextWeek,
            DueDate::Day(Weekday::Friday),
            DueDate::Date("March 5th".to_string()),
        ];

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"["today","nextWeek","Friday","March 5th"]"#);

        let parsed: Vec<DueDate> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, values);
    }

    #[test]
    fn keywords_resolve_to_fixed_offsets() {
        let today = date!(2025 - 12 - 17);
        assert_eq!(DueDate::Today.days_from(today), Some(0));
        assert_eq!(DueDate::Tomorrow.days_from(today), Some(1));
        assert_eq!(DueDate::NextWeek.days_from(today), Some(7));
    }

    #[test]
    fn weekday_resolves_to_next_occurrence() {
        // 2025-12-17 is a Wednesday.
        let today = date!(2025 - 12 - 17);
        assert_eq!(DueDate::Day(Weekday::Wednesday).days_from(today), Some(0));
        assert_eq!(DueDate::Day(Weekday::Friday).days_from(today), Some(2));
        assert_eq!(DueDate::Day(Weekday::Monday).days_from(today), Some(5));
    }

    #[test]
    fn month_day_rolls_into_next_year_when_past() {
        let today = date!(2025 - 12 - 17);
        assert_eq!(
            DueDate::Date("December 20th".to_string()).days_from(today),
            Some(3)
        );
        assert_eq!(
            DueDate::Date("January 1st".to_string()).days_from(today),
            Some(15)
        );
        assert_eq!(DueDate::Date("someday".to_string()).days_from(today), None);
    }
}
