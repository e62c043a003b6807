//! Query-string helpers shared by the back-office list filters
//!
//! List pages submit every filter field, so an unused one arrives as an
//! empty value (`?category_id=&available=`). [`blank_as_none`] reads those
//! as "no filter". [`DateRange`] is the created/updated/joined filter:
//! any date, today, past 7 days, this month or this year.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Parses an optional query value, treating a blank value as absent
///
/// ```
/// use pcshop_shared::models::filter::blank_as_none;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Filter {
///     #[serde(default, deserialize_with = "blank_as_none")]
///     brand_id: Option<i64>,
/// }
///
/// let filter: Filter = serde_json::from_str(r#"{"brand_id": ""}"#).unwrap();
/// assert_eq!(filter.brand_id, None);
/// ```
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Relative date window for list filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    Today,
    #[serde(rename = "past_7_days")]
    Past7Days,
    ThisMonth,
    ThisYear,
}

impl DateRange {
    /// Filter value as used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::Past7Days => "past_7_days",
            DateRange::ThisMonth => "this_month",
            DateRange::ThisYear => "this_year",
        }
    }

    /// Inclusive lower bound of the window at `now` (UTC calendar)
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = |year, month, day| {
            Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
                .single()
                .unwrap_or(now)
        };

        match self {
            DateRange::Today => midnight(now.year(), now.month(), now.day()),
            DateRange::Past7Days => midnight(now.year(), now.month(), now.day()) - Duration::days(7),
            DateRange::ThisMonth => midnight(now.year(), now.month(), 1),
            DateRange::ThisYear => midnight(now.year(), 1, 1),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DateRange::Today),
            "past_7_days" => Ok(DateRange::Past7Days),
            "this_month" => Ok(DateRange::ThisMonth),
            "this_year" => Ok(DateRange::ThisYear),
            other => Err(format!(
                "Unknown date range '{}', expected today, past_7_days, this_month or this_year",
                other
            )),
        }
    }
}

/// Lower bound for an optional date filter, evaluated now
pub fn since_now(range: Option<DateRange>) -> Option<DateTime<Utc>> {
    range.map(|r| r.since(Utc::now()))
}
