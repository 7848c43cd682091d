use crate::extract::NOT_AVAILABLE;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// How a source writes its publication dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateLayout {
    /// `5 Jan 23`, `05 January 2023`
    #[default]
    DayMonthYear,

    /// `2023-01-05`, optionally followed by a time
    IsoDate,
}

/// A date label that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("expected day, month and year in '{0}'")]
    WrongShape(String),

    #[error("'{0}' is not a valid date")]
    Invalid(String),
}

/// Parses a date label according to `layout`
pub fn parse_date(text: &str, layout: DateLayout) -> Result<NaiveDate, DateError> {
    match layout {
        DateLayout::DayMonthYear => parse_day_month_year(text),
        DateLayout::IsoDate => parse_iso_date(text),
    }
}

/// Parses a date label and renders it as `DD/MM/YYYY`
///
/// Unreadable labels become [`NOT_AVAILABLE`]; this never fails.
///
/// # Examples
///
/// ```
/// use greylit::extract::{normalize_date, DateLayout};
///
/// assert_eq!(normalize_date("5 Jan 23", DateLayout::DayMonthYear), "05/01/2023");
/// assert_eq!(normalize_date("2023-01-05T09:30:00Z", DateLayout::IsoDate), "05/01/2023");
/// assert_eq!(normalize_date("yesterday", DateLayout::DayMonthYear), "N/A");
/// ```
pub fn normalize_date(text: &str, layout: DateLayout) -> String {
    match parse_date(text, layout) {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(e) => {
            tracing::trace!("Date label not parsed: {}", e);
            NOT_AVAILABLE.to_string()
        }
    }
}

fn parse_day_month_year(text: &str) -> Result<NaiveDate, DateError> {
    let parts: Vec<&str> = text
        .split_whitespace()
        .map(|part| part.trim_matches(','))
        .collect();

    let [day, month, year] = parts.as_slice() else {
        return Err(DateError::WrongShape(text.to_string()));
    };

    // Full month names are cut to their three-letter abbreviation
    let month: String = month.chars().take(3).collect();
    let year = if year.len() == 2 {
        format!("20{}", year)
    } else {
        year.to_string()
    };

    NaiveDate::parse_from_str(&format!("{} {} {}", day, month, year), "%d %b %Y")
        .map_err(|_| DateError::Invalid(text.to_string()))
}

fn parse_iso_date(text: &str) -> Result<NaiveDate, DateError> {
    let prefix: String = text.trim().chars().take(10).collect();
    NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").map_err(|_| DateError::Invalid(text.to_string()))
}
