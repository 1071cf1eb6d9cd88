//! Optional inclusive date window over `createdAt`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::error::WindowError;

/// One side of a [`DateWindow`], keeping the caller's original text for labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowBound {
    pub at: DateTime<Utc>,
    pub raw: String,
}

/// A `{from, to}` range where each bound is optional and inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub from: Option<WindowBound>,
    pub to: Option<WindowBound>,
}

impl DateWindow {
    /// A window with no bounds.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse optional bounds. Blank strings count as absent.
    ///
    /// Accepted forms:
    /// - RFC 3339 (`2024-03-01T10:00:00Z`, `2024-03-01T12:00:00+02:00`)
    /// - naive date-time, read as UTC (`2024-03-01T10:00:00`)
    /// - bare date, read as midnight UTC (`2024-03-01`)
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, WindowError> {
        Ok(Self {
            from: parse_bound("from", from)?,
            to: parse_bound("to", to)?,
        })
    }

    pub fn from(&self) -> Option<DateTime<Utc>> {
        self.from.as_ref().map(|b| b.at)
    }

    pub fn to(&self) -> Option<DateTime<Utc>> {
        self.to.as_ref().map(|b| b.at)
    }

    /// Whether either bound is set.
    pub fn is_bounded(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Whether `at` falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from().map_or(true, |from| at >= from) && self.to().map_or(true, |to| at <= to)
    }

    /// Human label such as `2024-01-01 - All`.
    pub fn label(&self) -> String {
        let side = |bound: &Option<WindowBound>| {
            bound
                .as_ref()
                .map(|b| b.raw.clone())
                .unwrap_or_else(|| "All".to_string())
        };
        format!("{} - {}", side(&self.from), side(&self.to))
    }
}

fn parse_bound(bound: &'static str, value: Option<&str>) -> Result<Option<WindowBound>, WindowError> {
    let raw = match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    let at = parse_instant(raw).ok_or_else(|| WindowError::InvalidBound {
        bound,
        value: raw.to_string(),
    })?;

    Ok(Some(WindowBound {
        at,
        raw: raw.to_string(),
    }))
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unbounded_window() {
        let window = DateWindow::parse(None, Some("  ")).unwrap();
        assert!(!window.is_bounded());
        assert!(window.contains(Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(window.label(), "All - All");
    }

    #[test]
    fn test_bare_date_is_midnight_utc() {
        let window = DateWindow::parse(Some("2024-03-01"), None).unwrap();
        assert_eq!(
            window.from(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(window.label(), "2024-03-01 - All");
    }

    #[test]
    fn test_offset_timestamp_normalized() {
        let window = DateWindow::parse(None, Some("2024-03-01T12:00:00+02:00")).unwrap();
        assert_eq!(
            window.to(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let window = DateWindow::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();

        assert!(window.contains(from));
        assert!(window.contains(to));
        assert!(!window.contains(from - chrono::Duration::milliseconds(1)));
        assert!(!window.contains(to + chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn test_invalid_bound() {
        let err = DateWindow::parse(Some("2024-01-01"), Some("next tuesday")).unwrap_err();
        assert_eq!(
            err,
            WindowError::InvalidBound {
                bound: "to",
                value: "next tuesday".to_string()
            }
        );
    }
}
