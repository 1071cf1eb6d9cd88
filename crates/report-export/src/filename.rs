//! Download filenames.

use chrono::NaiveDate;

/// Longest slug kept from a report title, in characters.
pub const MAX_SLUG_CHARS: usize = 50;

/// Reduce a human title to a filesystem-safe slug.
///
/// Keeps ASCII letters and digits, the Hebrew block (U+0590..=U+05FF),
/// `-` and `_`; drops everything else, turns whitespace runs into `_` and
/// truncates to [`MAX_SLUG_CHARS`]. Applying it twice changes nothing.
pub fn sanitize_title(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_space = false;

    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('_');
                in_space = true;
            }
            continue;
        }
        if is_slug_char(c) {
            slug.push(c);
            in_space = false;
        }
    }

    slug.chars().take(MAX_SLUG_CHARS).collect()
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{0590}'..='\u{05FF}').contains(&c) || c == '-' || c == '_'
}

/// `<stem>_<YYYY-MM-DD>.<ext>`
pub fn dated_filename(stem: &str, date: NaiveDate, ext: &str) -> String {
    format!("{}_{}.{}", stem, date.format("%Y-%m-%d"), ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_stripped() {
        assert_eq!(sanitize_title("Report: Q1/2024!"), "Report_Q12024");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(sanitize_title("Daily   sales\t report"), "Daily_sales_report");
    }

    #[test]
    fn test_dropped_chars_do_not_split_whitespace() {
        assert_eq!(sanitize_title("emoji 🚀 removed"), "emoji_removed");
    }

    #[test]
    fn test_hebrew_kept() {
        assert_eq!(sanitize_title("דוח התאמות - מאי"), "דוח_התאמות_-_מאי");
    }

    #[test]
    fn test_truncated_to_limit() {
        let title = "a".repeat(80);
        assert_eq!(sanitize_title(&title).chars().count(), MAX_SLUG_CHARS);

        let hebrew = "ש".repeat(60);
        assert_eq!(sanitize_title(&hebrew).chars().count(), MAX_SLUG_CHARS);
    }

    #[test]
    fn test_idempotent() {
        for title in [
            "Report: Q1/2024!",
            "  leading and trailing  ",
            "דוח התאמות - מאי",
            "already_clean-slug",
            "emoji 🚀 removed",
        ] {
            let once = sanitize_title(title);
            assert_eq!(sanitize_title(&once), once, "title: {title:?}");
        }
    }

    #[test]
    fn test_dated_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        assert_eq!(dated_filename("reconciliation", date, "csv"), "reconciliation_2024-02-09.csv");
    }
}
