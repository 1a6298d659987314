//! Spreadsheet date handling.
//!
//! The `Date` column of the project sheets is typed by hand and never
//! normalized upstream, so the same day shows up as `1/7/2025`, `01/07/25`,
//! `1/07/2025` and so on. Dates are parsed once when a row is ingested and
//! compared structurally after that.

use chrono::{Datelike, Months, NaiveDate};

/// Two-digit years above this value belong to the 1900s, the rest to the 2000s.
/// `68` becomes 1968 and `25` becomes 2025. Sheets written after 2050 will
/// need a different pivot.
pub const TWO_DIGIT_YEAR_PIVOT: u32 = 50;

/// A row that carries a free-text spreadsheet date.
pub trait DateRecord {
    /// The raw text as it appears in the sheet.
    fn date_text(&self) -> &str;

    /// The calendar date parsed at ingestion, if the text was readable.
    fn date(&self) -> Option<NaiveDate>;
}

/// Expand a one or two digit year using [`TWO_DIGIT_YEAR_PIVOT`].
pub fn expand_two_digit_year(yy: u32) -> i32 {
    if yy > TWO_DIGIT_YEAR_PIVOT {
        1900 + yy as i32
    } else {
        2000 + yy as i32
    }
}

/// All eight textual encodings a sheet may use for `date`.
///
/// Full-year forms come first (`D/M`, `DD/M`, `D/MM`, `DD/MM`), followed by
/// the same four with the short year. The short year is `year % 100` written
/// without padding, so 2005 gives `1/7/5`.
pub fn date_encodings(date: NaiveDate) -> [String; 8] {
    let (d, m) = (date.day(), date.month());
    let full = date.year();
    let short = full.rem_euclid(100);
    [
        format!("{}/{}/{}", d, m, full),
        format!("{:02}/{}/{}", d, m, full),
        format!("{}/{:02}/{}", d, m, full),
        format!("{:02}/{:02}/{}", d, m, full),
        format!("{}/{}/{}", d, m, short),
        format!("{:02}/{}/{}", d, m, short),
        format!("{}/{:02}/{}", d, m, short),
        format!("{:02}/{:02}/{}", d, m, short),
    ]
}

/// Header form of a date: always `DD/MM/YYYY`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn parse_component(part: &str, max_len: usize) -> Option<u32> {
    if part.is_empty() || part.len() > max_len || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Parse a sheet date in any of the `D/M/Y` variants.
///
/// Day and month take one or two digits. A four-digit year is used as-is;
/// a short year is expanded with [`TWO_DIGIT_YEAR_PIVOT`]. Short years are
/// never zero-padded in the sheets, so `05` is rejected and `5` means 2005.
/// Returns `None` for anything else, including impossible dates like `31/2/2025`.
pub fn parse_sheet_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let day = parse_component(day, 2)?;
    let month = parse_component(month, 2)?;
    let year = match year.len() {
        4 => parse_component(year, 4)? as i32,
        1 => expand_two_digit_year(parse_component(year, 1)?),
        2 if !year.starts_with('0') => expand_two_digit_year(parse_component(year, 2)?),
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Number of days in a month, `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
        .map(|last| last.day())
}

/// Every record whose date is `date`, in input order.
///
/// An empty result is a normal outcome: the day simply has no submissions.
pub fn resolve_records_for_date<R: DateRecord>(records: &[R], date: NaiveDate) -> Vec<&R> {
    records.iter().filter(|r| r.date() == Some(date)).collect()
}

/// Newest readable date among `records`.
pub fn latest_date<R: DateRecord>(records: &[R]) -> Option<NaiveDate> {
    records.iter().filter_map(|r| r.date()).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        text: String,
        date: Option<NaiveDate>,
    }

    impl Row {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                date: parse_sheet_date(text),
            }
        }
    }

    impl DateRecord for Row {
        fn date_text(&self) -> &str {
            &self.text
        }

        fn date(&self) -> Option<NaiveDate> {
            self.date
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_encodings_order() {
        let enc = date_encodings(ymd(2025, 7, 1));
        assert_eq!(
            enc,
            [
                "1/7/2025", "01/7/2025", "1/07/2025", "01/07/2025", "1/7/25", "01/7/25",
                "1/07/25", "01/07/25",
            ]
        );
    }

    #[test]
    fn test_short_year_is_not_padded() {
        let enc = date_encodings(ymd(2005, 7, 1));
        assert_eq!(&enc[4..], ["1/7/5", "01/7/5", "1/07/5", "01/07/5"]);
    }

    #[test]
    fn test_padded_short_year_matches_nothing() {
        assert_eq!(parse_sheet_date("01/07/05"), None);
        assert_eq!(parse_sheet_date("1/7/00"), None);
        assert_eq!(parse_sheet_date("1/7/0"), Some(ymd(2000, 7, 1)));

        let rows = vec![Row::new("01/07/05"), Row::new("01/07/5")];
        let found = resolve_records_for_date(&rows, ymd(2005, 7, 1));
        let texts: Vec<&str> = found.iter().map(|r| r.date_text()).collect();
        assert_eq!(texts, vec!["01/07/5"]);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 7), Some(31));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2025, 13), None);
    }

    #[test]
    fn test_every_encoding_parses_back() {
        for date in [ymd(2025, 7, 1), ymd(2024, 12, 31), ymd(2005, 3, 9), ymd(1999, 11, 20)] {
            for text in date_encodings(date) {
                assert_eq!(parse_sheet_date(&text), Some(date), "encoding {}", text);
            }
        }
    }

    #[test]
    fn test_parse_sheet_date_variants() {
        assert_eq!(parse_sheet_date(" 26/06/68 "), Some(ymd(1968, 6, 26)));
        assert_eq!(parse_sheet_date("1/7/50"), Some(ymd(2050, 7, 1)));
        assert_eq!(parse_sheet_date("1/7/51"), Some(ymd(1951, 7, 1)));
        assert_eq!(parse_sheet_date("1/7/5"), Some(ymd(2005, 7, 1)));
    }

    #[test]
    fn test_parse_sheet_date_rejects_garbage() {
        assert_eq!(parse_sheet_date(""), None);
        assert_eq!(parse_sheet_date("2025-07-01"), None);
        assert_eq!(parse_sheet_date("31/2/2025"), None);
        assert_eq!(parse_sheet_date("1/7/2025/1"), None);
        assert_eq!(parse_sheet_date("001/7/2025"), None);
        assert_eq!(parse_sheet_date("1/7/202"), None);
        assert_eq!(parse_sheet_date("a/7/2025"), None);
    }

    #[test]
    fn test_resolve_records_for_date_matches_all_formats() {
        let rows = vec![
            Row::new("1/7/2025"),
            Row::new("01/07/25"),
            Row::new("2/7/2025"),
            Row::new("1/7/25"),
            Row::new("not a date"),
        ];
        let found = resolve_records_for_date(&rows, ymd(2025, 7, 1));
        let texts: Vec<&str> = found.iter().map(|r| r.date_text()).collect();
        assert_eq!(texts, vec!["1/7/2025", "01/07/25", "1/7/25"]);
    }

    #[test]
    fn test_resolve_records_for_date_empty() {
        let rows = vec![Row::new("2/7/2025")];
        assert!(resolve_records_for_date(&rows, ymd(2025, 7, 1)).is_empty());
    }

    #[test]
    fn test_display_date_is_zero_padded() {
        assert_eq!(display_date(ymd(2025, 7, 1)), "01/07/2025");
        assert_eq!(display_date(ymd(2025, 12, 31)), "31/12/2025");
    }

    #[test]
    fn test_latest_date() {
        let rows = vec![Row::new("30/6/25"), Row::new("2/7/2025"), Row::new("bogus")];
        assert_eq!(latest_date(&rows), Some(ymd(2025, 7, 2)));
        assert_eq!(latest_date::<Row>(&[]), None);
    }
}
