//! Project sheet rows ("reels") and the project payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::dates::{self, DateRecord};

/// Column holding the hand-typed submission date.
const DATE_COLUMN: &str = "Date";

/// One row of a project sheet.
///
/// Columns are whatever the sheet has (`PageName`, `Clip1`, `View1`,
/// `Status`, ...). The `Date` column is parsed once here so lookups by day
/// compare calendar dates instead of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ReelRecord {
    date_text: String,
    date: Option<NaiveDate>,
    fields: Map<String, Value>,
}

impl From<Map<String, Value>> for ReelRecord {
    fn from(fields: Map<String, Value>) -> Self {
        let date_text = fields
            .get(DATE_COLUMN)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();
        let date = dates::parse_sheet_date(&date_text);
        Self {
            date_text,
            date,
            fields,
        }
    }
}

impl From<ReelRecord> for Map<String, Value> {
    fn from(record: ReelRecord) -> Self {
        record.fields
    }
}

impl ReelRecord {
    /// A text column, if present and a string.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// A text column, or `-` when blank or missing.
    pub fn field_or_dash(&self, name: &str) -> &str {
        match self.field(name) {
            Some(v) if !v.trim().is_empty() => v,
            _ => "-",
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl DateRecord for ReelRecord {
    fn date_text(&self) -> &str {
        &self.date_text
    }

    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Payload of `fetch_employee_data`: every row of one project tab.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectData {
    #[serde(default)]
    pub reels: Vec<ReelRecord>,
    #[serde(default)]
    pub sheet_name: String,
}

impl ProjectData {
    /// Rows submitted on `date`; empty when nothing was sent that day.
    pub fn records_for(&self, date: NaiveDate) -> Vec<&ReelRecord> {
        dates::resolve_records_for_date(&self.reels, date)
    }

    /// Newest day with at least one row.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        dates::latest_date(&self.reels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProjectData {
        serde_json::from_value(serde_json::json!({
            "sheet_name": "Project Q",
            "reels": [
                { "No": "1", "Date": "1/7/2025", "PageName": "Cats Daily", "Status": "ส่งครบ" },
                { "No": "2", "Date": " 01/07/25 ", "PageName": "Dog Clips", "Status": "" },
                { "No": "3", "Date": "2/7/2025", "PageName": "Cats Daily" },
                { "No": "4", "Date": "1/7/25", "PageName": "Bird Reels" },
                { "No": "5", "PageName": "No date" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_project_data_parses_dates_once() {
        let data = sample();
        assert_eq!(data.sheet_name, "Project Q");
        assert_eq!(data.reels.len(), 5);
        assert_eq!(data.reels[1].date_text(), "01/07/25");
        assert_eq!(data.reels[1].date(), NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(data.reels[4].date(), None);
    }

    #[test]
    fn test_records_for_date() {
        let data = sample();
        let rows = data.records_for(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        let pages: Vec<&str> = rows.iter().map(|r| r.field_or_dash("PageName")).collect();
        assert_eq!(pages, vec!["Cats Daily", "Dog Clips", "Bird Reels"]);

        let none = data.records_for(NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
        assert!(none.is_empty());
    }

    #[test]
    fn test_latest_date() {
        assert_eq!(sample().latest_date(), NaiveDate::from_ymd_opt(2025, 7, 2));
        assert_eq!(ProjectData::default().latest_date(), None);
    }

    #[test]
    fn test_field_or_dash() {
        let data = sample();
        assert_eq!(data.reels[0].field_or_dash("Status"), "ส่งครบ");
        assert_eq!(data.reels[1].field_or_dash("Status"), "-");
        assert_eq!(data.reels[2].field_or_dash("Status"), "-");
    }

    #[test]
    fn test_reel_record_serializes_original_columns() {
        let data = sample();
        let value = serde_json::to_value(&data.reels[0]).unwrap();
        assert_eq!(value["PageName"], "Cats Daily");
        assert_eq!(value["Date"], "1/7/2025");
    }
}
