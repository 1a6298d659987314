//! Monthly submission summary, one entry per member.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::utils::dates::days_in_month;

/// Clips each member is expected to send per day.
pub const DAILY_CLIP_TARGET: i64 = 40;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Complete,
    Missing,
    Holiday,
    #[default]
    #[serde(rename = "nodata")]
    NoData,
}

impl std::fmt::Display for DayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayStatus::Complete => write!(f, "Complete"),
            DayStatus::Missing => write!(f, "Missing"),
            DayStatus::Holiday => write!(f, "Holiday"),
            DayStatus::NoData => write!(f, "No data"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DayEntry {
    #[serde(default)]
    pub clips: i64,
    #[serde(default)]
    pub status: DayStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DayEntry {
    /// Short cell text for a calendar grid.
    pub fn cell(&self) -> String {
        match self.status {
            DayStatus::Complete => self.clips.to_string(),
            DayStatus::Missing => "x".to_string(),
            DayStatus::Holiday => self.text.clone().unwrap_or_else(|| "off".to_string()),
            DayStatus::NoData => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    #[serde(default)]
    pub project_name: String,
    pub name: String,
    /// Day of month → that day's entry
    #[serde(default)]
    pub daily_data: BTreeMap<u32, DayEntry>,
    #[serde(default)]
    pub total_clips: i64,
    #[serde(default)]
    pub total_missing: i64,
    #[serde(default)]
    pub total_holidays: i64,
    #[serde(default)]
    pub total_views: i64,
    /// Clips expected for the whole month, see [`monthly_target`].
    #[serde(default)]
    pub monthly_target: i64,
}

impl MemberSummary {
    pub fn day(&self, day: u32) -> Option<&DayEntry> {
        self.daily_data.get(&day)
    }
}

/// [`DAILY_CLIP_TARGET`] for every day of the month.
pub fn monthly_target(year: i32, month: u32) -> i64 {
    days_in_month(year, month).map_or(0, |days| DAILY_CLIP_TARGET * days as i64)
}

/// Look up a member by display name.
pub fn find_member<'a>(summaries: &'a [MemberSummary], name: &str) -> Option<&'a MemberSummary> {
    let name = name.trim();
    summaries.iter().find(|m| m.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MemberSummary> {
        serde_json::from_value(serde_json::json!([
            {
                "projectName": "Project Q",
                "name": "Somchai",
                "dailyData": {
                    "1": { "clips": 4, "status": "complete" },
                    "2": { "clips": 0, "status": "missing" },
                    "3": { "clips": 0, "status": "holiday", "text": "หยุด" },
                    "4": { "clips": 0, "status": "nodata" }
                },
                "totalClips": 4,
                "totalMissing": 1,
                "totalHolidays": 1,
                "totalViews": 0
            },
            { "name": "Malee" }
        ]))
        .unwrap()
    }

    #[test]
    fn test_parse_monthly_summary() {
        let all = sample();
        assert_eq!(all.len(), 2);
        let somchai = &all[0];
        assert_eq!(somchai.project_name, "Project Q");
        assert_eq!(somchai.total_clips, 4);
        assert_eq!(somchai.day(1).map(|d| d.status), Some(DayStatus::Complete));
        assert_eq!(somchai.day(3).map(|d| d.cell()).as_deref(), Some("หยุด"));
        assert!(somchai.day(31).is_none());
        assert!(all[1].daily_data.is_empty());
    }

    #[test]
    fn test_day_cells() {
        let all = sample();
        let cells: Vec<String> = all[0].daily_data.values().map(DayEntry::cell).collect();
        assert_eq!(cells, vec!["4", "x", "หยุด", "-"]);
    }

    #[test]
    fn test_monthly_target() {
        assert_eq!(monthly_target(2025, 7), 1240);
        assert_eq!(monthly_target(2025, 2), 1120);
        assert_eq!(monthly_target(2024, 2), 1160);
        assert_eq!(monthly_target(2025, 0), 0);
        assert_eq!(sample()[1].monthly_target, 0);
    }

    #[test]
    fn test_find_member() {
        let all = sample();
        assert_eq!(find_member(&all, " Malee ").map(|m| m.name.as_str()), Some("Malee"));
        assert!(find_member(&all, "Nobody").is_none());
    }
}
