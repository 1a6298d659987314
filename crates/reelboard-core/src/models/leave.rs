//! The daily leave list: every staff member's status for one day, next to
//! their totals for the month.

use serde::{Deserialize, Serialize};

use super::staff::Staff;
use super::summary::{find_member, monthly_target, DayStatus, MemberSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct LeaveRow {
    /// 1-based position in the staff sheet
    pub id: usize,
    pub name: String,
    pub project_name: String,
    pub sent_today: i64,
    pub status_today: DayStatus,
    pub platform_fb: bool,
    pub platform_ig: bool,
    pub monthly_target: i64,
    pub total_clips_month: i64,
    pub total_leave_days: i64,
    pub total_missing_days: i64,
}

/// One row per staff member, in sheet order.
///
/// Members without a summary for the month still get a row, with zero
/// totals and [`DayStatus::NoData`].
pub fn build_leaves_list(
    staffs: &[Staff],
    summaries: &[MemberSummary],
    year: i32,
    month: u32,
    day: u32,
) -> Vec<LeaveRow> {
    let target = monthly_target(year, month);

    staffs
        .iter()
        .enumerate()
        .map(|(i, staff)| {
            let name = staff.name.trim();
            let summary = find_member(summaries, name);
            let today = summary.and_then(|s| s.day(day));
            let project_name = match staff.project_name.trim() {
                "" => "-".to_string(),
                p => p.to_string(),
            };

            LeaveRow {
                id: i + 1,
                name: name.to_string(),
                project_name,
                sent_today: today.map_or(0, |d| d.clips),
                status_today: today.map_or(DayStatus::NoData, |d| d.status),
                platform_fb: staff.has_flag("FB"),
                platform_ig: staff.has_flag("IG"),
                monthly_target: target,
                total_clips_month: summary.map_or(0, |s| s.total_clips),
                total_leave_days: summary.map_or(0, |s| s.total_holidays),
                total_missing_days: summary.map_or(0, |s| s.total_missing),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_leaves_list() {
        let staffs: Vec<Staff> = serde_json::from_value(serde_json::json!([
            { "ID": "1", "Name": " Somchai ", "Project Name": "Project Q", "FB": "1", "IG": "0" },
            { "ID": "2", "Name": "Malee", "IG": "1" }
        ]))
        .unwrap();
        let summaries: Vec<MemberSummary> = serde_json::from_value(serde_json::json!([
            {
                "name": "Somchai",
                "dailyData": { "3": { "clips": 40, "status": "complete" } },
                "totalClips": 120,
                "totalMissing": 2,
                "totalHolidays": 1
            }
        ]))
        .unwrap();

        let rows = build_leaves_list(&staffs, &summaries, 2025, 7, 3);
        assert_eq!(rows.len(), 2);

        let somchai = &rows[0];
        assert_eq!((somchai.id, somchai.name.as_str()), (1, "Somchai"));
        assert_eq!(somchai.sent_today, 40);
        assert_eq!(somchai.status_today, DayStatus::Complete);
        assert!(somchai.platform_fb && !somchai.platform_ig);
        assert_eq!(somchai.monthly_target, 1240);
        assert_eq!(
            (somchai.total_clips_month, somchai.total_leave_days, somchai.total_missing_days),
            (120, 1, 2)
        );

        let malee = &rows[1];
        assert_eq!(malee.id, 2);
        assert_eq!(malee.project_name, "-");
        assert_eq!(malee.status_today, DayStatus::NoData);
        assert_eq!(malee.total_clips_month, 0);
        assert!(malee.platform_ig);
    }

    #[test]
    fn test_day_without_entry_is_nodata() {
        let staffs: Vec<Staff> = serde_json::from_value(serde_json::json!([{ "Name": "Somchai" }])).unwrap();
        let summaries = vec![MemberSummary {
            name: "Somchai".to_string(),
            total_clips: 5,
            ..Default::default()
        }];
        let rows = build_leaves_list(&staffs, &summaries, 2025, 2, 30);
        assert_eq!(rows[0].status_today, DayStatus::NoData);
        assert_eq!(rows[0].total_clips_month, 5);
        assert_eq!(rows[0].monthly_target, 1120);
    }
}
