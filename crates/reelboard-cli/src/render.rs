//! Plain-text rendering of dashboard data.

use std::fmt::Write;

use reelboard_core::models::{CurrentUser, EmployeeDashboard, LeaveRow, MemberSummary, Profile, Staff};
use reelboard_core::utils::{days_in_month, truncate};
use reelboard_core::WorkTable;

/// Widest page name shown in the work table
const PAGE_NAME_WIDTH: usize = 24;

/// Widest link shown in a table cell
const LINK_WIDTH: usize = 32;

pub fn user(user: &CurrentUser) -> String {
    let projects = if user.allowed_projects.is_empty() {
        "(none)".to_string()
    } else {
        user.allowed_projects
            .iter()
            .map(|p| user.project_tab(p))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Email:    {}\nRole:     {}\nProjects: {}",
        user.email, user.role, projects
    )
}

pub fn projects(user: &CurrentUser) -> String {
    let mut ids: Vec<&String> = user.allowed_projects.iter().collect();
    ids.sort();
    let mut out = String::new();
    for id in ids {
        let _ = writeln!(out, "  {:<24} {}", id, user.project_tab(id));
    }
    if out.is_empty() {
        out.push_str("  (no projects)\n");
    }
    out
}

pub fn work_table(table: &WorkTable, age: Option<&str>) -> String {
    let mut out = String::new();
    let _ = write!(out, "{} - {}", table.project_name, table.display_date);
    if let Some(age) = age {
        let _ = write!(out, "  (updated {})", age);
    }
    out.push('\n');

    if table.is_empty() {
        out.push_str("  No submissions for this day.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "  {:>3}  {:<width$}  {:<link$}  {:<link$}  {}",
        "No",
        "Page",
        "Clip 1",
        "Clip 2",
        "Status",
        width = PAGE_NAME_WIDTH,
        link = LINK_WIDTH
    );
    for (idx, row) in table.rows.iter().enumerate() {
        let no = row
            .field("No")
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| (idx + 1).to_string());
        let _ = writeln!(
            out,
            "  {:>3}  {:<width$}  {:<link$}  {:<link$}  {}",
            no,
            truncate(row.field_or_dash("PageName"), PAGE_NAME_WIDTH),
            truncate(row.field_or_dash("Clip1"), LINK_WIDTH),
            truncate(row.field_or_dash("Clip2"), LINK_WIDTH),
            row.field_or_dash("Status"),
            width = PAGE_NAME_WIDTH,
            link = LINK_WIDTH
        );
    }
    out
}

pub fn employee_dashboard(email: &str, dashboard: &EmployeeDashboard) -> String {
    let pretty = |v: &serde_json::Value| serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string());
    format!(
        "Dashboard for {}\nKPI cards:\n{}\nPage cards ({}):\n{}",
        email,
        pretty(&dashboard.kpi_cards),
        dashboard.page_count(),
        pretty(&dashboard.page_cards)
    )
}

pub fn monthly_summary(year: i32, month: u32, members: &[MemberSummary]) -> String {
    let mut out = format!("Summary {}-{:02}\n", year, month);
    if members.is_empty() {
        out.push_str("  No data for this month.\n");
        return out;
    }
    let _ = writeln!(
        out,
        "  {:<20} {:<16} {:>6} {:>8} {:>8}",
        "Name", "Project", "Clips", "Missing", "Leave"
    );
    for m in members {
        let _ = writeln!(
            out,
            "  {:<20} {:<16} {:>6} {:>8} {:>8}",
            truncate(&m.name, 20),
            truncate(&m.project_name, 16),
            m.total_clips,
            m.total_missing,
            m.total_holidays
        );
    }
    out
}

pub fn member_summary(year: i32, month: u32, member: &MemberSummary) -> String {
    let mut out = format!(
        "{} ({}) {}-{:02}\n  Clips: {}  Missing: {}  Leave: {}  Views: {}\n",
        member.name,
        member.project_name,
        year,
        month,
        member.total_clips,
        member.total_missing,
        member.total_holidays,
        member.total_views
    );
    let days = days_in_month(year, month).unwrap_or(31);
    for day in 1..=days {
        let cell = member.day(day).map(|d| d.cell()).unwrap_or_else(|| ".".to_string());
        let _ = write!(out, "{:>3}:{:<5}", day, cell);
        if day % 7 == 0 {
            out.push('\n');
        }
    }
    out.push('\n');
    out
}

pub fn leaves(date: &str, rows: &[LeaveRow]) -> String {
    let mut out = format!("Leaves {}\n", date);
    if rows.is_empty() {
        out.push_str("  No staff found.\n");
        return out;
    }
    let _ = writeln!(
        out,
        "  {:>3}  {:<20} {:<16} {:>5} {:<9} {:<5} {:>12} {:>6} {:>7}",
        "ID", "Name", "Project", "Today", "Status", "Plat", "Month/Target", "Leave", "Missing"
    );
    for r in rows {
        let platforms = match (r.platform_fb, r.platform_ig) {
            (true, true) => "FB+IG",
            (true, false) => "FB",
            (false, true) => "IG",
            (false, false) => "-",
        };
        let _ = writeln!(
            out,
            "  {:>3}  {:<20} {:<16} {:>5} {:<9} {:<5} {:>12} {:>6} {:>7}",
            r.id,
            truncate(&r.name, 20),
            truncate(&r.project_name, 16),
            r.sent_today,
            r.status_today.to_string(),
            platforms,
            format!("{}/{}", r.total_clips_month, r.monthly_target),
            r.total_leave_days,
            r.total_missing_days
        );
    }
    out
}

pub fn profile(profile: &Profile) -> String {
    let avatar = if profile.avatar_url.is_empty() {
        "(default)"
    } else {
        profile.avatar_url.as_str()
    };
    format!(
        "Name:   {}\nEmail:  {}\nRole:   {}\nAvatar: {}",
        profile.name, profile.email, profile.role, avatar
    )
}

pub fn tabs(tabs: &[String]) -> String {
    if tabs.is_empty() {
        return "  (no tabs)\n".to_string();
    }
    tabs.iter().map(|t| format!("  {}\n", t)).collect()
}

pub fn staffs(staffs: &[Staff]) -> String {
    if staffs.is_empty() {
        return "  No matching staff.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:>4}  {:<20} {:<28} {:<16} {:<8} {}",
        "ID", "Name", "E-Mail", "Project", "Role", "Status"
    );
    for s in staffs {
        let _ = writeln!(
            out,
            "  {:>4}  {:<20} {:<28} {:<16} {:<8} {}",
            s.id,
            truncate(&s.name, 20),
            truncate(&s.email, 28),
            truncate(&s.project_name, 16),
            s.role,
            s.status
        );
    }
    out
}
