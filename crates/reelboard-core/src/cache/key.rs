use std::fmt;

use chrono::NaiveDate;

/// Identifies one cacheable unit of dashboard data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A project's reel sheet, by canonical project id.
    Project(String),
    /// One employee's KPI dashboard for one day.
    Dashboard { employee: String, date: NaiveDate },
    /// The all-members summary for a month.
    MonthlySummary { year: i32, month: u32 },
    /// The staff directory.
    Staffs,
}

impl CacheKey {
    pub fn project(project_id: impl Into<String>) -> Self {
        CacheKey::Project(project_id.into())
    }

    /// Employee ids are emails; case and surrounding whitespace don't identify anyone.
    pub fn dashboard(employee: &str, date: NaiveDate) -> Self {
        CacheKey::Dashboard {
            employee: employee.trim().to_lowercase(),
            date,
        }
    }

    pub fn monthly_summary(year: i32, month: u32) -> Self {
        CacheKey::MonthlySummary { year, month }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Project(id) => write!(f, "{}", id),
            CacheKey::Dashboard { employee, date } => {
                write!(f, "{}_{}", employee, date.format("%Y-%m-%d"))
            }
            CacheKey::MonthlySummary { year, month } => write!(f, "summary_{}_{:02}", year, month),
            CacheKey::Staffs => write!(f, "staffs"),
        }
    }
}
