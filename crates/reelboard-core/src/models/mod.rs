//! Data models for backend payloads.
//!
//! - `ProjectData`, `ReelRecord`: a project tab and its dated rows
//! - `EmployeeDashboard`: per-employee KPI and page cards for one day
//! - `MemberSummary`, `DayEntry`: monthly submission summary
//! - `Staff`: the staff directory
//! - `LeaveRow`: one line of the daily leave list
//! - `CurrentUser`, `Profile`: the signed-in user and their projects

pub mod dashboard;
pub mod leave;
pub mod reel;
pub mod staff;
pub mod summary;
pub mod user;

pub use dashboard::EmployeeDashboard;
pub use leave::{build_leaves_list, LeaveRow};
pub use reel::{ProjectData, ReelRecord};
pub use staff::{search_staffs, Staff};
pub use summary::{find_member, monthly_target, DayEntry, DayStatus, MemberSummary, DAILY_CLIP_TARGET};
pub use user::{CurrentUser, Profile, ProjectRef};
