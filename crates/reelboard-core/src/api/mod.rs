//! Backend bridge client module.
//!
//! The bridge reads the spreadsheets and answers each call with a tagged
//! ok/error envelope. `Backend` is the seam the dashboard fetches through;
//! `ApiClient` is the HTTP implementation.

pub mod client;
pub mod error;

use std::future::Future;

use chrono::NaiveDate;

use crate::models::{CurrentUser, EmployeeDashboard, MemberSummary, Profile, ProjectData, Staff};

pub use client::ApiClient;
pub use error::ApiError;

/// Calls the dashboard makes against the backend.
///
/// Implementations must be cheap to clone: a clone is moved into every
/// cache fetch.
pub trait Backend: Clone + Send + Sync + 'static {
    /// Sign in by email. With `remember`, the bridge keeps its own token too.
    fn login(
        &self,
        email: &str,
        remember: bool,
    ) -> impl Future<Output = Result<CurrentUser, ApiError>> + Send;

    fn logout(&self) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// All rows of one project tab, by canonical project id.
    fn fetch_employee_data(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<ProjectData, ApiError>> + Send;

    /// KPI and page cards for one employee on one day.
    fn get_employee_dashboard_data(
        &self,
        email: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<EmployeeDashboard, ApiError>> + Send;

    fn fetch_monthly_summary(
        &self,
        year: i32,
        month: u32,
    ) -> impl Future<Output = Result<Vec<MemberSummary>, ApiError>> + Send;

    fn fetch_staffs_data(&self) -> impl Future<Output = Result<Vec<Staff>, ApiError>> + Send;

    /// Write one cell of the staff row with ID `staff_id`.
    fn update_staff_info(
        &self,
        staff_id: &str,
        column: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Every tab in the spreadsheet, project or not.
    fn fetch_all_tab_names(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// The signed-in user's profile, read fresh from the staff sheet.
    fn get_profile_data(&self) -> impl Future<Output = Result<Profile, ApiError>> + Send;

    fn update_profile_name(&self, new_name: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn update_profile_avatar(
        &self,
        new_avatar_url: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}
