//! Dashboard state shared by every view.
//!
//! `Dashboard` owns the backend handle, one `DashboardDataCache` per payload
//! type and the signed-in user. Views ask it for data and render whatever
//! comes back; it decides whether that means a backend call.

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Backend};
use crate::auth::{Session, SessionData};
use crate::cache::{CacheError, CacheKey, DashboardDataCache};
use crate::models::{
    build_leaves_list, find_member, monthly_target, search_staffs, CurrentUser,
    EmployeeDashboard, LeaveRow, MemberSummary, Profile, ProjectData, ReelRecord, Staff,
};
use crate::utils::{canonical_id, display_date};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Access denied to project '{0}'")]
    AccessDenied(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Fetch(#[from] CacheError),

    #[error(transparent)]
    Backend(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

/// The submissions of one project on one day.
#[derive(Debug, Clone)]
pub struct WorkTable {
    pub project_id: String,
    pub project_name: String,
    pub date: NaiveDate,
    /// Always `DD/MM/YYYY`, whatever format the rows used.
    pub display_date: String,
    pub rows: Vec<ReelRecord>,
}

impl WorkTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct Dashboard<B: Backend> {
    backend: B,
    session: Option<Session>,
    user: Option<CurrentUser>,
    projects: DashboardDataCache<ProjectData>,
    dashboards: DashboardDataCache<EmployeeDashboard>,
    summaries: DashboardDataCache<Vec<MemberSummary>>,
    staffs: DashboardDataCache<Vec<Staff>>,
}

impl<B: Backend> Dashboard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: None,
            user: None,
            projects: DashboardDataCache::new(),
            dashboards: DashboardDataCache::new(),
            summaries: DashboardDataCache::new(),
            staffs: DashboardDataCache::new(),
        }
    }

    /// Persist remember-me sign-ins through `session`.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    fn require_user(&self) -> Result<&CurrentUser> {
        self.user.as_ref().ok_or(DashboardError::NotLoggedIn)
    }

    // ===== Session =====

    pub async fn login(&mut self, email: &str, remember: bool) -> Result<&CurrentUser> {
        let user = self.backend.login(email.trim(), remember).await?;
        info!(email = %user.email, role = %user.role, projects = user.allowed_projects.len(), "Logged in");

        if remember {
            if let Some(session) = self.session.as_mut() {
                session.update(SessionData::new(user.email.clone(), user.role.clone()));
                if let Err(e) = session.save() {
                    warn!(error = %e, "Failed to remember session");
                }
            }
        }

        // A different user may see different projects
        self.reload();
        Ok(self.user.insert(user))
    }

    /// Sign in again as the remembered user, if there is one.
    pub async fn auto_login(&mut self) -> Result<Option<&CurrentUser>> {
        let email = match self.session.as_mut() {
            Some(session) => match session.load() {
                Ok(true) => session.email().map(str::to_string),
                Ok(false) => None,
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable session");
                    None
                }
            },
            None => None,
        };

        match email {
            Some(email) => {
                debug!(email = %email, "Auto login");
                self.login(&email, true).await.map(Some)
            }
            None => Ok(None),
        }
    }

    pub async fn logout(&mut self) {
        if let Err(e) = self.backend.logout().await {
            warn!(error = %e, "Backend logout failed");
        }
        if let Some(session) = self.session.as_mut() {
            if let Err(e) = session.clear() {
                warn!(error = %e, "Failed to clear session");
            }
        }
        self.user = None;
        self.reload();
        info!("Logged out");
    }

    // ===== Projects =====

    /// All rows of a project the user may open.
    ///
    /// `project` may be the canonical id or the tab name it was derived from.
    pub async fn load_project(&self, project: &str) -> Result<Arc<ProjectData>> {
        let project_id = canonical_id(project);
        let user = self.require_user()?;
        if !user.can_access(&project_id) {
            warn!(project_id = %project_id, email = %user.email, "Project access denied");
            return Err(DashboardError::AccessDenied(project_id));
        }

        let backend = self.backend.clone();
        let key = CacheKey::project(project_id.clone());
        let data = self
            .projects
            .get(key, move || async move {
                backend.fetch_employee_data(&project_id).await
            })
            .await?;
        Ok(data)
    }

    /// A project's submissions for `date`. No rows is a valid answer.
    pub async fn work_table(&self, project: &str, date: NaiveDate) -> Result<WorkTable> {
        let data = self.load_project(project).await?;
        let project_id = canonical_id(project);
        let rows: Vec<ReelRecord> = data.records_for(date).into_iter().cloned().collect();
        debug!(project_id = %project_id, %date, rows = rows.len(), "Resolved work table");

        let project_name = match self.user.as_ref() {
            Some(user) if user.project_map.contains_key(&project_id) => {
                user.project_tab(&project_id).to_string()
            }
            _ if !data.sheet_name.is_empty() => data.sheet_name.clone(),
            _ => project_id.clone(),
        };

        Ok(WorkTable {
            project_id,
            project_name,
            date,
            display_date: display_date(date),
            rows,
        })
    }

    /// Day to open a project on: its newest submission, else today.
    pub async fn default_work_date(&self, project: &str) -> Result<NaiveDate> {
        let data = self.load_project(project).await?;
        Ok(data
            .latest_date()
            .unwrap_or_else(|| Local::now().date_naive()))
    }

    /// How long ago a project was fetched, if it is cached.
    pub fn project_age(&self, project: &str) -> Option<String> {
        self.projects.entry_age(&CacheKey::project(canonical_id(project)))
    }

    // ===== Employee dashboard =====

    pub async fn employee_dashboard(
        &self,
        email: &str,
        date: NaiveDate,
    ) -> Result<Arc<EmployeeDashboard>> {
        self.require_user()?;
        let backend = self.backend.clone();
        let key = CacheKey::dashboard(email, date);
        let email = email.trim().to_string();
        let dashboard = self
            .dashboards
            .get(key, move || async move {
                backend.get_employee_dashboard_data(&email, date).await
            })
            .await?;
        Ok(dashboard)
    }

    // ===== Monthly summary =====

    /// Every member's month, each carrying the month's clip target.
    pub async fn monthly_summary(&self, year: i32, month: u32) -> Result<Arc<Vec<MemberSummary>>> {
        self.require_user()?;
        let backend = self.backend.clone();
        let summary = self
            .summaries
            .get(CacheKey::monthly_summary(year, month), move || async move {
                let mut members = backend.fetch_monthly_summary(year, month).await?;
                let target = monthly_target(year, month);
                for member in &mut members {
                    member.monthly_target = target;
                }
                Ok::<_, ApiError>(members)
            })
            .await?;
        Ok(summary)
    }

    /// One member's month.
    ///
    /// When the cached month lacks the member (they may have started
    /// submitting after it was fetched), the month is fetched once more
    /// before giving up.
    pub async fn member_summary(
        &self,
        name: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<MemberSummary>> {
        let key = CacheKey::monthly_summary(year, month);
        if let Some(cached) = self.summaries.peek(&key) {
            if let Some(member) = find_member(&cached, name) {
                return Ok(Some(member.clone()));
            }
            debug!(name, key = %key, "Member missing from cached summary, refetching");
            self.summaries.invalidate(&key);
        }

        let summary = self.monthly_summary(year, month).await?;
        Ok(find_member(&summary, name).cloned())
    }

    // ===== Staff =====

    pub async fn staffs(&self) -> Result<Arc<Vec<Staff>>> {
        self.require_user()?;
        let backend = self.backend.clone();
        let staffs = self
            .staffs
            .get(CacheKey::Staffs, move || async move {
                backend.fetch_staffs_data().await
            })
            .await?;
        Ok(staffs)
    }

    pub async fn search_staffs(&self, term: &str) -> Result<Vec<Staff>> {
        let staffs = self.staffs().await?;
        Ok(search_staffs(&staffs, term).into_iter().cloned().collect())
    }

    /// Write one cell of a staff row. The cached directory is dropped so the
    /// next read shows the change.
    pub async fn update_staff_info(&self, staff_id: &str, column: &str, value: &str) -> Result<()> {
        self.require_user()?;
        let (staff_id, column) = (staff_id.trim(), column.trim());
        if staff_id.is_empty() || column.is_empty() {
            return Err(DashboardError::InvalidInput(
                "Staff ID and column are required".to_string(),
            ));
        }

        self.backend.update_staff_info(staff_id, column, value).await?;
        self.staffs.invalidate(&CacheKey::Staffs);
        info!(staff_id, column, "Staff info updated");
        Ok(())
    }

    // ===== Leaves =====

    /// Every staff member's status on `date` next to their month totals,
    /// built from the cached staff directory and the cached month.
    pub async fn leaves_list(&self, date: NaiveDate) -> Result<Vec<LeaveRow>> {
        let (year, month) = (date.year(), date.month());
        let (staffs, summary) = futures::try_join!(self.staffs(), self.monthly_summary(year, month))?;
        Ok(build_leaves_list(&staffs, &summary, year, month, date.day()))
    }

    // ===== Profile =====

    pub async fn profile(&self) -> Result<Profile> {
        self.require_user()?;
        Ok(self.backend.get_profile_data().await?)
    }

    pub async fn update_profile_name(&self, new_name: &str) -> Result<()> {
        self.require_user()?;
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(DashboardError::InvalidInput("Name must not be blank".to_string()));
        }
        self.backend.update_profile_name(new_name).await?;
        // The name lives in the staff sheet
        self.staffs.invalidate(&CacheKey::Staffs);
        Ok(())
    }

    pub async fn update_profile_avatar(&self, new_avatar_url: &str) -> Result<()> {
        self.require_user()?;
        let new_avatar_url = new_avatar_url.trim();
        if new_avatar_url.is_empty() {
            return Err(DashboardError::InvalidInput("Avatar URL must not be blank".to_string()));
        }
        self.backend.update_profile_avatar(new_avatar_url).await?;
        self.staffs.invalidate(&CacheKey::Staffs);
        Ok(())
    }

    /// Every tab of the spreadsheet. Not cached; tabs are added by hand.
    pub async fn tab_names(&self) -> Result<Vec<String>> {
        self.require_user()?;
        Ok(self.backend.fetch_all_tab_names().await?)
    }

    // ===== Reload =====

    /// Forget everything cached. The caller re-requests what its view shows.
    pub fn reload(&self) {
        self.projects.invalidate_all();
        self.dashboards.invalidate_all();
        self.summaries.invalidate_all();
        self.staffs.invalidate_all();
        debug!("All dashboard caches cleared");
    }
}

// ============================================================================
// Tests
// ============================================================================
