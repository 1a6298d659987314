//! HTTP client for the backend bridge.
//!
//! Every backend method is a `POST {base_url}/api/{method}` with a JSON
//! argument object. The bridge answers with a tagged envelope:
//! `{"status": "ok", "payload": ...}` or `{"status": "error", "message": ...}`.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::models::{CurrentUser, EmployeeDashboard, MemberSummary, Profile, ProjectData, Staff};

use super::{ApiError, Backend};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// Sheet reads on the bridge side can take several seconds for large tabs.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Envelope<T> {
    Ok {
        payload: T,
    },
    Error {
        #[serde(default)]
        message: String,
    },
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<T, ApiError> {
        match self {
            Envelope::Ok { payload } => Ok(payload),
            Envelope::Error { message } => Err(ApiError::Backend(message)),
        }
    }
}

/// Decode a bridge response body for `method`.
fn parse_envelope<T: DeserializeOwned>(method: &str, body: &str) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| {
        ApiError::InvalidResponse(format!("Failed to parse {} response: {}", method, e))
    })?;
    envelope.into_result()
}

/// Client for the backend bridge.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/api/{}", self.base_url, method)
    }

    /// Call a bridge method, retrying with exponential backoff while rate limited.
    async fn call<T: DeserializeOwned, A: Serialize>(&self, method: &str, args: &A) -> Result<T, ApiError> {
        let url = self.method_url(method);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            debug!(method, "Calling backend");
            let response = self
                .client
                .post(&url)
                .header(header::ACCEPT, "application/json")
                .json(args)
                .send()
                .await?;

            let status = response.status();
            if status.as_u16() == 429 {
                retries += 1;
                if retries > MAX_RATE_LIMIT_RETRIES {
                    return Err(ApiError::RateLimited);
                }
                warn!(method, retry = retries, backoff_ms, "Rate limited, backing off");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2;
                continue;
            }

            let body = response.text().await?;
            if !status.is_success() {
                return Err(ApiError::from_status(status, &body));
            }
            return parse_envelope(method, &body);
        }
    }

    /// Call a method whose ok envelope carries no payload worth keeping.
    async fn call_unit<A: Serialize>(&self, method: &str, args: &A) -> Result<(), ApiError> {
        let _: Option<serde_json::Value> = self.call(method, args).await?;
        Ok(())
    }
}

impl Backend for ApiClient {
    async fn login(&self, email: &str, remember: bool) -> Result<CurrentUser, ApiError> {
        self.call("login", &json!({ "email": email, "remember": remember }))
            .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.call_unit("logout", &json!({})).await
    }

    async fn fetch_employee_data(&self, project_id: &str) -> Result<ProjectData, ApiError> {
        let data: ProjectData = self
            .call("fetch_employee_data", &json!({ "project_id": project_id }))
            .await?;
        debug!(project_id, reels = data.reels.len(), "Fetched project data");
        Ok(data)
    }

    async fn get_employee_dashboard_data(
        &self,
        email: &str,
        date: NaiveDate,
    ) -> Result<EmployeeDashboard, ApiError> {
        let date_str = date.format("%Y-%m-%d").to_string();
        self.call(
            "get_employee_dashboard_data",
            &json!({ "email": email, "date_str": date_str }),
        )
        .await
    }

    async fn fetch_monthly_summary(&self, year: i32, month: u32) -> Result<Vec<MemberSummary>, ApiError> {
        self.call("fetch_monthly_summary", &json!({ "year": year, "month": month }))
            .await
    }

    async fn fetch_staffs_data(&self) -> Result<Vec<Staff>, ApiError> {
        self.call("fetch_staffs_data", &json!({})).await
    }

    async fn update_staff_info(&self, staff_id: &str, column: &str, value: &str) -> Result<(), ApiError> {
        debug!(staff_id, column, "Updating staff info");
        self.call_unit(
            "update_staff_info",
            &json!({ "staff_id": staff_id, "column_name": column, "new_value": value }),
        )
        .await
    }

    async fn fetch_all_tab_names(&self) -> Result<Vec<String>, ApiError> {
        self.call("fetch_all_tab_names", &json!({})).await
    }

    async fn get_profile_data(&self) -> Result<Profile, ApiError> {
        self.call("get_profile_data", &json!({})).await
    }

    async fn update_profile_name(&self, new_name: &str) -> Result<(), ApiError> {
        self.call_unit("update_profile_name", &json!({ "new_name": new_name }))
            .await
    }

    async fn update_profile_avatar(&self, new_avatar_url: &str) -> Result<(), ApiError> {
        self.call_unit("update_profile_avatar", &json!({ "new_avatar_url": new_avatar_url }))
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url_trims_trailing_slash() {
        let client = ApiClient::new("http://127.0.0.1:8765/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8765");
        assert_eq!(
            client.method_url("fetch_employee_data"),
            "http://127.0.0.1:8765/api/fetch_employee_data"
        );
    }

    #[test]
    fn test_parse_ok_envelope() {
        let body = r#"{"status":"ok","payload":{"reels":[{"Date":"1/7/2025"}],"sheet_name":"Project Q"}}"#;
        let data: ProjectData = parse_envelope("fetch_employee_data", body).unwrap();
        assert_eq!(data.sheet_name, "Project Q");
        assert_eq!(data.reels.len(), 1);
    }

    #[test]
    fn test_parse_error_envelope() {
        let body = r#"{"status":"error","message":"Permission denied"}"#;
        let err = parse_envelope::<ProjectData>("fetch_employee_data", body).unwrap_err();
        assert!(matches!(err, ApiError::Backend(ref m) if m == "Permission denied"));
    }

    #[test]
    fn test_parse_error_envelope_with_payload() {
        // fetch_staffs_data sends an empty payload alongside its error message
        let body = r#"{"status":"error","payload":[],"message":"quota exceeded"}"#;
        let err = parse_envelope::<Vec<Staff>>("fetch_staffs_data", body).unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_parse_ok_without_payload() {
        let body = r#"{"status":"ok"}"#;
        let value: Option<serde_json::Value> = parse_envelope("logout", body).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_parse_write_acknowledgement() {
        // Sheet writes answer with a message and no payload
        let body = r#"{"status":"ok","message":"updated Staff ID 2"}"#;
        let value: Option<serde_json::Value> = parse_envelope("update_staff_info", body).unwrap();
        assert!(value.is_none());

        let body = r#"{"status":"error","message":"column 'Nickname' not found"}"#;
        let err = parse_envelope::<Option<serde_json::Value>>("update_staff_info", body).unwrap_err();
        assert!(matches!(err, ApiError::Backend(ref m) if m.contains("Nickname")));
    }

    #[test]
    fn test_parse_tab_names() {
        let body = r#"{"status":"ok","payload":["Staffs","Project Q","Monthly_Summary"]}"#;
        let tabs: Vec<String> = parse_envelope("fetch_all_tab_names", body).unwrap();
        assert_eq!(tabs, vec!["Staffs", "Project Q", "Monthly_Summary"]);
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_envelope::<Vec<Staff>>("fetch_staffs_data", "<html>").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));

        let err = parse_envelope::<Vec<Staff>>("fetch_staffs_data", r#"{"status":"maybe"}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_login_payload() {
        let body = r#"{"status":"ok","payload":{"E-Mail":"a@b.co","Role":"Admin","AllowedProjects":["project_q"],"ProjectMap":{"project_q":{"tab":"Project Q","owner":null}}}}"#;
        let user: CurrentUser = parse_envelope("login", body).unwrap();
        assert!(user.is_admin());
        assert_eq!(user.project_tab("project_q"), "Project Q");
    }
}
