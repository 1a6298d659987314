//! The signed-in user as returned by `login`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Where a project id points. Older backends sent the tab name alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(untagged)]
pub enum ProjectRef {
    Tab(String),
    Detailed {
        tab: String,
        #[serde(default)]
        owner: Option<String>,
    },
}

impl ProjectRef {
    pub fn tab(&self) -> &str {
        match self {
            ProjectRef::Tab(tab) => tab,
            ProjectRef::Detailed { tab, .. } => tab,
        }
    }

    pub fn owner(&self) -> Option<&str> {
        match self {
            ProjectRef::Tab(_) => None,
            ProjectRef::Detailed { owner, .. } => owner.as_deref(),
        }
    }
}

/// Payload of `get_profile_data`: the signed-in user's `Staffs` row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CurrentUser {
    #[serde(rename = "E-Mail")]
    pub email: String,
    #[serde(rename = "Role", default)]
    pub role: String,
    /// Canonical project ids this user may open.
    #[serde(rename = "AllowedProjects", default)]
    pub allowed_projects: Vec<String>,
    #[serde(rename = "ProjectMap", default)]
    pub project_map: HashMap<String, ProjectRef>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }

    pub fn can_access(&self, project_id: &str) -> bool {
        self.is_admin() || self.allowed_projects.iter().any(|p| p == project_id)
    }

    /// Sheet tab name for a project, falling back to the id itself.
    pub fn project_tab<'a>(&'a self, project_id: &'a str) -> &'a str {
        self.project_map
            .get(project_id)
            .map(ProjectRef::tab)
            .unwrap_or(project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> CurrentUser {
        serde_json::from_value(serde_json::json!({
            "E-Mail": "somchai@rcp.co",
            "Role": role,
            "AllowedProjects": ["project_q"],
            "ProjectMap": {
                "project_q": { "tab": "Project Q", "owner": "somchai@rcp.co" },
                "legacy": "Legacy Tab"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_project_map_accepts_both_shapes() {
        let u = user("User");
        assert_eq!(u.project_tab("project_q"), "Project Q");
        assert_eq!(u.project_tab("legacy"), "Legacy Tab");
        assert_eq!(u.project_tab("unknown"), "unknown");
        assert_eq!(u.project_map["project_q"].owner(), Some("somchai@rcp.co"));
        assert_eq!(u.project_map["legacy"].owner(), None);
    }

    #[test]
    fn test_parse_profile() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "name": "Somchai",
            "email": "somchai@rcp.co",
            "role": "User",
            "avatar_url": "img/profile_pics/cat.png"
        }))
        .unwrap();
        assert_eq!(profile.avatar_url, "img/profile_pics/cat.png");
        assert_eq!(serde_json::from_str::<Profile>("{}").unwrap(), Profile::default());
    }

    #[test]
    fn test_can_access() {
        let u = user("User");
        assert!(u.can_access("project_q"));
        assert!(!u.can_access("legacy"));

        let admin = user("ADMIN");
        assert!(admin.is_admin());
        assert!(admin.can_access("anything"));
    }
}
