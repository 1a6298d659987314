use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::contains_ignore_case;

/// One row of the `Staffs` sheet.
///
/// Only the columns the client reads are typed; the rest are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Staff {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "E-Mail", default)]
    pub email: String,
    #[serde(rename = "Project Name", default)]
    pub project_name: String,
    #[serde(rename = "Role", default)]
    pub role: String,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Staff {
    /// Whether a flag column such as `FB` or `IG` is switched on.
    /// The sheet writes `1`; checkbox columns export `TRUE`.
    pub fn has_flag(&self, column: &str) -> bool {
        match self.extra.get(column) {
            Some(Value::String(s)) => {
                let s = s.trim();
                s == "1" || s.eq_ignore_ascii_case("true")
            }
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            Some(Value::Bool(b)) => *b,
            _ => false,
        }
    }

    pub fn matches(&self, term: &str) -> bool {
        contains_ignore_case(&self.name, term)
            || contains_ignore_case(&self.email, term)
            || contains_ignore_case(&self.project_name, term)
    }
}

/// Staff whose name, email or project contains `term`, ignoring case.
/// A blank term matches everyone.
pub fn search_staffs<'a>(staffs: &'a [Staff], term: &str) -> Vec<&'a Staff> {
    let term = term.trim();
    staffs.iter().filter(|s| s.matches(term)).collect()
}
