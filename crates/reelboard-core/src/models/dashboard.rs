use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of `get_employee_dashboard_data`.
///
/// Card contents are defined by the backend and rendered as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct EmployeeDashboard {
    #[serde(default)]
    pub kpi_cards: Value,
    #[serde(default)]
    pub page_cards: Value,
}

impl EmployeeDashboard {
    /// Number of page cards, when the backend sent a list.
    pub fn page_count(&self) -> usize {
        self.page_cards.as_array().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_payload() {
        let dash: EmployeeDashboard = serde_json::from_value(serde_json::json!({
            "kpi_cards": { "clips": 4, "views": 1200 },
            "page_cards": [{ "name": "Cats Daily" }, { "name": "Dog Clips" }]
        }))
        .unwrap();
        assert_eq!(dash.kpi_cards["views"], 1200);
        assert_eq!(dash.page_count(), 2);
    }

    #[test]
    fn test_missing_cards_default_to_null() {
        let dash: EmployeeDashboard = serde_json::from_str("{}").unwrap();
        assert!(dash.kpi_cards.is_null());
        assert_eq!(dash.page_count(), 0);
    }
}
