use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeEntry {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub role: Option<String>,
}

fn default_color() -> String {
    "#2563eb".to_string()
}

impl EmployeeEntry {
    /// Display name, falling back to the legal name when unset or blank.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.full_name)
    }

    pub fn initials(&self) -> String {
        self.full_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}
