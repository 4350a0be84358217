use serde::{Deserialize, Serialize};

/// Public profile of a business, fetched once per session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusinessProfile {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default = "default_vertical")]
    pub vertical: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_cancellation_hours")]
    pub cancellation_policy_hours: u32,
    #[serde(default = "default_true")]
    pub auto_confirm_bookings: bool,
}

fn default_vertical() -> String {
    "salon".to_string()
}

fn default_currency() -> String {
    "RON".to_string()
}

fn default_cancellation_hours() -> u32 {
    24
}

fn default_true() -> bool {
    true
}

impl BusinessProfile {
    pub fn location_line(&self) -> Option<String> {
        let parts: Vec<&str> = [self.address.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    pub fn cancellation_notice(&self) -> String {
        let hours = self.cancellation_policy_hours;
        match self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(phone) => format!(
                "To cancel or reschedule, contact us at least {hours}h in advance at {phone}."
            ),
            None => format!("To cancel or reschedule, contact us at least {hours}h in advance."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_profile_uses_policy_defaults() {
        let json = r#"{"id":1,"slug":"salon-ana","name":"Salon Ana"}"#;
        let profile: BusinessProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.cancellation_policy_hours, 24);
        assert!(profile.auto_confirm_bookings);
        assert_eq!(profile.currency, "RON");
        assert_eq!(profile.vertical, "salon");
        assert_eq!(profile.location_line(), None);
    }

    #[test]
    fn test_location_line_skips_blank_parts() {
        let json = r#"{"id":1,"slug":"s","name":"S","address":"Str. Lunga 4","city":"  "}"#;
        let profile: BusinessProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.location_line().as_deref(), Some("Str. Lunga 4"));
    }

    #[test]
    fn test_cancellation_notice_mentions_phone() {
        let json = r#"{"id":1,"slug":"s","name":"S","phone":"0722000111","cancellation_policy_hours":12}"#;
        let profile: BusinessProfile = serde_json::from_str(json).unwrap();
        let notice = profile.cancellation_notice();
        assert!(notice.contains("12h"));
        assert!(notice.contains("0722000111"));
    }
}
