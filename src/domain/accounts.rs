use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// Modules granted with every new demo; the backend owns the catalogue.
pub const DEFAULT_MODULES: [&str; 2] = ["blog", "localseo"];

// The serialization within this layer is a dependency leak, but its a pragmatic approach.
// Demo account as reported by the admin API. `email` is the stable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoAccount {
    pub email: String,
    // Some backends emit numeric ids.
    #[serde(deserialize_with = "string_or_number")]
    pub account_id: String,
    #[serde(default)]
    pub modules: Vec<ModuleGrant>,
    #[serde(deserialize_with = "utc_timestamp")]
    pub granted_at: DateTime<Utc>,
    #[serde(deserialize_with = "utc_timestamp")]
    pub trial_ends_at: DateTime<Utc>,
    // Computed by the backend; never derived locally.
    pub expired: bool,
}

impl DemoAccount {
    // Whole days until the trial ends, or None once the backend marks it expired.
    pub fn days_left(&self, now: DateTime<Utc>) -> Option<i64> {
        if self.expired {
            return None;
        }
        Some((self.trial_ends_at - now).num_days().max(0))
    }
}

// One product module attached to a demo account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleGrant {
    pub module: String,
    pub status: String,
    #[serde(default)]
    pub expired: bool,
}

// Active/total counters shown above the account table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountSummary {
    pub active: usize,
    pub total: usize,
}

impl AccountSummary {
    pub fn of(accounts: &[DemoAccount]) -> Self {
        Self {
            active: accounts.iter().filter(|account| !account.expired).count(),
            total: accounts.len(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "account_id must be a string or number, got {other}"
        ))),
    }
}

// Accepts RFC 3339 as well as offset-less ISO-8601, which is read as UTC.
fn utc_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_utc_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid timestamp: {raw}"))
    })
}

pub(crate) fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
