use crate::coach::CoachMessage;
use crate::views::{NavItem, Screen};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

pub const BOOTSTRAP_ID: &str = "system-root";
pub const DEFAULT_TARGET_WEIGHT: f64 = 75.0;
pub const DEFAULT_AVATAR: &str =
    "https://images.unsplash.com/photo-1599566150163-29194dcaad36?auto=format&fit=crop&q=80&w=200";
const ROOT_AVATAR: &str =
    "https://images.unsplash.com/photo-1633332755192-727a05c4013d?auto=format&fit=crop&q=80&w=200";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub name: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    #[serde(default = "default_target_weight")]
    pub target_weight: f64,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub logs: Vec<HealthLogEntry>,
    #[serde(default)]
    pub videos: Vec<VideoEntry>,
}

impl Account {
    /// The administrator seeded on first run.
    pub fn bootstrap() -> Self {
        Self {
            id: BOOTSTRAP_ID.to_string(),
            username: "admin".to_string(),
            password: "password".to_string(),
            name: "SYSTEM ROOT".to_string(),
            avatar: ROOT_AVATAR.to_string(),
            target_weight: 80.0,
            preferences: vec!["Control".to_string()],
            role: Role::Admin,
            logs: Vec::new(),
            videos: Vec::new(),
        }
    }

    pub fn is_bootstrap(&self) -> bool {
        self.id == BOOTSTRAP_ID
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

fn default_target_weight() -> f64 {
    DEFAULT_TARGET_WEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthLogEntry {
    pub date: NaiveDate,
    pub steps: u32,
    pub calories: u32,
    /// Millilitres.
    pub water_intake: u32,
    pub sleep_hours: f64,
    /// Kilograms.
    pub weight: f64,
    pub heart_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMessage {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
    /// Milliseconds since the unix epoch.
    pub timestamp: i64,
    pub code: String,
}

/// Hands out time-based identifiers that stay strictly increasing within the process.
#[derive(Debug, Default)]
pub struct IdSource {
    last: AtomicI64,
}

impl IdSource {
    pub fn next_id(&self) -> String {
        self.next_at(Utc::now().timestamp_millis()).to_string()
    }

    fn next_at(&self, now_millis: i64) -> i64 {
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now_millis.max(last + 1);
            match self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(current) => last = current,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub name: String,
}

/// Fields an account may change about itself. Absent fields are left as they are.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub target_weight: Option<f64>,
    pub preferences: Option<Vec<String>>,
}

/// Fields an administrator may change on any account. Username and password are not among them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEdit {
    pub name: Option<String>,
    pub target_weight: Option<f64>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelQuery {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
    pub target: f64,
    /// Share of the target reached, clamped to 100.
    pub progress: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub steps: u32,
    pub water_intake: u32,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub name: String,
    pub cards: Vec<StatCard>,
    pub trends: Vec<TrendPoint>,
    pub target_weight: f64,
    /// Latest weight minus target, once a weight has been logged.
    pub weight_gap: Option<f64>,
    pub draft: crate::journal::HealthLogDraft,
}

/// An account as shown to clients: no password.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub username: String,
    pub name: String,
    pub avatar: String,
    pub target_weight: f64,
    pub preferences: Vec<String>,
    pub role: Role,
    pub log_count: usize,
    pub video_count: usize,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            username: account.username.clone(),
            name: account.name.clone(),
            avatar: account.avatar.clone(),
            target_weight: account.target_weight,
            preferences: account.preferences.clone(),
            role: account.role,
            log_count: account.logs.len(),
            video_count: account.videos.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub account: Option<AccountView>,
    #[serde(flatten)]
    pub screen: Screen,
    pub nav: Vec<NavItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub accounts: Vec<AccountView>,
    pub total_accounts: usize,
    pub total_logs: usize,
}

#[derive(Debug, Serialize)]
pub struct CoachResponse {
    pub pending: bool,
    pub transcript: Vec<CoachMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}
