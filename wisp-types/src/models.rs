use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{MoodKind, ReminderKind, ReportStatus, ReportTarget, UserRole};

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{self, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(
            date: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(d) => serializer.serialize_str(&d.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s: Option<String> = Option::deserialize(deserializer)?;
            match s {
                Some(s) if !s.is_empty() => s
                    .parse::<DateTime<Utc>>()
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_banned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Filled in client-side from the thread-count endpoint; `None` means the
    /// count could not be fetched and renders as "N/A".
    #[serde(default)]
    pub thread_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub thread_id: i64,
    pub topic_id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub user_liked: bool,
    #[serde(default)]
    pub comments_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: i64,
    pub thread_id: i64,
    /// One level of reply nesting; a set parent only indents the comment.
    #[serde(default)]
    pub parent_comment_id: Option<i64>,
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "datetime_format::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub user_liked: bool,
}

impl Comment {
    pub fn is_edited(&self) -> bool {
        match self.updated_at {
            Some(updated) => updated != self.created_at,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub report_id: i64,
    #[serde(default)]
    pub thread_id: Option<i64>,
    #[serde(default)]
    pub comment_id: Option<i64>,
    pub reason: String,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default)]
    pub reporter_name: Option<String>,
    #[serde(default, with = "datetime_format::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn target(&self) -> Option<ReportTarget> {
        match (self.thread_id, self.comment_id) {
            (Some(id), _) => Some(ReportTarget::Thread(id)),
            (None, Some(id)) => Some(ReportTarget::Comment(id)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub mood: MoodKind,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "datetime_format::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: i64,
    pub mood: MoodKind,
    pub note: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

/// Aggregated mood counts served to the admin panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodSummary {
    pub mood: MoodKind,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    pub title: String,
    /// "HH:MM", 24-hour clock.
    pub time: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemindersResponse {
    #[serde(default)]
    pub mindfulness: Vec<Reminder>,
    #[serde(default)]
    pub water: Vec<Reminder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicThreadCount {
    pub topic_id: i64,
    pub thread_count: i64,
}

// Request/Response types for API

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateThreadRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_comment_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReportRequest {
    pub reason: String,
    pub thread_id: Option<i64>,
    pub comment_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveReportRequest {
    pub status: ReportStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateJournalRequest {
    pub title: String,
    pub content: String,
    pub mood: MoodKind,
    pub category_id: Option<i64>,
    pub is_locked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnlockJournalRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMoodRequest {
    pub mood: MoodKind,
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReminderRequest {
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    pub title: String,
    pub time: String,
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateReminderRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BanStatusRequest {
    pub is_banned: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
}
