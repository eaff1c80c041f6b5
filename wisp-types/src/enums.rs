use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(UserRole::User),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MoodKind {
    Happy,
    #[default]
    Neutral,
    Anxious,
    Sad,
}

impl MoodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodKind::Happy => "happy",
            MoodKind::Neutral => "neutral",
            MoodKind::Anxious => "anxious",
            MoodKind::Sad => "sad",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "happy" => Some(MoodKind::Happy),
            "neutral" => Some(MoodKind::Neutral),
            "anxious" => Some(MoodKind::Anxious),
            "sad" => Some(MoodKind::Sad),
            _ => None,
        }
    }

    /// Map a 1-10 mood level onto a mood kind.
    pub fn from_level(level: u8) -> Self {
        match level {
            7..=u8::MAX => MoodKind::Happy,
            5..=6 => MoodKind::Neutral,
            3..=4 => MoodKind::Anxious,
            _ => MoodKind::Sad,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Mindfulness,
    Water,
}

impl ReminderKind {
    /// URL path segment for the reminders endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Mindfulness => "mindfulness",
            ReminderKind::Water => "water",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mindfulness" => Some(ReminderKind::Mindfulness),
            "water" => Some(ReminderKind::Water),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ReportStatus::Pending),
            "resolved" => Some(ReportStatus::Resolved),
            "rejected" => Some(ReportStatus::Rejected),
            _ => None,
        }
    }
}

/// What a report points at. The wire format is a pair of nullable ids
/// (`thread_id`/`comment_id`); this is the client-side view of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTarget {
    Thread(i64),
    Comment(i64),
}

impl ReportTarget {
    pub fn id(&self) -> i64 {
        match self {
            ReportTarget::Thread(id) | ReportTarget::Comment(id) => *id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportTarget::Thread(_) => "thread",
            ReportTarget::Comment(_) => "comment",
        }
    }
}
