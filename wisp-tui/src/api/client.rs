use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult};
use wisp_types::*;

/// How long a single request may take before it degrades into an ordinary
/// retryable error instead of leaving the UI loading forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API client for communicating with the WISP server
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.into(),
            bearer_token: None,
        }
    }

    /// Set the bearer token for authenticated requests
    pub fn set_bearer_token(&mut self, token: Option<String>) {
        self.bearer_token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Helper to add the Authorization header if a token is present
    fn add_auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.bearer_token {
            req.bearer_auth(token)
        } else {
            req
        }
    }

    /// Turn a non-success response into the matching error variant
    async fn error_for_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        // Prefer the server's {"message": ...} body when it parses
        let clean_error = match serde_json::from_str::<ErrorResponse>(&error_text) {
            Ok(body) => body.message,
            Err(_) if error_text.contains("<html>") || error_text.contains("<!DOCTYPE") => {
                // HTML error pages (e.g. from a reverse proxy) are useless verbatim
                format!(
                    "Server returned {} error. Please check the server URL.",
                    status.as_u16()
                )
            }
            Err(_) => error_text,
        };

        match status.as_u16() {
            401 => ApiError::Unauthorized(clean_error),
            403 => ApiError::Forbidden(clean_error),
            404 => ApiError::NotFound(clean_error),
            400 => ApiError::BadRequest(clean_error),
            _ => ApiError::Api(clean_error),
        }
    }

    /// Helper to handle API responses carrying a single JSON object
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.error_for_response(response).await)
        }
    }

    /// Helper for endpoints that must return a JSON array.
    ///
    /// The server has been observed returning objects where lists are
    /// expected; that surfaces as `ApiError::Shape` here so callers can fall
    /// back to an empty list instead of crashing mid-render.
    async fn handle_list_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ApiResult<Vec<T>> {
        if !response.status().is_success() {
            return Err(self.error_for_response(response).await);
        }
        let value: serde_json::Value = response.json().await?;
        if !value.is_array() {
            return Err(ApiError::Shape(format!(
                "expected an array, got {}",
                json_kind(&value)
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    // Authentication endpoints

    /// Login with email and password
    pub async fn login(&mut self, email: String, password: String) -> ApiResult<AuthResponse> {
        let url = format!("{}/auth/login", self.base_url);
        let request = LoginRequest { email, password };
        let response = self.client.post(&url).json(&request).send().await?;
        let auth: AuthResponse = self.handle_response(response).await?;

        // Keep the token for subsequent requests
        self.bearer_token = Some(auth.token.clone());

        Ok(auth)
    }

    /// Register a new account
    pub async fn register(&mut self, request: RegisterRequest) -> ApiResult<AuthResponse> {
        let url = format!("{}/auth/register", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;
        let auth: AuthResponse = self.handle_response(response).await?;

        self.bearer_token = Some(auth.token.clone());

        Ok(auth)
    }

    // Community endpoints

    /// Get the list of discussion topics
    pub async fn get_topics(&self) -> ApiResult<Vec<Topic>> {
        let url = format!("{}/community/topics", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_list_response(response).await
    }

    /// Get per-topic thread counts (best-effort enrichment of the topic list)
    pub async fn get_topic_thread_counts(&self) -> ApiResult<Vec<TopicThreadCount>> {
        let url = format!("{}/community/topic-thread-counts", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_list_response(response).await
    }

    /// Get the threads in a topic
    pub async fn get_threads(&self, topic_id: i64) -> ApiResult<Vec<Thread>> {
        let url = format!("{}/community/topics/{}/threads", self.base_url, topic_id);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_list_response(response).await
    }

    /// Get a single thread by ID
    pub async fn get_thread(&self, thread_id: i64) -> ApiResult<Thread> {
        let url = format!("{}/community/threads/{}", self.base_url, thread_id);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Get the comments of a thread
    pub async fn get_comments(&self, thread_id: i64) -> ApiResult<Vec<Comment>> {
        let url = format!("{}/community/threads/{}/comments", self.base_url, thread_id);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_list_response(response).await
    }

    /// Create a new thread in a topic
    pub async fn create_thread(
        &self,
        topic_id: i64,
        title: String,
        content: String,
    ) -> ApiResult<Thread> {
        let url = format!("{}/community/topics/{}/threads", self.base_url, topic_id);
        let request = CreateThreadRequest { title, content };
        let req = self.add_auth_header(self.client.post(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Toggle the like on a thread (no response body required)
    pub async fn like_thread(&self, thread_id: i64) -> ApiResult<()> {
        let url = format!("{}/community/threads/{}/like", self.base_url, thread_id);
        let req = self.add_auth_header(self.client.post(&url));
        let response = req.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for_response(response).await)
        }
    }

    /// Toggle the like on a comment (no response body required)
    pub async fn like_comment(&self, comment_id: i64) -> ApiResult<()> {
        let url = format!("{}/community/comments/{}/like", self.base_url, comment_id);
        let req = self.add_auth_header(self.client.post(&url));
        let response = req.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for_response(response).await)
        }
    }

    /// Post a comment (optionally replying to another comment)
    pub async fn create_comment(
        &self,
        thread_id: i64,
        content: String,
        parent_comment_id: Option<i64>,
    ) -> ApiResult<Comment> {
        let url = format!("{}/community/threads/{}/comments", self.base_url, thread_id);
        let request = CreateCommentRequest {
            content,
            parent_comment_id,
        };
        let req = self.add_auth_header(self.client.post(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Update a comment's content
    pub async fn update_comment(&self, comment_id: i64, content: String) -> ApiResult<Comment> {
        let url = format!("{}/community/comments/{}", self.base_url, comment_id);
        let request = UpdateCommentRequest { content };
        let req = self.add_auth_header(self.client.put(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Delete a comment
    pub async fn delete_comment(&self, comment_id: i64) -> ApiResult<()> {
        let url = format!("{}/community/comments/{}", self.base_url, comment_id);
        let req = self.add_auth_header(self.client.delete(&url));
        let response = req.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for_response(response).await)
        }
    }

    /// Delete a thread (moderation)
    pub async fn delete_thread(&self, thread_id: i64) -> ApiResult<()> {
        let url = format!("{}/community/threads/{}", self.base_url, thread_id);
        let req = self.add_auth_header(self.client.delete(&url));
        let response = req.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for_response(response).await)
        }
    }

    /// Report a thread or comment
    pub async fn create_report(&self, target: ReportTarget, reason: String) -> ApiResult<()> {
        let url = format!("{}/community/reports", self.base_url);
        let request = CreateReportRequest {
            reason,
            thread_id: match target {
                ReportTarget::Thread(id) => Some(id),
                ReportTarget::Comment(_) => None,
            },
            comment_id: match target {
                ReportTarget::Comment(id) => Some(id),
                ReportTarget::Thread(_) => None,
            },
        };
        let req = self.add_auth_header(self.client.post(&url).json(&request));
        let response = req.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for_response(response).await)
        }
    }

    /// List reports filtered by status (admin)
    pub async fn get_reports(&self, status: ReportStatus) -> ApiResult<Vec<Report>> {
        let url = format!(
            "{}/community/reports?status={}",
            self.base_url,
            status.as_str()
        );
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_list_response(response).await
    }

    /// Resolve or reject a report (admin)
    pub async fn resolve_report(&self, report_id: i64, status: ReportStatus) -> ApiResult<()> {
        let url = format!("{}/community/reports/{}", self.base_url, report_id);
        let request = ResolveReportRequest { status };
        let req = self.add_auth_header(self.client.patch(&url).json(&request));
        let response = req.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for_response(response).await)
        }
    }

    // Journal endpoints

    /// Get all journal entries for the current user
    pub async fn get_journal_entries(&self) -> ApiResult<Vec<JournalEntry>> {
        let url = format!("{}/journal/entries", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_list_response(response).await
    }

    /// Get the journal categories
    pub async fn get_journal_categories(&self) -> ApiResult<Vec<JournalCategory>> {
        let url = format!("{}/journal/categories", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_list_response(response).await
    }

    /// Create a journal entry
    pub async fn create_journal_entry(
        &self,
        request: CreateJournalRequest,
    ) -> ApiResult<JournalEntry> {
        let url = format!("{}/journal/entries", self.base_url);
        let req = self.add_auth_header(self.client.post(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Update a journal entry
    pub async fn update_journal_entry(
        &self,
        entry_id: i64,
        request: CreateJournalRequest,
    ) -> ApiResult<JournalEntry> {
        let url = format!("{}/journal/entries/{}", self.base_url, entry_id);
        let req = self.add_auth_header(self.client.put(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Unlock a locked journal entry with the journal password
    pub async fn unlock_journal_entry(
        &self,
        entry_id: i64,
        password: String,
    ) -> ApiResult<JournalEntry> {
        let url = format!("{}/journal/entries/{}/unlock", self.base_url, entry_id);
        let request = UnlockJournalRequest { password };
        let req = self.add_auth_header(self.client.post(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    // Mood endpoints

    /// Get mood history for the current user
    pub async fn get_moods(&self) -> ApiResult<Vec<MoodEntry>> {
        let url = format!("{}/moods", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_list_response(response).await
    }

    /// Record a mood entry
    pub async fn create_mood(&self, mood: MoodKind, note: String) -> ApiResult<MoodEntry> {
        let url = format!("{}/moods", self.base_url);
        let request = CreateMoodRequest { mood, note };
        let req = self.add_auth_header(self.client.post(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Get aggregated mood counts (admin)
    pub async fn get_mood_summary(&self) -> ApiResult<Vec<MoodSummary>> {
        let url = format!("{}/moods/summary", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_list_response(response).await
    }

    // Reminder endpoints

    /// Get all reminders, grouped by kind
    pub async fn get_reminders(&self) -> ApiResult<RemindersResponse> {
        let url = format!("{}/reminders", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Create a reminder
    pub async fn create_reminder(&self, request: CreateReminderRequest) -> ApiResult<Reminder> {
        let url = format!("{}/reminders", self.base_url);
        let req = self.add_auth_header(self.client.post(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Enable or disable a reminder
    pub async fn set_reminder_enabled(
        &self,
        kind: ReminderKind,
        reminder_id: i64,
        enabled: bool,
    ) -> ApiResult<()> {
        let url = format!(
            "{}/reminders/{}/{}",
            self.base_url,
            kind.as_str(),
            reminder_id
        );
        let request = UpdateReminderRequest { enabled };
        let req = self.add_auth_header(self.client.patch(&url).json(&request));
        let response = req.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for_response(response).await)
        }
    }

    /// Delete a reminder
    pub async fn delete_reminder(&self, kind: ReminderKind, reminder_id: i64) -> ApiResult<()> {
        let url = format!(
            "{}/reminders/{}/{}",
            self.base_url,
            kind.as_str(),
            reminder_id
        );
        let req = self.add_auth_header(self.client.delete(&url));
        let response = req.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for_response(response).await)
        }
    }

    // Admin endpoints

    /// List all users (admin)
    pub async fn get_users(&self) -> ApiResult<Vec<User>> {
        let url = format!("{}/users/list", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_list_response(response).await
    }

    /// Set a user's ban status (admin)
    pub async fn set_ban_status(&self, user_id: i64, is_banned: bool) -> ApiResult<()> {
        let url = format!("{}/users/{}/ban-status", self.base_url, user_id);
        let request = BanStatusRequest { is_banned };
        let req = self.add_auth_header(self.client.put(&url).json(&request));
        let response = req.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for_response(response).await)
        }
    }

    /// Delete a user account (admin)
    pub async fn delete_user(&self, user_id: i64) -> ApiResult<()> {
        let url = format!("{}/users/{}", self.base_url, user_id);
        let req = self.add_auth_header(self.client.delete(&url));
        let response = req.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for_response(response).await)
        }
    }

    // Misc endpoints

    /// Get the daily quotes pool (best-effort, used for the home greeting)
    pub async fn get_quotes(&self) -> ApiResult<Vec<Quote>> {
        let url = format!("{}/quotes", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_list_response(response).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        let base_url = std::env::var("WISP_SERVER_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string());
        Self::new(base_url)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
