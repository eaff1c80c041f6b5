use anyhow::Result;
use chrono::Datelike;
use crossterm::event::KeyEvent;
use std::time::Instant;

use wisp_types::{
    Comment, CreateJournalRequest, CreateReminderRequest, MoodKind, ReminderKind, ReportStatus,
    ReportTarget, SessionContext,
};

use crate::api::{ApiClient, ApiError};
use crate::{log_api_call, log_navigation, log_optimistic};

pub mod nav;
pub mod optimistic;
pub mod state;
pub use nav::NavigationState;
pub use state::*;
pub mod handlers;

#[cfg(test)]
mod tests;

use optimistic::{LikeKey, LikeToggle};

/// How long transient notices stay on screen.
const NOTICE_DURATION: std::time::Duration = std::time::Duration::from_secs(3);

impl App {
    pub fn new() -> Self {
        let config_manager =
            crate::config::ConfigManager::new().expect("Failed to initialize config manager");

        Self {
            running: true,
            current_screen: Screen::Auth,
            api_client: ApiClient::default(),
            session: None,
            current_tab: Tab::Home,
            auth_state: AuthState {
                mode: AuthMode::Login,
                email: String::new(),
                password: String::new(),
                username: String::new(),
                full_name: String::new(),
                focused: AuthField::Email,
                loading: false,
                error: None,
            },
            home: HomeState {
                quote: None,
                pending_load: false,
                loading: false,
            },
            community: CommunityState {
                nav: NavigationState::TopicsList,
                back_stack: Vec::new(),
                epoch: 0,
                pending_load: false,
                topics: Vec::new(),
                threads: Vec::new(),
                current_topic_name: None,
                thread: None,
                comments: Vec::new(),
                topic_list_state: ratatui::widgets::ListState::default(),
                thread_list_state: ratatui::widgets::ListState::default(),
                comment_list_state: ratatui::widgets::ListState::default(),
                loading: false,
                error: None,
                notice: None,
                submitting: false,
                in_flight_likes: std::collections::HashSet::new(),
                composer: ComposerState::new(),
                new_thread: None,
                report: None,
                confirm_delete_comment: None,
            },
            journal: JournalState {
                entries: Vec::new(),
                categories: Vec::new(),
                unlocked: std::collections::HashSet::new(),
                list_state: ratatui::widgets::ListState::default(),
                loading: false,
                pending_load: false,
                error: None,
                editor: None,
                unlock: None,
                viewing: None,
            },
            mood: MoodState {
                entries: Vec::new(),
                list_state: ratatui::widgets::ListState::default(),
                loading: false,
                pending_load: false,
                error: None,
                notice: None,
                editor: None,
            },
            reminders: RemindersState {
                mindfulness: Vec::new(),
                water: Vec::new(),
                list_state: ratatui::widgets::ListState::default(),
                loading: false,
                pending_load: false,
                error: None,
                notice: None,
                form: None,
                confirm_delete: None,
            },
            admin: AdminState {
                section: AdminSection::Users,
                users: Vec::new(),
                reports: Vec::new(),
                mood_summary: Vec::new(),
                users_list_state: ratatui::widgets::ListState::default(),
                reports_list_state: ratatui::widgets::ListState::default(),
                loading: false,
                pending_load: false,
                error: None,
                notice: None,
                confirm: None,
            },
            pending_action: None,
            config_manager,
            show_help: false,
            input_mode: InputMode::Navigation,
            log_config: crate::logging::LogConfig::default(),
        }
    }

    // ========================================================================
    // SESSION
    // ========================================================================

    /// Install an authenticated session and enter the main screen.
    pub fn set_session(&mut self, ctx: SessionContext) {
        self.api_client.set_bearer_token(Some(ctx.token.clone()));
        self.session = Some(ctx);
        self.current_screen = Screen::Main;
        self.current_tab = Tab::Home;
        self.home.pending_load = true;
        self.community.pending_load = true;
    }

    /// The server said 401: the session is gone and nothing local can fix it.
    pub fn expire_session(&mut self) {
        log::warn!("Session expired, returning to login screen");
        self.reset_to_auth();
        self.auth_state.error = Some("Session expired. Please log in again.".to_string());
        // The stored session is stale as well
        if let Ok(store) = crate::session::SessionStore::new() {
            let _ = store.delete();
        }
    }

    /// User-requested logout.
    pub fn logout(&mut self) {
        if let Ok(store) = crate::session::SessionStore::new() {
            if let Err(e) = store.delete() {
                log::warn!("Failed to delete session file: {}", e);
            }
        }
        self.reset_to_auth();
    }

    fn reset_to_auth(&mut self) {
        self.api_client.set_bearer_token(None);
        self.session = None;
        self.current_screen = Screen::Auth;
        self.current_tab = Tab::Home;
        self.pending_action = None;
        self.input_mode = InputMode::Navigation;
        self.auth_state.loading = false;
        self.auth_state.error = None;
        self.auth_state.password.clear();

        // Drop everything fetched under the old session
        self.home.quote = None;
        self.community.topics.clear();
        self.community.threads.clear();
        self.community.thread = None;
        self.community.comments.clear();
        self.community.nav = NavigationState::TopicsList;
        self.community.back_stack.clear();
        self.community.epoch += 1;
        self.community.composer.reset();
        self.community.new_thread = None;
        self.community.report = None;
        self.community.in_flight_likes.clear();
        self.journal.entries.clear();
        self.journal.unlocked.clear();
        self.journal.editor = None;
        self.journal.unlock = None;
        self.mood.entries.clear();
        self.mood.editor = None;
        self.reminders.mindfulness.clear();
        self.reminders.water.clear();
        self.reminders.form = None;
        self.admin.users.clear();
        self.admin.reports.clear();
        self.admin.mood_summary.clear();
    }

    /// Route an API error: auth failures force a logout and return `None`,
    /// everything else comes back as a user-facing message.
    fn handle_api_error(&mut self, err: ApiError) -> Option<String> {
        if err.is_auth_failure() {
            self.expire_session();
            None
        } else {
            Some(categorize_error(&err))
        }
    }

    // ========================================================================
    // AUTH
    // ========================================================================

    pub async fn submit_auth(&mut self) -> Result<()> {
        let email = self.auth_state.email.trim().to_string();
        let password = self.auth_state.password.clone();

        if email.is_empty() || password.is_empty() {
            self.auth_state.error = Some("Please fill in all fields".to_string());
            return Ok(());
        }

        if self.auth_state.mode == AuthMode::Signup && self.auth_state.username.trim().is_empty() {
            self.auth_state.error = Some("Please choose a username".to_string());
            return Ok(());
        }

        self.auth_state.loading = true;
        self.auth_state.error = None;

        let result = match self.auth_state.mode {
            AuthMode::Login => self.api_client.login(email, password).await,
            AuthMode::Signup => {
                let full_name = self.auth_state.full_name.trim();
                let request = wisp_types::RegisterRequest {
                    username: self.auth_state.username.trim().to_string(),
                    email,
                    password,
                    full_name: if full_name.is_empty() {
                        None
                    } else {
                        Some(full_name.to_string())
                    },
                };
                self.api_client.register(request).await
            }
        };

        self.auth_state.loading = false;

        match result {
            Ok(auth) => {
                log::info!("Logged in as {}", auth.user.username);
                let ctx = SessionContext::new(auth.token, auth.user);

                // Persist so the next launch can restore the session
                match crate::session::SessionStore::new() {
                    Ok(store) => {
                        if let Err(e) = store.save(&ctx) {
                            log::warn!("Failed to save session: {}", e);
                        }
                    }
                    Err(e) => log::warn!("Session store unavailable: {}", e),
                }

                self.set_session(ctx);
            }
            Err(e) => {
                self.auth_state.error = Some(format!("Login failed: {}", e));
            }
        }

        Ok(())
    }

    // ========================================================================
    // COMMUNITY: VIEW ROUTER
    // ========================================================================

    /// Transition the community view. Clears data a stale render could show,
    /// bumps the fetch epoch so in-flight results get discarded, and flags the
    /// load for the main loop.
    pub fn navigate_to(&mut self, nav: NavigationState) {
        if self.community.nav != nav {
            let from = self.community.nav;
            self.community.back_stack.push(from);
            log_navigation!(
                self.log_config,
                "navigate {} -> {}",
                from.route(),
                nav.route()
            );
        }
        self.enter_state(nav);
    }

    /// Resolve a route string (deep link) straight to its state, with no back
    /// history behind it.
    pub fn open_route(&mut self, route: &str) {
        let nav = NavigationState::parse_route(route);
        log_navigation!(self.log_config, "open route {} -> {}", route, nav.route());
        self.community.back_stack.clear();
        self.current_tab = Tab::Community;
        self.enter_state(nav);
    }

    /// Back resolves to the previous route, or the state's natural parent
    /// when there is no history (deep links).
    pub fn navigate_back(&mut self) {
        let target = self
            .community
            .back_stack
            .pop()
            .or_else(|| self.community.nav.fallback_parent());
        if let Some(nav) = target {
            log_navigation!(self.log_config, "back to {}", nav.route());
            self.enter_state(nav);
        }
    }

    fn enter_state(&mut self, nav: NavigationState) {
        self.community.nav = nav;
        self.community.epoch += 1;
        self.community.error = None;
        self.community.confirm_delete_comment = None;
        self.community.report = None;
        self.community.composer.reset();
        self.input_mode = InputMode::Navigation;

        // Clear whatever deeper-level data the new state must not show
        match nav {
            NavigationState::TopicsList => {
                self.community.current_topic_name = None;
                self.community.threads.clear();
                self.community.thread = None;
                self.community.comments.clear();
                self.community.new_thread = None;
                self.community.pending_load = true;
            }
            NavigationState::ThreadsList { topic_id } => {
                self.community.current_topic_name = self
                    .community
                    .topics
                    .iter()
                    .find(|t| t.topic_id == topic_id)
                    .map(|t| t.name.clone());
                self.community.threads.clear();
                self.community.thread = None;
                self.community.comments.clear();
                self.community.new_thread = None;
                self.community.thread_list_state.select(None);
                self.community.pending_load = true;
            }
            NavigationState::ThreadDetail { .. } => {
                self.community.thread = None;
                self.community.comments.clear();
                self.community.comment_list_state.select(None);
                self.community.new_thread = None;
                self.community.pending_load = true;
            }
            NavigationState::NewThreadForm { topic_id } => {
                self.community.new_thread = Some(NewThreadForm::new(topic_id));
                self.input_mode = InputMode::Typing;
                // No fetch needed for the form itself
                self.community.pending_load = false;
            }
        }
    }

    /// Manual retry/refresh of whatever the current state shows.
    pub fn refresh_community(&mut self) {
        self.community.epoch += 1;
        self.community.error = None;
        self.community.pending_load = true;
    }

    // ========================================================================
    // COMMUNITY: FETCH ORCHESTRATOR
    // ========================================================================

    /// Results are committed only while the epoch they were fetched under is
    /// still the active one. Superseded fetches are discarded on arrival;
    /// this is the only cancellation mechanism.
    fn commit_allowed(&self, epoch: u64) -> bool {
        self.community.epoch == epoch
    }

    /// Issue the fetches the current navigation state requires.
    pub async fn load_community(&mut self) -> Result<()> {
        if self.session.is_none() || self.is_banned() {
            return Ok(());
        }
        let epoch = self.community.epoch;
        match self.community.nav {
            NavigationState::TopicsList => self.load_topics(epoch).await,
            NavigationState::ThreadsList { topic_id } => self.load_threads(topic_id, epoch).await,
            NavigationState::ThreadDetail { thread_id } => {
                self.load_thread_detail(thread_id, epoch).await
            }
            NavigationState::NewThreadForm { .. } => Ok(()),
        }
    }

    async fn load_topics(&mut self, epoch: u64) -> Result<()> {
        self.community.loading = true;
        self.community.error = None;
        log_api_call!(self.log_config, "GET topics (epoch {})", epoch);

        match self.api_client.get_topics().await {
            Ok(topics) => {
                if !self.commit_allowed(epoch) {
                    log_api_call!(self.log_config, "discarding stale topics result");
                    return Ok(());
                }
                let has_topics = !topics.is_empty();
                self.community.topics = topics;
                self.community
                    .topic_list_state
                    .select(if has_topics { Some(0) } else { None });
                self.community.loading = false;
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    if self.commit_allowed(epoch) {
                        self.community.topics.clear();
                        self.community.error = Some(msg);
                        self.community.loading = false;
                    }
                }
                return Ok(());
            }
        }

        // Best-effort enrichment: a failing count fetch must not fail the view
        match self.api_client.get_topic_thread_counts().await {
            Ok(counts) => {
                if !self.commit_allowed(epoch) {
                    return Ok(());
                }
                for topic in &mut self.community.topics {
                    topic.thread_count = counts
                        .iter()
                        .find(|c| c.topic_id == topic.topic_id)
                        .map(|c| c.thread_count);
                }
            }
            Err(e) => {
                log::warn!("Failed to fetch topic thread counts: {}", e);
            }
        }

        Ok(())
    }

    async fn load_threads(&mut self, topic_id: i64, epoch: u64) -> Result<()> {
        self.community.loading = true;
        self.community.error = None;
        log_api_call!(
            self.log_config,
            "GET threads for topic {} (epoch {})",
            topic_id,
            epoch
        );

        match self.api_client.get_threads(topic_id).await {
            Ok(threads) => {
                if !self.commit_allowed(epoch) {
                    log_api_call!(self.log_config, "discarding stale threads result");
                    return Ok(());
                }
                let has_threads = !threads.is_empty();
                self.community.threads = threads;
                self.community
                    .thread_list_state
                    .select(if has_threads { Some(0) } else { None });
                self.community.loading = false;
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    if self.commit_allowed(epoch) {
                        self.community.threads.clear();
                        self.community.error = Some(msg);
                        self.community.loading = false;
                    }
                }
            }
        }

        Ok(())
    }

    /// Thread metadata, then its comments, strictly in that order. Both must
    /// succeed before the view renders loaded; either failure leaves a single
    /// retryable error state.
    async fn load_thread_detail(&mut self, thread_id: i64, epoch: u64) -> Result<()> {
        self.community.loading = true;
        self.community.error = None;
        log_api_call!(
            self.log_config,
            "GET thread {} + comments (epoch {})",
            thread_id,
            epoch
        );

        let thread = match self.api_client.get_thread(thread_id).await {
            Ok(thread) => thread,
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    if self.commit_allowed(epoch) {
                        self.community.error = Some(msg);
                        self.community.loading = false;
                    }
                }
                return Ok(());
            }
        };

        let mut comments = match self.api_client.get_comments(thread_id).await {
            Ok(comments) => comments,
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    if self.commit_allowed(epoch) {
                        self.community.error = Some(msg);
                        self.community.loading = false;
                    }
                }
                return Ok(());
            }
        };

        if !self.commit_allowed(epoch) {
            log_api_call!(self.log_config, "discarding stale thread detail result");
            return Ok(());
        }

        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        self.community.thread = Some(thread);
        self.community.comments = comments;
        self.community.comment_list_state.select(None);
        self.community.loading = false;

        Ok(())
    }

    // ========================================================================
    // COMMUNITY: OPTIMISTIC MUTATION ENGINE
    // ========================================================================

    /// Like/unlike the thread open in the detail view.
    pub async fn toggle_thread_like(&mut self) -> Result<()> {
        let thread_id = match &self.community.thread {
            Some(thread) => thread.thread_id,
            None => return Ok(()),
        };
        let key = LikeKey::Thread(thread_id);
        if !self.community.in_flight_likes.insert(key) {
            // A toggle for this thread is still settling
            return Ok(());
        }

        let toggle = match &mut self.community.thread {
            Some(thread) => {
                let toggle = LikeToggle::capture(thread);
                toggle.apply(thread);
                toggle
            }
            None => {
                self.community.in_flight_likes.remove(&key);
                return Ok(());
            }
        };
        log_optimistic!(self.log_config, "thread {} like applied", thread_id);

        let result = self.api_client.like_thread(thread_id).await;
        self.community.in_flight_likes.remove(&key);

        if let Err(e) = result {
            if let Some(msg) = self.handle_api_error(e) {
                // Navigation may have dropped the thread; then there is
                // nothing left to roll back
                if let Some(thread) = self
                    .community
                    .thread
                    .as_mut()
                    .filter(|t| t.thread_id == thread_id)
                {
                    toggle.rollback(thread);
                    log_optimistic!(self.log_config, "thread {} like rolled back", thread_id);
                }
                self.set_community_notice(format!("Failed to update like status. {}", msg));
            }
        }

        Ok(())
    }

    /// Like/unlike a comment in the open thread.
    pub async fn toggle_comment_like(&mut self, comment_id: i64) -> Result<()> {
        let key = LikeKey::Comment(comment_id);
        if !self.community.in_flight_likes.insert(key) {
            return Ok(());
        }

        let toggle = match self
            .community
            .comments
            .iter_mut()
            .find(|c| c.comment_id == comment_id)
        {
            Some(comment) => {
                let toggle = LikeToggle::capture(comment);
                toggle.apply(comment);
                toggle
            }
            None => {
                self.community.in_flight_likes.remove(&key);
                return Ok(());
            }
        };
        log_optimistic!(self.log_config, "comment {} like applied", comment_id);

        let result = self.api_client.like_comment(comment_id).await;
        self.community.in_flight_likes.remove(&key);

        if let Err(e) = result {
            if let Some(msg) = self.handle_api_error(e) {
                if let Some(comment) = self
                    .community
                    .comments
                    .iter_mut()
                    .find(|c| c.comment_id == comment_id)
                {
                    toggle.rollback(comment);
                    log_optimistic!(self.log_config, "comment {} like rolled back", comment_id);
                }
                self.set_community_notice(format!("Failed to like comment. {}", msg));
            }
        }

        Ok(())
    }

    // Composer

    pub fn open_composer_new_comment(&mut self) {
        self.community.composer.reset();
        self.community.composer.mode = Some(ComposerMode::NewComment);
        self.input_mode = InputMode::Typing;
    }

    pub fn open_composer_reply(&mut self, parent_comment_id: i64, parent_author: String) {
        self.community.composer.reset();
        self.community.composer.mode = Some(ComposerMode::Reply {
            parent_comment_id,
            parent_author,
        });
        self.input_mode = InputMode::Typing;
    }

    /// Only offered for the session user's own comments.
    pub fn open_composer_edit_comment(&mut self, comment_id: i64) {
        let content = match self
            .community
            .comments
            .iter()
            .find(|c| c.comment_id == comment_id)
        {
            Some(comment) => comment.content.clone(),
            None => return,
        };
        self.community.composer.reset();
        self.community.composer.mode = Some(ComposerMode::EditComment { comment_id });
        self.community.composer.textarea = {
            let mut textarea = tui_textarea::TextArea::from(content.lines());
            textarea.set_hard_tab_indent(true);
            textarea
        };
        self.input_mode = InputMode::Typing;
    }

    pub fn close_composer(&mut self) {
        self.community.composer.reset();
        self.input_mode = InputMode::Navigation;
    }

    pub async fn submit_composer(&mut self) -> Result<()> {
        let content = self.community.composer.get_content();
        let trimmed = content.trim();

        // Whitespace-only submit is a no-op: no request goes out
        if trimmed.is_empty() {
            return Ok(());
        }
        if self.community.submitting {
            return Ok(());
        }

        match self.community.composer.mode.clone() {
            Some(ComposerMode::NewComment) => {
                self.submit_new_comment(trimmed.to_string(), None).await
            }
            Some(ComposerMode::Reply {
                parent_comment_id, ..
            }) => {
                self.submit_new_comment(trimmed.to_string(), Some(parent_comment_id))
                    .await
            }
            Some(ComposerMode::EditComment { comment_id }) => {
                self.submit_edit_comment(comment_id, trimmed.to_string())
                    .await
            }
            None => Ok(()),
        }
    }

    async fn submit_new_comment(
        &mut self,
        content: String,
        parent_comment_id: Option<i64>,
    ) -> Result<()> {
        let thread_id = match &self.community.thread {
            Some(thread) => thread.thread_id,
            None => return Ok(()),
        };
        let epoch = self.community.epoch;
        self.community.submitting = true;

        let result = self
            .api_client
            .create_comment(thread_id, content, parent_comment_id)
            .await;
        self.community.submitting = false;

        match result {
            Ok(mut comment) => {
                if !self.commit_allowed(epoch) {
                    return Ok(());
                }
                // The create response may come back without the author name
                if comment.username.is_none() {
                    comment.username = self.session.as_ref().map(|s| s.username().to_string());
                }
                insert_comment_sorted(&mut self.community.comments, comment);
                if let Some(thread) = &mut self.community.thread {
                    thread.comments_count += 1;
                }
                self.close_composer();
                self.set_community_notice("Comment posted!".to_string());
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    // Keep the composer text so the user can retry without
                    // retyping
                    self.set_community_notice(format!("Failed to post comment. {}", msg));
                }
            }
        }

        Ok(())
    }

    async fn submit_edit_comment(&mut self, comment_id: i64, content: String) -> Result<()> {
        let epoch = self.community.epoch;
        self.community.submitting = true;

        let result = self.api_client.update_comment(comment_id, content).await;
        self.community.submitting = false;

        match result {
            Ok(updated) => {
                if !self.commit_allowed(epoch) {
                    return Ok(());
                }
                if let Some(comment) = self
                    .community
                    .comments
                    .iter_mut()
                    .find(|c| c.comment_id == comment_id)
                {
                    comment.content = updated.content;
                    comment.updated_at = updated.updated_at;
                }
                self.close_composer();
                self.set_community_notice("Comment updated!".to_string());
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.set_community_notice(format!("Failed to update comment. {}", msg));
                }
            }
        }

        Ok(())
    }

    /// Deletion is pessimistic: the list shrinks only after the server ack.
    pub async fn delete_comment_confirmed(&mut self) -> Result<()> {
        let comment_id = match self.community.confirm_delete_comment.take() {
            Some(id) => id,
            None => return Ok(()),
        };
        let epoch = self.community.epoch;

        match self.api_client.delete_comment(comment_id).await {
            Ok(()) => {
                if !self.commit_allowed(epoch) {
                    return Ok(());
                }
                let before = self.community.comments.len();
                self.community.comments.retain(|c| c.comment_id != comment_id);
                if self.community.comments.len() < before {
                    if let Some(thread) = &mut self.community.thread {
                        thread.comments_count = (thread.comments_count - 1).max(0);
                    }
                }
                self.community.comment_list_state.select(None);
                self.set_community_notice("Comment deleted!".to_string());
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.set_community_notice(format!("Failed to delete comment. {}", msg));
                }
            }
        }

        Ok(())
    }

    // Reports

    pub fn open_report(&mut self, target: ReportTarget) {
        self.community.report = Some(ReportDraft {
            target,
            reason: String::new(),
        });
        self.input_mode = InputMode::Typing;
    }

    pub fn close_report(&mut self) {
        self.community.report = None;
        self.input_mode = InputMode::Navigation;
    }

    pub async fn submit_report(&mut self) -> Result<()> {
        let (target, reason) = match &self.community.report {
            Some(draft) => (draft.target, draft.reason.trim().to_string()),
            None => return Ok(()),
        };
        // Empty reason keeps the submit disabled
        if reason.is_empty() {
            return Ok(());
        }

        match self.api_client.create_report(target, reason).await {
            Ok(()) => {
                self.close_report();
                self.set_community_notice("Report submitted successfully. Thank you.".to_string());
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.set_community_notice(format!("Failed to submit report. {}", msg));
                }
            }
        }

        Ok(())
    }

    // New thread

    pub async fn submit_new_thread(&mut self) -> Result<()> {
        let (topic_id, title, content) = match &self.community.new_thread {
            Some(form) => (
                form.topic_id,
                form.title.trim().to_string(),
                form.content_text().trim().to_string(),
            ),
            None => return Ok(()),
        };

        if title.is_empty() || content.is_empty() {
            self.community.error = Some("Please fill in all fields".to_string());
            return Ok(());
        }
        if self.community.submitting {
            return Ok(());
        }

        self.community.submitting = true;
        self.community.error = None;
        let result = self.api_client.create_thread(topic_id, title, content).await;
        self.community.submitting = false;

        match result {
            Ok(thread) => {
                self.navigate_to(NavigationState::ThreadDetail {
                    thread_id: thread.thread_id,
                });
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.community.error = Some(format!("Failed to create thread. {}", msg));
                }
            }
        }

        Ok(())
    }

    fn set_community_notice(&mut self, message: String) {
        self.community.notice = Some((message, Instant::now()));
    }

    // ========================================================================
    // JOURNAL
    // ========================================================================

    pub async fn load_journal(&mut self) -> Result<()> {
        self.journal.loading = true;
        self.journal.error = None;

        match self.api_client.get_journal_entries().await {
            Ok(mut entries) => {
                entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                let has_entries = !entries.is_empty();
                self.journal.entries = entries;
                self.journal
                    .list_state
                    .select(if has_entries { Some(0) } else { None });
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.journal.entries.clear();
                    self.journal.error = Some(msg);
                }
                self.journal.loading = false;
                return Ok(());
            }
        }

        // Categories are enrichment for the editor; ignore failures
        if let Ok(categories) = self.api_client.get_journal_categories().await {
            self.journal.categories = categories;
        }

        self.journal.loading = false;
        Ok(())
    }

    pub fn open_journal_editor(&mut self, entry_id: Option<i64>) {
        let editor = match entry_id {
            Some(id) => {
                let entry = match self.journal.entries.iter().find(|e| e.id == id) {
                    Some(entry) if self.journal.is_readable(entry) => entry,
                    _ => return,
                };
                JournalEditor::from_entry(entry, &self.journal.categories)
            }
            None => JournalEditor::blank(),
        };
        self.journal.editor = Some(editor);
        self.input_mode = InputMode::Typing;
    }

    pub fn close_journal_editor(&mut self) {
        self.journal.editor = None;
        self.input_mode = InputMode::Navigation;
    }

    pub async fn submit_journal_editor(&mut self) -> Result<()> {
        let (entry_id, request) = match &self.journal.editor {
            Some(editor) => {
                let title = editor.title.trim().to_string();
                let content = editor.content_text().trim().to_string();
                if title.is_empty() || content.is_empty() {
                    self.journal.error =
                        Some("Title and content are both required".to_string());
                    return Ok(());
                }
                let category_id = editor
                    .category_index
                    .and_then(|i| self.journal.categories.get(i))
                    .map(|c| c.id);
                (
                    editor.entry_id,
                    CreateJournalRequest {
                        title,
                        content,
                        mood: editor.mood,
                        category_id,
                        is_locked: editor.is_locked,
                    },
                )
            }
            None => return Ok(()),
        };

        let result = match entry_id {
            Some(id) => self.api_client.update_journal_entry(id, request).await,
            None => self.api_client.create_journal_entry(request).await,
        };

        match result {
            Ok(entry) => {
                // An entry we just wrote is readable regardless of its lock
                self.journal.unlocked.insert(entry.id);
                self.close_journal_editor();
                self.journal.pending_load = true;
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.journal.error = Some(format!("Failed to save journal entry. {}", msg));
                }
            }
        }

        Ok(())
    }

    pub fn open_unlock_prompt(&mut self, entry_id: i64) {
        self.journal.unlock = Some(UnlockPrompt {
            entry_id,
            password: String::new(),
            error: None,
        });
        self.input_mode = InputMode::Typing;
    }

    pub fn close_unlock_prompt(&mut self) {
        self.journal.unlock = None;
        self.input_mode = InputMode::Navigation;
    }

    pub async fn submit_unlock(&mut self) -> Result<()> {
        let (entry_id, password) = match &self.journal.unlock {
            Some(prompt) => (prompt.entry_id, prompt.password.clone()),
            None => return Ok(()),
        };
        if password.is_empty() {
            return Ok(());
        }

        match self.api_client.unlock_journal_entry(entry_id, password).await {
            Ok(entry) => {
                if let Some(slot) = self.journal.entries.iter_mut().find(|e| e.id == entry_id) {
                    *slot = entry;
                }
                self.journal.unlocked.insert(entry_id);
                self.close_unlock_prompt();
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    if let Some(prompt) = &mut self.journal.unlock {
                        prompt.error = Some(msg);
                        prompt.password.clear();
                    }
                }
            }
        }

        Ok(())
    }

    // ========================================================================
    // MOOD TRACKER
    // ========================================================================

    pub async fn load_moods(&mut self) -> Result<()> {
        self.mood.loading = true;
        self.mood.error = None;

        match self.api_client.get_moods().await {
            Ok(mut entries) => {
                entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                let has_entries = !entries.is_empty();
                self.mood.entries = entries;
                self.mood
                    .list_state
                    .select(if has_entries { Some(0) } else { None });
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.mood.entries.clear();
                    self.mood.error = Some(msg);
                }
            }
        }

        self.mood.loading = false;
        Ok(())
    }

    pub fn open_mood_editor(&mut self) {
        self.mood.editor = Some(MoodEditor::new());
        self.input_mode = InputMode::Typing;
    }

    pub fn close_mood_editor(&mut self) {
        self.mood.editor = None;
        self.input_mode = InputMode::Navigation;
    }

    pub async fn submit_mood(&mut self) -> Result<()> {
        let (mood, note) = match &self.mood.editor {
            Some(editor) => (
                MoodKind::from_level(editor.level),
                editor.note_text().trim().to_string(),
            ),
            None => return Ok(()),
        };

        if note.is_empty() {
            self.mood.error = Some("Please add a note about your mood".to_string());
            return Ok(());
        }

        match self.api_client.create_mood(mood, note).await {
            Ok(_) => {
                self.close_mood_editor();
                self.mood.error = None;
                self.mood.notice = Some(("Mood entry saved".to_string(), Instant::now()));
                self.mood.pending_load = true;
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.mood.error = Some(format!("Failed to save mood entry. {}", msg));
                }
            }
        }

        Ok(())
    }

    // ========================================================================
    // REMINDERS
    // ========================================================================

    pub async fn load_reminders(&mut self) -> Result<()> {
        self.reminders.loading = true;
        self.reminders.error = None;

        match self.api_client.get_reminders().await {
            Ok(response) => {
                self.reminders.mindfulness = response.mindfulness;
                self.reminders.water = response.water;
                let total = self.reminders.mindfulness.len() + self.reminders.water.len();
                self.reminders
                    .list_state
                    .select(if total > 0 { Some(0) } else { None });
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.reminders.mindfulness.clear();
                    self.reminders.water.clear();
                    self.reminders.error =
                        Some(format!("{} (press r to retry)", msg));
                }
            }
        }

        self.reminders.loading = false;
        Ok(())
    }

    pub fn open_reminder_form(&mut self) {
        self.reminders.form = Some(ReminderForm::new());
        self.input_mode = InputMode::Typing;
    }

    pub fn close_reminder_form(&mut self) {
        self.reminders.form = None;
        self.input_mode = InputMode::Navigation;
    }

    pub async fn submit_reminder(&mut self) -> Result<()> {
        let request = match &mut self.reminders.form {
            Some(form) => {
                let title = form.title.trim().to_string();
                if title.is_empty() {
                    form.error = Some("Please enter a reminder title".to_string());
                    return Ok(());
                }
                let time = form.time.trim().to_string();
                if !is_valid_clock_time(&time) {
                    form.error = Some("Time must be HH:MM (24-hour)".to_string());
                    return Ok(());
                }
                CreateReminderRequest {
                    kind: form.kind,
                    title,
                    time,
                    enabled: true,
                }
            }
            None => return Ok(()),
        };

        match self.api_client.create_reminder(request).await {
            Ok(_) => {
                self.close_reminder_form();
                self.reminders.notice =
                    Some(("Reminder added successfully".to_string(), Instant::now()));
                self.reminders.pending_load = true;
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    if let Some(form) = &mut self.reminders.form {
                        form.error = Some(format!("Failed to add reminder. {}", msg));
                    }
                }
            }
        }

        Ok(())
    }

    /// Optimistic enable/disable; a failure reverts by refetching the lists.
    pub async fn toggle_reminder(&mut self, kind: ReminderKind, reminder_id: i64) -> Result<()> {
        let list = match kind {
            ReminderKind::Mindfulness => &mut self.reminders.mindfulness,
            ReminderKind::Water => &mut self.reminders.water,
        };
        let enabled = match list.iter_mut().find(|r| r.id == reminder_id) {
            Some(reminder) => {
                reminder.enabled = !reminder.enabled;
                reminder.enabled
            }
            None => return Ok(()),
        };

        if let Err(e) = self
            .api_client
            .set_reminder_enabled(kind, reminder_id, enabled)
            .await
        {
            if let Some(msg) = self.handle_api_error(e) {
                self.reminders.notice =
                    Some((format!("Failed to update reminder. {}", msg), Instant::now()));
                self.reminders.pending_load = true;
            }
        }

        Ok(())
    }

    pub async fn delete_reminder_confirmed(&mut self) -> Result<()> {
        let (kind, reminder_id) = match self.reminders.confirm_delete.take() {
            Some(target) => target,
            None => return Ok(()),
        };

        match self.api_client.delete_reminder(kind, reminder_id).await {
            Ok(()) => {
                match kind {
                    ReminderKind::Mindfulness => {
                        self.reminders.mindfulness.retain(|r| r.id != reminder_id)
                    }
                    ReminderKind::Water => self.reminders.water.retain(|r| r.id != reminder_id),
                }
                self.reminders.list_state.select(None);
                self.reminders.notice =
                    Some(("Reminder deleted successfully".to_string(), Instant::now()));
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.reminders.notice =
                        Some((format!("Failed to delete reminder. {}", msg), Instant::now()));
                }
            }
        }

        Ok(())
    }

    // ========================================================================
    // ADMIN
    // ========================================================================

    pub async fn load_admin(&mut self) -> Result<()> {
        if !self.is_admin() {
            return Ok(());
        }
        self.admin.loading = true;
        self.admin.error = None;

        match self.api_client.get_users().await {
            Ok(users) => {
                let has_users = !users.is_empty();
                self.admin.users = users;
                self.admin
                    .users_list_state
                    .select(if has_users { Some(0) } else { None });
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.admin.error = Some(format!("Failed to load users: {}", msg));
                }
                self.admin.loading = false;
                return Ok(());
            }
        }

        match self.api_client.get_reports(ReportStatus::Pending).await {
            Ok(reports) => {
                let has_reports = !reports.is_empty();
                self.admin.reports = reports;
                self.admin
                    .reports_list_state
                    .select(if has_reports { Some(0) } else { None });
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.admin.error = Some(format!("Failed to load reports: {}", msg));
                }
                self.admin.loading = false;
                return Ok(());
            }
        }

        // Mood summary is a nice-to-have dashboard panel
        if let Ok(summary) = self.api_client.get_mood_summary().await {
            self.admin.mood_summary = summary;
        }

        self.admin.loading = false;
        Ok(())
    }

    pub async fn admin_set_ban(&mut self, user_id: i64, is_banned: bool) -> Result<()> {
        match self.api_client.set_ban_status(user_id, is_banned).await {
            Ok(()) => {
                if let Some(user) = self.admin.users.iter_mut().find(|u| u.user_id == user_id) {
                    user.is_banned = is_banned;
                }
                let verb = if is_banned { "banned" } else { "unbanned" };
                self.admin.notice = Some((format!("User {}", verb), Instant::now()));
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.admin.notice =
                        Some((format!("Failed to update ban status. {}", msg), Instant::now()));
                }
            }
        }
        Ok(())
    }

    pub async fn admin_delete_confirmed(&mut self) -> Result<()> {
        let confirm = match self.admin.confirm.take() {
            Some(confirm) => confirm,
            None => return Ok(()),
        };

        let result = match confirm {
            AdminConfirm::DeleteUser(user_id) => self.api_client.delete_user(user_id).await,
            AdminConfirm::DeleteThread(thread_id) => self.api_client.delete_thread(thread_id).await,
            AdminConfirm::DeleteComment(comment_id) => {
                self.api_client.delete_comment(comment_id).await
            }
        };

        match result {
            Ok(()) => {
                match confirm {
                    AdminConfirm::DeleteUser(user_id) => {
                        self.admin.users.retain(|u| u.user_id != user_id);
                        self.admin.users_list_state.select(None);
                        self.admin.notice = Some(("User deleted".to_string(), Instant::now()));
                    }
                    AdminConfirm::DeleteThread(_) | AdminConfirm::DeleteComment(_) => {
                        self.admin.notice =
                            Some(("Reported content removed".to_string(), Instant::now()));
                        // The report for it is settled server-side; reload
                        self.admin.pending_load = true;
                    }
                }
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.admin.notice = Some((format!("Delete failed. {}", msg), Instant::now()));
                }
            }
        }

        Ok(())
    }

    pub async fn admin_resolve_report(
        &mut self,
        report_id: i64,
        status: ReportStatus,
    ) -> Result<()> {
        match self.api_client.resolve_report(report_id, status).await {
            Ok(()) => {
                self.admin.reports.retain(|r| r.report_id != report_id);
                self.admin.reports_list_state.select(None);
                self.admin.notice = Some((
                    format!("Report marked {}", status.as_str()),
                    Instant::now(),
                ));
            }
            Err(e) => {
                if let Some(msg) = self.handle_api_error(e) {
                    self.admin.notice =
                        Some((format!("Failed to update report. {}", msg), Instant::now()));
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // HOME
    // ========================================================================

    pub async fn load_quote(&mut self) -> Result<()> {
        self.home.loading = true;
        // Purely decorative; failures just leave the greeting without a quote
        match self.api_client.get_quotes().await {
            Ok(quotes) if !quotes.is_empty() => {
                let day = chrono::Utc::now().ordinal() as usize;
                self.home.quote = Some(quotes[day % quotes.len()].clone());
            }
            Ok(_) => {}
            Err(e) => {
                log::debug!("Failed to fetch quotes: {}", e);
            }
        }
        self.home.loading = false;
        Ok(())
    }

    // ========================================================================
    // MAIN-LOOP PLUMBING
    // ========================================================================

    /// Run any loads the key handlers flagged since the last iteration.
    pub async fn drain_pending_loads(&mut self) -> Result<()> {
        if self.current_screen != Screen::Main {
            return Ok(());
        }
        if self.home.pending_load {
            self.home.pending_load = false;
            self.load_quote().await?;
        }
        if self.community.pending_load {
            self.community.pending_load = false;
            self.load_community().await?;
        }
        if self.journal.pending_load {
            self.journal.pending_load = false;
            self.load_journal().await?;
        }
        if self.mood.pending_load {
            self.mood.pending_load = false;
            self.load_moods().await?;
        }
        if self.reminders.pending_load {
            self.reminders.pending_load = false;
            self.load_reminders().await?;
        }
        if self.admin.pending_load {
            self.admin.pending_load = false;
            self.load_admin().await?;
        }
        Ok(())
    }

    /// Execute an action queued by the key handlers.
    pub async fn perform(&mut self, action: PendingAction) -> Result<()> {
        match action {
            PendingAction::SubmitAuth => self.submit_auth().await,
            PendingAction::SubmitComposer => self.submit_composer().await,
            PendingAction::SubmitNewThread => self.submit_new_thread().await,
            PendingAction::SubmitReport => self.submit_report().await,
            PendingAction::DeleteComment => self.delete_comment_confirmed().await,
            PendingAction::ToggleThreadLike => self.toggle_thread_like().await,
            PendingAction::ToggleCommentLike(comment_id) => {
                self.toggle_comment_like(comment_id).await
            }
            PendingAction::SubmitJournalEditor => self.submit_journal_editor().await,
            PendingAction::SubmitUnlock => self.submit_unlock().await,
            PendingAction::SubmitMood => self.submit_mood().await,
            PendingAction::SubmitReminder => self.submit_reminder().await,
            PendingAction::ToggleReminder(kind, id) => self.toggle_reminder(kind, id).await,
            PendingAction::DeleteReminder => self.delete_reminder_confirmed().await,
            PendingAction::AdminSetBan(user_id, banned) => {
                self.admin_set_ban(user_id, banned).await
            }
            PendingAction::AdminDelete => self.admin_delete_confirmed().await,
            PendingAction::AdminResolveReport(report_id, status) => {
                self.admin_resolve_report(report_id, status).await
            }
            PendingAction::Logout => {
                self.logout();
                Ok(())
            }
        }
    }

    /// Clear notices older than the display window.
    pub fn clear_expired_notices(&mut self) {
        let now = Instant::now();
        for notice in [
            &mut self.community.notice,
            &mut self.mood.notice,
            &mut self.reminders.notice,
            &mut self.admin.notice,
        ] {
            if let Some((_, stamp)) = notice {
                if now.duration_since(*stamp) > NOTICE_DURATION {
                    *notice = None;
                }
            }
        }
    }

    // Tab switching

    pub fn next_tab(&mut self) {
        let next = self.current_tab.next(self.is_admin());
        self.switch_tab(next);
    }

    pub fn previous_tab(&mut self) {
        let prev = self.current_tab.previous(self.is_admin());
        self.switch_tab(prev);
    }

    /// Every visit refetches: the data shown on returning to a tab matches a
    /// fresh fetch, never a stale cache.
    fn switch_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
        match tab {
            Tab::Home => self.home.pending_load = true,
            Tab::Community => self.refresh_community(),
            Tab::Journal => self.journal.pending_load = true,
            Tab::Mood => self.mood.pending_load = true,
            Tab::Reminders => self.reminders.pending_load = true,
            Tab::Admin => self.admin.pending_load = true,
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        handlers::handle_key_event(self, key)
    }
}

/// Map an API error onto the message shown to the user. 401s never reach this
/// function; they are handled as session expiry.
fn categorize_error(err: &ApiError) -> String {
    match err {
        ApiError::Network(_) => {
            "Network Error: Connection failed - check your network and try again".to_string()
        }
        ApiError::BadRequest(msg) => format!("Validation Error: {}", msg),
        ApiError::Forbidden(_) => {
            "Authorization Error: You don't have permission to do that".to_string()
        }
        ApiError::NotFound(msg) => format!("Not Found: {}", msg),
        ApiError::Shape(msg) => format!("Server Error: unexpected response ({})", msg),
        ApiError::Serialization(_) => "Server Error: could not parse the response".to_string(),
        ApiError::Unauthorized(msg) => format!("Unauthorized: {}", msg),
        ApiError::Api(msg) => format!("Server Error: {}", msg),
    }
}

/// Insert a comment at the position its timestamp dictates, keeping the list
/// sorted by `created_at` ascending. Equal timestamps keep insertion order.
pub(crate) fn insert_comment_sorted(comments: &mut Vec<Comment>, comment: Comment) {
    let position = comments
        .iter()
        .position(|c| c.created_at > comment.created_at)
        .unwrap_or(comments.len());
    comments.insert(position, comment);
}

/// "HH:MM", 24-hour clock.
pub(crate) fn is_valid_clock_time(time: &str) -> bool {
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() != 2 || parts[0].len() != 2 || parts[1].len() != 2 {
        return false;
    }
    match (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
        (Ok(hours), Ok(minutes)) => hours < 24 && minutes < 60,
        _ => false,
    }
}
