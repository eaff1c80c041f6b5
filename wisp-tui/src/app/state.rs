use std::collections::HashSet;
use std::time::Instant;

use ratatui::widgets::ListState;
use tui_textarea::TextArea;

use wisp_types::{
    Comment, JournalCategory, JournalEntry, MoodEntry, MoodKind, MoodSummary, Quote, Reminder,
    ReminderKind, Report, ReportStatus, ReportTarget, SessionContext, Thread, Topic, User,
};

use crate::api::ApiClient;
use crate::app::nav::NavigationState;
use crate::app::optimistic::LikeKey;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Navigation, // Browsing content, shortcuts active
    Typing,     // In text input, shortcuts disabled
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Auth,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Home,
    Community,
    Journal,
    Mood,
    Reminders,
    Admin,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Community => "Community",
            Tab::Journal => "Journal",
            Tab::Mood => "Mood",
            Tab::Reminders => "Reminders",
            Tab::Admin => "Admin",
        }
    }

    pub fn all(is_admin: bool) -> Vec<Tab> {
        let mut tabs = vec![
            Tab::Home,
            Tab::Community,
            Tab::Journal,
            Tab::Mood,
            Tab::Reminders,
        ];
        if is_admin {
            tabs.push(Tab::Admin);
        }
        tabs
    }

    pub fn next(&self, is_admin: bool) -> Self {
        let tabs = Tab::all(is_admin);
        let idx = tabs.iter().position(|t| t == self).unwrap_or(0);
        tabs[(idx + 1) % tabs.len()]
    }

    pub fn previous(&self, is_admin: bool) -> Self {
        let tabs = Tab::all(is_admin);
        let idx = tabs.iter().position(|t| t == self).unwrap_or(0);
        tabs[(idx + tabs.len() - 1) % tabs.len()]
    }
}

/// Deferred async work queued by the (synchronous) key handlers and executed
/// by the main loop between renders.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    SubmitAuth,
    SubmitComposer,
    SubmitNewThread,
    SubmitReport,
    DeleteComment,
    ToggleThreadLike,
    ToggleCommentLike(i64),
    SubmitJournalEditor,
    SubmitUnlock,
    SubmitMood,
    SubmitReminder,
    ToggleReminder(ReminderKind, i64),
    DeleteReminder,
    AdminSetBan(i64, bool),
    AdminDelete,
    AdminResolveReport(i64, ReportStatus),
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthMode {
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthField {
    Username,
    Email,
    FullName,
    Password,
}

/// Authentication screen state
pub struct AuthState {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub username: String,
    pub full_name: String,
    pub focused: AuthField,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    pub fn fields(&self) -> Vec<AuthField> {
        match self.mode {
            AuthMode::Login => vec![AuthField::Email, AuthField::Password],
            AuthMode::Signup => vec![
                AuthField::Username,
                AuthField::Email,
                AuthField::FullName,
                AuthField::Password,
            ],
        }
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(idx + 1) % fields.len()];
    }

    pub fn focus_previous(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(idx + fields.len() - 1) % fields.len()];
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focused {
            AuthField::Username => &mut self.username,
            AuthField::Email => &mut self.email,
            AuthField::FullName => &mut self.full_name,
            AuthField::Password => &mut self.password,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        };
        self.focused = match self.mode {
            AuthMode::Login => AuthField::Email,
            AuthMode::Signup => AuthField::Username,
        };
        self.error = None;
    }
}

/// What the community composer is editing
#[derive(Debug, Clone)]
pub enum ComposerMode {
    NewComment,
    Reply {
        parent_comment_id: i64,
        parent_author: String,
    },
    EditComment {
        comment_id: i64,
    },
}

/// Comment composer state using tui-textarea
pub struct ComposerState {
    pub mode: Option<ComposerMode>,
    pub textarea: TextArea<'static>,
}

impl ComposerState {
    pub fn new() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_hard_tab_indent(true);
        Self {
            mode: None,
            textarea,
        }
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    pub fn get_content(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn reset(&mut self) {
        self.mode = None;
        let mut textarea = TextArea::default();
        textarea.set_hard_tab_indent(true);
        self.textarea = textarea;
    }
}

/// Draft of a content report, filled in via the report modal
pub struct ReportDraft {
    pub target: ReportTarget,
    pub reason: String,
}

/// Form state for composing a new thread
pub struct NewThreadForm {
    pub topic_id: i64,
    pub title: String,
    pub content: TextArea<'static>,
    pub editing_title: bool,
}

impl NewThreadForm {
    pub fn new(topic_id: i64) -> Self {
        let mut content = TextArea::default();
        content.set_hard_tab_indent(true);
        Self {
            topic_id,
            title: String::new(),
            content,
            editing_title: true,
        }
    }

    pub fn content_text(&self) -> String {
        self.content.lines().join("\n")
    }
}

/// Community tab state: the navigation state machine plus the entity lists it
/// hydrates. `epoch` is the stale-result guard: every navigation bumps it, and
/// fetch results are committed only if the epoch they were issued under is
/// still current.
pub struct CommunityState {
    pub nav: NavigationState,
    pub back_stack: Vec<NavigationState>,
    pub epoch: u64,
    pub pending_load: bool,
    pub topics: Vec<Topic>,
    pub threads: Vec<Thread>,
    pub current_topic_name: Option<String>,
    pub thread: Option<Thread>,
    pub comments: Vec<Comment>,
    pub topic_list_state: ListState,
    pub thread_list_state: ListState,
    pub comment_list_state: ListState,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<(String, Instant)>, // transient snackbar, auto-clears
    pub submitting: bool,
    pub in_flight_likes: HashSet<LikeKey>,
    pub composer: ComposerState,
    pub new_thread: Option<NewThreadForm>,
    pub report: Option<ReportDraft>,
    pub confirm_delete_comment: Option<i64>,
}

impl CommunityState {
    pub fn selected_thread(&self) -> Option<&Thread> {
        self.thread_list_state
            .selected()
            .and_then(|i| self.threads.get(i))
    }

    pub fn selected_comment(&self) -> Option<&Comment> {
        self.comment_list_state
            .selected()
            .and_then(|i| self.comments.get(i))
    }
}

/// Journal entry editor (create or edit)
pub struct JournalEditor {
    pub entry_id: Option<i64>,
    pub title: String,
    pub content: TextArea<'static>,
    pub mood: MoodKind,
    pub category_index: Option<usize>,
    pub is_locked: bool,
    pub editing_title: bool,
}

impl JournalEditor {
    pub fn blank() -> Self {
        let mut content = TextArea::default();
        content.set_hard_tab_indent(true);
        Self {
            entry_id: None,
            title: String::new(),
            content,
            mood: MoodKind::Neutral,
            category_index: None,
            is_locked: false,
            editing_title: true,
        }
    }

    pub fn from_entry(entry: &JournalEntry, categories: &[JournalCategory]) -> Self {
        let mut content = TextArea::from(entry.content.lines());
        content.set_hard_tab_indent(true);
        Self {
            entry_id: Some(entry.id),
            title: entry.title.clone(),
            content,
            mood: entry.mood,
            category_index: entry
                .category_id
                .and_then(|id| categories.iter().position(|c| c.id == id)),
            is_locked: entry.is_locked,
            editing_title: false,
        }
    }

    pub fn content_text(&self) -> String {
        self.content.lines().join("\n")
    }
}

/// Password prompt for a locked journal entry
pub struct UnlockPrompt {
    pub entry_id: i64,
    pub password: String,
    pub error: Option<String>,
}

/// Journal tab state
pub struct JournalState {
    pub entries: Vec<JournalEntry>,
    pub categories: Vec<JournalCategory>,
    /// Entries unlocked this session; everything else that is locked renders
    /// a placeholder instead of its content.
    pub unlocked: HashSet<i64>,
    pub list_state: ListState,
    pub loading: bool,
    pub pending_load: bool,
    pub error: Option<String>,
    pub editor: Option<JournalEditor>,
    pub unlock: Option<UnlockPrompt>,
    pub viewing: Option<i64>,
}

impl JournalState {
    pub fn selected_entry(&self) -> Option<&JournalEntry> {
        self.list_state.selected().and_then(|i| self.entries.get(i))
    }

    pub fn is_readable(&self, entry: &JournalEntry) -> bool {
        !entry.is_locked || self.unlocked.contains(&entry.id)
    }
}

/// Mood entry editor
pub struct MoodEditor {
    pub level: u8, // 1-10, mapped onto MoodKind on submit
    pub note: TextArea<'static>,
}

impl MoodEditor {
    pub fn new() -> Self {
        let mut note = TextArea::default();
        note.set_hard_tab_indent(true);
        Self { level: 5, note }
    }

    pub fn note_text(&self) -> String {
        self.note.lines().join("\n")
    }
}

/// Mood tab state
pub struct MoodState {
    pub entries: Vec<MoodEntry>,
    pub list_state: ListState,
    pub loading: bool,
    pub pending_load: bool,
    pub error: Option<String>,
    pub notice: Option<(String, Instant)>,
    pub editor: Option<MoodEditor>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReminderField {
    Title,
    Time,
}

/// Form for adding a reminder
pub struct ReminderForm {
    pub kind: ReminderKind,
    pub title: String,
    pub time: String, // "HH:MM"
    pub focused: ReminderField,
    pub error: Option<String>,
}

impl ReminderForm {
    pub fn new() -> Self {
        Self {
            kind: ReminderKind::Mindfulness,
            title: String::new(),
            time: String::new(),
            focused: ReminderField::Title,
            error: None,
        }
    }
}

/// Reminders tab state
pub struct RemindersState {
    pub mindfulness: Vec<Reminder>,
    pub water: Vec<Reminder>,
    pub list_state: ListState,
    pub loading: bool,
    pub pending_load: bool,
    pub error: Option<String>,
    pub notice: Option<(String, Instant)>,
    pub form: Option<ReminderForm>,
    pub confirm_delete: Option<(ReminderKind, i64)>,
}

impl RemindersState {
    /// Flattened view of both sections, mindfulness first, matching the
    /// rendered list order.
    pub fn combined(&self) -> Vec<&Reminder> {
        self.mindfulness.iter().chain(self.water.iter()).collect()
    }

    pub fn selected_reminder(&self) -> Option<&Reminder> {
        self.list_state
            .selected()
            .and_then(|i| self.combined().get(i).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdminSection {
    Users,
    Reports,
    Moods,
}

impl AdminSection {
    pub fn next(&self) -> Self {
        match self {
            AdminSection::Users => AdminSection::Reports,
            AdminSection::Reports => AdminSection::Moods,
            AdminSection::Moods => AdminSection::Users,
        }
    }
}

/// Destructive admin actions that need confirmation first
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdminConfirm {
    DeleteUser(i64),
    DeleteThread(i64),
    DeleteComment(i64),
}

/// Admin tab state
pub struct AdminState {
    pub section: AdminSection,
    pub users: Vec<User>,
    pub reports: Vec<Report>,
    pub mood_summary: Vec<MoodSummary>,
    pub users_list_state: ListState,
    pub reports_list_state: ListState,
    pub loading: bool,
    pub pending_load: bool,
    pub error: Option<String>,
    pub notice: Option<(String, Instant)>,
    pub confirm: Option<AdminConfirm>,
}

impl AdminState {
    pub fn selected_user(&self) -> Option<&User> {
        self.users_list_state
            .selected()
            .and_then(|i| self.users.get(i))
    }

    pub fn selected_report(&self) -> Option<&Report> {
        self.reports_list_state
            .selected()
            .and_then(|i| self.reports.get(i))
    }
}

/// Home tab state
pub struct HomeState {
    pub quote: Option<Quote>,
    pub pending_load: bool,
    pub loading: bool,
}

/// Main application state
pub struct App {
    pub running: bool,
    pub current_screen: Screen,
    pub api_client: ApiClient,
    pub session: Option<SessionContext>,
    pub current_tab: Tab,
    pub auth_state: AuthState,
    pub home: HomeState,
    pub community: CommunityState,
    pub journal: JournalState,
    pub mood: MoodState,
    pub reminders: RemindersState,
    pub admin: AdminState,
    pub pending_action: Option<PendingAction>,
    pub config_manager: crate::config::ConfigManager,
    pub show_help: bool,
    pub input_mode: InputMode,
    pub log_config: crate::logging::LogConfig,
}

impl App {
    pub fn is_admin(&self) -> bool {
        self.session.as_ref().map(|s| s.is_admin()).unwrap_or(false)
    }

    pub fn is_banned(&self) -> bool {
        self.session.as_ref().map(|s| s.is_banned()).unwrap_or(false)
    }
}
