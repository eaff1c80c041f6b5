use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::ListState;

use crate::app::nav::NavigationState;
use crate::app::state::{
    AdminConfirm, AdminSection, App, InputMode, PendingAction, ReminderField, Screen, Tab,
};
use crate::log_key_event;
use wisp_types::{ReportStatus, ReportTarget};

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    // Help modal swallows everything until dismissed
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            app.toggle_help();
        }
        return Ok(());
    }

    match app.current_screen {
        Screen::Auth => handle_auth_keys(app, key),
        Screen::Main => handle_main_keys(app, key),
    }
}

fn handle_auth_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.auth_state.loading {
        return Ok(());
    }

    match key.code {
        KeyCode::Esc => {
            app.running = false;
        }
        KeyCode::Enter => {
            app.pending_action = Some(PendingAction::SubmitAuth);
        }
        KeyCode::Tab | KeyCode::Down => {
            app.auth_state.focus_next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.auth_state.focus_previous();
        }
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.auth_state.toggle_mode();
        }
        KeyCode::Char(c) => {
            app.auth_state.focused_value_mut().push(c);
        }
        KeyCode::Backspace => {
            app.auth_state.focused_value_mut().pop();
        }
        _ => {}
    }
    Ok(())
}

fn handle_main_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    log_key_event!(app.log_config, "key {:?} on tab {:?}", key.code, app.current_tab);

    // Confirmation dialogs take priority over everything, including the
    // global shortcuts below
    let confirm_open = app.community.confirm_delete_comment.is_some()
        || app.reminders.confirm_delete.is_some()
        || app.admin.confirm.is_some();

    // Global shortcuts are only live while browsing, never while typing
    if app.input_mode == InputMode::Navigation && !confirm_open {
        match key.code {
            KeyCode::Char('?') => {
                app.toggle_help();
                return Ok(());
            }
            KeyCode::Tab => {
                app.next_tab();
                return Ok(());
            }
            KeyCode::BackTab => {
                app.previous_tab();
                return Ok(());
            }
            KeyCode::Char('q') => {
                app.running = false;
                return Ok(());
            }
            KeyCode::Char('L') => {
                app.pending_action = Some(PendingAction::Logout);
                return Ok(());
            }
            _ => {}
        }
    }

    match app.current_tab {
        Tab::Home => handle_home_keys(app, key),
        Tab::Community => handle_community_keys(app, key),
        Tab::Journal => handle_journal_keys(app, key),
        Tab::Mood => handle_mood_keys(app, key),
        Tab::Reminders => handle_reminders_keys(app, key),
        Tab::Admin => handle_admin_keys(app, key),
    }
}

fn handle_home_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('r') => {
            app.home.pending_load = true;
        }
        KeyCode::Esc => {
            app.running = false;
        }
        _ => {}
    }
    Ok(())
}

// ============================================================================
// COMMUNITY
// ============================================================================

fn handle_community_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    // Modal priority order: confirm > report > composer > new-thread form

    if app.community.confirm_delete_comment.is_some() {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                // The action reads and clears the stored id
                app.pending_action = Some(PendingAction::DeleteComment);
            }
            _ => {
                app.community.confirm_delete_comment = None;
            }
        }
        return Ok(());
    }

    if app.community.report.is_some() {
        match key.code {
            KeyCode::Esc => app.close_report(),
            KeyCode::Enter => {
                app.pending_action = Some(PendingAction::SubmitReport);
            }
            KeyCode::Char(c) => {
                if let Some(draft) = &mut app.community.report {
                    draft.reason.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(draft) = &mut app.community.report {
                    draft.reason.pop();
                }
            }
            _ => {}
        }
        return Ok(());
    }

    if app.community.composer.is_open() {
        match key.code {
            KeyCode::Esc => app.close_composer(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.pending_action = Some(PendingAction::SubmitComposer);
            }
            _ => {
                let input = tui_textarea::Input::from(crossterm::event::Event::Key(key));
                app.community.composer.textarea.input(input);
            }
        }
        return Ok(());
    }

    if matches!(app.community.nav, NavigationState::NewThreadForm { .. }) {
        return handle_new_thread_form_keys(app, key);
    }

    // Banned accounts see the notice; only navigation works
    if app.is_banned() {
        if matches!(key.code, KeyCode::Esc) {
            app.running = false;
        }
        return Ok(());
    }

    match app.community.nav {
        NavigationState::TopicsList => handle_topics_list_keys(app, key),
        NavigationState::ThreadsList { topic_id } => handle_threads_list_keys(app, key, topic_id),
        NavigationState::ThreadDetail { .. } => handle_thread_detail_keys(app, key),
        NavigationState::NewThreadForm { .. } => Ok(()),
    }
}

fn handle_new_thread_form_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => {
            app.navigate_back();
        }
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.pending_action = Some(PendingAction::SubmitNewThread);
        }
        KeyCode::Tab => {
            if let Some(form) = &mut app.community.new_thread {
                form.editing_title = !form.editing_title;
            }
        }
        _ => {
            if let Some(form) = &mut app.community.new_thread {
                if form.editing_title {
                    match key.code {
                        KeyCode::Char(c) => form.title.push(c),
                        KeyCode::Backspace => {
                            form.title.pop();
                        }
                        KeyCode::Enter => form.editing_title = false,
                        _ => {}
                    }
                } else {
                    let input = tui_textarea::Input::from(crossterm::event::Event::Key(key));
                    form.content.input(input);
                }
            }
        }
    }
    Ok(())
}

fn handle_topics_list_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(
                &mut app.community.topic_list_state,
                app.community.topics.len(),
                true,
            );
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(
                &mut app.community.topic_list_state,
                app.community.topics.len(),
                false,
            );
        }
        KeyCode::Enter => {
            if let Some(topic) = app
                .community
                .topic_list_state
                .selected()
                .and_then(|i| app.community.topics.get(i))
            {
                let topic_id = topic.topic_id;
                app.navigate_to(NavigationState::ThreadsList { topic_id });
            }
        }
        KeyCode::Char('n') => {
            if let Some(topic) = app
                .community
                .topic_list_state
                .selected()
                .and_then(|i| app.community.topics.get(i))
            {
                let topic_id = topic.topic_id;
                app.navigate_to(NavigationState::NewThreadForm { topic_id });
            }
        }
        KeyCode::Char('r') => {
            app.refresh_community();
        }
        KeyCode::Esc => {
            app.running = false;
        }
        _ => {}
    }
    Ok(())
}

fn handle_threads_list_keys(app: &mut App, key: KeyEvent, topic_id: i64) -> Result<()> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(
                &mut app.community.thread_list_state,
                app.community.threads.len(),
                true,
            );
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(
                &mut app.community.thread_list_state,
                app.community.threads.len(),
                false,
            );
        }
        KeyCode::Enter => {
            if let Some(thread) = app.community.selected_thread() {
                let thread_id = thread.thread_id;
                app.navigate_to(NavigationState::ThreadDetail { thread_id });
            }
        }
        KeyCode::Char('n') => {
            app.navigate_to(NavigationState::NewThreadForm { topic_id });
        }
        KeyCode::Char('r') => {
            app.refresh_community();
        }
        KeyCode::Esc | KeyCode::Left | KeyCode::Char('b') => {
            app.navigate_back();
        }
        _ => {}
    }
    Ok(())
}

fn handle_thread_detail_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            // None = the thread header is focused; first Down enters the list
            let len = app.community.comments.len();
            if len > 0 {
                let next = match app.community.comment_list_state.selected() {
                    None => 0,
                    Some(i) if i + 1 < len => i + 1,
                    Some(i) => i,
                };
                app.community.comment_list_state.select(Some(next));
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            match app.community.comment_list_state.selected() {
                None | Some(0) => app.community.comment_list_state.select(None),
                Some(i) => app.community.comment_list_state.select(Some(i - 1)),
            }
        }
        KeyCode::Char('l') => {
            // Like the selected comment, or the thread when the header is
            // focused
            match app.community.selected_comment() {
                Some(comment) => {
                    app.pending_action =
                        Some(PendingAction::ToggleCommentLike(comment.comment_id));
                }
                None => {
                    app.pending_action = Some(PendingAction::ToggleThreadLike);
                }
            }
        }
        KeyCode::Char('c') => {
            app.open_composer_new_comment();
        }
        KeyCode::Char('R') | KeyCode::Char('p') => {
            if let Some(comment) = app.community.selected_comment() {
                let id = comment.comment_id;
                let author = comment
                    .username
                    .clone()
                    .unwrap_or_else(|| "Anonymous".to_string());
                app.open_composer_reply(id, author);
            }
        }
        KeyCode::Char('e') => {
            // Edit affordance only exists for the session user's own comments
            if let (Some(comment), Some(session)) =
                (app.community.selected_comment(), &app.session)
            {
                if session.owns(comment.user_id) {
                    let id = comment.comment_id;
                    app.open_composer_edit_comment(id);
                }
            }
        }
        KeyCode::Char('x') => {
            if let (Some(comment), Some(session)) =
                (app.community.selected_comment(), &app.session)
            {
                if session.owns(comment.user_id) {
                    app.community.confirm_delete_comment = Some(comment.comment_id);
                }
            }
        }
        KeyCode::Char('t') => {
            // Report whatever is focused, except the user's own content
            if let Some(session) = &app.session {
                match app.community.selected_comment() {
                    Some(comment) if !session.owns(comment.user_id) => {
                        let target = ReportTarget::Comment(comment.comment_id);
                        app.open_report(target);
                    }
                    Some(_) => {}
                    None => {
                        if let Some(thread) = &app.community.thread {
                            if !session.owns(thread.user_id) {
                                let target = ReportTarget::Thread(thread.thread_id);
                                app.open_report(target);
                            }
                        }
                    }
                }
            }
        }
        KeyCode::Char('r') => {
            app.refresh_community();
        }
        KeyCode::Esc | KeyCode::Left | KeyCode::Char('b') => {
            app.navigate_back();
        }
        _ => {}
    }
    Ok(())
}

// ============================================================================
// JOURNAL
// ============================================================================

fn handle_journal_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.journal.unlock.is_some() {
        match key.code {
            KeyCode::Esc => app.close_unlock_prompt(),
            KeyCode::Enter => {
                app.pending_action = Some(PendingAction::SubmitUnlock);
            }
            KeyCode::Char(c) => {
                if let Some(prompt) = &mut app.journal.unlock {
                    prompt.password.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(prompt) = &mut app.journal.unlock {
                    prompt.password.pop();
                }
            }
            _ => {}
        }
        return Ok(());
    }

    if app.journal.editor.is_some() {
        return handle_journal_editor_keys(app, key);
    }

    if app.journal.viewing.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('b')) {
            app.journal.viewing = None;
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(&mut app.journal.list_state, app.journal.entries.len(), true);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(&mut app.journal.list_state, app.journal.entries.len(), false);
        }
        KeyCode::Enter => {
            if let Some(entry) = app.journal.selected_entry() {
                if app.journal.is_readable(entry) {
                    app.journal.viewing = Some(entry.id);
                } else {
                    let id = entry.id;
                    app.open_unlock_prompt(id);
                }
            }
        }
        KeyCode::Char('n') => {
            app.open_journal_editor(None);
        }
        KeyCode::Char('e') => {
            if let Some(entry) = app.journal.selected_entry() {
                let id = entry.id;
                app.open_journal_editor(Some(id));
            }
        }
        KeyCode::Char('r') => {
            app.journal.pending_load = true;
        }
        KeyCode::Esc => {
            app.running = false;
        }
        _ => {}
    }
    Ok(())
}

fn handle_journal_editor_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.close_journal_editor(),
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.pending_action = Some(PendingAction::SubmitJournalEditor);
        }
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(editor) = &mut app.journal.editor {
                editor.mood = next_mood(editor.mood);
            }
        }
        KeyCode::Char('x') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(editor) = &mut app.journal.editor {
                editor.is_locked = !editor.is_locked;
            }
        }
        KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(editor) = &mut app.journal.editor {
                let count = app.journal.categories.len();
                editor.category_index = match editor.category_index {
                    None if count > 0 => Some(0),
                    Some(i) if i + 1 < count => Some(i + 1),
                    _ => None,
                };
            }
        }
        KeyCode::Tab => {
            if let Some(editor) = &mut app.journal.editor {
                editor.editing_title = !editor.editing_title;
            }
        }
        _ => {
            if let Some(editor) = &mut app.journal.editor {
                if editor.editing_title {
                    match key.code {
                        KeyCode::Char(c) => editor.title.push(c),
                        KeyCode::Backspace => {
                            editor.title.pop();
                        }
                        KeyCode::Enter => editor.editing_title = false,
                        _ => {}
                    }
                } else {
                    let input = tui_textarea::Input::from(crossterm::event::Event::Key(key));
                    editor.content.input(input);
                }
            }
        }
    }
    Ok(())
}

fn next_mood(mood: wisp_types::MoodKind) -> wisp_types::MoodKind {
    use wisp_types::MoodKind;
    match mood {
        MoodKind::Happy => MoodKind::Neutral,
        MoodKind::Neutral => MoodKind::Anxious,
        MoodKind::Anxious => MoodKind::Sad,
        MoodKind::Sad => MoodKind::Happy,
    }
}

// ============================================================================
// MOOD TRACKER
// ============================================================================

fn handle_mood_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.mood.editor.is_some() {
        match key.code {
            KeyCode::Esc => app.close_mood_editor(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.pending_action = Some(PendingAction::SubmitMood);
            }
            KeyCode::PageUp => {
                if let Some(editor) = &mut app.mood.editor {
                    editor.level = (editor.level + 1).min(10);
                }
            }
            KeyCode::PageDown => {
                if let Some(editor) = &mut app.mood.editor {
                    editor.level = editor.level.saturating_sub(1).max(1);
                }
            }
            _ => {
                if let Some(editor) = &mut app.mood.editor {
                    let input = tui_textarea::Input::from(crossterm::event::Event::Key(key));
                    editor.note.input(input);
                }
            }
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(&mut app.mood.list_state, app.mood.entries.len(), true);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(&mut app.mood.list_state, app.mood.entries.len(), false);
        }
        KeyCode::Char('n') => {
            app.open_mood_editor();
        }
        KeyCode::Char('r') => {
            app.mood.pending_load = true;
        }
        KeyCode::Esc => {
            app.running = false;
        }
        _ => {}
    }
    Ok(())
}

// ============================================================================
// REMINDERS
// ============================================================================

fn handle_reminders_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.reminders.confirm_delete.is_some() {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.pending_action = Some(PendingAction::DeleteReminder);
            }
            _ => {
                app.reminders.confirm_delete = None;
            }
        }
        return Ok(());
    }

    if app.reminders.form.is_some() {
        return handle_reminder_form_keys(app, key);
    }

    let total = app.reminders.mindfulness.len() + app.reminders.water.len();
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(&mut app.reminders.list_state, total, true);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(&mut app.reminders.list_state, total, false);
        }
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('t') => {
            if let Some(reminder) = app.reminders.selected_reminder() {
                app.pending_action =
                    Some(PendingAction::ToggleReminder(reminder.kind, reminder.id));
            }
        }
        KeyCode::Char('n') => {
            app.open_reminder_form();
        }
        KeyCode::Char('x') => {
            if let Some(reminder) = app.reminders.selected_reminder() {
                app.reminders.confirm_delete = Some((reminder.kind, reminder.id));
            }
        }
        KeyCode::Char('r') => {
            app.reminders.pending_load = true;
        }
        KeyCode::Esc => {
            app.running = false;
        }
        _ => {}
    }
    Ok(())
}

fn handle_reminder_form_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.close_reminder_form(),
        KeyCode::Enter => {
            app.pending_action = Some(PendingAction::SubmitReminder);
        }
        KeyCode::Tab => {
            if let Some(form) = &mut app.reminders.form {
                form.focused = match form.focused {
                    ReminderField::Title => ReminderField::Time,
                    ReminderField::Time => ReminderField::Title,
                };
            }
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(form) = &mut app.reminders.form {
                form.kind = match form.kind {
                    wisp_types::ReminderKind::Mindfulness => wisp_types::ReminderKind::Water,
                    wisp_types::ReminderKind::Water => wisp_types::ReminderKind::Mindfulness,
                };
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = &mut app.reminders.form {
                match form.focused {
                    ReminderField::Title => form.title.push(c),
                    ReminderField::Time => {
                        // "HH:MM" is as long as the field gets
                        if form.time.len() < 5 {
                            form.time.push(c);
                        }
                    }
                }
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = &mut app.reminders.form {
                match form.focused {
                    ReminderField::Title => {
                        form.title.pop();
                    }
                    ReminderField::Time => {
                        form.time.pop();
                    }
                }
            }
        }
        _ => {}
    }
    Ok(())
}

// ============================================================================
// ADMIN
// ============================================================================

fn handle_admin_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.admin.confirm.is_some() {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.pending_action = Some(PendingAction::AdminDelete);
            }
            _ => {
                app.admin.confirm = None;
            }
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Char('s') => {
            app.admin.section = app.admin.section.next();
            return Ok(());
        }
        KeyCode::Char('r') => {
            app.admin.pending_load = true;
            return Ok(());
        }
        KeyCode::Esc => {
            app.running = false;
            return Ok(());
        }
        _ => {}
    }

    match app.admin.section {
        AdminSection::Users => match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                move_selection(&mut app.admin.users_list_state, app.admin.users.len(), true);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                move_selection(&mut app.admin.users_list_state, app.admin.users.len(), false);
            }
            KeyCode::Char('b') => {
                if let Some(user) = app.admin.selected_user() {
                    app.pending_action =
                        Some(PendingAction::AdminSetBan(user.user_id, !user.is_banned));
                }
            }
            KeyCode::Char('x') => {
                if let Some(user) = app.admin.selected_user() {
                    app.admin.confirm = Some(AdminConfirm::DeleteUser(user.user_id));
                }
            }
            _ => {}
        },
        AdminSection::Reports => match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                move_selection(
                    &mut app.admin.reports_list_state,
                    app.admin.reports.len(),
                    true,
                );
            }
            KeyCode::Up | KeyCode::Char('k') => {
                move_selection(
                    &mut app.admin.reports_list_state,
                    app.admin.reports.len(),
                    false,
                );
            }
            KeyCode::Char('a') => {
                if let Some(report) = app.admin.selected_report() {
                    app.pending_action = Some(PendingAction::AdminResolveReport(
                        report.report_id,
                        ReportStatus::Resolved,
                    ));
                }
            }
            KeyCode::Char('d') => {
                if let Some(report) = app.admin.selected_report() {
                    app.pending_action = Some(PendingAction::AdminResolveReport(
                        report.report_id,
                        ReportStatus::Rejected,
                    ));
                }
            }
            KeyCode::Char('x') => {
                // Remove the reported content itself
                if let Some(report) = app.admin.selected_report() {
                    app.admin.confirm = match report.target() {
                        Some(ReportTarget::Thread(id)) => Some(AdminConfirm::DeleteThread(id)),
                        Some(ReportTarget::Comment(id)) => Some(AdminConfirm::DeleteComment(id)),
                        None => None,
                    };
                }
            }
            _ => {}
        },
        AdminSection::Moods => {}
    }
    Ok(())
}

/// Shared list-selection movement: clamps at both ends, selects the first
/// item when nothing is selected yet.
fn move_selection(list_state: &mut ListState, len: usize, down: bool) {
    if len == 0 {
        list_state.select(None);
        return;
    }
    let next = match (list_state.selected(), down) {
        (None, _) => 0,
        (Some(i), true) if i + 1 < len => i + 1,
        (Some(i), true) => i,
        (Some(0), false) => 0,
        (Some(i), false) => i - 1,
    };
    list_state.select(Some(next));
}
