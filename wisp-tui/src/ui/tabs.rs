use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::nav::NavigationState;
use crate::app::{AdminSection, App, AuthField, AuthMode, Tab};
use wisp_types::MoodKind;

use super::formatting::*;
use super::modals::*;
use super::theme::{theme, ThemeColors};

pub fn render_auth_screen(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let colors = theme();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let header = Paragraph::new("WISP - Mental Wellness Companion")
        .style(
            Style::default()
                .fg(colors.primary)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let mut lines = vec![Line::from("")];

    const LOGO_LINES: &[&str] = &[
        " __        ___     _  ",
        " \\ \\      / (_)___| |_ __",
        "  \\ \\ /\\ / /| / __| '_ \\ ",
        "   \\ V  V / | \\__ \\ |_) |",
        "    \\_/\\_/  |_|___/ .__/ ",
        "                  |_|    ",
    ];

    for logo_line in LOGO_LINES {
        lines.push(Line::from(Span::styled(
            *logo_line,
            Style::default()
                .fg(colors.primary)
                .add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    let mode_title = match app.auth_state.mode {
        AuthMode::Login => "Log In",
        AuthMode::Signup => "Create Account",
    };
    lines.push(Line::from(Span::styled(
        mode_title,
        Style::default()
            .fg(colors.text)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let field_line = |label: &str, value: &str, field: AuthField, masked: bool| -> Line<'static> {
        let focused = app.auth_state.focused == field;
        let marker = if focused { "> " } else { "  " };
        let shown = if masked {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        };
        let style = if focused {
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text)
        };
        Line::from(vec![
            Span::styled(format!("{}{:<12}", marker, label), style),
            Span::styled(shown, Style::default().fg(colors.text)),
            Span::styled(if focused { "_" } else { "" }, Style::default().fg(colors.accent)),
        ])
    };

    if app.auth_state.mode == AuthMode::Signup {
        lines.push(field_line(
            "Username:",
            &app.auth_state.username.clone(),
            AuthField::Username,
            false,
        ));
    }
    lines.push(field_line(
        "Email:",
        &app.auth_state.email.clone(),
        AuthField::Email,
        false,
    ));
    if app.auth_state.mode == AuthMode::Signup {
        lines.push(field_line(
            "Full name:",
            &app.auth_state.full_name.clone(),
            AuthField::FullName,
            false,
        ));
    }
    lines.push(field_line(
        "Password:",
        &app.auth_state.password.clone(),
        AuthField::Password,
        true,
    ));

    lines.push(Line::from(""));
    if app.auth_state.loading {
        lines.push(Line::from(Span::styled(
            "Signing in...",
            Style::default().fg(colors.text_dim),
        )));
    } else if let Some(error) = &app.auth_state.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(colors.error),
        )));
    }

    let content = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(content, chunks[1]);

    let other_mode = match app.auth_state.mode {
        AuthMode::Login => "sign up",
        AuthMode::Signup => "log in",
    };
    let footer = Paragraph::new(format!(
        "Tab: next field • Enter: submit • Ctrl+N: {} • Esc: quit",
        other_mode
    ))
    .style(Style::default().fg(colors.text_dim))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}

pub fn render_main_screen(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let colors = theme();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_tab_bar(frame, app, chunks[0], &colors);

    match app.current_tab {
        Tab::Home => render_home(frame, app, chunks[1], &colors),
        Tab::Community => render_community(frame, app, chunks[1], &colors),
        Tab::Journal => render_journal(frame, app, chunks[1], &colors),
        Tab::Mood => render_mood(frame, app, chunks[1], &colors),
        Tab::Reminders => render_reminders(frame, app, chunks[1], &colors),
        Tab::Admin => render_admin(frame, app, chunks[1], &colors),
    }

    render_status_bar(frame, app, chunks[2], &colors);

    // Modal overlays, help always on top
    render_tab_modals(frame, app, area, &colors);
    if app.show_help {
        render_help_modal(frame, area, &colors);
    }
}

fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect, colors: &ThemeColors) {
    let mut spans = vec![Span::raw(" ")];
    for tab in Tab::all(app.is_admin()) {
        let style = if tab == app.current_tab {
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text_dim)
        };
        spans.push(Span::styled(format!(" {} ", tab.title()), style));
        spans.push(Span::raw("|"));
    }
    spans.pop();

    let username = app
        .session
        .as_ref()
        .map(|s| s.username().to_string())
        .unwrap_or_default();
    let title = format!(" wisp — {} ", username);

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .title(title),
    );
    frame.render_widget(bar, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect, colors: &ThemeColors) {
    // Notices win over the static key hints
    let notice = match app.current_tab {
        Tab::Community => app.community.notice.as_ref(),
        Tab::Mood => app.mood.notice.as_ref(),
        Tab::Reminders => app.reminders.notice.as_ref(),
        Tab::Admin => app.admin.notice.as_ref(),
        _ => None,
    };

    let (text, style) = if let Some((message, _)) = notice {
        (message.clone(), Style::default().fg(colors.warning))
    } else {
        let hints = match app.current_tab {
            Tab::Home => "r: refresh • Tab: switch tab • ?: help • q: quit",
            Tab::Community => match app.community.nav {
                NavigationState::TopicsList => "j/k: move • Enter: open • n: new thread • r: refresh",
                NavigationState::ThreadsList { .. } => {
                    "j/k: move • Enter: open • n: new thread • Esc: back"
                }
                NavigationState::ThreadDetail { .. } => {
                    "j/k: move • l: like • c: comment • R: reply • e: edit • x: delete • t: report"
                }
                NavigationState::NewThreadForm { .. } => {
                    "Tab: title/body • Ctrl+S: post • Esc: cancel"
                }
            },
            Tab::Journal => "j/k: move • Enter: open • n: new • e: edit • r: refresh",
            Tab::Mood => "j/k: move • n: new entry • r: refresh",
            Tab::Reminders => "j/k: move • Enter: toggle • n: add • x: delete",
            Tab::Admin => "s: section • j/k: move • b: ban • a/d: resolve • x: delete",
        };
        (hints.to_string(), Style::default().fg(colors.text_dim))
    };

    let bar = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border)),
    );
    frame.render_widget(bar, area);
}

// ============================================================================
// HOME
// ============================================================================

fn render_home(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    let name = app
        .session
        .as_ref()
        .and_then(|s| s.user.full_name.clone())
        .or_else(|| app.session.as_ref().map(|s| s.username().to_string()))
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Welcome back, {}", name),
            Style::default()
                .fg(colors.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some(quote) = &app.home.quote {
        lines.push(Line::from(Span::styled(
            format!("\u{201c}{}\u{201d}", quote.text),
            Style::default().fg(colors.secondary),
        )));
        if let Some(author) = &quote.author {
            lines.push(Line::from(Span::styled(
                format!("— {}", author),
                Style::default().fg(colors.text_dim),
            )));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "How are you feeling today?",
        Style::default().fg(colors.text),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Community · Journal · Mood · Reminders",
        Style::default().fg(colors.text_dim),
    )));

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .title(" Home "),
        );
    frame.render_widget(content, area);
}

// ============================================================================
// COMMUNITY
// ============================================================================

fn render_community(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    if app.is_banned() {
        let notice = Paragraph::new(
            "Your account has been banned from accessing the community.\n\
             Please contact support for more information.",
        )
        .style(Style::default().fg(colors.error))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.error))
                .title(" Community "),
        );
        frame.render_widget(notice, area);
        return;
    }

    // The new-thread form shows its validation error inline instead
    if !matches!(app.community.nav, NavigationState::NewThreadForm { .. }) {
        if let Some(error) = app.community.error.clone() {
            let retry = Paragraph::new(format!("{}\n\nPress r to retry.", error))
                .style(Style::default().fg(colors.error))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(colors.error))
                        .title(" Community "),
                );
            frame.render_widget(retry, area);
            return;
        }
    }

    match app.community.nav {
        NavigationState::TopicsList => render_topics_list(frame, app, area, colors),
        NavigationState::ThreadsList { .. } => render_threads_list(frame, app, area, colors),
        NavigationState::ThreadDetail { .. } => render_thread_detail(frame, app, area, colors),
        NavigationState::NewThreadForm { .. } => render_new_thread_form(frame, app, area, colors),
    }
}

fn render_topics_list(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    let title = if app.community.loading {
        " Community Hub (loading…) "
    } else {
        " Community Hub "
    };

    if !app.community.loading && app.community.topics.is_empty() {
        let empty = Paragraph::new("No topics available at the moment.")
            .style(Style::default().fg(colors.text_dim))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.border))
                    .title(title),
            );
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .community
        .topics
        .iter()
        .map(|topic| {
            let count = match topic.thread_count {
                Some(count) => count.to_string(),
                None => "N/A".to_string(),
            };
            let description = topic
                .description
                .clone()
                .unwrap_or_else(|| "No description provided.".to_string());
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        topic.name.clone(),
                        Style::default()
                            .fg(colors.text)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  ({} threads)", count),
                        Style::default().fg(colors.text_dim),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {}", truncate(&description, 90)),
                    Style::default().fg(colors.text_dim),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .title(title),
        )
        .highlight_style(Style::default().bg(colors.highlight_bg));

    frame.render_stateful_widget(list, area, &mut app.community.topic_list_state);
}

fn render_threads_list(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    let topic_name = app
        .community
        .current_topic_name
        .clone()
        .unwrap_or_else(|| "Threads".to_string());
    let title = if app.community.loading {
        format!(" {} (loading…) ", topic_name)
    } else {
        format!(" {} ", topic_name)
    };

    if !app.community.loading && app.community.threads.is_empty() {
        let empty = Paragraph::new(format!(
            "No threads yet in \"{}\".\nBe the first to start a discussion! (press n)",
            topic_name
        ))
        .style(Style::default().fg(colors.text_dim))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .title(title),
        );
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .community
        .threads
        .iter()
        .map(|thread| {
            let author = thread
                .author_name
                .clone()
                .unwrap_or_else(|| "Unknown User".to_string());
            ListItem::new(vec![
                Line::from(Span::styled(
                    thread.title.clone(),
                    Style::default()
                        .fg(colors.text)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!(
                        "  By: {} • {} • {} likes • {} comments",
                        author,
                        format_relative(&thread.created_at),
                        thread.like_count,
                        thread.comments_count
                    ),
                    Style::default().fg(colors.text_dim),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .title(title),
        )
        .highlight_style(Style::default().bg(colors.highlight_bg));

    frame.render_stateful_widget(list, area, &mut app.community.thread_list_state);
}

fn render_thread_detail(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    let thread = match &app.community.thread {
        Some(thread) => thread.clone(),
        None => {
            let loading = Paragraph::new(if app.community.loading {
                "Loading thread…"
            } else {
                "Thread data is unavailable."
            })
            .style(Style::default().fg(colors.text_dim))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.border))
                    .title(" Thread "),
            );
            frame.render_widget(loading, area);
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    // Thread header: title, author, like state, body
    let author = thread
        .author_name
        .clone()
        .unwrap_or_else(|| "Unknown Author".to_string());
    let heart = if thread.user_liked { "♥" } else { "♡" };
    let header_focused = app.community.comment_list_state.selected().is_none();

    let mut header_lines = vec![
        Line::from(vec![
            Span::styled(
                thread.title.clone(),
                Style::default()
                    .fg(if header_focused {
                        colors.accent
                    } else {
                        colors.text
                    })
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} {}", heart, thread.like_count),
                Style::default().fg(colors.error),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "Posted by {} • {}",
                author,
                format_timestamp(&thread.created_at)
            ),
            Style::default().fg(colors.text_dim),
        )),
        Line::from(""),
    ];
    header_lines.extend(wrap_content(
        &thread.content,
        chunks[0].width as usize,
        colors,
    ));

    let header = Paragraph::new(header_lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .title(" Thread "),
    );
    frame.render_widget(header, chunks[0]);

    // Comments, flat list with one level of reply indentation
    let session_user_id = app.session.as_ref().map(|s| s.user_id());
    let items: Vec<ListItem> = app
        .community
        .comments
        .iter()
        .map(|comment| {
            let author = comment
                .username
                .clone()
                .unwrap_or_else(|| "Anonymous".to_string());
            let indent = if comment.parent_comment_id.is_some() {
                "    "
            } else {
                ""
            };
            let heart = if comment.user_liked { "♥" } else { "♡" };
            let edited = if comment.is_edited() { " (edited)" } else { "" };
            let own = session_user_id == Some(comment.user_id);
            let author_style = if own {
                Style::default()
                    .fg(colors.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .fg(colors.primary)
                    .add_modifier(Modifier::BOLD)
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(indent),
                    Span::styled(author, author_style),
                    Span::styled(
                        format!(
                            " • {}{} • {} {}",
                            format_relative(&comment.created_at),
                            edited,
                            heart,
                            comment.like_count
                        ),
                        Style::default().fg(colors.text_dim),
                    ),
                ]),
                Line::from(vec![
                    Span::raw(indent),
                    Span::styled(
                        format!("  {}", truncate(&comment.content, 110)),
                        Style::default().fg(colors.text),
                    ),
                ]),
            ])
        })
        .collect();

    let comments_title = format!(" Comments ({}) ", app.community.comments.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .title(comments_title),
        )
        .highlight_style(Style::default().bg(colors.highlight_bg));

    frame.render_stateful_widget(list, chunks[1], &mut app.community.comment_list_state);
}

fn render_new_thread_form(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    let form = match &app.community.new_thread {
        Some(form) => form,
        None => return,
    };

    let error = app.community.error.clone();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(if error.is_some() { 1 } else { 0 }),
            Constraint::Min(0),
        ])
        .split(area);

    if let Some(error) = error {
        let error_line = Paragraph::new(error).style(Style::default().fg(colors.error));
        frame.render_widget(error_line, chunks[1]);
    }

    let title_style = if form.editing_title {
        Style::default().fg(colors.accent)
    } else {
        Style::default().fg(colors.border)
    };
    let title_field = Paragraph::new(form.title.clone()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(title_style)
            .title(" Title "),
    );
    frame.render_widget(title_field, chunks[0]);

    let content_style = if form.editing_title {
        Style::default().fg(colors.border)
    } else {
        Style::default().fg(colors.accent)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(content_style)
        .title(" Content (Ctrl+S to post) ");
    let inner = block.inner(chunks[2]);
    frame.render_widget(block, chunks[2]);
    frame.render_widget(&form.content, inner);
}

// ============================================================================
// JOURNAL
// ============================================================================

fn render_journal(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    // Entry detail view replaces the list
    if let Some(entry_id) = app.journal.viewing {
        if let Some(entry) = app.journal.entries.iter().find(|e| e.id == entry_id) {
            let mut lines = vec![
                Line::from(Span::styled(
                    entry.title.clone(),
                    Style::default()
                        .fg(colors.text)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!(
                        "{} • mood: {}{}",
                        format_timestamp(&entry.created_at),
                        entry.mood.as_str(),
                        if entry.is_locked { " • locked" } else { "" }
                    ),
                    Style::default().fg(colors.text_dim),
                )),
                Line::from(""),
            ];
            lines.extend(wrap_content(&entry.content, area.width as usize, colors));

            let detail = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.border))
                    .title(" Journal Entry (Esc to close) "),
            );
            frame.render_widget(detail, area);
        }
        return;
    }

    let title = if app.journal.loading {
        " Journal (loading…) "
    } else {
        " Journal "
    };

    if let Some(error) = &app.journal.error {
        let error_widget = Paragraph::new(format!("{}\n\nPress r to retry.", error.clone()))
            .style(Style::default().fg(colors.error))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.error))
                    .title(title),
            );
        frame.render_widget(error_widget, area);
        return;
    }

    if !app.journal.loading && app.journal.entries.is_empty() {
        let empty = Paragraph::new("No journal entries yet. Press n to write one.")
            .style(Style::default().fg(colors.text_dim))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.border))
                    .title(title),
            );
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .journal
        .entries
        .iter()
        .map(|entry| {
            let readable = app.journal.is_readable(entry);
            let preview = if readable {
                truncate(&entry.content, 80)
            } else {
                "🔒 Locked — press Enter to unlock".to_string()
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        entry.title.clone(),
                        Style::default()
                            .fg(colors.text)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(
                            "  {} • {}",
                            entry.mood.as_str(),
                            format_relative(&entry.created_at)
                        ),
                        Style::default().fg(colors.text_dim),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {}", preview),
                    Style::default().fg(colors.text_dim),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .title(title),
        )
        .highlight_style(Style::default().bg(colors.highlight_bg));

    frame.render_stateful_widget(list, area, &mut app.journal.list_state);
}

// ============================================================================
// MOOD TRACKER
// ============================================================================

fn mood_glyph(mood: MoodKind) -> &'static str {
    match mood {
        MoodKind::Happy => "😊",
        MoodKind::Neutral => "😐",
        MoodKind::Anxious => "😟",
        MoodKind::Sad => "😢",
    }
}

fn render_mood(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    let title = if app.mood.loading {
        " Mood Tracker (loading…) "
    } else {
        " Mood Tracker "
    };

    if let Some(error) = &app.mood.error {
        let error_widget = Paragraph::new(format!("{}\n\nPress r to retry.", error.clone()))
            .style(Style::default().fg(colors.error))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.error))
                    .title(title),
            );
        frame.render_widget(error_widget, area);
        return;
    }

    if !app.mood.loading && app.mood.entries.is_empty() {
        let empty = Paragraph::new("No mood entries yet. Press n to record how you feel.")
            .style(Style::default().fg(colors.text_dim))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.border))
                    .title(title),
            );
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .mood
        .entries
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", mood_glyph(entry.mood))),
                Span::styled(
                    format!("{:<8}", entry.mood.as_str()),
                    Style::default()
                        .fg(colors.text)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "{} — {}",
                        format_relative(&entry.created_at),
                        truncate(&entry.note, 70)
                    ),
                    Style::default().fg(colors.text_dim),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .title(title),
        )
        .highlight_style(Style::default().bg(colors.highlight_bg));

    frame.render_stateful_widget(list, area, &mut app.mood.list_state);
}

// ============================================================================
// REMINDERS
// ============================================================================

fn render_reminders(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    let title = if app.reminders.loading {
        " Reminders (loading…) "
    } else {
        " Reminders "
    };

    if let Some(error) = &app.reminders.error {
        let error_widget = Paragraph::new(error.clone())
            .style(Style::default().fg(colors.error))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.error))
                    .title(title),
            );
        frame.render_widget(error_widget, area);
        return;
    }

    let combined = app.reminders.combined();
    if !app.reminders.loading && combined.is_empty() {
        let empty = Paragraph::new("No reminders yet. Press n to add one.")
            .style(Style::default().fg(colors.text_dim))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.border))
                    .title(title),
            );
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = combined
        .iter()
        .map(|reminder| {
            let toggle = if reminder.enabled { "[x]" } else { "[ ]" };
            let kind = match reminder.kind {
                wisp_types::ReminderKind::Mindfulness => "mindfulness",
                wisp_types::ReminderKind::Water => "water",
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", toggle),
                    Style::default().fg(if reminder.enabled {
                        colors.success
                    } else {
                        colors.text_dim
                    }),
                ),
                Span::styled(
                    format!("{:<5} ", reminder.time),
                    Style::default()
                        .fg(colors.text)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(reminder.title.clone(), Style::default().fg(colors.text)),
                Span::styled(
                    format!("  ({})", kind),
                    Style::default().fg(colors.text_dim),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .title(title),
        )
        .highlight_style(Style::default().bg(colors.highlight_bg));

    frame.render_stateful_widget(list, area, &mut app.reminders.list_state);
}

// ============================================================================
// ADMIN
// ============================================================================

fn render_admin(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    let section_title = match app.admin.section {
        AdminSection::Users => " Admin — Users (s: next section) ",
        AdminSection::Reports => " Admin — Pending Reports (s: next section) ",
        AdminSection::Moods => " Admin — Mood Summary (s: next section) ",
    };

    if let Some(error) = &app.admin.error {
        let error_widget = Paragraph::new(format!("{}\n\nPress r to retry.", error.clone()))
            .style(Style::default().fg(colors.error))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.error))
                    .title(section_title),
            );
        frame.render_widget(error_widget, area);
        return;
    }

    match app.admin.section {
        AdminSection::Users => {
            let items: Vec<ListItem> = app
                .admin
                .users
                .iter()
                .map(|user| {
                    let badge = if user.is_banned {
                        " [BANNED]"
                    } else if user.is_admin {
                        " [admin]"
                    } else {
                        ""
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            user.username.clone(),
                            Style::default()
                                .fg(colors.text)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("  {}{}", user.email, badge),
                            Style::default().fg(if user.is_banned {
                                colors.error
                            } else {
                                colors.text_dim
                            }),
                        ),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(colors.border))
                        .title(section_title),
                )
                .highlight_style(Style::default().bg(colors.highlight_bg));
            frame.render_stateful_widget(list, area, &mut app.admin.users_list_state);
        }
        AdminSection::Reports => {
            let items: Vec<ListItem> = app
                .admin
                .reports
                .iter()
                .map(|report| {
                    let target = match report.target() {
                        Some(wisp_types::ReportTarget::Thread(id)) => format!("thread #{}", id),
                        Some(wisp_types::ReportTarget::Comment(id)) => format!("comment #{}", id),
                        None => "unknown target".to_string(),
                    };
                    ListItem::new(vec![
                        Line::from(Span::styled(
                            format!("Report #{} on {}", report.report_id, target),
                            Style::default()
                                .fg(colors.text)
                                .add_modifier(Modifier::BOLD),
                        )),
                        Line::from(Span::styled(
                            format!("  {}", truncate(&report.reason, 100)),
                            Style::default().fg(colors.text_dim),
                        )),
                    ])
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(colors.border))
                        .title(section_title),
                )
                .highlight_style(Style::default().bg(colors.highlight_bg));
            frame.render_stateful_widget(list, area, &mut app.admin.reports_list_state);
        }
        AdminSection::Moods => {
            let mut lines = vec![Line::from("")];
            if app.admin.mood_summary.is_empty() {
                lines.push(Line::from(Span::styled(
                    "No mood data available.",
                    Style::default().fg(colors.text_dim),
                )));
            } else {
                for summary in &app.admin.mood_summary {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("{:<10}", summary.mood.as_str()),
                            Style::default().fg(colors.text),
                        ),
                        Span::styled(
                            "█".repeat((summary.count.min(60)) as usize),
                            Style::default().fg(colors.secondary),
                        ),
                        Span::styled(
                            format!(" {}", summary.count),
                            Style::default().fg(colors.text_dim),
                        ),
                    ]));
                }
            }
            let chart = Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.border))
                    .title(section_title),
            );
            frame.render_widget(chart, area);
        }
    }
}
