use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ComposerMode, ReminderField, Tab};
use wisp_types::{MoodKind, ReportTarget};

use super::theme::ThemeColors;

/// Helper to create a centered rect using a percentage of the available area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn modal_block(title: &str, colors: &ThemeColors) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.accent))
        .title(format!(" {} ", title))
        .style(Style::default().bg(colors.background))
}

/// Render whichever modal the current tab has open.
pub fn render_tab_modals(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    match app.current_tab {
        Tab::Community => render_community_modals(frame, app, area, colors),
        Tab::Journal => render_journal_modals(frame, app, area, colors),
        Tab::Mood => render_mood_modals(frame, app, area, colors),
        Tab::Reminders => render_reminders_modals(frame, app, area, colors),
        Tab::Admin => render_admin_modals(frame, app, area, colors),
        Tab::Home => {}
    }
}

fn render_community_modals(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    if let Some(comment_id) = app.community.confirm_delete_comment {
        render_confirm(
            frame,
            area,
            colors,
            "Delete Comment?",
            &format!(
                "Are you sure you want to delete comment #{}?\nThis action cannot be undone.",
                comment_id
            ),
        );
        return;
    }

    if let Some(draft) = &app.community.report {
        let popup = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup);

        let target_label = match draft.target {
            ReportTarget::Thread(_) => "Thread",
            ReportTarget::Comment(_) => "Comment",
        };
        let lines = vec![
            Line::from(Span::styled(
                "Please provide a reason for reporting this content.",
                Style::default().fg(colors.text),
            )),
            Line::from(Span::styled(
                "Your report will be reviewed by administrators.",
                Style::default().fg(colors.text_dim),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Reason: ", Style::default().fg(colors.text_dim)),
                Span::styled(draft.reason.clone(), Style::default().fg(colors.text)),
                Span::styled("_", Style::default().fg(colors.accent)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                if draft.reason.trim().is_empty() {
                    "Enter a reason to enable submit"
                } else {
                    "Enter: submit • Esc: cancel"
                },
                Style::default().fg(colors.text_dim),
            )),
        ];

        let modal = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(modal_block(&format!("Report {}", target_label), colors));
        frame.render_widget(modal, popup);
        return;
    }

    if app.community.composer.is_open() {
        let popup = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup);

        let title = match &app.community.composer.mode {
            Some(ComposerMode::NewComment) => "Leave a Comment".to_string(),
            Some(ComposerMode::Reply { parent_author, .. }) => {
                format!("Replying to {}", parent_author)
            }
            Some(ComposerMode::EditComment { .. }) => "Edit Comment".to_string(),
            None => return,
        };

        let block = modal_block(&format!("{} (Ctrl+S to submit)", title), colors);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(&app.community.composer.textarea, chunks[0]);

        let status = if app.community.submitting {
            "Posting…"
        } else {
            "Esc: cancel"
        };
        let footer = Paragraph::new(status)
            .style(Style::default().fg(colors.text_dim))
            .alignment(Alignment::Right);
        frame.render_widget(footer, chunks[1]);
    }
}

fn render_journal_modals(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    if let Some(prompt) = &app.journal.unlock {
        let popup = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup);

        let mut lines = vec![
            Line::from(Span::styled(
                "This entry is locked. Enter your journal password.",
                Style::default().fg(colors.text),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Password: ", Style::default().fg(colors.text_dim)),
                Span::styled(
                    "*".repeat(prompt.password.chars().count()),
                    Style::default().fg(colors.text),
                ),
                Span::styled("_", Style::default().fg(colors.accent)),
            ]),
        ];
        if let Some(error) = &prompt.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(colors.error),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter: unlock • Esc: cancel",
            Style::default().fg(colors.text_dim),
        )));

        let modal = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(modal_block("Unlock Entry", colors));
        frame.render_widget(modal, popup);
        return;
    }

    if let Some(editor) = &app.journal.editor {
        let popup = centered_rect(80, 70, area);
        frame.render_widget(Clear, popup);

        let title = if editor.entry_id.is_some() {
            "Edit Journal Entry"
        } else {
            "New Journal Entry"
        };
        let block = modal_block(&format!("{} (Ctrl+S to save)", title), colors);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let title_style = if editor.editing_title {
            Style::default().fg(colors.accent)
        } else {
            Style::default().fg(colors.text)
        };
        let title_line = Paragraph::new(Line::from(vec![
            Span::styled("Title: ", Style::default().fg(colors.text_dim)),
            Span::styled(editor.title.clone(), title_style),
            Span::styled(
                if editor.editing_title { "_" } else { "" },
                Style::default().fg(colors.accent),
            ),
        ]));
        frame.render_widget(title_line, chunks[0]);

        let category = editor
            .category_index
            .and_then(|i| app.journal.categories.get(i))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "none".to_string());
        let meta_line = Paragraph::new(Line::from(Span::styled(
            format!(
                "mood: {} (Ctrl+G) • category: {} (Ctrl+F) • locked: {} (Ctrl+X)",
                editor.mood.as_str(),
                category,
                if editor.is_locked { "yes" } else { "no" }
            ),
            Style::default().fg(colors.text_dim),
        )));
        frame.render_widget(meta_line, chunks[1]);

        frame.render_widget(&editor.content, chunks[2]);

        let footer = Paragraph::new("Tab: title/body • Esc: cancel")
            .style(Style::default().fg(colors.text_dim))
            .alignment(Alignment::Right);
        frame.render_widget(footer, chunks[3]);
    }
}

fn render_mood_modals(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    if let Some(editor) = &app.mood.editor {
        let popup = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup);

        let block = modal_block("How are you feeling? (Ctrl+S to save)", colors);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let filled = editor.level as usize;
        let gauge_line = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    format!("Level {:>2}/10  ", editor.level),
                    Style::default().fg(colors.text),
                ),
                Span::styled("●".repeat(filled), Style::default().fg(colors.secondary)),
                Span::styled(
                    "○".repeat(10 - filled),
                    Style::default().fg(colors.text_dim),
                ),
                Span::styled(
                    format!("  → {}", MoodKind::from_level(editor.level).as_str()),
                    Style::default().fg(colors.accent),
                ),
            ]),
            Line::from(Span::styled(
                "PgUp/PgDn: adjust level",
                Style::default().fg(colors.text_dim),
            )),
        ]);
        frame.render_widget(gauge_line, chunks[0]);

        frame.render_widget(&editor.note, chunks[1]);

        let footer = Paragraph::new("Note is required • Esc: cancel")
            .style(Style::default().fg(colors.text_dim))
            .alignment(Alignment::Right);
        frame.render_widget(footer, chunks[2]);
    }
}

fn render_reminders_modals(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    if let Some((kind, id)) = app.reminders.confirm_delete {
        render_confirm(
            frame,
            area,
            colors,
            "Delete Reminder?",
            &format!(
                "Are you sure you want to delete {} reminder #{}?",
                kind.as_str(),
                id
            ),
        );
        return;
    }

    if let Some(form) = &app.reminders.form {
        let popup = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup);

        let field_style = |field: ReminderField| {
            if form.focused == field {
                Style::default().fg(colors.accent)
            } else {
                Style::default().fg(colors.text)
            }
        };

        let mut lines = vec![
            Line::from(Span::styled(
                format!("Kind: {} (Ctrl+W to switch)", form.kind.as_str()),
                Style::default().fg(colors.text_dim),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Title: ", Style::default().fg(colors.text_dim)),
                Span::styled(form.title.clone(), field_style(ReminderField::Title)),
            ]),
            Line::from(vec![
                Span::styled("Time:  ", Style::default().fg(colors.text_dim)),
                Span::styled(form.time.clone(), field_style(ReminderField::Time)),
                Span::styled(" (HH:MM)", Style::default().fg(colors.text_dim)),
            ]),
        ];
        if let Some(error) = &form.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(colors.error),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Tab: next field • Enter: add • Esc: cancel",
            Style::default().fg(colors.text_dim),
        )));

        let modal = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(modal_block("Add Reminder", colors));
        frame.render_widget(modal, popup);
    }
}

fn render_admin_modals(frame: &mut Frame, app: &mut App, area: Rect, colors: &ThemeColors) {
    if let Some(confirm) = app.admin.confirm {
        let description = match confirm {
            crate::app::AdminConfirm::DeleteUser(id) => {
                format!("Delete user #{} and all their content?", id)
            }
            crate::app::AdminConfirm::DeleteThread(id) => {
                format!("Delete reported thread #{}?", id)
            }
            crate::app::AdminConfirm::DeleteComment(id) => {
                format!("Delete reported comment #{}?", id)
            }
        };
        render_confirm(
            frame,
            area,
            colors,
            "Confirm Delete",
            &format!("{}\nThis action cannot be undone.", description),
        );
    }
}

fn render_confirm(frame: &mut Frame, area: Rect, colors: &ThemeColors, title: &str, body: &str) {
    let popup = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup);

    let mut lines: Vec<Line> = body
        .lines()
        .map(|l| {
            Line::from(Span::styled(
                l.to_string(),
                Style::default().fg(colors.text),
            ))
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "y/Enter: confirm • any other key: cancel",
        Style::default().fg(colors.text_dim),
    )));

    let modal = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(modal_block(title, colors));
    frame.render_widget(modal, popup);
}

pub fn render_help_modal(frame: &mut Frame, area: Rect, colors: &ThemeColors) {
    let popup = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup);

    let entries: &[(&str, &str)] = &[
        ("Tab / Shift+Tab", "switch tab"),
        ("j / k, ↓ / ↑", "move selection"),
        ("Enter", "open / confirm"),
        ("Esc", "back / close / quit"),
        ("r", "refresh current view"),
        ("n", "new (thread, entry, reminder)"),
        ("l", "like thread or comment"),
        ("c", "comment on thread"),
        ("R", "reply to selected comment"),
        ("e / x", "edit / delete own comment"),
        ("t", "report thread or comment"),
        ("Ctrl+S", "submit composer / editor"),
        ("L", "log out"),
        ("q", "quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (keys, description) in entries {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<18}", keys),
                Style::default()
                    .fg(colors.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(*description, Style::default().fg(colors.text)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press ? or Esc to close",
        Style::default().fg(colors.text_dim),
    )));

    let modal = Paragraph::new(lines).block(modal_block("Keyboard Shortcuts", colors));
    frame.render_widget(modal, popup);
}
