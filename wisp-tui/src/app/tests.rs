use super::*;
use chrono::{Duration as ChronoDuration, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use wisp_types::{Comment, Thread, User, UserRole};

use crate::app::optimistic::{LikeToggle, Likeable};

/// Helper to create a KeyEvent
fn key_event(code: KeyCode) -> KeyEvent {
    let mut event = KeyEvent::new(code, KeyModifiers::empty());
    event.kind = KeyEventKind::Press;
    event
}

fn test_user(id: i64) -> User {
    User {
        user_id: id,
        username: format!("user{}", id),
        email: format!("user{}@example.com", id),
        full_name: None,
        bio: None,
        role: UserRole::User,
        is_admin: false,
        is_banned: false,
    }
}

fn test_session(user_id: i64) -> SessionContext {
    SessionContext::new("token-1234567890".to_string(), test_user(user_id))
}

fn test_thread(thread_id: i64, author_id: i64) -> Thread {
    Thread {
        thread_id,
        topic_id: 1,
        title: "Dealing with stress".to_string(),
        content: "How do you all unwind after a hard day?".to_string(),
        user_id: author_id,
        author_name: Some(format!("user{}", author_id)),
        created_at: Utc::now(),
        like_count: 3,
        user_liked: false,
        comments_count: 0,
    }
}

fn test_comment(comment_id: i64, author_id: i64, minutes_ago: i64) -> Comment {
    Comment {
        comment_id,
        thread_id: 42,
        parent_comment_id: None,
        user_id: author_id,
        username: Some(format!("user{}", author_id)),
        content: format!("comment {}", comment_id),
        created_at: Utc::now() - ChronoDuration::minutes(minutes_ago),
        updated_at: None,
        like_count: 0,
        user_liked: false,
    }
}

/// App with an installed session, bypassing set_session's load flags.
fn logged_in_app(user_id: i64) -> App {
    let mut app = App::new();
    app.session = Some(test_session(user_id));
    app.current_screen = Screen::Main;
    app
}

// ============================================================================
// VIEW ROUTER
// ============================================================================

#[test]
fn test_route_round_trip() {
    let states = [
        NavigationState::TopicsList,
        NavigationState::ThreadsList { topic_id: 7 },
        NavigationState::ThreadDetail { thread_id: 42 },
        NavigationState::NewThreadForm { topic_id: 7 },
    ];
    for state in states {
        assert_eq!(NavigationState::parse_route(&state.route()), state);
    }
}

#[test]
fn test_route_parse_fallback() {
    assert_eq!(
        NavigationState::parse_route("/community/threads/not-a-number"),
        NavigationState::TopicsList
    );
    assert_eq!(
        NavigationState::parse_route("/somewhere/else"),
        NavigationState::TopicsList
    );
    assert_eq!(NavigationState::parse_route(""), NavigationState::TopicsList);
}

#[test]
fn test_deep_link_resolves_without_topics() {
    let mut app = logged_in_app(1);

    app.open_route("/community/threads/42");

    assert_eq!(app.current_tab, Tab::Community);
    assert_eq!(
        app.community.nav,
        NavigationState::ThreadDetail { thread_id: 42 }
    );
    // The detail fetch is flagged directly; no topics load is required first
    assert!(app.community.pending_load);
    assert!(app.community.topics.is_empty());
}

#[test]
fn test_navigation_clears_child_data() {
    let mut app = logged_in_app(1);
    app.community.thread = Some(test_thread(42, 2));
    app.community.comments.push(test_comment(1, 2, 5));

    app.navigate_to(NavigationState::ThreadsList { topic_id: 7 });

    assert!(app.community.thread.is_none(), "thread should be cleared");
    assert!(app.community.comments.is_empty(), "comments should be cleared");
    assert!(app.community.pending_load);
}

#[test]
fn test_navigation_bumps_epoch() {
    let mut app = logged_in_app(1);
    let before = app.community.epoch;

    app.navigate_to(NavigationState::ThreadsList { topic_id: 7 });
    app.navigate_to(NavigationState::TopicsList);

    assert!(app.community.epoch >= before + 2);
}

#[test]
fn test_stale_results_not_committed() {
    let mut app = logged_in_app(1);
    app.navigate_to(NavigationState::ThreadsList { topic_id: 7 });
    let issued_epoch = app.community.epoch;
    assert!(app.commit_allowed(issued_epoch));

    // The user navigates away while the fetch is in flight
    app.navigate_to(NavigationState::TopicsList);

    assert!(!app.commit_allowed(issued_epoch));
}

#[test]
fn test_back_returns_to_previous_state() {
    let mut app = logged_in_app(1);

    app.navigate_to(NavigationState::ThreadsList { topic_id: 7 });
    app.navigate_to(NavigationState::ThreadDetail { thread_id: 42 });
    app.navigate_back();

    assert_eq!(
        app.community.nav,
        NavigationState::ThreadsList { topic_id: 7 }
    );
}

#[test]
fn test_back_from_deep_link_falls_back_to_topics() {
    let mut app = logged_in_app(1);
    app.open_route("/community/threads/42");

    app.navigate_back();

    assert_eq!(app.community.nav, NavigationState::TopicsList);
}

#[test]
fn test_revisiting_state_refetches() {
    let mut app = logged_in_app(1);

    app.navigate_to(NavigationState::ThreadsList { topic_id: 7 });
    app.community.pending_load = false; // pretend the load finished
    app.navigate_to(NavigationState::TopicsList);
    app.community.pending_load = false;
    app.navigate_to(NavigationState::ThreadsList { topic_id: 7 });

    // A -> B -> A fetches A again, it never shows a stale cache
    assert!(app.community.pending_load);
}

// ============================================================================
// OPTIMISTIC MUTATION ENGINE
// ============================================================================

#[test]
fn test_like_toggle_apply_and_rollback() {
    let mut thread = test_thread(42, 2);
    thread.like_count = 3;
    thread.user_liked = false;

    let toggle = LikeToggle::capture(&thread);
    toggle.apply(&mut thread);
    assert_eq!(thread.like_state(), (4, true));

    // Server call failed: state reverts to exactly the pre-toggle snapshot
    toggle.rollback(&mut thread);
    assert_eq!(thread.like_state(), (3, false));
}

#[test]
fn test_like_toggle_unlike() {
    let mut comment = test_comment(1, 2, 5);
    comment.like_count = 1;
    comment.user_liked = true;

    let toggle = LikeToggle::capture(&comment);
    toggle.apply(&mut comment);
    assert_eq!(comment.like_state(), (0, false));

    toggle.rollback(&mut comment);
    assert_eq!(comment.like_state(), (1, true));
}

#[test]
fn test_unlike_saturates_at_zero() {
    // A server-side count we never saw could leave like_count at 0 while
    // user_liked is true; unliking must not go negative
    let mut comment = test_comment(1, 2, 5);
    comment.like_count = 0;
    comment.user_liked = true;

    let toggle = LikeToggle::capture(&comment);
    toggle.apply(&mut comment);
    assert_eq!(comment.like_state(), (0, false));
}

#[test]
fn test_liked_implies_positive_count() {
    let mut thread = test_thread(42, 2);
    thread.like_count = 0;
    thread.user_liked = false;

    let toggle = LikeToggle::capture(&thread);
    toggle.apply(&mut thread);

    let (count, liked) = thread.like_state();
    assert!(liked);
    assert!(count >= 1, "user_liked implies like_count >= 1");
}

#[test]
fn test_in_flight_like_blocks_second_toggle() {
    let mut app = logged_in_app(1);
    let key = optimistic::LikeKey::Thread(42);

    assert!(app.community.in_flight_likes.insert(key));
    // While the first toggle is settling, a second must not start
    assert!(!app.community.in_flight_likes.insert(key));

    app.community.in_flight_likes.remove(&key);
    assert!(app.community.in_flight_likes.insert(key));
}

#[test]
fn test_insert_comment_sorted_not_appended() {
    let mut comments = vec![
        test_comment(1, 2, 60),
        test_comment(2, 2, 30),
        test_comment(3, 2, 10),
    ];

    // A comment older than the last one must land in the middle, not the end
    let newcomer = test_comment(4, 2, 20);
    insert_comment_sorted(&mut comments, newcomer);

    let order: Vec<i64> = comments.iter().map(|c| c.comment_id).collect();
    assert_eq!(order, vec![1, 2, 4, 3]);

    for pair in comments.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
    }
}

#[tokio::test]
async fn test_whitespace_comment_submit_is_noop() {
    let mut app = logged_in_app(1);
    app.community.nav = NavigationState::ThreadDetail { thread_id: 42 };
    app.community.thread = Some(test_thread(42, 2));
    app.open_composer_new_comment();
    app.community.composer.textarea.insert_str("   \n\t  ");

    app.submit_composer().await.unwrap();

    // No request went out: the composer stays open, untouched, nothing posted
    assert!(app.community.composer.is_open());
    assert!(app.community.comments.is_empty());
    assert!(!app.community.submitting);
    assert_eq!(app.community.thread.as_ref().unwrap().comments_count, 0);
}

#[tokio::test]
async fn test_empty_report_reason_is_noop() {
    let mut app = logged_in_app(1);
    app.open_report(wisp_types::ReportTarget::Thread(42));
    if let Some(draft) = &mut app.community.report {
        draft.reason = "   ".to_string();
    }

    app.submit_report().await.unwrap();

    // The dialog stays open until a non-empty reason is provided
    assert!(app.community.report.is_some());
}

// ============================================================================
// KEY HANDLING
// ============================================================================

#[test]
fn test_escape_closes_help_modal_first() {
    let mut app = logged_in_app(1);
    app.show_help = true;
    app.running = true;

    app.handle_key_event(key_event(KeyCode::Esc)).unwrap();

    assert!(!app.show_help, "Help modal should be closed");
    assert!(app.running, "App should still be running");
}

#[test]
fn test_question_mark_toggles_help() {
    let mut app = logged_in_app(1);
    app.input_mode = InputMode::Navigation;

    app.handle_key_event(key_event(KeyCode::Char('?'))).unwrap();
    assert!(app.show_help);

    app.handle_key_event(key_event(KeyCode::Char('?'))).unwrap();
    assert!(!app.show_help);
}

#[test]
fn test_like_key_targets_thread_when_header_focused() {
    let mut app = logged_in_app(1);
    app.current_tab = Tab::Community;
    app.community.nav = NavigationState::ThreadDetail { thread_id: 42 };
    app.community.thread = Some(test_thread(42, 2));
    app.community.comments.push(test_comment(1, 2, 5));
    app.community.comment_list_state.select(None);

    app.handle_key_event(key_event(KeyCode::Char('l'))).unwrap();

    assert_eq!(app.pending_action, Some(PendingAction::ToggleThreadLike));
}

#[test]
fn test_like_key_targets_selected_comment() {
    let mut app = logged_in_app(1);
    app.current_tab = Tab::Community;
    app.community.nav = NavigationState::ThreadDetail { thread_id: 42 };
    app.community.thread = Some(test_thread(42, 2));
    app.community.comments.push(test_comment(9, 2, 5));
    app.community.comment_list_state.select(Some(0));

    app.handle_key_event(key_event(KeyCode::Char('l'))).unwrap();

    assert_eq!(app.pending_action, Some(PendingAction::ToggleCommentLike(9)));
}

#[test]
fn test_edit_affordance_only_for_own_comments() {
    let mut app = logged_in_app(1);
    app.current_tab = Tab::Community;
    app.community.nav = NavigationState::ThreadDetail { thread_id: 42 };
    app.community.thread = Some(test_thread(42, 2));
    app.community.comments.push(test_comment(9, 2, 5)); // authored by user 2
    app.community.comment_list_state.select(Some(0));

    app.handle_key_event(key_event(KeyCode::Char('e'))).unwrap();
    assert!(
        !app.community.composer.is_open(),
        "must not edit someone else's comment"
    );

    app.handle_key_event(key_event(KeyCode::Char('x'))).unwrap();
    assert!(
        app.community.confirm_delete_comment.is_none(),
        "must not delete someone else's comment"
    );
}

#[test]
fn test_edit_opens_for_own_comment() {
    let mut app = logged_in_app(1);
    app.current_tab = Tab::Community;
    app.community.nav = NavigationState::ThreadDetail { thread_id: 42 };
    app.community.thread = Some(test_thread(42, 2));
    app.community.comments.push(test_comment(9, 1, 5)); // own comment
    app.community.comment_list_state.select(Some(0));

    app.handle_key_event(key_event(KeyCode::Char('e'))).unwrap();

    assert!(app.community.composer.is_open());
    assert!(matches!(
        app.community.composer.mode,
        Some(ComposerMode::EditComment { comment_id: 9 })
    ));
}

#[test]
fn test_report_not_offered_for_own_thread() {
    let mut app = logged_in_app(1);
    app.current_tab = Tab::Community;
    app.community.nav = NavigationState::ThreadDetail { thread_id: 42 };
    app.community.thread = Some(test_thread(42, 1)); // own thread
    app.community.comment_list_state.select(None);

    app.handle_key_event(key_event(KeyCode::Char('t'))).unwrap();

    assert!(app.community.report.is_none());
}

#[test]
fn test_banned_user_cannot_interact_with_community() {
    let mut app = logged_in_app(1);
    if let Some(session) = &mut app.session {
        session.user.is_banned = true;
    }
    app.current_tab = Tab::Community;
    app.community.nav = NavigationState::ThreadDetail { thread_id: 42 };
    app.community.thread = Some(test_thread(42, 2));

    app.handle_key_event(key_event(KeyCode::Char('l'))).unwrap();
    app.handle_key_event(key_event(KeyCode::Char('c'))).unwrap();

    assert!(app.pending_action.is_none());
    assert!(!app.community.composer.is_open());
}

#[test]
fn test_delete_confirmation_flow() {
    let mut app = logged_in_app(1);
    app.current_tab = Tab::Community;
    app.community.nav = NavigationState::ThreadDetail { thread_id: 42 };
    app.community.thread = Some(test_thread(42, 2));
    app.community.comments.push(test_comment(9, 1, 5));
    app.community.comment_list_state.select(Some(0));

    app.handle_key_event(key_event(KeyCode::Char('x'))).unwrap();
    assert_eq!(app.community.confirm_delete_comment, Some(9));

    // Any key that isn't y/Enter cancels
    app.handle_key_event(key_event(KeyCode::Char('o'))).unwrap();
    assert!(app.community.confirm_delete_comment.is_none());
    assert!(app.pending_action.is_none());
}

#[test]
fn test_tab_cycle_skips_admin_for_regular_users() {
    let mut app = logged_in_app(1);
    app.current_tab = Tab::Reminders;

    app.next_tab();

    assert_eq!(app.current_tab, Tab::Home, "admin tab is hidden");
}

#[test]
fn test_tab_cycle_includes_admin_for_admins() {
    let mut app = logged_in_app(1);
    if let Some(session) = &mut app.session {
        session.user.is_admin = true;
    }
    app.current_tab = Tab::Reminders;

    app.next_tab();

    assert_eq!(app.current_tab, Tab::Admin);
}

#[test]
fn test_auth_field_cycling() {
    let mut app = App::new();
    assert_eq!(app.auth_state.focused, AuthField::Email);

    app.handle_key_event(key_event(KeyCode::Tab)).unwrap();
    assert_eq!(app.auth_state.focused, AuthField::Password);

    app.handle_key_event(key_event(KeyCode::Tab)).unwrap();
    assert_eq!(app.auth_state.focused, AuthField::Email);
}

#[test]
fn test_auth_mode_toggle() {
    let mut app = App::new();
    let mut event = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
    event.kind = KeyEventKind::Press;

    app.handle_key_event(event).unwrap();
    assert_eq!(app.auth_state.mode, AuthMode::Signup);
    assert_eq!(app.auth_state.focused, AuthField::Username);
}

#[test]
fn test_auth_typing_goes_to_focused_field() {
    let mut app = App::new();
    for c in "me@example.com".chars() {
        app.handle_key_event(key_event(KeyCode::Char(c))).unwrap();
    }
    assert_eq!(app.auth_state.email, "me@example.com");

    app.handle_key_event(key_event(KeyCode::Backspace)).unwrap();
    assert_eq!(app.auth_state.email, "me@example.co");
}

// ============================================================================
// MISC
// ============================================================================

#[test]
fn test_clock_time_validation() {
    assert!(is_valid_clock_time("08:30"));
    assert!(is_valid_clock_time("23:59"));
    assert!(is_valid_clock_time("00:00"));

    assert!(!is_valid_clock_time("24:00"));
    assert!(!is_valid_clock_time("12:60"));
    assert!(!is_valid_clock_time("8:30"));
    assert!(!is_valid_clock_time("0830"));
    assert!(!is_valid_clock_time("aa:bb"));
    assert!(!is_valid_clock_time(""));
}

#[test]
fn test_mood_from_level_mapping() {
    assert_eq!(MoodKind::from_level(10), MoodKind::Happy);
    assert_eq!(MoodKind::from_level(7), MoodKind::Happy);
    assert_eq!(MoodKind::from_level(5), MoodKind::Neutral);
    assert_eq!(MoodKind::from_level(3), MoodKind::Anxious);
    assert_eq!(MoodKind::from_level(1), MoodKind::Sad);
}

#[test]
fn test_reminders_combined_order() {
    let mut app = logged_in_app(1);
    app.reminders.mindfulness.push(wisp_types::Reminder {
        id: 1,
        kind: ReminderKind::Mindfulness,
        title: "Breathe".to_string(),
        time: "08:00".to_string(),
        enabled: true,
    });
    app.reminders.water.push(wisp_types::Reminder {
        id: 2,
        kind: ReminderKind::Water,
        title: "Drink".to_string(),
        time: "10:00".to_string(),
        enabled: false,
    });

    let combined = app.reminders.combined();
    assert_eq!(combined.len(), 2);
    assert_eq!(combined[0].id, 1);
    assert_eq!(combined[1].id, 2);
}

#[test]
fn test_logout_resets_to_auth_screen() {
    let mut app = logged_in_app(1);
    app.community.topics.push(wisp_types::Topic {
        topic_id: 1,
        name: "Anxiety".to_string(),
        description: None,
        thread_count: Some(3),
    });

    app.reset_to_auth();

    assert_eq!(app.current_screen, Screen::Auth);
    assert!(app.session.is_none());
    assert!(app.community.topics.is_empty());
}
