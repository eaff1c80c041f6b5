use wisp::api::ApiClient;
use wisp::app::nav::NavigationState;
use wisp::app::optimistic::{LikeToggle, Likeable};
use wisp::session::SessionStore;

use wisp_types::{SessionContext, Thread, User, UserRole};

fn sample_user() -> User {
    User {
        user_id: 7,
        username: "fern".to_string(),
        email: "fern@example.com".to_string(),
        full_name: Some("Fern Willow".to_string()),
        bio: None,
        role: UserRole::User,
        is_admin: false,
        is_banned: false,
    }
}

fn sample_thread() -> Thread {
    Thread {
        thread_id: 42,
        topic_id: 1,
        title: "Evening routines".to_string(),
        content: "What helps you wind down?".to_string(),
        user_id: 7,
        author_name: Some("fern".to_string()),
        created_at: chrono::Utc::now(),
        like_count: 3,
        user_liked: false,
        comments_count: 2,
    }
}

#[test]
fn test_route_strings_resolve_to_navigation_states() {
    // The states a deep link can land on
    assert_eq!(
        NavigationState::parse_route("/community"),
        NavigationState::TopicsList
    );
    assert_eq!(
        NavigationState::parse_route("/community/topics/3"),
        NavigationState::ThreadsList { topic_id: 3 }
    );
    assert_eq!(
        NavigationState::parse_route("/community/threads/42"),
        NavigationState::ThreadDetail { thread_id: 42 }
    );

    // And each state renders back to the route it parses from
    let state = NavigationState::ThreadDetail { thread_id: 42 };
    assert_eq!(NavigationState::parse_route(&state.route()), state);
}

#[test]
fn test_like_toggle_failure_restores_snapshot() {
    let mut thread = sample_thread();

    let toggle = LikeToggle::capture(&thread);
    toggle.apply(&mut thread);
    assert_eq!(thread.like_state(), (4, true));

    // Simulated server failure
    toggle.rollback(&mut thread);
    assert_eq!(thread.like_state(), (3, false));
}

#[test]
fn test_api_client_uses_configured_base_url() {
    let client = ApiClient::new("http://localhost:9000/api");
    assert_eq!(client.base_url(), "http://localhost:9000/api");
}

#[test]
fn test_session_store_round_trip_in_isolated_home() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let original_home = std::env::var("HOME").ok();
    std::env::set_var("HOME", temp_dir.path());

    let store = SessionStore::new().unwrap();
    let session = SessionContext::new("integration-token-123".to_string(), sample_user());

    store.save(&session).unwrap();
    let loaded = store.load().unwrap().expect("session should round-trip");
    assert_eq!(loaded.token, "integration-token-123");
    assert_eq!(loaded.user.username, "fern");

    store.delete().unwrap();
    assert!(store.load().unwrap().is_none());

    // Restore original environment state
    match original_home {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }
}
