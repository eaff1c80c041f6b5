/// Community navigation. The active `NavigationState` is the single source of
/// truth for which view renders and which fetches run; route strings exist so
/// deep links (`--open /community/threads/42`) and the back stack resolve to
/// exactly the same states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    TopicsList,
    ThreadsList { topic_id: i64 },
    ThreadDetail { thread_id: i64 },
    NewThreadForm { topic_id: i64 },
}

impl NavigationState {
    /// Format this state as its canonical route string.
    pub fn route(&self) -> String {
        match self {
            NavigationState::TopicsList => "/community".to_string(),
            NavigationState::ThreadsList { topic_id } => {
                format!("/community/topics/{}", topic_id)
            }
            NavigationState::ThreadDetail { thread_id } => {
                format!("/community/threads/{}", thread_id)
            }
            NavigationState::NewThreadForm { topic_id } => {
                format!("/community/topics/{}/new", topic_id)
            }
        }
    }

    /// Resolve a route string to a navigation state.
    ///
    /// Anything unrecognized falls back to the topics list rather than
    /// erroring; a bad deep link should land the user somewhere usable.
    pub fn parse_route(route: &str) -> Self {
        let segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["community"] => NavigationState::TopicsList,
            ["community", "topics", id] => match id.parse::<i64>() {
                Ok(topic_id) => NavigationState::ThreadsList { topic_id },
                Err(_) => NavigationState::TopicsList,
            },
            ["community", "topics", id, "new"] => match id.parse::<i64>() {
                Ok(topic_id) => NavigationState::NewThreadForm { topic_id },
                Err(_) => NavigationState::TopicsList,
            },
            ["community", "threads", id] => match id.parse::<i64>() {
                Ok(thread_id) => NavigationState::ThreadDetail { thread_id },
                Err(_) => NavigationState::TopicsList,
            },
            _ => NavigationState::TopicsList,
        }
    }

    /// The state the back key should land on when the back stack is empty.
    pub fn fallback_parent(&self) -> Option<Self> {
        match self {
            NavigationState::TopicsList => None,
            NavigationState::ThreadsList { .. } => Some(NavigationState::TopicsList),
            // Thread detail reached by deep link has no topic context to
            // return to, so fall back to the topics list.
            NavigationState::ThreadDetail { .. } => Some(NavigationState::TopicsList),
            NavigationState::NewThreadForm { topic_id } => Some(NavigationState::ThreadsList {
                topic_id: *topic_id,
            }),
        }
    }
}
