use wisp_types::{Comment, Thread};

/// Entities whose like state can be toggled optimistically.
pub trait Likeable {
    fn like_state(&self) -> (i64, bool);
    fn set_like_state(&mut self, like_count: i64, user_liked: bool);
}

impl Likeable for Thread {
    fn like_state(&self) -> (i64, bool) {
        (self.like_count, self.user_liked)
    }

    fn set_like_state(&mut self, like_count: i64, user_liked: bool) {
        self.like_count = like_count;
        self.user_liked = user_liked;
    }
}

impl Likeable for Comment {
    fn like_state(&self) -> (i64, bool) {
        (self.like_count, self.user_liked)
    }

    fn set_like_state(&mut self, like_count: i64, user_liked: bool) {
        self.like_count = like_count;
        self.user_liked = user_liked;
    }
}

/// Command object for a single like toggle.
///
/// `capture` snapshots the entity, `apply` writes the flipped state derived
/// from that snapshot, and `rollback` restores it verbatim. Both directions
/// read the same captured values, so the revert path cannot drift from the
/// apply path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    prev_count: i64,
    prev_liked: bool,
}

impl LikeToggle {
    pub fn capture<T: Likeable>(entity: &T) -> Self {
        let (prev_count, prev_liked) = entity.like_state();
        Self {
            prev_count,
            prev_liked,
        }
    }

    /// Flip the like locally. Unliking saturates at zero so a server-side
    /// count we never saw can't push the display negative.
    pub fn apply<T: Likeable>(&self, entity: &mut T) {
        if self.prev_liked {
            entity.set_like_state((self.prev_count - 1).max(0), false);
        } else {
            entity.set_like_state(self.prev_count + 1, true);
        }
    }

    /// Restore the exact snapshot taken at capture time.
    pub fn rollback<T: Likeable>(&self, entity: &mut T) {
        entity.set_like_state(self.prev_count, self.prev_liked);
    }
}

/// Identifies an entity with an in-flight like request. While a key is in the
/// in-flight set, no second toggle may start on the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeKey {
    Thread(i64),
    Comment(i64),
}
