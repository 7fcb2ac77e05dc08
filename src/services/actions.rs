//! Button and counter state driven by action endpoint statuses.

use std::fmt;
use tracing::warn;

use crate::models::status::ActionStatus;

/// Which endpoint a toggle hits next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleRequest {
    /// POST to the add endpoint (like, save, follow).
    Add,
    /// DELETE to the remove endpoint (unlike, unsave, unfollow).
    Remove,
}

/// Parse a counter as displayed on the page. Unparsable text leaves the counter unknown.
pub fn parse_counter(text: &str) -> Option<u64> {
    match text.trim().parse::<u64>() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!(text = %text, error = %e, "unparsable counter");
            None
        }
    }
}

fn bump(count: &mut Option<u64>, up: bool) {
    match count {
        Some(n) if up => *n += 1,
        Some(n) => *n = n.saturating_sub(1),
        None => warn!("counter unknown, left unchanged"),
    }
}

/// Like button with its total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeToggle {
    pub liked: bool,
    pub count: Option<u64>,
}

impl LikeToggle {
    pub fn new(liked: bool, count_text: &str) -> Self {
        Self {
            liked,
            count: parse_counter(count_text),
        }
    }

    pub fn request(&self) -> ToggleRequest {
        if self.liked {
            ToggleRequest::Remove
        } else {
            ToggleRequest::Add
        }
    }

    pub fn apply(&mut self, status: ActionStatus) {
        match status {
            ActionStatus::Liked => {
                self.liked = true;
                bump(&mut self.count, true);
            }
            ActionStatus::Unliked => {
                self.liked = false;
                bump(&mut self.count, false);
            }
            ActionStatus::AlreadyLiked => self.liked = true,
            ActionStatus::NotLiked => self.liked = false,
            other => warn!(status = %other, "unexpected like status"),
        }
    }

    /// Heart glyph shown on the button.
    pub fn glyph(&self) -> char {
        if self.liked {
            '\u{2764}'
        } else {
            '\u{2661}'
        }
    }
}

/// Bookmark button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveToggle {
    pub saved: bool,
}

impl SaveToggle {
    pub fn new(saved: bool) -> Self {
        Self { saved }
    }

    pub fn request(&self) -> ToggleRequest {
        if self.saved {
            ToggleRequest::Remove
        } else {
            ToggleRequest::Add
        }
    }

    pub fn apply(&mut self, status: ActionStatus) {
        match status {
            ActionStatus::Saved | ActionStatus::AlreadySaved => self.saved = true,
            ActionStatus::Unsaved | ActionStatus::NotSaved => self.saved = false,
            other => warn!(status = %other, "unexpected save status"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowLabel {
    Follow,
    Unfollow,
    /// A follow request to a private account is pending.
    Cancel,
}

impl FollowLabel {
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "Unfollow" => FollowLabel::Unfollow,
            "Cancel" => FollowLabel::Cancel,
            _ => FollowLabel::Follow,
        }
    }
}

impl fmt::Display for FollowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FollowLabel::Follow => "Follow",
            FollowLabel::Unfollow => "Unfollow",
            FollowLabel::Cancel => "Cancel",
        })
    }
}

/// Follow button with the followed user's follower total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowButton {
    pub label: FollowLabel,
    pub followers: Option<u64>,
}

impl FollowButton {
    pub fn new(label: &str, followers_text: &str) -> Self {
        Self {
            label: FollowLabel::parse(label),
            followers: parse_counter(followers_text),
        }
    }

    /// Only `Unfollow` deletes; `Cancel` posts again and the server withdraws the request.
    pub fn request(&self) -> ToggleRequest {
        match self.label {
            FollowLabel::Unfollow => ToggleRequest::Remove,
            FollowLabel::Follow | FollowLabel::Cancel => ToggleRequest::Add,
        }
    }

    pub fn apply(&mut self, status: ActionStatus) {
        match status {
            ActionStatus::Followed => {
                self.label = FollowLabel::Unfollow;
                bump(&mut self.followers, true);
            }
            ActionStatus::RequestSent => self.label = FollowLabel::Cancel,
            ActionStatus::Unfollowed => {
                self.label = FollowLabel::Follow;
                bump(&mut self.followers, false);
            }
            ActionStatus::Canceled => self.label = FollowLabel::Follow,
            other => warn!(status = %other, "follow state unchanged"),
        }
    }
}

/// Follow button on a recommended-user card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationButton {
    pub label: FollowLabel,
}

impl Default for RecommendationButton {
    fn default() -> Self {
        Self {
            label: FollowLabel::Follow,
        }
    }
}

impl RecommendationButton {
    pub fn apply(&mut self, status: ActionStatus) {
        self.label = match status {
            ActionStatus::Follow | ActionStatus::Followed => FollowLabel::Unfollow,
            _ => FollowLabel::Follow,
        };
    }
}

/// A comment disappears only when the server confirms the delete.
pub fn comment_removed(status: ActionStatus) -> bool {
    status == ActionStatus::Deleted
}

/// An activity entry disappears only on `Ok`.
pub fn action_removed(status: ActionStatus) -> bool {
    status == ActionStatus::Ok
}
