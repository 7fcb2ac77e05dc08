//! Status labels returned by the site's action endpoints as `{"status": "<label>"}`.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// Every label the action endpoints are known to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Liked,
    Unliked,
    AlreadyLiked,
    NotLiked,
    Saved,
    Unsaved,
    AlreadySaved,
    NotSaved,
    Deleted,
    DeleteDenied,
    Ok,
    Followed,
    RequestSent,
    Unfollowed,
    Canceled,
    AlreadyFollowed,
    NotFollowed,
    Follow,
}

impl ActionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ActionStatus::Liked => "Liked",
            ActionStatus::Unliked => "Unliked",
            ActionStatus::AlreadyLiked => "Already liked",
            ActionStatus::NotLiked => "Post not liked",
            ActionStatus::Saved => "Saved",
            ActionStatus::Unsaved => "Unsaved",
            ActionStatus::AlreadySaved => "Already saved",
            ActionStatus::NotSaved => "Post not saved",
            ActionStatus::Deleted => "Deleted",
            ActionStatus::DeleteDenied => "You can't delete",
            ActionStatus::Ok => "Ok",
            ActionStatus::Followed => "Followed",
            ActionStatus::RequestSent => "Request was sent",
            ActionStatus::Unfollowed => "Unfollowed",
            ActionStatus::Canceled => "Canceled",
            ActionStatus::AlreadyFollowed => "Already followed",
            ActionStatus::NotFollowed => "Not followed",
            ActionStatus::Follow => "Follow",
        }
    }
}

impl FromStr for ActionStatus {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim() {
            "Liked" => ActionStatus::Liked,
            "Unliked" => ActionStatus::Unliked,
            "Already liked" => ActionStatus::AlreadyLiked,
            "Post not liked" => ActionStatus::NotLiked,
            "Saved" => ActionStatus::Saved,
            "Unsaved" => ActionStatus::Unsaved,
            "Already saved" => ActionStatus::AlreadySaved,
            "Post not saved" => ActionStatus::NotSaved,
            "Deleted" => ActionStatus::Deleted,
            "You can't delete" | "You cant delete this comment" => ActionStatus::DeleteDenied,
            "Ok" => ActionStatus::Ok,
            "Followed" => ActionStatus::Followed,
            "Request was sent" => ActionStatus::RequestSent,
            "Unfollowed" => ActionStatus::Unfollowed,
            "Canceled" => ActionStatus::Canceled,
            "Already followed" => ActionStatus::AlreadyFollowed,
            "Not followed" => ActionStatus::NotFollowed,
            "Follow" => ActionStatus::Follow,
            other => return Err(ClientError::UnexpectedStatus(other.to_string())),
        };
        Ok(status)
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw response body of an action endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn parse(&self) -> Result<ActionStatus, ClientError> {
        self.status.parse()
    }
}
