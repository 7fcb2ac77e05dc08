//! HTTP actions: likes, saves, comment and activity deletes, follows. CSRF-guarded, same-origin only.

use reqwest::{header, redirect, Method};
use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::models::status::{ActionStatus, StatusResponse};
use crate::services::actions::{
    action_removed, comment_removed, FollowButton, LikeToggle, RecommendationButton, SaveToggle,
    ToggleRequest,
};

pub const CSRF_COOKIE: &str = "csrftoken";
pub const HEADER_CSRF: &str = "x-csrftoken";

/// Pull the anti-forgery token out of a `Cookie` header value.
pub fn csrf_from_cookie_header(cookies: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CSRF_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Client for the site's state-toggling endpoints.
#[derive(Clone)]
pub struct ActionsClient {
    http: reqwest::Client,
    origin: Url,
    cookie: String,
    csrf_token: String,
}

impl ActionsClient {
    /// `origin` is the page origin; `cookie` is the browser's cookie header and must carry `csrftoken`.
    pub fn new(origin: Url, cookie: &str) -> ClientResult<Self> {
        let csrf_token = csrf_from_cookie_header(cookie)
            .ok_or_else(|| ClientError::Config(format!("no {} cookie", CSRF_COOKIE)))?;
        let allowed = origin.origin();
        let http = reqwest::Client::builder()
            .redirect(redirect::Policy::custom(move |attempt| {
                if attempt.url().origin() == allowed {
                    attempt.follow()
                } else {
                    attempt.error("cross-origin redirect blocked")
                }
            }))
            .build()?;
        Ok(Self {
            http,
            origin,
            cookie: cookie.to_string(),
            csrf_token,
        })
    }

    /// Resolve `path` against the origin, refusing anything that leaves it.
    pub fn resolve(&self, path: &str) -> ClientResult<Url> {
        let url = self.origin.join(path)?;
        if url.origin() != self.origin.origin() {
            return Err(ClientError::CrossOrigin(url.to_string()));
        }
        Ok(url)
    }

    async fn call(&self, method: Method, path: &str) -> ClientResult<ActionStatus> {
        let url = self.resolve(path)?;
        debug!(method = %method, url = %url, "action request");
        let body: StatusResponse = self
            .http
            .request(method.clone(), url.clone())
            .header(HEADER_CSRF, &self.csrf_token)
            .header(header::COOKIE, &self.cookie)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let status = body.parse()?;
        info!(method = %method, url = %url, status = %status, "action done");
        Ok(status)
    }

    pub async fn like_post(&self, post_id: u64) -> ClientResult<ActionStatus> {
        self.call(Method::POST, &format!("/posts/{}/like/", post_id)).await
    }

    pub async fn unlike_post(&self, post_id: u64) -> ClientResult<ActionStatus> {
        self.call(Method::DELETE, &format!("/posts/{}/unlike/", post_id)).await
    }

    pub async fn save_post(&self, post_id: u64) -> ClientResult<ActionStatus> {
        self.call(Method::POST, &format!("/posts/{}/save/", post_id)).await
    }

    pub async fn unsave_post(&self, post_id: u64) -> ClientResult<ActionStatus> {
        self.call(Method::DELETE, &format!("/posts/{}/unsave/", post_id)).await
    }

    pub async fn delete_comment(&self, post_id: u64, comment_id: u64) -> ClientResult<ActionStatus> {
        self.call(
            Method::DELETE,
            &format!("/posts/{}/delete-comment/{}/", post_id, comment_id),
        )
        .await
    }

    pub async fn delete_action(&self, action_id: u64) -> ClientResult<ActionStatus> {
        self.call(Method::DELETE, &format!("/delete-action/{}/", action_id)).await
    }

    pub async fn follow(&self, user_slug: &str) -> ClientResult<ActionStatus> {
        self.call(Method::POST, &format!("/users/{}/follow/", user_slug)).await
    }

    pub async fn unfollow(&self, user_slug: &str) -> ClientResult<ActionStatus> {
        self.call(Method::DELETE, &format!("/users/{}/unfollow/", user_slug)).await
    }

    /// Click on a like button: unlike if liked, like otherwise. The toggle is untouched on error.
    pub async fn toggle_like(&self, post_id: u64, like: &mut LikeToggle) -> ClientResult<ActionStatus> {
        let status = match like.request() {
            ToggleRequest::Add => self.like_post(post_id).await?,
            ToggleRequest::Remove => self.unlike_post(post_id).await?,
        };
        like.apply(status);
        Ok(status)
    }

    pub async fn toggle_save(&self, post_id: u64, save: &mut SaveToggle) -> ClientResult<ActionStatus> {
        let status = match save.request() {
            ToggleRequest::Add => self.save_post(post_id).await?,
            ToggleRequest::Remove => self.unsave_post(post_id).await?,
        };
        save.apply(status);
        Ok(status)
    }

    /// Click on a follow button, on a profile or in a followers list.
    pub async fn toggle_follow(&self, user_slug: &str, button: &mut FollowButton) -> ClientResult<ActionStatus> {
        let status = match button.request() {
            ToggleRequest::Add => self.follow(user_slug).await?,
            ToggleRequest::Remove => self.unfollow(user_slug).await?,
        };
        button.apply(status);
        Ok(status)
    }

    pub async fn accept_recommendation(
        &self,
        user_slug: &str,
        button: &mut RecommendationButton,
    ) -> ClientResult<ActionStatus> {
        let status = self.follow(user_slug).await?;
        button.apply(status);
        Ok(status)
    }

    /// Returns whether the comment should be removed from the page.
    pub async fn remove_comment(&self, post_id: u64, comment_id: u64) -> ClientResult<bool> {
        Ok(comment_removed(self.delete_comment(post_id, comment_id).await?))
    }

    /// Returns whether the activity entry should be removed from the page.
    pub async fn remove_action(&self, action_id: u64) -> ClientResult<bool> {
        Ok(action_removed(self.delete_action(action_id).await?))
    }
}
