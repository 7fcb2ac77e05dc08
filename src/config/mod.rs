//! Client configuration loaded from environment.

use chrono::Locale;
use url::Url;
use validator::Validate;

use crate::models::session::{ChatKind, SessionContext};

/// Client configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone, Validate)]
pub struct Config {
    /// Page origin the chat belongs to (e.g. `https://copygram.com`).
    pub base_url: Url,
    pub chat_id: u64,
    /// Viewer's username.
    #[validate(length(min = 1))]
    pub user: String,
    pub avatar: String,
    pub kind: ChatKind,
    pub owner: Option<String>,
    /// Messages already in the room when the session starts.
    pub message_count: u64,
    #[validate(length(min = 1))]
    pub leave_url: String,
    #[validate(length(min = 1))]
    pub media_url: String,
    /// Browser cookie header (session id, `csrftoken`).
    pub cookie: Option<String>,
    /// Month names in timestamps. `CHAT_LOCALE`, else `LANG`, else `en_US`.
    pub locale: Locale,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` (variable name -> value).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &'static str| lookup(key).ok_or(ConfigLoadError::Missing(key));

        let base_url = Url::parse(&var("COPYGRAM_URL", "http://127.0.0.1:8000"))
            .map_err(|_| ConfigLoadError::InvalidBaseUrl)?;
        let chat_id = required("CHAT_ID")?
            .trim()
            .parse()
            .map_err(|_| ConfigLoadError::InvalidNumber("CHAT_ID"))?;
        let message_count = var("CHAT_MESSAGE_COUNT", "0")
            .trim()
            .parse()
            .map_err(|_| ConfigLoadError::InvalidNumber("CHAT_MESSAGE_COUNT"))?;
        let kind = var("CHAT_KIND", "private_chat")
            .parse::<ChatKind>()
            .map_err(|e| ConfigLoadError::Invalid(format!("CHAT_KIND: {}", e)))?;
        let locale = match lookup("CHAT_LOCALE") {
            Some(name) => parse_locale(&name)
                .ok_or_else(|| ConfigLoadError::Invalid(format!("CHAT_LOCALE: unknown locale {:?}", name)))?,
            None => lookup("LANG")
                .and_then(|name| parse_locale(&name))
                .unwrap_or(Locale::en_US),
        };

        let config = Self {
            base_url,
            chat_id,
            user: required("CHAT_USER")?,
            avatar: var("CHAT_AVATAR", ""),
            kind,
            owner: lookup("CHAT_OWNER").filter(|o| !o.is_empty()),
            message_count,
            leave_url: var("CHAT_LEAVE_URL", "/groups/"),
            media_url: var("MEDIA_URL", "/media/messages/"),
            cookie: lookup("COOKIE").filter(|c| !c.is_empty()),
            locale,
            log_level: var("LOG_LEVEL", "info"),
        };
        config
            .validate()
            .map_err(|e| ConfigLoadError::Invalid(e.to_string()))?;
        Ok(config)
    }

    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            chat_id: self.chat_id,
            user: self.user.clone(),
            avatar: self.avatar.clone(),
            kind: self.kind,
            owner: self.owner.clone(),
            initial_message_count: self.message_count,
            leave_url: self.leave_url.clone(),
            media_url: self.media_url.clone(),
            locale: self.locale,
        }
    }
}

/// `de_DE`, `de_DE.UTF-8` and `C` style names.
fn parse_locale(name: &str) -> Option<Locale> {
    let name = name.trim().split(['.', '@']).next().unwrap_or_default();
    match name {
        "C" | "POSIX" => Some(Locale::POSIX),
        _ => Locale::try_from(name).ok(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Missing {0}")]
    Missing(&'static str),
    #[error("Invalid COPYGRAM_URL")]
    InvalidBaseUrl,
    #[error("Invalid number in {0}")]
    InvalidNumber(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigLoadError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_for_a_direct_chat() {
        let c = load(&[("CHAT_ID", "7"), ("CHAT_USER", "alice")]).unwrap();
        assert_eq!(c.base_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(c.kind, ChatKind::Direct);
        assert_eq!(c.message_count, 0);
        assert_eq!(c.owner, None);
        assert_eq!(c.media_url, "/media/messages/");
        assert_eq!(c.locale, Locale::en_US);
        let ctx = c.session_context();
        assert_eq!(ctx.chat_id, 7);
        assert!(ctx.can_clear());
    }

    #[test]
    fn group_chat_with_owner() {
        let c = load(&[
            ("CHAT_ID", "3"),
            ("CHAT_USER", "bob"),
            ("CHAT_KIND", "group_chat"),
            ("CHAT_OWNER", "alice"),
            ("CHAT_MESSAGE_COUNT", "12"),
            ("COOKIE", "csrftoken=t"),
        ])
        .unwrap();
        assert_eq!(c.kind, ChatKind::Group);
        assert_eq!(c.cookie.as_deref(), Some("csrftoken=t"));
        assert!(!c.session_context().can_clear());
    }

    #[test]
    fn missing_and_invalid_values() {
        assert!(matches!(load(&[("CHAT_USER", "a")]), Err(ConfigLoadError::Missing("CHAT_ID"))));
        assert!(matches!(
            load(&[("CHAT_ID", "x"), ("CHAT_USER", "a")]),
            Err(ConfigLoadError::InvalidNumber("CHAT_ID"))
        ));
        assert!(matches!(
            load(&[("CHAT_ID", "1"), ("CHAT_USER", "a"), ("COPYGRAM_URL", "not a url")]),
            Err(ConfigLoadError::InvalidBaseUrl)
        ));
        assert!(matches!(
            load(&[("CHAT_ID", "1"), ("CHAT_USER", "")]),
            Err(ConfigLoadError::Invalid(_))
        ));
        for kind in ["group", "private", ""] {
            match load(&[("CHAT_ID", "1"), ("CHAT_USER", "a"), ("CHAT_KIND", kind)]) {
                Err(ConfigLoadError::Invalid(msg)) => assert!(msg.contains("CHAT_KIND"), "{}", msg),
                other => panic!("{:?} accepted: {:?}", kind, other.map(|c| c.kind)),
            }
        }
        assert!(matches!(
            load(&[("CHAT_ID", "1"), ("CHAT_USER", "a"), ("CHAT_LOCALE", "xx_YY")]),
            Err(ConfigLoadError::Invalid(_))
        ));
    }

    #[test]
    fn locale_from_chat_locale_or_lang() {
        let base = [("CHAT_ID", "1"), ("CHAT_USER", "a")];
        let with = |extra: &[(&'static str, &'static str)]| {
            let mut vars = base.to_vec();
            vars.extend_from_slice(extra);
            load(&vars).unwrap().locale
        };
        assert_eq!(with(&[("CHAT_LOCALE", "de_DE.UTF-8")]), Locale::de_DE);
        assert_eq!(with(&[("LANG", "fr_FR.UTF-8")]), Locale::fr_FR);
        assert_eq!(with(&[("LANG", "C.UTF-8")]), Locale::POSIX);
        assert_eq!(with(&[("LANG", "nonsense")]), Locale::en_US);
        assert_eq!(with(&[("CHAT_LOCALE", "en_GB"), ("LANG", "fr_FR")]), Locale::en_GB);
    }
}
