//! Rendered chat transcript: append-only, reset only by a clear.

use chrono::{DateTime, Locale, TimeZone, Timelike};
use std::fmt;

pub const PLACEHOLDER_TEXT: &str = "Send your first message";

/// `"<Mon>. <Day>, <Year>, <Hour>:<Minute> <a.m.|p.m.>"` on a 12-hour clock,
/// with the month abbreviated in `locale`.
pub fn format_timestamp<Tz>(t: &DateTime<Tz>, locale: Locale) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let month = t.format_localized("%b", locale).to_string();
    let (pm, hour) = t.hour12();
    format!(
        "{}. {}, {}:{:02} {}",
        month.trim_end_matches('.'),
        t.format("%-d, %Y"),
        hour,
        t.minute(),
        if pm { "p.m." } else { "a.m." }
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Someone else's message.
    Left,
    /// The viewer's own message.
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLink {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub timestamp: String,
    pub alignment: Alignment,
    /// `Me` for the viewer, otherwise the sender's username.
    pub author: String,
    pub avatar: Option<String>,
    pub attachments: Vec<AttachmentLink>,
    pub text: String,
}

impl MessageEntry {
    /// Author and text as shown in the bubble, e.g. `Me: hi`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.author, self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Placeholder,
    Message(MessageEntry),
    Notice(String),
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptEntry::Placeholder => f.write_str(PLACEHOLDER_TEXT),
            TranscriptEntry::Notice(text) => f.write_str(text),
            TranscriptEntry::Message(m) => {
                write!(f, "[{}] {}:", m.timestamp, m.author)?;
                for link in &m.attachments {
                    write!(f, " <{}>", link.href)?;
                }
                if !m.text.is_empty() {
                    write!(f, " {}", m.text)?;
                }
                Ok(())
            }
        }
    }
}

/// Ordered list of rendered entries plus the scroll position of the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    scroll: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript of a room with no messages yet.
    pub fn empty_room() -> Self {
        let mut t = Self::new();
        t.push(TranscriptEntry::Placeholder);
        t
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Append and pin the view to the bottom.
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
        self.scroll = self.entries.len();
    }

    /// Drop everything and show the placeholder.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.push(TranscriptEntry::Placeholder);
    }

    #[cfg(test)]
    pub(crate) fn scroll_to(&mut self, position: usize) {
        self.scroll = position.min(self.entries.len());
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll == self.entries.len()
    }
}
