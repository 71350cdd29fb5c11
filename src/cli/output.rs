use serde::Serialize;

use crate::dom::BadgeVisual;
use crate::model::{MentionItem, MentionKind, MentionToken};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RenderJson {
    /// True when the content had no tokens and passed through untouched
    pub plain: bool,
    pub lines: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<BadgeJson>,
}

#[derive(Serialize)]
pub struct BadgeJson {
    #[serde(flatten)]
    pub token: MentionToken,
    pub row: u16,
    pub col_start: u16,
    pub col_end: u16,
    pub visual: VisualJson,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VisualJson {
    Icon { kind: MentionKind },
    Avatar { url: String },
    Initials { text: String },
}

impl From<&BadgeVisual> for VisualJson {
    fn from(visual: &BadgeVisual) -> Self {
        match visual {
            BadgeVisual::Icon(kind) => VisualJson::Icon { kind: *kind },
            BadgeVisual::Avatar(url) => VisualJson::Avatar { url: url.clone() },
            BadgeVisual::Initials(text) => VisualJson::Initials { text: text.clone() },
        }
    }
}

#[derive(Serialize)]
pub struct MentionJson {
    #[serde(flatten)]
    pub token: MentionToken,
    /// The token as stored, e.g. `@[task:Ship it]`
    pub text: String,
}

impl From<MentionToken> for MentionJson {
    fn from(token: MentionToken) -> Self {
        MentionJson {
            text: token.encode(),
            token,
        }
    }
}

#[derive(Serialize)]
pub struct ItemsJson<'a> {
    pub query: Option<&'a str>,
    pub items: Vec<&'a MentionItem>,
}

#[derive(Serialize)]
pub struct AvatarJson<'a> {
    pub label: &'a str,
    pub avatar_url: &'a str,
}

#[derive(Serialize)]
pub struct CommentJson {
    pub author: String,
    pub content: String,
    pub mentions: Vec<MentionJson>,
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One line per item: kind, id, label, then meta
pub fn format_item_line(item: &MentionItem) -> String {
    let mut line = format!("{:<4}  {:<8}  {}", item.kind, item.id, item.label);
    if let Some(ref meta) = item.meta {
        line.push_str(&format!("  ({})", meta));
    }
    if item.completed {
        line.push_str("  [done]");
    }
    line
}
