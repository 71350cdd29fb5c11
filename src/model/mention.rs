use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of entity a mention points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionKind {
    Task,
    File,
    User,
}

impl MentionKind {
    /// Group order used by the suggestion dropdown
    pub const ALL: [MentionKind; 3] = [MentionKind::Task, MentionKind::File, MentionKind::User];

    pub fn as_str(self) -> &'static str {
        match self {
            MentionKind::Task => "task",
            MentionKind::File => "file",
            MentionKind::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<MentionKind> {
        match s {
            "task" => Some(MentionKind::Task),
            "file" => Some(MentionKind::File),
            "user" => Some(MentionKind::User),
            _ => None,
        }
    }

    /// Heading shown above this kind's group in the dropdown
    pub fn group_title(self) -> &'static str {
        match self {
            MentionKind::Task => "Tasks",
            MentionKind::File => "Files",
            MentionKind::User => "People",
        }
    }
}

impl fmt::Display for MentionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A parsed `@[kind:label]` token. The label is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MentionToken {
    #[serde(rename = "type")]
    pub kind: MentionKind,
    pub label: String,
}

impl MentionToken {
    pub fn new(kind: MentionKind, label: impl Into<String>) -> Self {
        MentionToken {
            kind,
            label: label.into(),
        }
    }

    /// Canonical text encoding, `@[kind:label]`
    pub fn encode(&self) -> String {
        format!("@[{}:{}]", self.kind, self.label)
    }
}

impl fmt::Display for MentionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@[{}:{}]", self.kind, self.label)
    }
}

/// An entry in the suggestion catalog supplied by the embedding screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionItem {
    #[serde(rename = "type")]
    pub kind: MentionKind,
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl MentionItem {
    pub fn new(kind: MentionKind, id: impl Into<String>, label: impl Into<String>) -> Self {
        MentionItem {
            kind,
            id: id.into(),
            label: label.into(),
            meta: None,
            completed: false,
            avatar: None,
        }
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar = Some(url.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// The token inserted when this item is picked. `]` and line breaks
    /// cannot appear inside a token label, so they are dropped.
    pub fn token(&self) -> MentionToken {
        let label: String = self
            .label
            .chars()
            .filter(|&c| c != ']' && c != '\n' && c != '\r')
            .collect();
        MentionToken::new(self.kind, label)
    }
}
