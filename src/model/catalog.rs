use serde::{Deserialize, Serialize};

use super::avatar::{AvatarEntry, MentionUserAvatarLookup};
use super::mention::{MentionItem, MentionKind};

/// Everything a comment composer can mention, as loaded from a catalog file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub members: Vec<MemberEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Catalog {
    /// Suggestion items, tasks first, then files, then members
    pub fn mention_items(&self) -> Vec<MentionItem> {
        let tasks = self.tasks.iter().map(|t| {
            let mut item = MentionItem::new(MentionKind::Task, &t.id, &t.title)
                .completed(t.completed);
            item.meta = t.status.clone();
            item
        });
        let files = self.files.iter().map(|f| {
            let mut item = MentionItem::new(MentionKind::File, &f.id, &f.name);
            item.meta = f.size.map(format_file_size);
            item
        });
        let members = self.members.iter().map(|m| {
            let mut item = MentionItem::new(MentionKind::User, &m.id, &m.name);
            item.meta = m.role.clone();
            item.avatar = m.avatar_url.clone();
            item
        });
        tasks.chain(files).chain(members).collect()
    }

    pub fn avatar_entries(&self) -> Vec<AvatarEntry> {
        self.members
            .iter()
            .map(|m| AvatarEntry {
                label: m.name.clone(),
                avatar_url: m.avatar_url.clone(),
            })
            .collect()
    }

    pub fn avatar_lookup(&self) -> MentionUserAvatarLookup {
        MentionUserAvatarLookup::build(&self.avatar_entries())
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.files.is_empty() && self.members.is_empty()
    }
}

/// Human-readable byte size: `512 B`, `1.2 KB`, `3.4 MB`, `1.0 GB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
