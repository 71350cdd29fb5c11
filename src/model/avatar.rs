use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A display name paired with the avatar shown for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarEntry {
    pub label: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl AvatarEntry {
    pub fn new(label: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        AvatarEntry {
            label: label.into(),
            avatar_url: Some(avatar_url.into()),
        }
    }
}

/// Resolves a user mention's label to an avatar URL.
///
/// Labels are matched after [`normalize_label`]. When the same normalized
/// label maps to two different URLs the label is dropped: a mention only
/// carries a display name, so an ambiguous name has no known avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionUserAvatarLookup {
    urls: HashMap<String, String>,
}

impl MentionUserAvatarLookup {
    pub fn build<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a AvatarEntry>,
    {
        // None marks a label seen with conflicting URLs
        let mut seen: HashMap<String, Option<String>> = HashMap::new();
        for entry in entries {
            let url = match entry.avatar_url.as_deref().map(str::trim) {
                Some(u) if !u.is_empty() => u,
                _ => continue,
            };
            let key = normalize_label(&entry.label);
            if key.is_empty() {
                continue;
            }
            match seen.get_mut(&key) {
                None => {
                    seen.insert(key, Some(url.to_string()));
                }
                Some(slot) => {
                    if slot.as_deref() != Some(url) {
                        if slot.is_some() {
                            tracing::debug!(label = %key, "dropping ambiguous avatar label");
                        }
                        *slot = None;
                    }
                }
            }
        }

        let urls = seen
            .into_iter()
            .filter_map(|(k, v)| v.map(|url| (k, url)))
            .collect();
        MentionUserAvatarLookup { urls }
    }

    /// Avatar URL for a mention label, if exactly one is known
    pub fn get(&self, label: &str) -> Option<&str> {
        self.urls.get(&normalize_label(label)).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Entries sorted by normalized label
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = self
            .urls
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        out.sort();
        out
    }
}

/// Trim, collapse internal whitespace, lowercase.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Up to two uppercase initials taken from the label's first words.
pub fn initials(label: &str) -> String {
    let out: String = label
        .split_whitespace()
        .take(2)
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if out.is_empty() { "?".to_string() } else { out }
}
