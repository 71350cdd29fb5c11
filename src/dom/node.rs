use crate::model::{MentionKind, MentionToken, MentionUserAvatarLookup, initials};

/// One node of the editable tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    /// Explicit line break, extracted as `\n`
    Break,
    /// Atomic, non-editable mention
    Badge(Badge),
    /// Nested block-level container. Extraction puts a line break in front
    /// of it unless the text before already ends with one.
    Block(Vec<Node>),
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn is_badge(&self) -> bool {
        matches!(self, Node::Badge(_))
    }
}

/// The inline visual for a mention token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// The exact token text this badge was built from
    pub token_text: String,
    pub token: MentionToken,
    pub visual: BadgeVisual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeVisual {
    /// Task or file icon
    Icon(MentionKind),
    /// User with a known avatar
    Avatar(String),
    /// User without a known avatar
    Initials(String),
}

impl Badge {
    pub fn new(
        token_text: impl Into<String>,
        token: MentionToken,
        avatars: Option<&MentionUserAvatarLookup>,
    ) -> Self {
        let visual = badge_visual(&token, avatars);
        Badge {
            token_text: token_text.into(),
            token,
            visual,
        }
    }

    pub fn label(&self) -> &str {
        &self.token.label
    }
}

/// Icon for tasks and files; avatar or initials for users.
pub fn badge_visual(token: &MentionToken, avatars: Option<&MentionUserAvatarLookup>) -> BadgeVisual {
    match token.kind {
        MentionKind::Task | MentionKind::File => BadgeVisual::Icon(token.kind),
        MentionKind::User => match avatars.and_then(|a| a.get(&token.label)) {
            Some(url) => BadgeVisual::Avatar(url.to_string()),
            None => BadgeVisual::Initials(initials(&token.label)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AvatarEntry;

    #[test]
    fn test_user_badge_prefers_avatar() {
        let lookup = MentionUserAvatarLookup::build(&[AvatarEntry::new("Sam Lee", "sam.png")]);
        let token = MentionToken::new(MentionKind::User, "Sam Lee");
        assert_eq!(
            badge_visual(&token, Some(&lookup)),
            BadgeVisual::Avatar("sam.png".into())
        );
        assert_eq!(
            badge_visual(&token, None),
            BadgeVisual::Initials("SL".into())
        );
    }

    #[test]
    fn test_task_badge_uses_icon() {
        let token = MentionToken::new(MentionKind::Task, "Ship it");
        assert_eq!(
            badge_visual(&token, None),
            BadgeVisual::Icon(MentionKind::Task)
        );
    }
}
