use crate::model::{MentionItem, MentionKind};

/// An in-progress `@query` while the dropdown is live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionSession {
    pub query: String,
    /// Byte offset of the `@` that opened the session
    pub anchor: usize,
    /// Flat index into the filtered list
    pub selected: usize,
}

impl SuggestionSession {
    pub fn new(anchor: usize, query: impl Into<String>) -> Self {
        SuggestionSession {
            query: query.into(),
            anchor,
            selected: 0,
        }
    }

    pub fn move_down(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn move_up(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }
}

/// Indices of the items whose label contains `query` (case-insensitive),
/// ordered tasks, files, users and by catalog order within a kind. This
/// order is both the display order and the flat selection order.
pub fn filter_items(items: &[MentionItem], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    let mut out: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.label.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect();
    out.sort_by_key(|&i| items[i].kind);
    out
}

/// A block of dropdown rows for one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionGroup<'a> {
    pub kind: MentionKind,
    /// (flat index, item)
    pub entries: Vec<(usize, &'a MentionItem)>,
}

/// Split filtered indices into per-kind groups, skipping empty kinds.
pub fn group_suggestions<'a>(items: &'a [MentionItem], filtered: &[usize]) -> Vec<SuggestionGroup<'a>> {
    MentionKind::ALL
        .iter()
        .filter_map(|&kind| {
            let entries: Vec<(usize, &MentionItem)> = filtered
                .iter()
                .enumerate()
                .filter_map(|(flat, &i)| items.get(i).map(|item| (flat, item)))
                .filter(|(_, item)| item.kind == kind)
                .collect();
            (!entries.is_empty()).then_some(SuggestionGroup { kind, entries })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn items() -> Vec<MentionItem> {
        vec![
            MentionItem::new(MentionKind::User, "u1", "Alex Kim"),
            MentionItem::new(MentionKind::Task, "t1", "Align roadmap"),
            MentionItem::new(MentionKind::File, "f1", "alpha.png"),
            MentionItem::new(MentionKind::Task, "t2", "Ship it"),
            MentionItem::new(MentionKind::User, "u2", "Sal"),
        ]
    }

    #[test]
    fn test_filter_is_case_insensitive_and_grouped() {
        let items = items();
        let filtered = filter_items(&items, "AL");
        let labels: Vec<&str> = filtered.iter().map(|&i| items[i].label.as_str()).collect();
        assert_eq!(labels, vec!["Align roadmap", "alpha.png", "Alex Kim", "Sal"]);
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let items = items();
        assert_eq!(filter_items(&items, "").len(), items.len());
        assert!(filter_items(&items, "zzz").is_empty());
    }

    #[test]
    fn test_groups_carry_flat_indices() {
        let items = items();
        let filtered = filter_items(&items, "al");
        let groups = group_suggestions(&items, &filtered);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].kind, MentionKind::Task);
        assert_eq!(groups[1].entries[0].0, 1);
        let user_flat: Vec<usize> = groups[2].entries.iter().map(|(f, _)| *f).collect();
        assert_eq!(user_flat, vec![2, 3]);
    }

    #[test]
    fn test_selection_wraps() {
        let mut session = SuggestionSession::new(0, "a");
        session.move_up(3);
        assert_eq!(session.selected, 2);
        session.move_down(3);
        assert_eq!(session.selected, 0);
        session.move_down(0);
        assert_eq!(session.selected, 0);
    }
}
