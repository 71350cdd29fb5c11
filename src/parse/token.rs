use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{MentionKind, MentionToken};

/// Matches one whole token and nothing else
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@\[(task|file|user):([^\]]+)\]$").expect("token pattern is valid")
});

/// Finds token-shaped substrings anywhere in a string
static SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@\[(?:task|file|user):[^\]]+\]").expect("split pattern is valid")
});

/// A piece of content: either literal text or the exact text of a token.
///
/// Token segments are only token-*shaped*; a segment such as `@[task: ]`
/// still fails [`parse_token`] and is displayed as literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Token(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Text(s) | Segment::Token(s) => s,
        }
    }
}

/// Parse exactly one token. Anything else, including an empty or
/// whitespace-only label, is not a token.
pub fn parse_token(s: &str) -> Option<MentionToken> {
    let caps = TOKEN_RE.captures(s)?;
    let kind = MentionKind::parse(caps.get(1)?.as_str())?;
    let label = caps.get(2)?.as_str();
    if label.trim().is_empty() {
        return None;
    }
    Some(MentionToken::new(kind, label))
}

/// Split content into text and token segments. Concatenating the
/// segments reproduces `s` exactly; empty text segments are omitted.
pub fn split_segments(s: &str) -> Vec<Segment<'_>> {
    split_with_ranges(s).into_iter().map(|(seg, _)| seg).collect()
}

/// Like [`split_segments`], also returning each segment's byte range.
pub fn split_with_ranges(s: &str) -> Vec<(Segment<'_>, Range<usize>)> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in SPLIT_RE.find_iter(s) {
        if m.start() > last {
            out.push((Segment::Text(&s[last..m.start()]), last..m.start()));
        }
        out.push((Segment::Token(m.as_str()), m.range()));
        last = m.end();
    }
    if last < s.len() {
        out.push((Segment::Text(&s[last..]), last..s.len()));
    }
    out
}

/// True if the content contains at least one valid token
pub fn has_mentions(s: &str) -> bool {
    SPLIT_RE.find_iter(s).any(|m| parse_token(m.as_str()).is_some())
}

/// All valid tokens in order of appearance
pub fn extract_mentions(s: &str) -> Vec<MentionToken> {
    SPLIT_RE
        .find_iter(s)
        .filter_map(|m| parse_token(m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_valid_token() {
        assert_eq!(
            parse_token("@[task:Ship it]"),
            Some(MentionToken::new(MentionKind::Task, "Ship it"))
        );
        assert_eq!(
            parse_token("@[user: Sam ]"),
            Some(MentionToken::new(MentionKind::User, " Sam "))
        );
    }

    #[test]
    fn test_parse_rejects_empty_label() {
        assert_eq!(parse_token("@[task:]"), None);
        assert_eq!(parse_token("@[task:   ]"), None);
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert_eq!(parse_token("@[unknown:x]"), None);
        assert_eq!(parse_token("@[Task:x]"), None);
    }

    #[test]
    fn test_parse_rejects_surrounding_text() {
        assert_eq!(parse_token(" @[task:x]"), None);
        assert_eq!(parse_token("@[task:x] "), None);
        assert_eq!(parse_token("@[task:x]]"), None);
    }

    #[test]
    fn test_split_alternates_text_and_tokens() {
        let s = "Ping @[user:Sam] about @[file:Brief.pdf].";
        assert_eq!(
            split_segments(s),
            vec![
                Segment::Text("Ping "),
                Segment::Token("@[user:Sam]"),
                Segment::Text(" about "),
                Segment::Token("@[file:Brief.pdf]"),
                Segment::Text("."),
            ]
        );
    }

    #[test]
    fn test_split_reconcatenates() {
        let cases = [
            "",
            "plain",
            "@[task:a]@[task:b]",
            "a\n@[user:Sam]\n\nb",
            "@[task:]@[bogus:x] @[file:x",
            "email@example.com @[user:Ana]",
        ];
        for s in cases {
            let joined: String = split_segments(s).iter().map(|seg| seg.as_str()).collect();
            assert_eq!(joined, s);
        }
    }

    #[test]
    fn test_split_ranges() {
        let s = "x @[task:y]";
        let parts = split_with_ranges(s);
        assert_eq!(parts[0], (Segment::Text("x "), 0..2));
        assert_eq!(parts[1], (Segment::Token("@[task:y]"), 2..11));
    }

    #[test]
    fn test_extract_mentions_skips_invalid() {
        let s = "@[task:   ] and @[user:Ana] and @[file:Spec.md]";
        assert_eq!(
            extract_mentions(s),
            vec![
                MentionToken::new(MentionKind::User, "Ana"),
                MentionToken::new(MentionKind::File, "Spec.md"),
            ]
        );
        assert!(has_mentions(s));
        assert!(!has_mentions("@[task: ]"));
    }
}
