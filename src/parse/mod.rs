pub mod query;
pub mod token;

pub use query::{MentionQuery, detect_mention_query, floor_char_boundary};
pub use token::{
    Segment, extract_mentions, has_mentions, parse_token, split_segments, split_with_ranges,
};
