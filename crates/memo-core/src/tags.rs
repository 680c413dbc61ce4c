//! Tag list policies shared by generation and orchestration.

use std::collections::HashSet;

/// Merge user-authored tags with generated tags.
///
/// User tags come first, then generated ones. The first occurrence of a tag
/// wins and equality is case-sensitive, so the output never holds duplicates.
pub fn merge_tags(user: &[String], generated: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(user.len() + generated.len());
    let mut merged = Vec::with_capacity(user.len() + generated.len());

    for tag in user.iter().chain(generated.iter()) {
        if seen.insert(tag.as_str()) {
            merged.push(tag.clone());
        }
    }

    merged
}

/// Keep at most `max` tags, preserving order.
pub fn clamp_tags(mut tags: Vec<String>, max: usize) -> Vec<String> {
    tags.truncate(max);
    tags
}
