//! Live text filter over the roster

use super::member::Member;

/// Members whose display name contains `query`, ignoring case.
///
/// Plain substring match; an empty query returns every member in roster order.
pub fn filter_members<'a>(members: &'a [Member], query: &str) -> Vec<&'a Member> {
    if query.is_empty() {
        return members.iter().collect();
    }
    let needle = query.to_lowercase();
    members
        .iter()
        .filter(|m| m.name.to_lowercase().contains(&needle))
        .collect()
}
