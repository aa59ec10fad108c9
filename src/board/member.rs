//! Member registry: normalizes raw user records into board members.
//!
//! Upstream records name their identifier either `id` or `_id`, sometimes
//! wrapped as a Mongo `{"$oid": "..."}` object. Everything past this module
//! only ever sees the canonical `Member::id`.

use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A normalized team-roster entry available for assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Member {
    /// Canonical identifier, whatever key the upstream record used
    pub id: String,

    /// Display name formatted as "First Last"
    pub name: String,

    /// Avatar URL, if the record carried one
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Read-only roster of members for one project, sorted by display name
#[derive(Debug, Clone, Default)]
pub struct MemberRegistry {
    members: Vec<Member>,
}

impl MemberRegistry {
    /// Build the roster from raw user records, keeping only users of `project_id`.
    ///
    /// Records without an identifier or with a blank name are skipped. When the
    /// same id shows up twice the first record wins.
    pub fn from_records(records: &[Value], project_id: &str) -> Self {
        let mut seen = HashSet::new();
        let mut members = Vec::new();

        for record in records {
            let Some(id) = record_id(record) else {
                warn!("Skipping user record without an id");
                continue;
            };
            if !belongs_to_project(record, project_id) {
                continue;
            }
            let name = record
                .get("name")
                .and_then(Value::as_str)
                .map(format_display_name)
                .unwrap_or_default();
            if name.is_empty() {
                warn!("Skipping user '{}' with a blank name", id);
                continue;
            }
            if !seen.insert(id.clone()) {
                debug!("Duplicate user record '{}' ignored", id);
                continue;
            }
            let avatar = record
                .get("avatar")
                .and_then(Value::as_str)
                .filter(|url| !url.trim().is_empty())
                .map(str::to_string);

            members.push(Member { id, name, avatar });
        }

        members.sort_by(|a, b| compare_names(&a.name, &b.name));
        debug!(
            "Registry built with {} members for project '{}'",
            members.len(),
            project_id
        );
        Self { members }
    }

    /// Wrap members that are already normalized (sorted here regardless)
    #[cfg(test)]
    pub fn from_members(mut members: Vec<Member>) -> Self {
        members.sort_by(|a, b| compare_names(&a.name, &b.name));
        Self { members }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Format a free-text name as "First Last", title-casing both tokens.
///
/// `"MARIA DA SILVA"` becomes `"Maria Silva"`; a single token is kept alone.
pub fn format_display_name(raw: &str) -> String {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    match tokens.as_slice() {
        [] => String::new(),
        [only] => title_case(only),
        [first, .., last] => format!("{} {}", title_case(first), title_case(last)),
    }
}

fn title_case(token: &str) -> String {
    let lower = token.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Locale-friendly ordering: accents and case are ignored first, then the
/// raw strings break ties so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Extract an identifier from `id`, `_id`, or a Mongo `{"$oid": ..}` wrapper
pub fn record_id(record: &Value) -> Option<String> {
    ["id", "_id"]
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(id_value)
}

/// Serde adapter so demand, ref and project ids accept the same shapes as
/// user records: strings, numbers and `{"$oid": ..}`.
pub(super) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_value(&value).ok_or_else(|| {
        de::Error::custom(format!(
            "expected a string, number or {{\"$oid\": ..}} id, found {}",
            value
        ))
    })
}

fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(id_value),
        _ => None,
    }
}

fn belongs_to_project(record: &Value, project_id: &str) -> bool {
    let matches = |value: &Value| {
        id_value(value)
            .or_else(|| record_id(value))
            .is_some_and(|id| id == project_id)
    };

    if ["project", "projectId"]
        .iter()
        .filter_map(|key| record.get(*key))
        .any(matches)
    {
        return true;
    }

    record
        .get("projects")
        .and_then(Value::as_array)
        .is_some_and(|projects| projects.iter().any(matches))
}
