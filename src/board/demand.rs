//! Demand/assignment buckets and the member references they hold

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::member::deserialize_id;

/// Closed set of region codes a member assignment can be tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionCode {
    Rsi,
    Rsc,
    Rsl,
    Rsn,
    Rso,
    Rse,
    Rmn,
    Rms,
    Rcn,
    Rcs,
}

impl RegionCode {
    pub const ALL: [RegionCode; 10] = [
        RegionCode::Rsi,
        RegionCode::Rsc,
        RegionCode::Rsl,
        RegionCode::Rsn,
        RegionCode::Rso,
        RegionCode::Rse,
        RegionCode::Rmn,
        RegionCode::Rms,
        RegionCode::Rcn,
        RegionCode::Rcs,
    ];

    pub fn code(self) -> &'static str {
        match self {
            RegionCode::Rsi => "RSI",
            RegionCode::Rsc => "RSC",
            RegionCode::Rsl => "RSL",
            RegionCode::Rsn => "RSN",
            RegionCode::Rso => "RSO",
            RegionCode::Rse => "RSE",
            RegionCode::Rmn => "RMN",
            RegionCode::Rms => "RMS",
            RegionCode::Rcn => "RCN",
            RegionCode::Rcs => "RCS",
        }
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RegionCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        RegionCode::ALL
            .into_iter()
            .find(|code| code.code() == upper)
            .ok_or_else(|| format!("unknown region code '{}'", s))
    }
}

/// Primary/secondary region pair attached to one assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Regional {
    #[serde(default)]
    pub primary: Option<RegionCode>,

    #[serde(default)]
    pub secondary: Option<RegionCode>,
}

impl Regional {
    #[cfg(test)]
    pub fn new(primary: RegionCode, secondary: RegionCode) -> Self {
        Self {
            primary: Some(primary),
            secondary: Some(secondary),
        }
    }

    /// Secondary must differ from primary whenever both are set
    pub fn is_valid(&self) -> bool {
        match (self.primary, self.secondary) {
            (Some(p), Some(s)) => p != s,
            _ => true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none()
    }

    pub fn label(&self) -> String {
        match (self.primary, self.secondary) {
            (Some(p), Some(s)) => format!("{}/{}", p, s),
            (Some(p), None) => p.to_string(),
            (None, Some(s)) => format!("-/{}", s),
            (None, None) => String::new(),
        }
    }
}

/// Entry in a demand's `assigned` list.
///
/// Demand boards store bare member ids; assignment boards store the member id
/// together with its regional tags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum MemberRef {
    Bare(#[serde(deserialize_with = "deserialize_id")] String),
    Tracked {
        #[serde(rename = "userId", deserialize_with = "deserialize_id")]
        user_id: String,

        #[serde(default)]
        regional: Regional,
    },
}

impl MemberRef {
    pub fn member_id(&self) -> &str {
        match self {
            MemberRef::Bare(id) => id,
            MemberRef::Tracked { user_id, .. } => user_id,
        }
    }

    pub fn regional(&self) -> Option<&Regional> {
        match self {
            MemberRef::Bare(_) => None,
            MemberRef::Tracked { regional, .. } => Some(regional),
        }
    }
}

/// Which reference form `assign` appends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BoardKind {
    #[default]
    Demand,
    Assignment,
}

impl BoardKind {
    pub fn new_ref(self, member_id: &str) -> MemberRef {
        match self {
            BoardKind::Demand => MemberRef::Bare(member_id.to_string()),
            BoardKind::Assignment => MemberRef::Tracked {
                user_id: member_id.to_string(),
                regional: Regional::default(),
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BoardKind::Demand => "demand",
            BoardKind::Assignment => "assignment",
        }
    }
}

/// A named work bucket holding zero or more assigned members
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Demand {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub assigned: Vec<MemberRef>,
}

impl Demand {
    pub fn contains(&self, member_id: &str) -> bool {
        self.assigned.iter().any(|r| r.member_id() == member_id)
    }

    pub fn position(&self, member_id: &str) -> Option<usize> {
        self.assigned.iter().position(|r| r.member_id() == member_id)
    }

    /// Collapse repeated refs to the same member, keeping the first.
    /// Returns how many refs were dropped.
    pub fn dedupe(&mut self) -> usize {
        let before = self.assigned.len();
        let mut seen = HashSet::new();
        self.assigned
            .retain(|r| seen.insert(r.member_id().to_string()));
        before - self.assigned.len()
    }
}
