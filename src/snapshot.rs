//! Point-in-time board snapshot delivered by the data collaborator

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::board::{AssignmentBoard, BoardKind, Demand, Project};
use crate::error::SnapshotError;

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct BoardSnapshot {
    /// Selected project; without one the roster stays empty
    #[serde(default)]
    pub project: Option<Project>,

    /// `demand` boards hold bare ids, `assignment` boards carry regional tags
    #[serde(default)]
    pub kind: BoardKind,

    /// Raw user records; only `id`/`_id`, `name`, `avatar` and project keys are read
    #[serde(default)]
    pub members: Vec<Value>,

    #[serde(default, alias = "assignments")]
    pub demands: Vec<Demand>,
}

impl BoardSnapshot {
    /// Load a snapshot; `.yaml`/`.yml` files are read as YAML, anything else as JSON
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|e| SnapshotError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let snapshot: BoardSnapshot = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        info!(
            "Loaded snapshot {} ({} user records, {} demands)",
            path.display(),
            snapshot.members.len(),
            snapshot.demands.len()
        );
        Ok(snapshot)
    }

    pub fn into_board(self) -> AssignmentBoard {
        AssignmentBoard::new(self.project, self.kind, &self.members, self.demands)
    }
}
