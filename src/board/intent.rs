//! Mutation intents handed to whoever persists the board

use serde::{Deserialize, Serialize};

use super::demand::Regional;
use crate::error::JournalError;

/// A mutation the board applied, for the collaborator to persist or ignore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "camelCase")]
pub enum BoardIntent {
    #[serde(rename_all = "camelCase")]
    Assign { member_id: String, demand_id: String },

    #[serde(rename_all = "camelCase")]
    Unassign { member_id: String, demand_id: String },

    #[serde(rename_all = "camelCase")]
    UpdateRegional {
        member_id: String,
        demand_id: String,
        regional: Regional,
    },
}

impl BoardIntent {
    pub fn label(&self) -> &'static str {
        match self {
            BoardIntent::Assign { .. } => "assign",
            BoardIntent::Unassign { .. } => "unassign",
            BoardIntent::UpdateRegional { .. } => "updateRegional",
        }
    }

    pub fn member_id(&self) -> &str {
        match self {
            BoardIntent::Assign { member_id, .. }
            | BoardIntent::Unassign { member_id, .. }
            | BoardIntent::UpdateRegional { member_id, .. } => member_id,
        }
    }

    pub fn demand_id(&self) -> &str {
        match self {
            BoardIntent::Assign { demand_id, .. }
            | BoardIntent::Unassign { demand_id, .. }
            | BoardIntent::UpdateRegional { demand_id, .. } => demand_id,
        }
    }
}

/// Receiver of mutation intents. The board never waits on the outcome.
pub trait IntentSink {
    fn emit(&mut self, intent: &BoardIntent) -> Result<(), JournalError>;
}

impl IntentSink for Vec<BoardIntent> {
    fn emit(&mut self, intent: &BoardIntent) -> Result<(), JournalError> {
        self.push(intent.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::demand::RegionCode;

    #[test]
    fn test_intent_wire_shape() {
        let intent = BoardIntent::UpdateRegional {
            member_id: "1".into(),
            demand_id: "d2".into(),
            regional: Regional::new(RegionCode::Rsi, RegionCode::Rsc),
        };
        let value = serde_json::to_value(&intent).unwrap();
        assert_eq!(value["intent"], "updateRegional");
        assert_eq!(value["memberId"], "1");
        assert_eq!(value["demandId"], "d2");
        assert_eq!(value["regional"]["primary"], "RSI");
    }
}
