//! Board orchestrator: owns the demand mapping for one board session and
//! wires drag gestures, search and regional edits into it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::demand::{BoardKind, Demand, MemberRef, Regional};
use super::drag::{DragEnd, DragSession};
use super::intent::{BoardIntent, IntentSink};
use super::member::{deserialize_id, Member, MemberRegistry};
use super::search::filter_members;
use crate::error::JournalError;

/// The project a board session is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Project {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// Why a mutation left the board untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    UnknownDemand,
    AlreadyAssigned,
    NotAssigned,
    InvalidRegional,
}

impl NoOpReason {
    pub fn label(self) -> &'static str {
        match self {
            NoOpReason::UnknownDemand => "unknown demand",
            NoOpReason::AlreadyAssigned => "already assigned",
            NoOpReason::NotAssigned => "not assigned",
            NoOpReason::InvalidRegional => "secondary region equals primary",
        }
    }
}

/// Result of a board mutation. No-ops are a normal outcome, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    Unchanged(NoOpReason),
}

/// One board session: roster, demands, drag state and search query
#[derive(Debug, Clone)]
pub struct AssignmentBoard {
    project: Option<Project>,
    kind: BoardKind,
    registry: MemberRegistry,
    demands: Vec<Demand>,
    drag: DragSession,
    query: String,
    pending: Vec<BoardIntent>,
}

impl AssignmentBoard {
    /// Seed a session from the collaborator's snapshot.
    ///
    /// Without a project the roster is empty. Repeated refs inside one seeded
    /// demand are collapsed so the no-duplicate rule holds from the start.
    pub fn new(
        project: Option<Project>,
        kind: BoardKind,
        members: &[Value],
        mut demands: Vec<Demand>,
    ) -> Self {
        let registry = match &project {
            Some(project) => MemberRegistry::from_records(members, &project.id),
            None => {
                warn!("No project selected; board roster is empty");
                MemberRegistry::default()
            }
        };

        for demand in &mut demands {
            let dropped = demand.dedupe();
            if dropped > 0 {
                warn!(
                    "Demand '{}' had {} duplicate assignment(s); collapsed",
                    demand.id, dropped
                );
            }
        }

        info!(
            "Board loaded: {} members, {} {}s",
            registry.len(),
            demands.len(),
            kind.label()
        );

        Self {
            project,
            kind,
            registry,
            demands,
            drag: DragSession::new(),
            query: String::new(),
            pending: Vec::new(),
        }
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn kind(&self) -> BoardKind {
        self.kind
    }

    pub fn registry(&self) -> &MemberRegistry {
        &self.registry
    }

    pub fn members(&self) -> &[Member] {
        self.registry.members()
    }

    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    pub fn demand(&self, demand_id: &str) -> Option<&Demand> {
        self.demands.iter().find(|d| d.id == demand_id)
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Add `member_id` to one demand. Other demands are left alone.
    pub fn assign(&mut self, member_id: &str, demand_id: &str) -> Mutation {
        apply_assign(
            &mut self.demands,
            &mut self.pending,
            self.kind,
            member_id,
            demand_id,
        )
    }

    /// Remove `member_id` from exactly the named demand
    pub fn unassign(&mut self, member_id: &str, demand_id: &str) -> Mutation {
        let Some(demand) = self.demands.iter_mut().find(|d| d.id == demand_id) else {
            debug!("Unassign ignored: unknown demand '{}'", demand_id);
            return Mutation::Unchanged(NoOpReason::UnknownDemand);
        };
        let Some(index) = demand.position(member_id) else {
            debug!(
                "Unassign ignored: '{}' not in demand '{}'",
                member_id, demand_id
            );
            return Mutation::Unchanged(NoOpReason::NotAssigned);
        };

        demand.assigned.remove(index);
        info!("Unassigned '{}' from '{}'", member_id, demand_id);
        self.pending.push(BoardIntent::Unassign {
            member_id: member_id.to_string(),
            demand_id: demand_id.to_string(),
        });
        Mutation::Applied
    }

    /// Replace the regional tags on an existing assignment
    pub fn update_regional(
        &mut self,
        member_id: &str,
        demand_id: &str,
        regional: Regional,
    ) -> Mutation {
        if !regional.is_valid() {
            debug!(
                "Regional update ignored for '{}' in '{}': {}",
                member_id,
                demand_id,
                NoOpReason::InvalidRegional.label()
            );
            return Mutation::Unchanged(NoOpReason::InvalidRegional);
        }
        let Some(demand) = self.demands.iter_mut().find(|d| d.id == demand_id) else {
            debug!("Regional update ignored: unknown demand '{}'", demand_id);
            return Mutation::Unchanged(NoOpReason::UnknownDemand);
        };
        let Some(index) = demand.position(member_id) else {
            debug!(
                "Regional update ignored: '{}' not in demand '{}'",
                member_id, demand_id
            );
            return Mutation::Unchanged(NoOpReason::NotAssigned);
        };

        // Bare refs are upgraded so the tags have somewhere to live
        demand.assigned[index] = MemberRef::Tracked {
            user_id: member_id.to_string(),
            regional,
        };
        info!(
            "Regional for '{}' in '{}' set to {}",
            member_id,
            demand_id,
            regional.label()
        );
        self.pending.push(BoardIntent::UpdateRegional {
            member_id: member_id.to_string(),
            demand_id: demand_id.to_string(),
            regional,
        });
        Mutation::Applied
    }

    /// Regional tags for one assignment, if the member is assigned there
    pub fn regional(&self, member_id: &str, demand_id: &str) -> Option<Regional> {
        let demand = self.demand(demand_id)?;
        let index = demand.position(member_id)?;
        Some(demand.assigned[index].regional().copied().unwrap_or_default())
    }

    // Drag wiring

    pub fn begin_drag(&mut self, member_id: &str) {
        self.drag.begin(member_id);
    }

    pub fn hover(&mut self, demand_id: Option<&str>) {
        let target = demand_id
            .filter(|id| self.demands.iter().any(|d| d.id == *id))
            .map(str::to_string);
        self.drag.hover(target);
    }

    /// Finish the drag over `target`. The assignment is applied before the
    /// session returns to idle; `None` cancels without touching demands.
    pub fn drop_on(&mut self, target: Option<&str>) -> (DragEnd, Option<Mutation>) {
        let demands = &mut self.demands;
        let pending = &mut self.pending;
        let kind = self.kind;
        let mut outcome = None;

        let end = self.drag.release(target, |member_id, demand_id| {
            outcome = Some(apply_assign(demands, pending, kind, member_id, demand_id));
        });
        (end, outcome)
    }

    pub fn cancel_drag(&mut self) -> DragEnd {
        self.drag.cancel()
    }

    pub fn pointer_lost(&mut self) -> DragEnd {
        self.drag.pointer_lost()
    }

    // Derived views, recomputed on every call

    pub fn filtered_members(&self) -> Vec<&Member> {
        filter_members(self.registry.members(), &self.query)
    }

    /// Full record of the member being dragged, for the floating preview
    pub fn active_member(&self) -> Option<&Member> {
        self.drag
            .active_id()
            .and_then(|id| self.registry.get(id))
    }

    /// Number of demands `member_id` currently appears in
    pub fn assignment_count(&self, member_id: &str) -> usize {
        self.demands.iter().filter(|d| d.contains(member_id)).count()
    }

    /// Assignment count for every roster member, zero included
    pub fn assignment_counts(&self) -> HashMap<String, usize> {
        self.registry
            .members()
            .iter()
            .map(|m| (m.id.clone(), self.assignment_count(&m.id)))
            .collect()
    }

    // Intents

    #[cfg(test)]
    pub fn pending_intents(&self) -> &[BoardIntent] {
        &self.pending
    }

    pub fn drain_intents(&mut self) -> Vec<BoardIntent> {
        std::mem::take(&mut self.pending)
    }

    /// Forward queued intents to `sink` in order. When the sink fails, the
    /// failing intent and every later one stay queued for the next flush; the
    /// board state is already updated and does not roll back.
    pub fn flush_intents(&mut self, sink: &mut dyn IntentSink) -> Result<usize, JournalError> {
        let mut intents = self.drain_intents().into_iter();
        let mut sent = 0;
        while let Some(intent) = intents.next() {
            if let Err(e) = sink.emit(&intent) {
                self.pending = std::iter::once(intent).chain(intents).collect();
                warn!(
                    "Intent sink failed after {} intent(s); {} kept for retry",
                    sent,
                    self.pending.len()
                );
                return Err(e);
            }
            sent += 1;
        }
        Ok(sent)
    }
}

fn apply_assign(
    demands: &mut [Demand],
    pending: &mut Vec<BoardIntent>,
    kind: BoardKind,
    member_id: &str,
    demand_id: &str,
) -> Mutation {
    let Some(demand) = demands.iter_mut().find(|d| d.id == demand_id) else {
        debug!("Assign ignored: unknown demand '{}'", demand_id);
        return Mutation::Unchanged(NoOpReason::UnknownDemand);
    };
    if demand.contains(member_id) {
        debug!(
            "Assign ignored: '{}' already in demand '{}'",
            member_id, demand_id
        );
        return Mutation::Unchanged(NoOpReason::AlreadyAssigned);
    }

    demand.assigned.push(kind.new_ref(member_id));
    info!("Assigned '{}' to '{}'", member_id, demand_id);
    pending.push(BoardIntent::Assign {
        member_id: member_id.to_string(),
        demand_id: demand_id.to_string(),
    });
    Mutation::Applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::demand::RegionCode;
    use crate::board::drag::DragPhase;
    use serde_json::json;

    fn scenario_board(kind: BoardKind) -> AssignmentBoard {
        let members = vec![
            json!({"id": "1", "name": "Ana Silva", "project": "p1"}),
            json!({"id": "2", "name": "Bruno Costa", "project": "p1"}),
        ];
        let demands = vec![
            Demand {
                id: "d1".into(),
                name: "Suporte".into(),
                assigned: vec![],
            },
            Demand {
                id: "d2".into(),
                name: "Triagem".into(),
                assigned: vec![],
            },
        ];
        let project = Project {
            id: "p1".into(),
            name: None,
        };
        AssignmentBoard::new(Some(project), kind, &members, demands)
    }

    fn ids(board: &AssignmentBoard, demand_id: &str) -> Vec<String> {
        board
            .demand(demand_id)
            .unwrap()
            .assigned
            .iter()
            .map(|r| r.member_id().to_string())
            .collect()
    }

    #[test]
    fn test_assignment_scenario() {
        let mut board = scenario_board(BoardKind::Demand);

        assert_eq!(board.assign("1", "d1"), Mutation::Applied);
        assert_eq!(ids(&board, "d1"), vec!["1"]);

        assert_eq!(board.assign("1", "d2"), Mutation::Applied);
        assert_eq!(ids(&board, "d1"), vec!["1"]);
        assert_eq!(ids(&board, "d2"), vec!["1"]);
        assert_eq!(board.assignment_count("1"), 2);

        assert_eq!(board.unassign("1", "d1"), Mutation::Applied);
        assert!(ids(&board, "d1").is_empty());
        assert_eq!(ids(&board, "d2"), vec!["1"]);
        assert_eq!(board.assignment_count("1"), 1);

        assert_eq!(board.assign("1", "d1"), Mutation::Applied);
        assert_eq!(
            board.assign("1", "d1"),
            Mutation::Unchanged(NoOpReason::AlreadyAssigned)
        );
        assert_eq!(ids(&board, "d1"), vec!["1"]);
    }

    #[test]
    fn test_no_duplicates_over_many_assigns() {
        let mut board = scenario_board(BoardKind::Assignment);
        for _ in 0..5 {
            board.assign("2", "d1");
            board.assign("1", "d1");
        }
        assert_eq!(ids(&board, "d1"), vec!["2", "1"]);
    }

    #[test]
    fn test_unassign_absent_and_unknown() {
        let mut board = scenario_board(BoardKind::Demand);
        assert_eq!(
            board.unassign("1", "d1"),
            Mutation::Unchanged(NoOpReason::NotAssigned)
        );
        assert_eq!(
            board.unassign("1", "nope"),
            Mutation::Unchanged(NoOpReason::UnknownDemand)
        );
        assert_eq!(
            board.assign("1", "nope"),
            Mutation::Unchanged(NoOpReason::UnknownDemand)
        );
        assert!(board.drain_intents().is_empty());
    }

    #[test]
    fn test_counts_match_demands() {
        let mut board = scenario_board(BoardKind::Demand);
        board.assign("1", "d1");
        board.assign("2", "d1");
        board.assign("2", "d2");
        board.unassign("1", "d1");
        board.assign("1", "d2");

        let counts = board.assignment_counts();
        for member in board.members() {
            let expected = board
                .demands()
                .iter()
                .filter(|d| d.assigned.iter().any(|r| r.member_id() == member.id))
                .count();
            assert_eq!(counts[&member.id], expected);
        }
        assert_eq!(counts["1"], 1);
        assert_eq!(counts["2"], 2);
    }

    #[test]
    fn test_regional_update_scenario() {
        let mut board = scenario_board(BoardKind::Assignment);
        board.assign("1", "d2");
        let before = board.demand("d2").cloned();

        let regional = Regional::new(RegionCode::Rsi, RegionCode::Rsc);
        assert_eq!(board.update_regional("1", "d2", regional), Mutation::Applied);
        assert_eq!(board.regional("1", "d2"), Some(regional));

        let snapshot = board.demand("d2").cloned();
        assert_eq!(
            board.update_regional("2", "d2", regional),
            Mutation::Unchanged(NoOpReason::NotAssigned)
        );
        assert_eq!(board.demand("d2").cloned(), snapshot);
        assert_ne!(before, snapshot);
    }

    #[test]
    fn test_regional_upgrades_bare_ref() {
        let mut board = scenario_board(BoardKind::Demand);
        board.assign("1", "d1");
        assert_eq!(board.demand("d1").unwrap().assigned[0], MemberRef::Bare("1".into()));

        let regional = Regional::new(RegionCode::Rmn, RegionCode::Rms);
        board.update_regional("1", "d1", regional);
        assert_eq!(
            board.demand("d1").unwrap().assigned[0],
            MemberRef::Tracked {
                user_id: "1".into(),
                regional
            }
        );
    }

    #[test]
    fn test_regional_rejects_equal_codes() {
        let mut board = scenario_board(BoardKind::Assignment);
        board.assign("1", "d1");
        let bad = Regional::new(RegionCode::Rsi, RegionCode::Rsi);
        assert_eq!(
            board.update_regional("1", "d1", bad),
            Mutation::Unchanged(NoOpReason::InvalidRegional)
        );
        assert_eq!(board.regional("1", "d1"), Some(Regional::default()));
    }

    #[test]
    fn test_drop_assigns_before_idle() {
        let mut board = scenario_board(BoardKind::Demand);
        board.begin_drag("1");
        board.hover(Some("d1"));
        assert_eq!(board.drag().hover_target(), Some("d1"));
        assert_eq!(board.active_member().map(|m| m.name.as_str()), Some("Ana Silva"));

        let (end, outcome) = board.drop_on(Some("d1"));
        assert!(matches!(end, DragEnd::Dropped { .. }));
        assert_eq!(outcome, Some(Mutation::Applied));
        assert_eq!(board.drag().phase(), DragPhase::Idle);
        assert!(board.active_member().is_none());
        assert_eq!(ids(&board, "d1"), vec!["1"]);
    }

    #[test]
    fn test_cancelled_drag_leaves_demands_unchanged() {
        let mut board = scenario_board(BoardKind::Demand);
        board.assign("2", "d2");
        board.drain_intents();
        let before = board.demands().to_vec();

        board.begin_drag("1");
        board.hover(Some("d1"));
        board.hover(None);
        let (end, outcome) = board.drop_on(None);
        assert_eq!(end, DragEnd::Cancelled);
        assert_eq!(outcome, None);
        assert_eq!(board.demands(), before.as_slice());

        board.begin_drag("1");
        board.cancel_drag();
        board.begin_drag("2");
        board.pointer_lost();
        assert_eq!(board.demands(), before.as_slice());
        assert!(board.drag().active_id().is_none());
        assert!(board.drain_intents().is_empty());
    }

    #[test]
    fn test_hover_ignores_unknown_columns() {
        let mut board = scenario_board(BoardKind::Demand);
        board.begin_drag("1");
        board.hover(Some("ghost"));
        assert_eq!(board.drag().hover_target(), None);
    }

    #[test]
    fn test_filtered_members_follow_query() {
        let mut board = scenario_board(BoardKind::Demand);
        assert_eq!(board.filtered_members().len(), 2);
        board.set_query("cos");
        let names: Vec<&str> = board.filtered_members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Bruno Costa"]);
        board.set_query("");
        assert_eq!(board.filtered_members().len(), 2);
    }

    #[test]
    fn test_missing_project_degrades_to_empty() {
        let members = vec![json!({"id": "1", "name": "Ana Silva", "project": "p1"})];
        let board = AssignmentBoard::new(None, BoardKind::Demand, &members, vec![]);
        assert!(board.filtered_members().is_empty());
        assert!(board.assignment_counts().is_empty());
        assert!(board.active_member().is_none());
    }

    #[test]
    fn test_seeded_duplicates_collapsed() {
        let demands = vec![Demand {
            id: "d1".into(),
            name: "Suporte".into(),
            assigned: vec![MemberRef::Bare("1".into()), MemberRef::Bare("1".into())],
        }];
        let project = Project {
            id: "p1".into(),
            name: None,
        };
        let board = AssignmentBoard::new(Some(project), BoardKind::Demand, &[], demands);
        assert_eq!(board.demand("d1").unwrap().assigned.len(), 1);
    }

    #[test]
    fn test_intents_only_for_applied_mutations() {
        let mut board = scenario_board(BoardKind::Assignment);
        board.assign("1", "d1");
        board.assign("1", "d1");
        board.unassign("2", "d1");
        board.update_regional("1", "d1", Regional::new(RegionCode::Rsi, RegionCode::Rsc));

        let mut sink: Vec<BoardIntent> = Vec::new();
        let flushed = board.flush_intents(&mut sink).unwrap();
        assert_eq!(flushed, 2);
        assert!(matches!(sink[0], BoardIntent::Assign { .. }));
        assert!(matches!(sink[1], BoardIntent::UpdateRegional { .. }));
        assert!(board.pending_intents().is_empty());
    }

    /// Accepts `accept` intents, then fails every write
    struct FlakySink {
        accept: usize,
        calls: usize,
        seen: Vec<BoardIntent>,
    }

    impl IntentSink for FlakySink {
        fn emit(&mut self, intent: &BoardIntent) -> Result<(), JournalError> {
            self.calls += 1;
            if self.seen.len() >= self.accept {
                return Err(JournalError::Write(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            self.seen.push(intent.clone());
            Ok(())
        }
    }

    #[test]
    fn test_failed_flush_keeps_unsent_intents() {
        let mut board = scenario_board(BoardKind::Demand);
        board.assign("1", "d1");
        board.assign("2", "d1");
        board.assign("1", "d2");

        let mut flaky = FlakySink {
            accept: 1,
            calls: 0,
            seen: Vec::new(),
        };
        assert!(board.flush_intents(&mut flaky).is_err());
        assert_eq!(flaky.calls, 2);
        assert_eq!(flaky.seen.len(), 1);
        assert_eq!(board.pending_intents().len(), 2);

        let mut healthy: Vec<BoardIntent> = Vec::new();
        assert_eq!(board.flush_intents(&mut healthy).unwrap(), 2);
        assert_eq!(healthy[0].member_id(), "2");
        assert_eq!(healthy[0].demand_id(), "d1");
        assert_eq!(healthy[1].member_id(), "1");
        assert_eq!(healthy[1].demand_id(), "d2");
        assert!(board.pending_intents().is_empty());
    }
}
