//! Drag session state machine.
//!
//! ```text
//! Idle --begin--> Dragging --release(Some)--> Dropped --> Idle
//!                    |  \--release(None) / cancel / pointer_lost--> Idle
//!                    \--hover--> Dragging
//! ```
//!
//! Every exit path from `Dragging` ends in `Idle`; `Dropped` only exists while
//! the drop callback runs.

use tracing::debug;

/// Observable phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Dropped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        member_id: String,
        hover: Option<String>,
    },
    Dropped {
        member_id: String,
        target: String,
    },
}

/// How a drag gesture ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEnd {
    /// Released over a column; the drop callback ran
    Dropped { member_id: String, target: String },
    /// Released outside any column, cancelled, or the pointer was lost
    Cancelled,
    /// Nothing was being dragged
    NotDragging,
}

/// Tracks which member card is currently being dragged
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        match self.state {
            DragState::Idle => DragPhase::Idle,
            DragState::Dragging { .. } => DragPhase::Dragging,
            DragState::Dropped { .. } => DragPhase::Dropped,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Id of the member being dragged, if any
    pub fn active_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { member_id, .. } | DragState::Dropped { member_id, .. } => {
                Some(member_id)
            }
            DragState::Idle => None,
        }
    }

    /// Column currently under the pointer
    pub fn hover_target(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { hover, .. } => hover.as_deref(),
            _ => None,
        }
    }

    /// Pick up a member card. A single pointer cannot start a second drag, so
    /// a new `begin` simply replaces whatever session was in flight.
    pub fn begin(&mut self, member_id: impl Into<String>) {
        let member_id = member_id.into();
        debug!("Drag started for member '{}'", member_id);
        self.state = DragState::Dragging {
            member_id,
            hover: None,
        };
    }

    /// Update the column under the pointer; ignored outside a drag
    pub fn hover(&mut self, target: Option<String>) {
        if let DragState::Dragging { hover, .. } = &mut self.state {
            *hover = target;
        }
    }

    /// End the gesture. With a target, `on_drop(member_id, target)` runs while
    /// the phase is `Dropped` and the session returns to `Idle` afterwards.
    /// Without a target the gesture is cancelled and `on_drop` never runs.
    pub fn release<F>(&mut self, target: Option<&str>, on_drop: F) -> DragEnd
    where
        F: FnOnce(&str, &str),
    {
        let member_id = match std::mem::take(&mut self.state) {
            DragState::Dragging { member_id, .. } => member_id,
            DragState::Idle | DragState::Dropped { .. } => return DragEnd::NotDragging,
        };

        let Some(target) = target else {
            debug!("Drag for member '{}' released outside any column", member_id);
            return DragEnd::Cancelled;
        };

        self.state = DragState::Dropped {
            member_id: member_id.clone(),
            target: target.to_string(),
        };
        on_drop(&member_id, target);
        self.state = DragState::Idle;

        debug!("Member '{}' dropped on '{}'", member_id, target);
        DragEnd::Dropped {
            member_id,
            target: target.to_string(),
        }
    }

    /// Abort the gesture without touching any demand
    pub fn cancel(&mut self) -> DragEnd {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DragEnd::NotDragging,
            _ => {
                debug!("Drag cancelled");
                DragEnd::Cancelled
            }
        }
    }

    /// The pointer left the surface (focus loss, window hidden)
    pub fn pointer_lost(&mut self) -> DragEnd {
        self.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_hover_release() {
        let mut session = DragSession::new();
        assert_eq!(session.phase(), DragPhase::Idle);

        session.begin("1");
        assert_eq!(session.phase(), DragPhase::Dragging);
        assert_eq!(session.active_id(), Some("1"));

        session.hover(Some("d1".to_string()));
        assert_eq!(session.hover_target(), Some("d1"));

        let mut dropped = None;
        let end = session.release(Some("d1"), |member, target| {
            dropped = Some((member.to_string(), target.to_string()));
        });

        assert_eq!(
            end,
            DragEnd::Dropped {
                member_id: "1".into(),
                target: "d1".into()
            }
        );
        assert_eq!(dropped, Some(("1".to_string(), "d1".to_string())));
        assert_eq!(session.phase(), DragPhase::Idle);
        assert_eq!(session.active_id(), None);
    }

    #[test]
    fn test_release_without_target_cancels() {
        let mut session = DragSession::new();
        session.begin("1");

        let mut called = false;
        let end = session.release(None, |_, _| called = true);

        assert_eq!(end, DragEnd::Cancelled);
        assert!(!called);
        assert_eq!(session.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_every_exit_clears_active_id() {
        let mut session = DragSession::new();

        session.begin("1");
        assert_eq!(session.cancel(), DragEnd::Cancelled);
        assert!(session.active_id().is_none());

        session.begin("2");
        assert_eq!(session.pointer_lost(), DragEnd::Cancelled);
        assert!(session.active_id().is_none());
        assert!(session.hover_target().is_none());
    }

    #[test]
    fn test_idle_operations_are_noops() {
        let mut session = DragSession::new();
        session.hover(Some("d1".to_string()));
        assert!(session.hover_target().is_none());
        assert_eq!(session.cancel(), DragEnd::NotDragging);
        assert_eq!(session.release(Some("d1"), |_, _| {}), DragEnd::NotDragging);
    }
}
