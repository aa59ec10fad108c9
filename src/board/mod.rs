//! Assignment board core.
//!
//! Pure in-memory state for one board session: the member roster, the
//! demand buckets, the drag session and the derived views. Nothing in here
//! performs I/O; applied mutations are queued as intents for the caller.

mod demand;
mod drag;
mod intent;
mod member;
mod orchestrator;
mod regional;
mod search;
mod viewport;

pub use demand::{BoardKind, Demand};
pub use drag::{DragEnd, DragPhase};
pub use intent::{BoardIntent, IntentSink};
pub use member::MemberRegistry;
pub use orchestrator::{AssignmentBoard, Mutation, Project};
pub use regional::{RegionalWizard, WizardStep};
pub use viewport::{LayoutMode, ResizeSubscription, ViewportMonitor};

#[cfg(test)]
pub use demand::{MemberRef, RegionCode, Regional};
