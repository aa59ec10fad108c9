//! Check command - prints a plain-text summary of a snapshot

use anyhow::{Context, Result};

use super::CheckArgs;
use crate::board::AssignmentBoard;
use crate::snapshot::BoardSnapshot;

pub fn execute(args: CheckArgs) -> Result<()> {
    let snapshot = BoardSnapshot::load(&args.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
    let mut board = snapshot.into_board();
    if let Some(query) = args.query {
        board.set_query(query);
    }

    print!("{}", render_summary(&board));
    Ok(())
}

/// Demands with their members, then the filtered roster with assignment counts
pub fn render_summary(board: &AssignmentBoard) -> String {
    let mut out = String::new();

    let project = board
        .project()
        .map(|p| p.name.clone().unwrap_or_else(|| p.id.clone()))
        .unwrap_or_else(|| "(no project)".to_string());
    out.push_str(&format!("{} · {} board\n\n", project, board.kind().label()));

    out.push_str("Demands:\n");
    for demand in board.demands() {
        out.push_str(&format!("  {} ({})\n", demand.name, demand.assigned.len()));
        for entry in &demand.assigned {
            let name = board
                .registry()
                .get(entry.member_id())
                .map(|m| m.name.clone())
                .unwrap_or_else(|| format!("?{}", entry.member_id()));
            match entry.regional().filter(|r| !r.is_empty()) {
                Some(regional) => {
                    out.push_str(&format!("    - {} [{}]\n", name, regional.label()))
                }
                None => out.push_str(&format!("    - {}\n", name)),
            }
        }
    }
    out.push('\n');

    let members = board.filtered_members();
    out.push_str(&format!(
        "Members ({}/{}):\n",
        members.len(),
        board.registry().len()
    ));
    if board.registry().is_empty() {
        out.push_str("  (none)\n");
    }
    let counts = board.assignment_counts();
    for member in members {
        let count = counts.get(&member.id).copied().unwrap_or(0);
        out.push_str(&format!("  {}: {}\n", member.name, count));
    }

    out
}
