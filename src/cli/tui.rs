//! TUI command - launches the interactive terminal UI

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use super::TuiArgs;
use crate::config::Config;
use crate::error::BoardError;
use crate::journal::IntentJournal;
use crate::snapshot::BoardSnapshot;
use crate::tui::{run_tui, TuiConfig};

pub fn execute(args: TuiArgs) -> Result<()> {
    let config = prepare_session(&args)?;
    run_tui(config)
}

/// Load config, snapshot and journal before the terminal is taken over
fn prepare_session(args: &TuiArgs) -> Result<TuiConfig, BoardError> {
    let config = Config::load_or_default(&args.config)?;
    config.validate()?;

    let snapshot = BoardSnapshot::load(&args.snapshot)?;
    let project_id = snapshot.project.as_ref().map(|p| p.id.clone());
    let board = snapshot.into_board();

    let journal = match journal_path(args, &config) {
        Some(path) => {
            info!("Journaling applied changes to {}", path.display());
            Some(IntentJournal::open(&path, project_id)?)
        }
        None => None,
    };

    Ok(TuiConfig {
        board,
        journal,
        mobile_breakpoint: config.mobile_breakpoint,
        mouse: config.mouse,
        tick: Duration::from_millis(config.tick_ms),
    })
}

fn journal_path(args: &TuiArgs, config: &Config) -> Option<PathBuf> {
    args.journal.clone().or_else(|| config.journal.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: &std::path::Path, journal: Option<PathBuf>) -> TuiArgs {
        TuiArgs {
            snapshot: dir.join("board.json"),
            config: dir.join("teamboard.yaml"),
            journal,
        }
    }

    #[test]
    fn test_journal_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            journal: Some(PathBuf::from("from-config.jsonl")),
            ..Default::default()
        };

        let flagged = args(dir.path(), Some(PathBuf::from("from-flag.jsonl")));
        assert_eq!(
            journal_path(&flagged, &config),
            Some(PathBuf::from("from-flag.jsonl"))
        );

        let plain = args(dir.path(), None);
        assert_eq!(
            journal_path(&plain, &config),
            Some(PathBuf::from("from-config.jsonl"))
        );
    }

    #[test]
    fn test_prepare_session_reports_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("board.json"), "{}").unwrap();
        std::fs::write(dir.path().join("teamboard.yaml"), "tick_ms: 0\n").unwrap();

        let err = prepare_session(&args(dir.path(), None)).err().unwrap();
        assert!(matches!(err, BoardError::Config(_)));
    }

    #[test]
    fn test_prepare_session_opens_journal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("board.json"),
            r#"{"project": {"id": "p1"}, "demands": [{"id": "d1", "name": "Suporte"}]}"#,
        )
        .unwrap();
        let journal = dir.path().join("out/intents.jsonl");

        let session = prepare_session(&args(dir.path(), Some(journal.clone()))).unwrap();
        assert_eq!(session.board.demands().len(), 1);
        assert_eq!(session.mobile_breakpoint, 100);
        assert!(journal.exists());
    }
}
