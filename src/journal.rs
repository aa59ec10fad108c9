//! Append-only JSON-lines log of applied board mutations

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::board::{BoardIntent, IntentSink};
use crate::error::JournalError;

#[derive(Serialize)]
struct JournalEntry<'a> {
    at: DateTime<Utc>,
    project: Option<&'a str>,
    #[serde(flatten)]
    intent: &'a BoardIntent,
}

pub struct IntentJournal {
    path: PathBuf,
    project: Option<String>,
    writer: BufWriter<File>,
}

impl IntentJournal {
    pub fn open(path: &Path, project: Option<String>) -> Result<Self, JournalError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| JournalError::Open {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| JournalError::Open {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            project,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IntentSink for IntentJournal {
    fn emit(&mut self, intent: &BoardIntent) -> Result<(), JournalError> {
        let entry = JournalEntry {
            at: Utc::now(),
            project: self.project.as_deref(),
            intent,
        };
        serde_json::to_writer(&mut self.writer, &entry)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        debug!(
            "Journaled {} for '{}' in '{}'",
            intent.label(),
            intent.member_id(),
            intent.demand_id()
        );
        Ok(())
    }
}
